//! Auto-Enrolment Eligibility Engine for the Irish My Future Fund scheme.
//!
//! This crate determines whether statutory pension auto-enrolment applies to
//! an employee record, when it takes effect, and how much each party
//! (employee, employer, state) must contribute across the four escalating
//! contribution phases of the Automatic Enrolment Retirement Savings System
//! Act 2024.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
