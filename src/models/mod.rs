//! Data models for the Auto-Enrolment Engine.
//!
//! This module contains the input and output types of the engine: the
//! normalized [`EmployeeRecord`] consumed from the upload/validation layer
//! and the [`EligibilityResult`] exposed to the reporting and API layers.

mod assessment;
mod employee;

pub use assessment::{CheckOutcome, EligibilityCheck, EligibilityChecks, EligibilityResult};
pub use employee::{
    DirectorDetails, DirectorRole, EmployeeRecord, EmploymentCategory, EmploymentStatus,
    FamilyShareholding, PayFrequency, PayrollRecord,
};
