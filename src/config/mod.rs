//! Configuration loading and management for the Auto-Enrolment Engine.
//!
//! This module provides the statutory scheme parameters: eligibility
//! thresholds, classification cutoffs, contribution phases, opt-out windows
//! and the staging-date calendar. They can be loaded from YAML files or
//! taken from the built-in statutory default.
//!
//! # Example
//!
//! ```
//! use pension_engine::config::SchemeConfig;
//!
//! let config = SchemeConfig::statutory();
//! println!("Scheme: {}", config.metadata.name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ClassificationThresholds, EligibilityThresholds, OptOutParameters, PhaseRates, SchemeConfig,
    SchemeMetadata, StagingCalendar, StagingFrequency,
};
