//! Error types for the Auto-Enrolment Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during an eligibility assessment.
//!
//! Failed eligibility checks are never errors: the engine reports them as
//! business outcomes inside [`crate::models::EligibilityResult`]. Errors are
//! reserved for malformed input and configuration problems.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Auto-Enrolment Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use pension_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An employee record field was invalid or out of range.
    ///
    /// Used for fail-fast input errors such as negative pay or a
    /// shareholding outside `[0, 1]`. Values are never silently clamped.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A date input was invalid, such as a birth date after the reference date.
    #[error("Invalid date in field '{field}' ({date}): {message}")]
    InvalidDate {
        /// The field that held the invalid date.
        field: String,
        /// The offending date.
        date: NaiveDate,
        /// A description of what made the date invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
