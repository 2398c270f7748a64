//! Assessment result models for the Auto-Enrolment Engine.
//!
//! This module contains the [`EligibilityResult`] type and its associated
//! structures. The result is the de facto contract with the reporting and
//! API layers: field names and units are stable, and the ordered reasons
//! list forms a complete audit trail of every check the engine ran.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::ContributionResult;

/// Identifies one of the eligibility checks the orchestrator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityCheck {
    /// The statutory age window (23 to 60 inclusive).
    Age,
    /// The ordered employment classification table.
    Classification,
    /// Annualized or projected earnings against the trigger.
    Earnings,
    /// Continuous employment against the waiting period.
    Duration,
    /// Opt-out and re-enrolment status.
    OptOut,
    /// Director and ownership exclusions.
    Exclusion,
    /// Whether the employment is still active.
    EmploymentStatus,
}

/// The outcome of a single eligibility check.
///
/// A failed check is an expected business outcome, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Which check produced this outcome.
    pub check: EligibilityCheck,
    /// Whether the check passed.
    pub passed: bool,
    /// A human-readable reason for the outcome.
    pub reason: String,
}

impl CheckOutcome {
    /// Creates a passed outcome with the given reason.
    pub fn pass(check: EligibilityCheck, reason: impl Into<String>) -> Self {
        Self {
            check,
            passed: true,
            reason: reason.into(),
        }
    }

    /// Creates a failed outcome with the given reason.
    pub fn fail(check: EligibilityCheck, reason: impl Into<String>) -> Self {
        Self {
            check,
            passed: false,
            reason: reason.into(),
        }
    }
}

/// The named outcomes of every check the orchestrator runs.
///
/// All checks are always present; the engine never short-circuits, so a
/// reader can see every pass and fail even when eligibility was already
/// lost on an earlier check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityChecks {
    /// The age-window check.
    pub age: CheckOutcome,
    /// The classification-table check.
    pub classification: CheckOutcome,
    /// The earnings-trigger check.
    pub earnings: CheckOutcome,
    /// The waiting-period check.
    pub duration: CheckOutcome,
    /// The opt-out/re-enrolment check.
    pub opt_out: CheckOutcome,
    /// The director/ownership exclusion check.
    pub exclusion: CheckOutcome,
    /// The employment-status check.
    pub employment_status: CheckOutcome,
}

impl EligibilityChecks {
    /// Returns the outcomes in their fixed assessment order.
    pub fn in_order(&self) -> [&CheckOutcome; 7] {
        [
            &self.age,
            &self.classification,
            &self.earnings,
            &self.duration,
            &self.opt_out,
            &self.exclusion,
            &self.employment_status,
        ]
    }

    /// Returns true only when every check passed.
    pub fn all_passed(&self) -> bool {
        self.in_order().iter().all(|outcome| outcome.passed)
    }
}

/// The complete result of an eligibility assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    /// The ID of the employee the assessment is for.
    pub employee_id: String,
    /// The date the assessment was made against.
    pub assessment_date: NaiveDate,
    /// The final verdict: the logical AND of every check.
    pub is_eligible: bool,
    /// Every check's reason, in the fixed assessment order.
    pub reasons: Vec<String>,
    /// The date eligibility begins, when the waiting period is the only
    /// blocking factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility_date: Option<NaiveDate>,
    /// The next re-enrolment date, for opted-out employees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<NaiveDate>,
    /// The named outcome of every check.
    pub checks: EligibilityChecks,
    /// Non-fatal warnings, such as an implausible age.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// The phase-appropriate contribution breakdown, attached when the
    /// employee is eligible and an enrolment date is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributions: Option<ContributionResult>,
}
