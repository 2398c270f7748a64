//! Core calculation modules for the auto-enrolment engine.
//!
//! Everything here is pure: no clock, no I/O, no interior state. The
//! reference date and the scheme configuration are always explicit
//! arguments, so every function is deterministic and directly testable.

pub mod age;
pub mod annualize;
pub mod classification;
pub mod contribution;
pub mod eligibility;
pub mod exclusion;
pub mod opt_out;
pub mod projection;

pub use age::{
    MAX_PLAUSIBLE_AGE, add_months, add_weeks, date_at_age, exact_age, full_months_between,
};
pub use annualize::{
    AnnualizedEarnings, annualize_earnings, deannualize, round_to_cent, weeks_per_year,
};
pub use classification::{ClassificationResult, ContributionClass, classify_employment};
pub use contribution::{
    ContributionResult, PeriodContribution, PhaseContribution, RetirementProjection,
    TakeHomeImpact, calculate_contributions, phase_for, phase_on, project_retirement_pot,
    take_home_impact,
};
pub use eligibility::{assess_batch, assess_eligibility};
pub use exclusion::{
    ExclusionReason, ExclusionReasonCode, ExclusionResult, evaluate_exclusions,
};
pub use opt_out::{
    ContributionPayment, EnrolmentType, OptOutOutcome, OptOutWindow, OptOutWindowState,
    OptOutWindowStatus, RefundBreakdown, is_re_enrolment_due, next_re_enrolment_date,
    opt_out_window, validate_opt_out, window_status,
};
pub use projection::{
    ProjectionConfidence, ProjectionMethod, ProjectionResult, ProjectionSettings, TrendDirection,
    project_annual_earnings,
};
