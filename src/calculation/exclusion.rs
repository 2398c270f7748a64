//! Director and ownership exclusion functionality.
//!
//! This module evaluates the disqualification rules for company directors,
//! controlling shareholders and the self-employed. Unlike the
//! classification table, every applicable reason is accumulated rather
//! than stopping at the first match, so an audit reader sees the complete
//! picture.
//!
//! All shareholding thresholds are strict inequalities: a holding of
//! exactly 50% does not exclude.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DirectorDetails, DirectorRole, EmployeeRecord};

use super::classification::ContributionClass;

/// Personal shareholding above this fraction excludes a director.
fn majority_threshold() -> Decimal {
    Decimal::new(50, 2)
}

/// Managing-director shareholding above this fraction indicates de-facto
/// control.
fn control_threshold() -> Decimal {
    Decimal::new(25, 2)
}

/// A machine-readable exclusion reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReasonCode {
    /// Self-employed under a contract for services.
    SelfEmployed,
    /// Member of a partnership.
    PartnershipMember,
    /// Director with a personal shareholding above 50%.
    MajorityShareholding,
    /// Director whose combined family shareholding exceeds 50%.
    FamilyMajorityShareholding,
    /// Director with de-facto control of the company.
    DeFactoControl,
}

/// One applicable exclusion reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionReason {
    /// The reason code.
    pub code: ExclusionReasonCode,
    /// A human-readable description of the reason.
    pub description: String,
}

/// The result of evaluating the exclusion rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionResult {
    /// Whether the employee is excluded from auto-enrolment.
    pub excluded: bool,
    /// Every applicable reason, not just the first.
    pub reasons: Vec<ExclusionReason>,
    /// The contribution class an excluded controller resolves to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_class: Option<ContributionClass>,
}

/// Evaluates all exclusion rules against an employee record.
///
/// Checks, in a fixed order, accumulating every rule that applies:
/// self-employment; partnership membership; a personal shareholding
/// strictly above 50% with any director role; a combined family
/// shareholding (personal + spouse + children + parents, capped at 100%)
/// strictly above 50% with any director role; and de-facto control (sole
/// directorship, board majority, veto rights, a voting-rights agreement,
/// or a managing-director role with a personal shareholding above 25%).
///
/// # Returns
///
/// Returns the accumulated result, or `InvalidEmployee` if any
/// shareholding fraction lies outside `[0, 1]`.
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::evaluate_exclusions;
/// # use pension_engine::models::*;
/// # use chrono::NaiveDate;
/// # use rust_decimal::Decimal;
/// # let record = EmployeeRecord {
/// #     id: "emp_001".to_string(),
/// #     date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
/// #     employment_start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
/// #     employment_category: EmploymentCategory::Private,
/// #     permanent: true,
/// #     gross_pay: Decimal::new(30_000, 0),
/// #     pay_frequency: PayFrequency::Annual,
/// #     hours_per_week: None,
/// #     weeks_worked: None,
/// #     annual_salary: None,
/// #     payroll_history: vec![],
/// #     opted_out: false,
/// #     opt_out_date: None,
/// #     enrolment_date: None,
/// #     employment_status: EmploymentStatus::Active,
/// #     partnership_member: false,
/// #     director: None,
/// # };
/// let result = evaluate_exclusions(&record).unwrap();
/// assert!(!result.excluded);
/// ```
pub fn evaluate_exclusions(record: &EmployeeRecord) -> EngineResult<ExclusionResult> {
    if let Some(director) = &record.director {
        validate_fraction("director.shareholding", director.shareholding)?;
        validate_fraction("director.family.spouse", director.family.spouse)?;
        validate_fraction("director.family.children", director.family.children)?;
        validate_fraction("director.family.parents", director.family.parents)?;
    }

    let mut reasons = Vec::new();

    if record.is_self_employed() {
        reasons.push(ExclusionReason {
            code: ExclusionReasonCode::SelfEmployed,
            description: "Self-employed under a contract for services".to_string(),
        });
    }

    if record.partnership_member {
        reasons.push(ExclusionReason {
            code: ExclusionReasonCode::PartnershipMember,
            description: "Member of a partnership".to_string(),
        });
    }

    if let Some(director) = &record.director {
        if director.shareholding > majority_threshold() {
            reasons.push(ExclusionReason {
                code: ExclusionReasonCode::MajorityShareholding,
                description: format!(
                    "Director holding {}% of the company, above the 50% threshold",
                    percent(director.shareholding)
                ),
            });
        }

        let family_total = (director.shareholding
            + director.family.spouse
            + director.family.children
            + director.family.parents)
            .min(Decimal::ONE);
        if family_total > majority_threshold() {
            reasons.push(ExclusionReason {
                code: ExclusionReasonCode::FamilyMajorityShareholding,
                description: format!(
                    "Combined family shareholding of {}% exceeds the 50% threshold",
                    percent(family_total)
                ),
            });
        }

        if let Some(triggers) = de_facto_control_triggers(director) {
            reasons.push(ExclusionReason {
                code: ExclusionReasonCode::DeFactoControl,
                description: format!("De-facto control of the company: {}", triggers),
            });
        }
    }

    let excluded = !reasons.is_empty();
    Ok(ExclusionResult {
        excluded,
        reasons,
        resolved_class: excluded.then_some(ContributionClass::ClassS),
    })
}

/// Returns a description of the control triggers that apply, if any.
fn de_facto_control_triggers(director: &DirectorDetails) -> Option<String> {
    let mut triggers = Vec::new();

    if director.sole_director {
        triggers.push("sole directorship");
    }
    if director.board_majority {
        triggers.push("board-majority control");
    }
    if director.veto_rights {
        triggers.push("veto rights");
    }
    if director.voting_agreement {
        triggers.push("voting-rights agreement");
    }
    if director.role == DirectorRole::ManagingDirector
        && director.shareholding > control_threshold()
    {
        triggers.push("managing director with more than a 25% shareholding");
    }

    if triggers.is_empty() {
        None
    } else {
        Some(triggers.join(", "))
    }
}

fn validate_fraction(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(EngineError::InvalidEmployee {
            field: field.to_string(),
            message: format!("shareholding {} must be within [0, 1]", value),
        });
    }
    Ok(())
}

fn percent(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).normalize()
}
