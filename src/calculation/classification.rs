//! Employment classification functionality.
//!
//! This module resolves an employee record to a PRSI-style contribution
//! class and a base auto-enrolment eligibility verdict via an ordered
//! decision table.
//!
//! The table is evaluated strictly top-to-bottom and the first matching
//! rule wins. The order encodes legal precedence between overlapping
//! conditions (a low-earning pensioner is a pensioner first), not a
//! performance choice: do not convert it to a keyed lookup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SchemeConfig;
use crate::models::{EmployeeRecord, EmploymentCategory};

use super::annualize::AnnualizedEarnings;

/// A PRSI-style social insurance contribution class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionClass {
    /// Standard employment; the only broadly auto-enrolable class.
    ClassA,
    /// Civil and public servants recruited before the 1995 cutover.
    ClassB,
    /// Commissioned officers of the Defence Forces.
    ClassC,
    /// Permanent and pensionable public or health service employees.
    ClassD,
    /// Non-commissioned Defence Forces personnel.
    ClassH,
    /// People over pensionable age or with sub-threshold earnings.
    ClassJ,
    /// People under 16 or otherwise outside social insurance.
    ClassM,
    /// Share fishermen and fisherwomen; auto-enrolable.
    ClassP,
    /// Self-employed contributors.
    ClassS,
}

impl ContributionClass {
    /// The single-letter class code used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            ContributionClass::ClassA => "A",
            ContributionClass::ClassB => "B",
            ContributionClass::ClassC => "C",
            ContributionClass::ClassD => "D",
            ContributionClass::ClassH => "H",
            ContributionClass::ClassJ => "J",
            ContributionClass::ClassM => "M",
            ContributionClass::ClassP => "P",
            ContributionClass::ClassS => "S",
        }
    }
}

/// The result of resolving an employee's contribution class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The resolved contribution class.
    pub class: ContributionClass,
    /// Whether this class is within scope of auto-enrolment.
    pub eligible_for_auto_enrolment: bool,
    /// A human-readable reason for the classification.
    pub reason: String,
    /// The phase-1 employee contribution rate, zero for ineligible classes.
    pub base_employee_rate: Decimal,
    /// The phase-1 employer contribution rate, zero for ineligible classes.
    pub base_employer_rate: Decimal,
}

impl ClassificationResult {
    fn ineligible(class: ContributionClass, reason: String) -> Self {
        Self {
            class,
            eligible_for_auto_enrolment: false,
            reason,
            base_employee_rate: Decimal::ZERO,
            base_employer_rate: Decimal::ZERO,
        }
    }

    fn eligible(class: ContributionClass, reason: String, config: &SchemeConfig) -> Self {
        let phase_one = config.phase_rates(1);
        Self {
            class,
            eligible_for_auto_enrolment: true,
            reason,
            base_employee_rate: phase_one.map_or(Decimal::ZERO, |p| p.employee),
            base_employer_rate: phase_one.map_or(Decimal::ZERO, |p| p.employer),
        }
    }
}

/// Resolves the contribution class for an employee record.
///
/// The rules are applied strictly in order; several can hold for one record
/// and the earliest takes precedence:
///
/// 1. Over pensionable age with income at or above the pensioner floor.
/// 2. Weekly earnings below the sub-class floor (Class M under 16).
/// 3. Self-employed with income at or above the self-employed floor.
/// 4. Share fisherman (eligible).
/// 5. Public service, started before the 1995 cutover.
/// 6. Public service, started on or after the cutover.
/// 7. Defence Forces commissioned officer.
/// 8. Defence Forces enlisted personnel.
/// 9. Permanent health service employee.
/// 10. Standard Class A employment (eligible).
///
/// # Arguments
///
/// * `record` - The employee record
/// * `earnings` - The annualized earnings view of the record
/// * `age` - Exact-day age at the assessment date
/// * `config` - The scheme configuration carrying classification thresholds
pub fn classify_employment(
    record: &EmployeeRecord,
    earnings: &AnnualizedEarnings,
    age: u32,
    config: &SchemeConfig,
) -> ClassificationResult {
    let thresholds = &config.classification;

    // Rule 1: over pensionable age.
    if age >= thresholds.pensionable_age
        && earnings.annual_gross >= thresholds.pensioner_income_floor
    {
        return ClassificationResult::ineligible(
            ContributionClass::ClassJ,
            format!(
                "Age {} is at or above pensionable age {}; Class J applies",
                age, thresholds.pensionable_age
            ),
        );
    }

    // Rule 2: sub-threshold weekly earnings.
    if earnings.weekly_equivalent < thresholds.sub_class_weekly_floor {
        let class = if age < 16 {
            ContributionClass::ClassM
        } else {
            ContributionClass::ClassJ
        };
        return ClassificationResult::ineligible(
            class,
            format!(
                "Weekly earnings {} are below the Class A floor of {}; Class {} applies",
                earnings.weekly_equivalent,
                thresholds.sub_class_weekly_floor,
                class.code()
            ),
        );
    }

    // Rule 3: self-employment above the income floor.
    if record.is_self_employed() && earnings.annual_gross >= thresholds.self_employed_income_floor
    {
        return ClassificationResult::ineligible(
            ContributionClass::ClassS,
            "Self-employed with reckonable income; Class S applies".to_string(),
        );
    }

    // Rule 4: share fishermen are within scope.
    if record.employment_category == EmploymentCategory::ShareFisherman {
        return ClassificationResult::eligible(
            ContributionClass::ClassP,
            "Share fisherman; Class P applies and is within auto-enrolment scope".to_string(),
            config,
        );
    }

    // Rules 5 and 6: public service, split at the 1995 cutover.
    if record.employment_category == EmploymentCategory::PublicService {
        if record.employment_start_date < thresholds.public_service_cutover {
            return ClassificationResult::ineligible(
                ContributionClass::ClassB,
                format!(
                    "Public servant recruited before {}; modified-rate Class B applies \
                     with an occupational pension",
                    thresholds.public_service_cutover
                ),
            );
        }
        return ClassificationResult::ineligible(
            ContributionClass::ClassD,
            "Permanent and pensionable public servant; Class D applies with an \
             occupational pension"
                .to_string(),
        );
    }

    // Rule 7: commissioned Defence Forces officers.
    if record.employment_category == EmploymentCategory::DefenceForcesOfficer {
        return ClassificationResult::ineligible(
            ContributionClass::ClassC,
            "Commissioned Defence Forces officer; Class C applies".to_string(),
        );
    }

    // Rule 8: enlisted Defence Forces personnel.
    if record.employment_category == EmploymentCategory::DefenceForcesEnlisted {
        return ClassificationResult::ineligible(
            ContributionClass::ClassH,
            "Enlisted Defence Forces personnel; Class H applies".to_string(),
        );
    }

    // Rule 9: permanent health service employees.
    if record.employment_category == EmploymentCategory::HealthService && record.permanent {
        return ClassificationResult::ineligible(
            ContributionClass::ClassD,
            "Permanent and pensionable health service employee; Class D applies".to_string(),
        );
    }

    // Rule 10: standard employment.
    ClassificationResult::eligible(
        ContributionClass::ClassA,
        "Standard Class A employment; within auto-enrolment scope".to_string(),
        config,
    )
}
