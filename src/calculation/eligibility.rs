//! Eligibility assessment orchestration.
//!
//! [`assess_eligibility`] is the engine's single entry point: it runs every
//! check in a fixed order without short-circuiting, so the result always
//! carries the complete audit trail of passes and failures. A failed check
//! is a business outcome; `Err` is reserved for invalid input.
//!
//! The reference date is always an explicit argument. The engine never
//! reads a clock; defaulting to today happens at the API boundary only.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::SchemeConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CheckOutcome, EligibilityCheck, EligibilityChecks, EligibilityResult, EmployeeRecord,
    PayFrequency,
};

use super::age::{MAX_PLAUSIBLE_AGE, add_months, exact_age, full_months_between};
use super::annualize::{AnnualizedEarnings, annualize_earnings};
use super::classification::classify_employment;
use super::contribution::{calculate_contributions, phase_on};
use super::exclusion::evaluate_exclusions;
use super::opt_out::next_re_enrolment_date;
use super::projection::{ProjectionConfidence, ProjectionSettings, project_annual_earnings};

/// Assesses one employee's auto-enrolment eligibility at a reference date.
///
/// All seven checks run unconditionally, in the order age, classification,
/// earnings, duration, opt-out, exclusion, employment status. The earnings
/// figure comes from the declared annual salary when one is present, else
/// from the payroll-history projector, else from annualizing the supplied
/// gross pay.
///
/// When the waiting period is the only blocking check, the result carries
/// the date eligibility will begin. Opted-out employees carry their next
/// re-enrolment date instead. An eligible employee with a known past
/// enrolment date gets the phase-appropriate contribution breakdown
/// attached.
///
/// # Arguments
///
/// * `record` - The employee record to assess
/// * `assessment_date` - The date to assess against
/// * `config` - The scheme configuration
///
/// # Returns
///
/// Returns the [`EligibilityResult`], or an error when the record's dates
/// or amounts are invalid.
pub fn assess_eligibility(
    record: &EmployeeRecord,
    assessment_date: NaiveDate,
    config: &SchemeConfig,
) -> EngineResult<EligibilityResult> {
    debug!(employee_id = %record.id, %assessment_date, "assessing eligibility");

    let mut warnings = Vec::new();

    let age = exact_age(record.date_of_birth, assessment_date)?;
    if age > MAX_PLAUSIBLE_AGE {
        warnings.push(format!(
            "Age {age} exceeds the plausible maximum of {MAX_PLAUSIBLE_AGE}; check the date of birth"
        ));
    }

    let min_age = config.thresholds.minimum_age;
    let max_age = config.thresholds.maximum_age;
    let age_check = if age < min_age {
        CheckOutcome::fail(
            EligibilityCheck::Age,
            format!("Age {age} is below the minimum enrolment age of {min_age}"),
        )
    } else if age > max_age {
        CheckOutcome::fail(
            EligibilityCheck::Age,
            format!("Age {age} is above the maximum enrolment age of {max_age}"),
        )
    } else {
        CheckOutcome::pass(
            EligibilityCheck::Age,
            format!("Age {age} is within the {min_age}-{max_age} window"),
        )
    };

    let (earnings, earnings_check) = resolve_earnings(record, config, &mut warnings)?;

    let classification = classify_employment(record, &earnings, age, config);
    let classification_check = if classification.eligible_for_auto_enrolment {
        CheckOutcome::pass(EligibilityCheck::Classification, classification.reason.clone())
    } else {
        CheckOutcome::fail(EligibilityCheck::Classification, classification.reason.clone())
    };

    let months_employed = full_months_between(record.employment_start_date, assessment_date)?;
    let waiting_months = config.thresholds.waiting_period_months;
    let duration_check = if months_employed >= waiting_months {
        CheckOutcome::pass(
            EligibilityCheck::Duration,
            format!(
                "Employed for {months_employed} full months, meeting the {waiting_months}-month waiting period"
            ),
        )
    } else {
        CheckOutcome::fail(
            EligibilityCheck::Duration,
            format!(
                "Employed for {months_employed} full months; the waiting period is {waiting_months} months"
            ),
        )
    };

    let mut next_review_date = None;
    let opt_out_check = if !record.opted_out {
        CheckOutcome::pass(EligibilityCheck::OptOut, "Not opted out")
    } else {
        match record.opt_out_date {
            Some(opt_out_date) => {
                let due = next_re_enrolment_date(opt_out_date, config)?;
                if assessment_date >= due {
                    CheckOutcome::pass(
                        EligibilityCheck::OptOut,
                        format!("Opted out on {opt_out_date}; re-enrolment fell due on {due}"),
                    )
                } else {
                    next_review_date = Some(due);
                    CheckOutcome::fail(
                        EligibilityCheck::OptOut,
                        format!("Opted out on {opt_out_date}; re-enrolment falls due on {due}"),
                    )
                }
            }
            None => CheckOutcome::fail(
                EligibilityCheck::OptOut,
                "Opted out; no opt-out date recorded, so re-enrolment cannot be scheduled",
            ),
        }
    };

    let exclusion = evaluate_exclusions(record)?;
    let exclusion_check = if exclusion.excluded {
        let descriptions: Vec<&str> = exclusion
            .reasons
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        CheckOutcome::fail(
            EligibilityCheck::Exclusion,
            format!("Excluded from auto-enrolment: {}", descriptions.join("; ")),
        )
    } else {
        CheckOutcome::pass(EligibilityCheck::Exclusion, "No exclusion applies")
    };

    let status_check = if record.is_active() {
        CheckOutcome::pass(
            EligibilityCheck::EmploymentStatus,
            "Employment is active",
        )
    } else {
        CheckOutcome::fail(
            EligibilityCheck::EmploymentStatus,
            format!("Employment status is {:?}", record.employment_status),
        )
    };

    let checks = EligibilityChecks {
        age: age_check,
        classification: classification_check,
        earnings: earnings_check,
        duration: duration_check,
        opt_out: opt_out_check,
        exclusion: exclusion_check,
        employment_status: status_check,
    };

    let is_eligible = checks.all_passed();
    let reasons: Vec<String> = checks
        .in_order()
        .iter()
        .map(|outcome| outcome.reason.clone())
        .collect();

    // The start date is only meaningful when waiting is the sole blocker.
    let duration_is_only_blocker = !checks.duration.passed
        && checks
            .in_order()
            .iter()
            .all(|o| o.passed || o.check == EligibilityCheck::Duration);
    let eligibility_date = duration_is_only_blocker.then(|| {
        add_months(
            record.employment_start_date,
            waiting_months as i32,
        )
    });

    let contributions = match record.enrolment_date {
        Some(enrolment_date) if is_eligible && enrolment_date <= assessment_date => {
            let phase = phase_on(enrolment_date, assessment_date, config)?;
            Some(calculate_contributions(
                earnings.annual_gross,
                phase,
                record.pay_frequency,
                config,
            )?)
        }
        _ => None,
    };

    debug!(employee_id = %record.id, is_eligible, "assessment complete");

    Ok(EligibilityResult {
        employee_id: record.id.clone(),
        assessment_date,
        is_eligible,
        reasons,
        eligibility_date,
        next_review_date,
        checks,
        warnings,
        contributions,
    })
}

/// Assesses a batch of records independently.
///
/// One record's invalid input never aborts the batch; each entry carries
/// its own `Result`.
pub fn assess_batch(
    records: &[EmployeeRecord],
    assessment_date: NaiveDate,
    config: &SchemeConfig,
) -> Vec<Result<EligibilityResult, EngineError>> {
    records
        .iter()
        .map(|record| assess_eligibility(record, assessment_date, config))
        .collect()
}

fn resolve_earnings(
    record: &EmployeeRecord,
    config: &SchemeConfig,
    warnings: &mut Vec<String>,
) -> EngineResult<(AnnualizedEarnings, CheckOutcome)> {
    let trigger = config.thresholds.earnings_trigger;

    if let Some(declared) = record.annual_salary {
        let earnings = annualize_earnings(
            declared,
            PayFrequency::Annual,
            record.hours_per_week,
            None,
            config,
        )?;
        let check = trigger_outcome(&earnings, trigger, "declared annual salary");
        return Ok((earnings, check));
    }

    if !record.payroll_history.is_empty() {
        let projection = project_annual_earnings(
            &record.payroll_history,
            None,
            &ProjectionSettings::default(),
        )?;
        warnings.extend(projection.warnings.iter().cloned());

        let earnings = annualize_earnings(
            projection.projected_annual,
            PayFrequency::Annual,
            record.hours_per_week,
            None,
            config,
        )?;

        let check = if projection.confidence == ProjectionConfidence::Insufficient {
            CheckOutcome::fail(
                EligibilityCheck::Earnings,
                format!(
                    "Only {} months of payroll history; at least 3 are needed to project earnings",
                    projection.months_of_data
                ),
            )
        } else {
            trigger_outcome(
                &earnings,
                trigger,
                &format!(
                    "projected from {} months of payroll history",
                    projection.months_of_data
                ),
            )
        };
        return Ok((earnings, check));
    }

    let earnings = annualize_earnings(
        record.gross_pay,
        record.pay_frequency,
        record.hours_per_week,
        record.weeks_worked,
        config,
    )?;
    let check = trigger_outcome(&earnings, trigger, "annualized gross pay");
    Ok((earnings, check))
}

fn trigger_outcome(
    earnings: &AnnualizedEarnings,
    trigger: rust_decimal::Decimal,
    source: &str,
) -> CheckOutcome {
    if earnings.meets_earnings_trigger {
        CheckOutcome::pass(
            EligibilityCheck::Earnings,
            format!(
                "Annual earnings of {} ({source}) meet the {trigger} trigger",
                earnings.annual_gross
            ),
        )
    } else {
        CheckOutcome::fail(
            EligibilityCheck::Earnings,
            format!(
                "Annual earnings of {} ({source}) are below the {trigger} trigger",
                earnings.annual_gross
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DirectorDetails, DirectorRole, EmploymentCategory, EmploymentStatus, FamilyShareholding,
        PayrollRecord,
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> SchemeConfig {
        SchemeConfig::statutory()
    }

    fn baseline_record() -> EmployeeRecord {
        EmployeeRecord {
            id: "emp_001".to_string(),
            date_of_birth: date(1996, 1, 15),
            employment_start_date: date(2024, 1, 1),
            employment_category: EmploymentCategory::Private,
            permanent: true,
            gross_pay: dec("3000.00"),
            pay_frequency: PayFrequency::Monthly,
            hours_per_week: None,
            weeks_worked: None,
            annual_salary: None,
            payroll_history: vec![],
            opted_out: false,
            opt_out_date: None,
            enrolment_date: None,
            employment_status: EmploymentStatus::Active,
            partnership_member: false,
            director: None,
        }
    }

    const ASSESSMENT: fn() -> NaiveDate = || date(2026, 3, 1);

    /// EL-001: a standard employee passes all seven checks
    #[test]
    fn test_baseline_employee_is_eligible() {
        let result = assess_eligibility(&baseline_record(), ASSESSMENT(), &config()).unwrap();

        assert!(result.is_eligible);
        assert!(result.checks.all_passed());
        assert_eq!(result.reasons.len(), 7);
        assert!(result.eligibility_date.is_none());
        assert!(result.next_review_date.is_none());
        assert!(result.warnings.is_empty());
        assert!(result.contributions.is_none());
    }

    /// EL-002: exactly 23, exactly at the trigger, exactly 6 months
    #[test]
    fn test_all_minimum_thresholds_met_exactly() {
        let mut record = baseline_record();
        record.date_of_birth = date(2003, 3, 1); // turns 23 on the assessment date
        record.employment_start_date = date(2025, 9, 1); // exactly 6 full months
        record.gross_pay = dec("20000");
        record.pay_frequency = PayFrequency::Annual;

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(result.is_eligible, "reasons: {:?}", result.reasons);
    }

    /// EL-003: one day short of 23 fails on minimum age
    #[test]
    fn test_under_age_fails_minimum_age_check() {
        let mut record = baseline_record();
        record.date_of_birth = date(2003, 3, 2); // still 22 on the assessment date

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.is_eligible);
        assert!(!result.checks.age.passed);
        assert!(result.checks.age.reason.contains("below the minimum"));
        // The remaining checks still ran.
        assert!(result.checks.earnings.passed);
        assert!(result.checks.duration.passed);
    }

    /// EL-004: over 60 fails on maximum age
    #[test]
    fn test_over_age_fails_maximum_age_check() {
        let mut record = baseline_record();
        record.date_of_birth = date(1965, 1, 1); // 61

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.is_eligible);
        assert!(result.checks.age.reason.contains("above the maximum"));
    }

    /// EL-005: waiting period as sole blocker sets the eligibility date
    #[test]
    fn test_waiting_period_sets_eligibility_date() {
        let mut record = baseline_record();
        record.employment_start_date = date(2025, 12, 1); // 3 full months

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.is_eligible);
        assert!(!result.checks.duration.passed);
        assert_eq!(result.eligibility_date, Some(date(2026, 6, 1)));
    }

    #[test]
    fn test_no_eligibility_date_when_other_checks_also_fail() {
        let mut record = baseline_record();
        record.employment_start_date = date(2025, 12, 1);
        record.gross_pay = dec("1000.00"); // 12000/year, below trigger

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.is_eligible);
        assert!(result.eligibility_date.is_none());
    }

    /// EL-006: low earnings fail the trigger check
    #[test]
    fn test_earnings_below_trigger() {
        let mut record = baseline_record();
        record.gross_pay = dec("1500.00"); // 18000/year

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.is_eligible);
        assert!(result.checks.earnings.reason.contains("below the 20000 trigger"));
    }

    /// EL-007: a declared salary overrides the payroll history
    #[test]
    fn test_declared_salary_short_circuits_history() {
        let mut record = baseline_record();
        record.annual_salary = Some(dec("50000"));
        record.payroll_history = vec![
            PayrollRecord { period_end: date(2026, 1, 31), gross: dec("100") },
            PayrollRecord { period_end: date(2026, 2, 28), gross: dec("100") },
        ];

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(result.checks.earnings.passed);
        assert!(result.checks.earnings.reason.contains("declared annual salary"));
    }

    /// EL-008: earnings projected from sufficient payroll history
    #[test]
    fn test_earnings_projected_from_history() {
        let mut record = baseline_record();
        record.gross_pay = Decimal::ZERO;
        record.payroll_history = (1..=12)
            .map(|month| PayrollRecord {
                period_end: date(2025, month, 28),
                gross: dec("3000"),
            })
            .collect();

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(result.checks.earnings.passed);
        assert!(
            result
                .checks
                .earnings
                .reason
                .contains("projected from 12 months")
        );
    }

    /// EL-009: too little history fails the earnings check
    #[test]
    fn test_insufficient_history_fails_earnings() {
        let mut record = baseline_record();
        record.gross_pay = Decimal::ZERO;
        record.payroll_history = vec![
            PayrollRecord { period_end: date(2026, 1, 31), gross: dec("3000") },
            PayrollRecord { period_end: date(2026, 2, 28), gross: dec("3000") },
        ];

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.checks.earnings.passed);
        assert!(result.checks.earnings.reason.contains("Only 2 months"));
    }

    /// EL-010: an opted-out employee carries the next re-enrolment date
    #[test]
    fn test_opted_out_employee_gets_review_date() {
        let mut record = baseline_record();
        record.opted_out = true;
        record.opt_out_date = Some(date(2026, 1, 20));

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.is_eligible);
        assert!(!result.checks.opt_out.passed);
        assert_eq!(result.next_review_date, Some(date(2028, 4, 1)));
    }

    /// EL-011: once re-enrolment falls due the opt-out no longer blocks
    #[test]
    fn test_opt_out_clears_once_re_enrolment_due() {
        let mut record = baseline_record();
        record.opted_out = true;
        record.opt_out_date = Some(date(2023, 1, 20));

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(result.checks.opt_out.passed);
        assert!(result.checks.opt_out.reason.contains("fell due"));
    }

    /// EL-012: a majority-shareholding director is excluded
    #[test]
    fn test_director_exclusion_fails_check() {
        let mut record = baseline_record();
        record.director = Some(DirectorDetails {
            role: DirectorRole::Director,
            shareholding: dec("0.51"),
            family: FamilyShareholding::default(),
            sole_director: false,
            board_majority: false,
            veto_rights: false,
            voting_agreement: false,
        });

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.is_eligible);
        assert!(!result.checks.exclusion.passed);
        assert!(result.checks.exclusion.reason.contains("Excluded"));
    }

    /// EL-013: terminated employment fails the status check
    #[test]
    fn test_terminated_employment_fails_status() {
        let mut record = baseline_record();
        record.employment_status = EmploymentStatus::Terminated;

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.is_eligible);
        assert!(!result.checks.employment_status.passed);
    }

    /// EL-014: implausible ages warn but do not error
    #[test]
    fn test_implausible_age_produces_warning() {
        let mut record = baseline_record();
        record.date_of_birth = date(1900, 1, 1); // 126

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(!result.is_eligible); // fails the age window
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("126"));
    }

    /// EL-015: eligible with a known enrolment date attaches contributions
    #[test]
    fn test_eligible_enrolled_employee_gets_contributions() {
        let mut record = baseline_record();
        record.enrolment_date = Some(date(2026, 1, 1));

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(result.is_eligible);

        let contributions = result.contributions.unwrap();
        assert_eq!(contributions.current_phase, 1);
        assert_eq!(contributions.current.employee, dec("540.00"));
        assert_eq!(contributions.per_period.employee, dec("45.00"));
    }

    #[test]
    fn test_phase_two_contributions_after_three_years() {
        let mut record = baseline_record();
        record.employment_start_date = date(2022, 1, 1);
        record.enrolment_date = Some(date(2023, 1, 1));

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        let contributions = result.contributions.unwrap();
        assert_eq!(contributions.current_phase, 2);
    }

    #[test]
    fn test_future_enrolment_date_attaches_nothing() {
        let mut record = baseline_record();
        record.enrolment_date = Some(date(2026, 4, 1));

        let result = assess_eligibility(&record, ASSESSMENT(), &config()).unwrap();
        assert!(result.is_eligible);
        assert!(result.contributions.is_none());
    }

    #[test]
    fn test_reasons_follow_check_order() {
        let result = assess_eligibility(&baseline_record(), ASSESSMENT(), &config()).unwrap();
        let expected: Vec<String> = result
            .checks
            .in_order()
            .iter()
            .map(|o| o.reason.clone())
            .collect();
        assert_eq!(result.reasons, expected);
    }

    #[test]
    fn test_invalid_birth_date_is_an_error() {
        let mut record = baseline_record();
        record.date_of_birth = date(2030, 1, 1);
        assert!(assess_eligibility(&record, ASSESSMENT(), &config()).is_err());
    }

    /// EL-016: a batch isolates per-record failures
    #[test]
    fn test_batch_isolates_errors() {
        let good = baseline_record();
        let mut bad = baseline_record();
        bad.id = "emp_bad".to_string();
        bad.date_of_birth = date(2030, 1, 1);

        let results = assess_batch(&[good, bad], ASSESSMENT(), &config());
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
