//! Phased contribution calculation.
//!
//! Contribution rates escalate through four multi-year phases. The phase is
//! a pure function of full elapsed years since enrolment; the calculator
//! computes all four phases in one pass so callers can show the employee
//! the full escalation schedule, then converts the current phase to the
//! employee's own pay cadence.
//!
//! Every component amount is rounded to the cent as it is computed, and
//! every total is the sum of already-rounded components. A total is never
//! produced by rounding a raw aggregate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SchemeConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::PayFrequency;

use super::age::full_months_between;
use super::annualize::{deannualize, round_to_cent};

/// Contribution amounts for one phase at an annual cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseContribution {
    /// The phase number, 1 through 4.
    pub phase: u8,
    /// Employee rate as a percentage of reckonable earnings.
    #[serde(with = "rust_decimal::serde::str")]
    pub employee_rate: Decimal,
    /// Employer rate as a percentage of reckonable earnings.
    #[serde(with = "rust_decimal::serde::str")]
    pub employer_rate: Decimal,
    /// State top-up rate as a percentage of reckonable earnings.
    #[serde(with = "rust_decimal::serde::str")]
    pub state_rate: Decimal,
    /// Annual employee contribution.
    pub employee: Decimal,
    /// Annual employer contribution.
    pub employer: Decimal,
    /// Annual state top-up.
    pub state: Decimal,
    /// Annual total; always the sum of the three rounded components.
    pub total: Decimal,
}

/// The current phase's contributions at the employee's own pay cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodContribution {
    /// The cadence the amounts are expressed at.
    pub frequency: PayFrequency,
    /// Employee contribution per period.
    pub employee: Decimal,
    /// Employer contribution per period.
    pub employer: Decimal,
    /// State top-up per period.
    pub state: Decimal,
    /// Per-period total; the sum of the three rounded components.
    pub total: Decimal,
}

/// The complete contribution picture for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionResult {
    /// Annual earnings after the upper cap; the contribution base.
    pub reckonable_earnings: Decimal,
    /// The phase currently in force.
    pub current_phase: u8,
    /// The current phase's annual amounts.
    pub current: PhaseContribution,
    /// All configured phases, for the escalation schedule.
    pub all_phases: Vec<PhaseContribution>,
    /// The current phase at the employee's pay cadence.
    pub per_period: PeriodContribution,
}

/// A multi-year projection of the retirement pot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementProjection {
    /// Years projected.
    pub years: u32,
    /// The projected pot at the end of the final year.
    pub final_pot: Decimal,
    /// Employee contributions across all years.
    pub total_employee: Decimal,
    /// Employer contributions across all years.
    pub total_employer: Decimal,
    /// State top-ups across all years.
    pub total_state: Decimal,
    /// All contributions combined.
    pub total_contributions: Decimal,
    /// Investment growth: final pot less total contributions.
    pub investment_growth: Decimal,
}

/// The net pay effect of the employee contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeHomeImpact {
    /// The gross annual employee contribution.
    pub gross_contribution: Decimal,
    /// Relief at the supplied marginal rate.
    pub tax_relief: Decimal,
    /// The net annual reduction in take-home pay.
    pub net_cost: Decimal,
}

/// Maps full elapsed years since enrolment to a phase number.
///
/// Scheme year one is the enrolment year itself, so zero elapsed years is
/// year one of phase one. The final phase is open-ended.
///
/// # Returns
///
/// Returns the phase, or `CalculationError` if no configured phase covers
/// the scheme year.
pub fn phase_for(elapsed_years: u32, config: &SchemeConfig) -> EngineResult<u8> {
    let scheme_year = elapsed_years + 1;

    config
        .phases
        .iter()
        .find(|p| {
            scheme_year >= p.from_year && p.to_year.is_none_or(|to| scheme_year <= to)
        })
        .map(|p| p.phase)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("no contribution phase covers scheme year {scheme_year}"),
        })
}

/// Returns the phase in force at a reference date for an enrolment.
///
/// Elapsed years are full months between the dates, truncated to whole
/// years; the phase therefore advances on the enrolment anniversary.
///
/// # Returns
///
/// Returns the phase, or `InvalidDate` naming `enrolment_date` when the
/// enrolment is after the reference date.
pub fn phase_on(
    enrolment_date: NaiveDate,
    as_of: NaiveDate,
    config: &SchemeConfig,
) -> EngineResult<u8> {
    if enrolment_date > as_of {
        return Err(EngineError::InvalidDate {
            field: "enrolment_date".to_string(),
            date: enrolment_date,
            message: "is after the reference date".to_string(),
        });
    }
    let elapsed_years = full_months_between(enrolment_date, as_of)? / 12;
    phase_for(elapsed_years, config)
}

fn phase_amounts(reckonable: Decimal, rates: &crate::config::PhaseRates) -> PhaseContribution {
    let hundred = Decimal::ONE_HUNDRED;
    let employee = round_to_cent(reckonable * rates.employee / hundred);
    let employer = round_to_cent(reckonable * rates.employer / hundred);
    let state = round_to_cent(reckonable * rates.state / hundred);

    PhaseContribution {
        phase: rates.phase,
        employee_rate: rates.employee,
        employer_rate: rates.employer,
        state_rate: rates.state,
        employee,
        employer,
        state,
        total: employee + employer + state,
    }
}

/// Calculates contributions for all phases on an annual earnings figure.
///
/// Earnings are capped at the upper band before any rate is applied. All
/// four phases are computed; the one named by `current_phase` is also
/// converted to per-period amounts at the employee's cadence, each
/// component deannualized separately so the per-period total remains the
/// sum of rounded components.
///
/// # Arguments
///
/// * `annual_gross` - Annual gross earnings before the cap
/// * `current_phase` - The phase in force, from [`phase_for`]
/// * `frequency` - The employee's pay cadence
/// * `config` - The scheme configuration carrying cap and rates
///
/// # Returns
///
/// Returns the [`ContributionResult`], or an error if earnings are
/// negative or the phase is not configured.
pub fn calculate_contributions(
    annual_gross: Decimal,
    current_phase: u8,
    frequency: PayFrequency,
    config: &SchemeConfig,
) -> EngineResult<ContributionResult> {
    if annual_gross.is_sign_negative() {
        return Err(EngineError::InvalidEmployee {
            field: "annual_earnings".to_string(),
            message: "cannot be negative".to_string(),
        });
    }

    let reckonable = annual_gross.min(config.thresholds.upper_earnings_cap);

    let all_phases: Vec<PhaseContribution> = config
        .phases
        .iter()
        .map(|rates| phase_amounts(reckonable, rates))
        .collect();

    let current = all_phases
        .iter()
        .find(|p| p.phase == current_phase)
        .cloned()
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("contribution phase {current_phase} is not configured"),
        })?;

    let employee = deannualize(current.employee, frequency);
    let employer = deannualize(current.employer, frequency);
    let state = deannualize(current.state, frequency);
    let per_period = PeriodContribution {
        frequency,
        employee,
        employer,
        state,
        total: employee + employer + state,
    };

    Ok(ContributionResult {
        reckonable_earnings: reckonable,
        current_phase,
        current,
        all_phases,
        per_period,
    })
}

/// Projects the retirement pot over a number of scheme years.
///
/// Each year the salary grows by `salary_growth`, earnings are re-capped,
/// the year's phase rates are applied, and the pot accrues `annual_return`
/// on its opening balance before the year's contributions are added. Both
/// rates are fractions; the return must be in `(-1, 1)` and growth in
/// `[0, 1)`.
pub fn project_retirement_pot(
    annual_gross: Decimal,
    years: u32,
    annual_return: Decimal,
    salary_growth: Decimal,
    config: &SchemeConfig,
) -> EngineResult<RetirementProjection> {
    if annual_gross.is_sign_negative() {
        return Err(EngineError::InvalidEmployee {
            field: "annual_earnings".to_string(),
            message: "cannot be negative".to_string(),
        });
    }
    if annual_return <= Decimal::NEGATIVE_ONE || annual_return >= Decimal::ONE {
        return Err(EngineError::CalculationError {
            message: "annual return must be within (-1, 1)".to_string(),
        });
    }
    if salary_growth.is_sign_negative() || salary_growth >= Decimal::ONE {
        return Err(EngineError::CalculationError {
            message: "salary growth must be within [0, 1)".to_string(),
        });
    }

    let growth_factor = Decimal::ONE + salary_growth;
    let return_factor = Decimal::ONE + annual_return;

    let mut salary = round_to_cent(annual_gross);
    let mut pot = Decimal::ZERO;
    let mut total_employee = Decimal::ZERO;
    let mut total_employer = Decimal::ZERO;
    let mut total_state = Decimal::ZERO;

    for elapsed in 0..years {
        let phase = phase_for(elapsed, config)?;
        let rates = config
            .phase_rates(phase)
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("contribution phase {phase} is not configured"),
            })?;

        let reckonable = salary.min(config.thresholds.upper_earnings_cap);
        let year = phase_amounts(reckonable, rates);

        total_employee += year.employee;
        total_employer += year.employer;
        total_state += year.state;

        pot = round_to_cent(pot * return_factor) + year.total;
        salary = round_to_cent(salary * growth_factor);
    }

    let total_contributions = total_employee + total_employer + total_state;

    Ok(RetirementProjection {
        years,
        final_pot: pot,
        total_employee,
        total_employer,
        total_state,
        total_contributions,
        investment_growth: pot - total_contributions,
    })
}

/// Computes the take-home effect of a gross employee contribution.
///
/// # Returns
///
/// Returns the impact, or `CalculationError` if the marginal rate is
/// outside `[0, 1)`.
pub fn take_home_impact(
    gross_contribution: Decimal,
    marginal_rate: Decimal,
) -> EngineResult<TakeHomeImpact> {
    if marginal_rate.is_sign_negative() || marginal_rate >= Decimal::ONE {
        return Err(EngineError::CalculationError {
            message: "marginal rate must be within [0, 1)".to_string(),
        });
    }
    if gross_contribution.is_sign_negative() {
        return Err(EngineError::InvalidEmployee {
            field: "gross_contribution".to_string(),
            message: "cannot be negative".to_string(),
        });
    }

    let tax_relief = round_to_cent(gross_contribution * marginal_rate);

    Ok(TakeHomeImpact {
        gross_contribution,
        tax_relief,
        net_cost: gross_contribution - tax_relief,
    })
}
