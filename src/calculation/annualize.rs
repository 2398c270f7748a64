//! Earnings annualization functionality.
//!
//! This module converts gross pay at any supported cadence to an annual
//! figure, applies the reckonable-earnings cap, and derives the weekly and
//! monthly equivalents used elsewhere in the engine.
//!
//! All conversions share one canonical weeks-per-year constant (365.25 / 7,
//! not 52), and every monetary value is rounded to the cent immediately
//! after each multiply or divide. Raw unrounded values never flow into a
//! subsequent step.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::SchemeConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::PayFrequency;

/// The canonical weeks-per-year constant: 365.25 / 7.
pub fn weeks_per_year() -> Decimal {
    Decimal::new(36_525, 2) / Decimal::new(7, 0)
}

/// Rounds a monetary value to the cent, away from zero at the midpoint.
pub fn round_to_cent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The annualized view of an employee's earnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedEarnings {
    /// Annual gross earnings.
    pub annual_gross: Decimal,
    /// Weekly equivalent of the annual gross.
    pub weekly_equivalent: Decimal,
    /// Monthly equivalent of the annual gross.
    pub monthly_equivalent: Decimal,
    /// Annual gross capped at the upper earnings band; the contribution base.
    pub reckonable_earnings: Decimal,
    /// True when the annual gross reaches the earnings trigger.
    pub meets_earnings_trigger: bool,
    /// True when the annual gross exceeds the upper cap.
    pub exceeds_upper_cap: bool,
    /// Contracted hours as a fraction of the standard full-time week,
    /// capped at 1. Reported for context; never silently applied to the
    /// earnings themselves.
    pub pro_rata_factor: Decimal,
}

/// Annualizes gross pay supplied at any cadence.
///
/// Weekly, fortnightly and four-weekly pay are scaled by the canonical
/// weeks-per-year constant and then divided down by the period length.
/// Monthly pay is scaled by 12. An annual figure passes through, except
/// that `weeks_worked` marks it as a partial-year total covering only that
/// many weeks, and it is scaled up accordingly. `weeks_worked` is only
/// meaningful for annual figures and is rejected at any other cadence.
///
/// # Arguments
///
/// * `gross` - Gross pay at the supplied cadence
/// * `frequency` - The cadence of `gross`
/// * `hours_per_week` - Contracted hours, for the reported pro-rata factor
/// * `weeks_worked` - Weeks covered by an annual (year-to-date) figure
/// * `config` - The scheme configuration carrying trigger and cap
///
/// # Returns
///
/// Returns the [`AnnualizedEarnings`] view, or `InvalidEmployee` if pay is
/// negative, hours are non-positive, weeks-worked is outside
/// `(0, 365.25/7]`, or weeks-worked is supplied with a non-annual
/// frequency. Out-of-range values are never silently clamped or ignored.
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::annualize_earnings;
/// use pension_engine::config::SchemeConfig;
/// use pension_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// let config = SchemeConfig::statutory();
/// let earnings = annualize_earnings(
///     Decimal::new(3_000, 0),
///     PayFrequency::Monthly,
///     None,
///     None,
///     &config,
/// )
/// .unwrap();
/// assert_eq!(earnings.annual_gross, Decimal::new(36_000, 0));
/// assert!(earnings.meets_earnings_trigger);
/// ```
pub fn annualize_earnings(
    gross: Decimal,
    frequency: PayFrequency,
    hours_per_week: Option<Decimal>,
    weeks_worked: Option<Decimal>,
    config: &SchemeConfig,
) -> EngineResult<AnnualizedEarnings> {
    if gross.is_sign_negative() {
        return Err(EngineError::InvalidEmployee {
            field: "gross_pay".to_string(),
            message: "cannot be negative".to_string(),
        });
    }

    if let Some(hours) = hours_per_week {
        if hours <= Decimal::ZERO {
            return Err(EngineError::InvalidEmployee {
                field: "hours_per_week".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
    }

    if let Some(weeks) = weeks_worked {
        if frequency != PayFrequency::Annual {
            return Err(EngineError::InvalidEmployee {
                field: "weeks_worked".to_string(),
                message: "only applies to annual year-to-date figures".to_string(),
            });
        }
        if weeks <= Decimal::ZERO || weeks > weeks_per_year() {
            return Err(EngineError::InvalidEmployee {
                field: "weeks_worked".to_string(),
                message: "must be within (0, 365.25/7]".to_string(),
            });
        }
    }

    // Multiply before dividing: a half-cent rounding error in a small
    // intermediate quotient would be magnified by the later scale-up.
    let annual_gross = match frequency {
        PayFrequency::Weekly => round_to_cent(gross * weeks_per_year()),
        PayFrequency::Fortnightly => {
            let scaled = round_to_cent(gross * weeks_per_year());
            round_to_cent(scaled / Decimal::from(2))
        }
        PayFrequency::FourWeekly => {
            let scaled = round_to_cent(gross * weeks_per_year());
            round_to_cent(scaled / Decimal::from(4))
        }
        PayFrequency::Monthly => round_to_cent(gross * Decimal::from(12)),
        PayFrequency::Annual => match weeks_worked {
            // A year-to-date total covering only part of the year.
            Some(weeks) => {
                let scaled = round_to_cent(gross * weeks_per_year());
                round_to_cent(scaled / weeks)
            }
            None => round_to_cent(gross),
        },
    };

    let weekly_equivalent = round_to_cent(annual_gross / weeks_per_year());
    let monthly_equivalent = round_to_cent(annual_gross / Decimal::from(12));

    let cap = config.thresholds.upper_earnings_cap;
    let reckonable_earnings = annual_gross.min(cap);

    let pro_rata_factor = match hours_per_week {
        Some(hours) => (hours / config.thresholds.standard_weekly_hours)
            .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
            .min(Decimal::ONE),
        None => Decimal::ONE,
    };

    Ok(AnnualizedEarnings {
        annual_gross,
        weekly_equivalent,
        monthly_equivalent,
        reckonable_earnings,
        meets_earnings_trigger: annual_gross >= config.thresholds.earnings_trigger,
        exceeds_upper_cap: annual_gross > cap,
        pro_rata_factor,
    })
}

/// Converts an annual figure back to a per-period amount.
///
/// Uses the same canonical constants as [`annualize_earnings`], so a
/// round trip through both functions agrees within one cent.
pub fn deannualize(annual: Decimal, frequency: PayFrequency) -> Decimal {
    // Same ordering discipline as annualization: multiply first.
    match frequency {
        PayFrequency::Weekly => round_to_cent(annual / weeks_per_year()),
        PayFrequency::Fortnightly => {
            let scaled = round_to_cent(annual * Decimal::from(2));
            round_to_cent(scaled / weeks_per_year())
        }
        PayFrequency::FourWeekly => {
            let scaled = round_to_cent(annual * Decimal::from(4));
            round_to_cent(scaled / weeks_per_year())
        }
        PayFrequency::Monthly => round_to_cent(annual / Decimal::from(12)),
        PayFrequency::Annual => round_to_cent(annual),
    }
}
