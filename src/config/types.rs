//! Configuration types for the auto-enrolment scheme.
//!
//! This module contains the strongly-typed scheme parameters that are
//! deserialized from YAML configuration files. [`SchemeConfig::statutory`]
//! provides the parameters of the Automatic Enrolment Retirement Savings
//! System Act 2024 as a built-in default, so the pure engine never requires
//! file I/O.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Metadata about the scheme.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemeMetadata {
    /// The scheme code (e.g., "MFF").
    pub code: String,
    /// The human-readable name of the scheme.
    pub name: String,
    /// The version or effective date of the parameters.
    pub version: String,
    /// URL to the governing legislation.
    pub source_url: String,
}

/// Thresholds used by the eligibility orchestrator.
#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityThresholds {
    /// Minimum enrolment age, inclusive.
    pub minimum_age: u32,
    /// Maximum enrolment age, inclusive.
    pub maximum_age: u32,
    /// Annual gross earnings trigger.
    pub earnings_trigger: Decimal,
    /// Upper cap on reckonable earnings.
    pub upper_earnings_cap: Decimal,
    /// Waiting period in full months of continuous employment.
    pub waiting_period_months: u32,
    /// Standard full-time hours per week, for the pro-rata factor.
    pub standard_weekly_hours: Decimal,
}

/// Thresholds used by the employment classification table.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationThresholds {
    /// State pensionable age.
    pub pensionable_age: u32,
    /// Annual income floor above which a pensioner is classified as such.
    pub pensioner_income_floor: Decimal,
    /// Weekly earnings floor below which Class A does not apply.
    pub sub_class_weekly_floor: Decimal,
    /// Annual income floor for self-employed classification.
    pub self_employed_income_floor: Decimal,
    /// Start dates before this fall under the modified public-service class.
    pub public_service_cutover: NaiveDate,
}

/// Contribution rates for one multi-year phase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhaseRates {
    /// The phase number, 1 through 4.
    pub phase: u8,
    /// First scheme year of the phase, 1-based.
    pub from_year: u32,
    /// Last scheme year of the phase; `None` means open-ended.
    pub to_year: Option<u32>,
    /// Employee contribution rate as a percentage of capped earnings.
    pub employee: Decimal,
    /// Employer contribution rate as a percentage of capped earnings.
    pub employer: Decimal,
    /// State top-up rate as a percentage of capped earnings.
    pub state: Decimal,
}

/// Opt-out window and re-enrolment parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct OptOutParameters {
    /// Weeks after initial enrolment at which the opt-out window opens.
    pub initial_open_weeks: i64,
    /// Weeks after initial enrolment at which the opt-out window closes.
    pub initial_close_weeks: i64,
    /// Weeks after re-enrolment at which the opt-out window opens.
    pub re_enrolment_open_weeks: i64,
    /// Weeks after re-enrolment at which the opt-out window closes.
    pub re_enrolment_close_weeks: i64,
    /// Years after a valid opt-out at which re-enrolment falls due.
    pub re_enrolment_interval_years: u32,
}

/// How often staging dates occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingFrequency {
    /// Staging dates occur in every month.
    Monthly,
    /// Staging dates occur in January, April, July and October.
    Quarterly,
}

/// The externally configured staging-date calendar.
///
/// Enrolment and re-enrolment may only take effect on a staging date; the
/// engine aligns computed dates forward to the next one.
#[derive(Debug, Clone, Deserialize)]
pub struct StagingCalendar {
    /// How often staging dates occur.
    pub frequency: StagingFrequency,
    /// Days of the month on which staging dates fall.
    pub days_of_month: Vec<u32>,
}

impl StagingCalendar {
    fn staging_months(&self) -> &'static [u32] {
        match self.frequency {
            StagingFrequency::Monthly => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            StagingFrequency::Quarterly => &[1, 4, 7, 10],
        }
    }

    /// Returns the first staging date on or after `date`.
    ///
    /// Returns `None` only when the calendar has no valid day-of-month
    /// entries at all.
    pub fn next_on_or_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut best: Option<NaiveDate> = None;
        // Two years is always enough to find the next occurrence.
        for year in date.year()..=date.year() + 1 {
            for &month in self.staging_months() {
                for &day in &self.days_of_month {
                    if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day) {
                        if candidate >= date && best.is_none_or(|b| candidate < b) {
                            best = Some(candidate);
                        }
                    }
                }
            }
        }
        best
    }
}

/// The complete scheme configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemeConfig {
    /// Scheme metadata.
    pub metadata: SchemeMetadata,
    /// Eligibility thresholds.
    pub thresholds: EligibilityThresholds,
    /// Classification thresholds.
    pub classification: ClassificationThresholds,
    /// The four contribution phases, ordered by phase number.
    pub phases: Vec<PhaseRates>,
    /// Opt-out window parameters.
    pub opt_out: OptOutParameters,
    /// The staging-date calendar.
    pub staging: StagingCalendar,
}

impl SchemeConfig {
    /// Returns the statutory parameters of the Automatic Enrolment
    /// Retirement Savings System Act 2024.
    pub fn statutory() -> Self {
        Self {
            metadata: SchemeMetadata {
                code: "MFF".to_string(),
                name: "My Future Fund".to_string(),
                version: "2025-09-30".to_string(),
                source_url: "https://www.irishstatutebook.ie/eli/2024/act/20".to_string(),
            },
            thresholds: EligibilityThresholds {
                minimum_age: 23,
                maximum_age: 60,
                earnings_trigger: Decimal::new(20_000, 0),
                upper_earnings_cap: Decimal::new(80_000, 0),
                waiting_period_months: 6,
                standard_weekly_hours: Decimal::new(39, 0),
            },
            classification: ClassificationThresholds {
                pensionable_age: 66,
                pensioner_income_floor: Decimal::new(5_000, 0),
                sub_class_weekly_floor: Decimal::new(38, 0),
                self_employed_income_floor: Decimal::new(5_000, 0),
                public_service_cutover: NaiveDate::from_ymd_opt(1995, 4, 6)
                    .expect("valid statutory cutover date"),
            },
            phases: vec![
                PhaseRates {
                    phase: 1,
                    from_year: 1,
                    to_year: Some(3),
                    employee: Decimal::new(15, 1),
                    employer: Decimal::new(15, 1),
                    state: Decimal::new(5, 1),
                },
                PhaseRates {
                    phase: 2,
                    from_year: 4,
                    to_year: Some(6),
                    employee: Decimal::new(30, 1),
                    employer: Decimal::new(30, 1),
                    state: Decimal::new(10, 1),
                },
                PhaseRates {
                    phase: 3,
                    from_year: 7,
                    to_year: Some(9),
                    employee: Decimal::new(45, 1),
                    employer: Decimal::new(45, 1),
                    state: Decimal::new(15, 1),
                },
                PhaseRates {
                    phase: 4,
                    from_year: 10,
                    to_year: None,
                    employee: Decimal::new(60, 1),
                    employer: Decimal::new(60, 1),
                    state: Decimal::new(20, 1),
                },
            ],
            opt_out: OptOutParameters {
                initial_open_weeks: 2,
                initial_close_weeks: 4,
                re_enrolment_open_weeks: 6,
                re_enrolment_close_weeks: 8,
                re_enrolment_interval_years: 2,
            },
            staging: StagingCalendar {
                frequency: StagingFrequency::Quarterly,
                days_of_month: vec![1],
            },
        }
    }

    /// Returns the rates for the given phase number, if configured.
    pub fn phase_rates(&self, phase: u8) -> Option<&PhaseRates> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_statutory_config_has_four_phases() {
        let config = SchemeConfig::statutory();
        assert_eq!(config.phases.len(), 4);
        assert_eq!(config.phase_rates(1).unwrap().employee, dec("1.5"));
        assert_eq!(config.phase_rates(4).unwrap().employee, dec("6.0"));
        assert_eq!(config.phase_rates(4).unwrap().to_year, None);
        assert!(config.phase_rates(5).is_none());
    }

    #[test]
    fn test_statutory_thresholds() {
        let config = SchemeConfig::statutory();
        assert_eq!(config.thresholds.minimum_age, 23);
        assert_eq!(config.thresholds.maximum_age, 60);
        assert_eq!(config.thresholds.earnings_trigger, dec("20000"));
        assert_eq!(config.thresholds.upper_earnings_cap, dec("80000"));
        assert_eq!(config.thresholds.waiting_period_months, 6);
    }

    #[test]
    fn test_statutory_re_enrolment_interval_is_two_years() {
        let config = SchemeConfig::statutory();
        assert_eq!(config.opt_out.re_enrolment_interval_years, 2);
    }

    #[test]
    fn test_quarterly_staging_next_on_or_after() {
        let calendar = StagingCalendar {
            frequency: StagingFrequency::Quarterly,
            days_of_month: vec![1],
        };

        let date = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        assert_eq!(
            calendar.next_on_or_after(date),
            Some(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap())
        );

        // A staging date maps to itself.
        let exact = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        assert_eq!(calendar.next_on_or_after(exact), Some(exact));
    }

    #[test]
    fn test_quarterly_staging_wraps_year_end() {
        let calendar = StagingCalendar {
            frequency: StagingFrequency::Quarterly,
            days_of_month: vec![1],
        };

        let date = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
        assert_eq!(
            calendar.next_on_or_after(date),
            Some(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_monthly_staging_with_multiple_days() {
        let calendar = StagingCalendar {
            frequency: StagingFrequency::Monthly,
            days_of_month: vec![1, 15],
        };

        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(
            calendar.next_on_or_after(date),
            Some(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_staging_skips_invalid_days_in_short_months() {
        let calendar = StagingCalendar {
            frequency: StagingFrequency::Monthly,
            days_of_month: vec![31],
        };

        // February has no 31st, so the next candidate is 31 March.
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(
            calendar.next_on_or_after(date),
            Some(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap())
        );
    }

    #[test]
    fn test_empty_calendar_returns_none() {
        let calendar = StagingCalendar {
            frequency: StagingFrequency::Monthly,
            days_of_month: vec![],
        };
        assert!(
            calendar
                .next_on_or_after(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
                .is_none()
        );
    }

    #[test]
    fn test_deserialize_phase_rates_from_yaml() {
        let yaml = r#"
phase: 2
from_year: 4
to_year: 6
employee: "3.0"
employer: "3.0"
state: "1.0"
"#;
        let rates: PhaseRates = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rates.phase, 2);
        assert_eq!(rates.from_year, 4);
        assert_eq!(rates.to_year, Some(6));
        assert_eq!(rates.employee, dec("3.0"));
    }
}
