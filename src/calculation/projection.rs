//! Variable earnings projection functionality.
//!
//! This module estimates annual earnings from partial payroll history when
//! no employer-declared salary exists. Every projection carries a
//! confidence grade, the method used, the underlying statistics and any
//! warnings, so a caller can never mistake a weak estimate for a strong
//! one. A projection with [`ProjectionConfidence::Insufficient`] is forced
//! to zero and must be gated on before any number is trusted.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollRecord;

use super::annualize::round_to_cent;

/// How much payroll history backs a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionConfidence {
    /// Fewer than 3 months of history; the projection is forced to zero.
    Insufficient,
    /// 3 to 5 months of history.
    Low,
    /// 6 to 11 months of history.
    Medium,
    /// 12 or more months, or an employer-declared salary.
    High,
}

/// The method that produced a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMethod {
    /// Trailing 12 months of actual payroll summed directly.
    Actual,
    /// Monthly mean scaled to a year, with a trend adjustment when one is
    /// detected.
    Extrapolated,
    /// Monthly mean scaled to a year with no trend adjustment, used when
    /// variance suggests seasonality.
    AverageBased,
    /// An employer-declared annual salary, used verbatim.
    Declared,
}

/// The direction of any detected earnings trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Later months earn more than earlier months.
    Increasing,
    /// Later months earn less than earlier months.
    Decreasing,
    /// No material shift between earlier and later months.
    Stable,
}

/// Tunable projection parameters.
#[derive(Debug, Clone)]
pub struct ProjectionSettings {
    /// Z-score beyond which a month is discarded as an outlier. Outlier
    /// removal is skipped entirely with fewer than 4 data points.
    pub outlier_z_score: f64,
    /// Coefficient-of-variation threshold above which the history is
    /// treated as seasonal.
    pub seasonality_threshold: f64,
    /// Relative shift between the first and last third of the window that
    /// counts as a trend.
    pub trend_change_threshold: f64,
    /// Fixed adjustment applied to the annualized mean when a trend is
    /// detected.
    pub trend_adjustment: Decimal,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            outlier_z_score: 2.5,
            seasonality_threshold: 0.3,
            trend_change_threshold: 0.10,
            trend_adjustment: Decimal::new(5, 2),
        }
    }
}

/// A confidence-scored annual earnings estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// The projected annual earnings; zero when confidence is insufficient.
    pub projected_annual: Decimal,
    /// How much history backs the projection.
    pub confidence: ProjectionConfidence,
    /// Distinct months of payroll history considered.
    pub months_of_data: u32,
    /// The method that produced the projection.
    pub method: ProjectionMethod,
    /// Mean monthly gross over the retained window.
    pub average_monthly: Decimal,
    /// Minimum monthly gross over the retained window.
    pub minimum_monthly: Decimal,
    /// Maximum monthly gross over the retained window.
    pub maximum_monthly: Decimal,
    /// Population standard deviation divided by the mean, to 4 places.
    pub coefficient_of_variation: Decimal,
    /// The direction of any detected trend.
    pub trend: TrendDirection,
    /// Warnings a caller should surface alongside the number.
    pub warnings: Vec<String>,
}

/// Projects annual earnings from monthly payroll history.
///
/// A declared annual salary short-circuits the projection entirely and is
/// returned at [`ProjectionConfidence::High`]. Otherwise the history is
/// sorted chronologically and de-duplicated per month, outliers beyond the
/// configured z-score are removed (when at least 4 points exist), and the
/// projection method is chosen from the amount and shape of the data:
/// 12+ months sum the trailing year directly; a high coefficient of
/// variation annualizes the plain mean to avoid overweighting one season;
/// anything else annualizes the mean with a fixed adjustment in the
/// direction of any detected trend.
///
/// # Arguments
///
/// * `history` - Monthly payroll records, in any order
/// * `declared_annual` - An employer-declared annual salary, if any
/// * `settings` - Tunable thresholds; use `ProjectionSettings::default()`
///
/// # Returns
///
/// Returns the projection with its statistics and warnings, or
/// `InvalidEmployee` if any amount is negative.
pub fn project_annual_earnings(
    history: &[PayrollRecord],
    declared_annual: Option<Decimal>,
    settings: &ProjectionSettings,
) -> EngineResult<ProjectionResult> {
    if let Some(declared) = declared_annual {
        if declared.is_sign_negative() {
            return Err(EngineError::InvalidEmployee {
                field: "annual_salary".to_string(),
                message: "cannot be negative".to_string(),
            });
        }
    }

    for record in history {
        if record.gross.is_sign_negative() {
            return Err(EngineError::InvalidEmployee {
                field: "payroll_history".to_string(),
                message: format!("gross for {} cannot be negative", record.period_end),
            });
        }
    }

    let months = deduplicate_months(history);
    let months_of_data = months.len() as u32;

    // An employer-declared salary is authoritative.
    if let Some(declared) = declared_annual {
        let stats = Statistics::of(&months);
        return Ok(ProjectionResult {
            projected_annual: round_to_cent(declared),
            confidence: ProjectionConfidence::High,
            months_of_data,
            method: ProjectionMethod::Declared,
            average_monthly: stats.mean,
            minimum_monthly: stats.minimum,
            maximum_monthly: stats.maximum,
            coefficient_of_variation: stats.coefficient_of_variation,
            trend: TrendDirection::Stable,
            warnings: vec![],
        });
    }

    let mut warnings = Vec::new();

    if months_of_data < 3 {
        let stats = Statistics::of(&months);
        warnings.push(format!(
            "Only {} month(s) of payroll history; projection withheld",
            months_of_data
        ));
        return Ok(ProjectionResult {
            projected_annual: Decimal::ZERO,
            confidence: ProjectionConfidence::Insufficient,
            months_of_data,
            method: ProjectionMethod::AverageBased,
            average_monthly: stats.mean,
            minimum_monthly: stats.minimum,
            maximum_monthly: stats.maximum,
            coefficient_of_variation: stats.coefficient_of_variation,
            trend: TrendDirection::Stable,
            warnings,
        });
    }

    let confidence = match months_of_data {
        3..=5 => ProjectionConfidence::Low,
        6..=11 => ProjectionConfidence::Medium,
        _ => ProjectionConfidence::High,
    };

    let retained = remove_outliers(&months, settings.outlier_z_score);
    if retained.len() < months.len() {
        warnings.push(format!(
            "{} outlier month(s) removed beyond {}σ",
            months.len() - retained.len(),
            settings.outlier_z_score
        ));
    }

    let stats = Statistics::of(&retained);
    let trend = detect_trend(&retained, settings.trend_change_threshold);

    let (projected_annual, method) = if months_of_data >= 12 {
        // Enough real data: sum the trailing 12 months directly.
        let trailing: Decimal = months
            .iter()
            .rev()
            .take(12)
            .map(|record| record.gross)
            .sum();
        (round_to_cent(trailing), ProjectionMethod::Actual)
    } else if stats.coefficient_of_variation
        > Decimal::from_f64(settings.seasonality_threshold).unwrap_or_default()
    {
        // Seasonal pattern: the plain mean avoids overweighting one season.
        warnings.push(
            "High month-to-month variance suggests seasonal earnings; \
             trend adjustment skipped"
                .to_string(),
        );
        (
            round_to_cent(stats.mean * Decimal::from(12)),
            ProjectionMethod::AverageBased,
        )
    } else {
        let base = round_to_cent(stats.mean * Decimal::from(12));
        let adjusted = match trend {
            TrendDirection::Increasing => {
                round_to_cent(base * (Decimal::ONE + settings.trend_adjustment))
            }
            TrendDirection::Decreasing => {
                round_to_cent(base * (Decimal::ONE - settings.trend_adjustment))
            }
            TrendDirection::Stable => base,
        };
        (adjusted, ProjectionMethod::Extrapolated)
    };

    Ok(ProjectionResult {
        projected_annual,
        confidence,
        months_of_data,
        method,
        average_monthly: stats.mean,
        minimum_monthly: stats.minimum,
        maximum_monthly: stats.maximum,
        coefficient_of_variation: stats.coefficient_of_variation,
        trend,
        warnings,
    })
}

/// Sorts chronologically and keeps the latest record per calendar month.
fn deduplicate_months(history: &[PayrollRecord]) -> Vec<PayrollRecord> {
    use chrono::Datelike;

    let mut sorted: Vec<PayrollRecord> = history.to_vec();
    sorted.sort_by_key(|record| record.period_end);

    let mut deduped: Vec<PayrollRecord> = Vec::with_capacity(sorted.len());
    for record in sorted {
        let month_key = (record.period_end.year(), record.period_end.month());
        match deduped.last() {
            Some(last)
                if (last.period_end.year(), last.period_end.month()) == month_key =>
            {
                *deduped.last_mut().expect("non-empty") = record;
            }
            _ => deduped.push(record),
        }
    }
    deduped
}

/// Removes months whose z-score exceeds the threshold.
///
/// Skipped entirely with fewer than 4 points or when the history has no
/// spread at all.
fn remove_outliers(months: &[PayrollRecord], z_threshold: f64) -> Vec<PayrollRecord> {
    if months.len() < 4 {
        return months.to_vec();
    }

    let values: Vec<f64> = months
        .iter()
        .map(|record| record.gross.to_f64().unwrap_or(0.0))
        .collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return months.to_vec();
    }

    months
        .iter()
        .zip(&values)
        .filter(|(_, value)| ((**value - mean) / std_dev).abs() <= z_threshold)
        .map(|(record, _)| record.clone())
        .collect()
}

/// Compares the mean of the first third of the window to the last third.
fn detect_trend(months: &[PayrollRecord], change_threshold: f64) -> TrendDirection {
    if months.len() < 2 {
        return TrendDirection::Stable;
    }

    let third = (months.len() / 3).max(1);
    let first: f64 = months[..third]
        .iter()
        .map(|record| record.gross.to_f64().unwrap_or(0.0))
        .sum::<f64>()
        / third as f64;
    let last: f64 = months[months.len() - third..]
        .iter()
        .map(|record| record.gross.to_f64().unwrap_or(0.0))
        .sum::<f64>()
        / third as f64;

    if first == 0.0 {
        return if last > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Stable
        };
    }

    let change = (last - first) / first;
    if change > change_threshold {
        TrendDirection::Increasing
    } else if change < -change_threshold {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Mean, extrema and coefficient of variation over a window.
struct Statistics {
    mean: Decimal,
    minimum: Decimal,
    maximum: Decimal,
    coefficient_of_variation: Decimal,
}

impl Statistics {
    fn of(months: &[PayrollRecord]) -> Self {
        if months.is_empty() {
            return Self {
                mean: Decimal::ZERO,
                minimum: Decimal::ZERO,
                maximum: Decimal::ZERO,
                coefficient_of_variation: Decimal::ZERO,
            };
        }

        let sum: Decimal = months.iter().map(|record| record.gross).sum();
        let mean = round_to_cent(sum / Decimal::from(months.len() as i64));
        let minimum = months
            .iter()
            .map(|record| record.gross)
            .min()
            .expect("non-empty");
        let maximum = months
            .iter()
            .map(|record| record.gross)
            .max()
            .expect("non-empty");

        let values: Vec<f64> = months
            .iter()
            .map(|record| record.gross.to_f64().unwrap_or(0.0))
            .collect();
        let mean_f = values.iter().sum::<f64>() / values.len() as f64;
        let coefficient_of_variation = if mean_f == 0.0 {
            Decimal::ZERO
        } else {
            let variance =
                values.iter().map(|v| (v - mean_f).powi(2)).sum::<f64>() / values.len() as f64;
            Decimal::from_f64(variance.sqrt() / mean_f)
                .unwrap_or_default()
                .round_dp(4)
        };

        Self {
            mean,
            minimum,
            maximum,
            coefficient_of_variation,
        }
    }
}
