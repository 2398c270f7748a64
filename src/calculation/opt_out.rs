//! Opt-out window and re-enrolment functionality.
//!
//! This module implements the opt-out state machine: before-window during
//! the waiting weeks, open, then expired. The state is purely a function
//! of elapsed time from the enrolment date; nothing advances it except
//! time and the opt-out action itself, and nothing is cached between
//! calls.
//!
//! Both window boundaries are inclusive: an opt-out on the open date or
//! the close date itself is valid.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SchemeConfig;
use crate::error::{EngineError, EngineResult};

use super::age::{add_months, add_weeks};

/// Where an enrolment currently sits relative to its opt-out window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptOutWindowState {
    /// The waiting period is not yet complete.
    BeforeWindow,
    /// The window is open; an opt-out is valid.
    Open,
    /// The window has closed.
    Expired,
}

/// Which window profile applies to an enrolment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrolmentType {
    /// First enrolment: the window opens at +2 weeks and closes at +4.
    Initial,
    /// Re-enrolment after an opt-out: +6 to +8 weeks.
    ReEnrolment,
}

/// The closed opt-out interval for one enrolment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptOutWindow {
    /// First valid opt-out date, inclusive.
    pub opens_on: NaiveDate,
    /// Last valid opt-out date, inclusive.
    pub closes_on: NaiveDate,
}

/// The state of an opt-out window at a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptOutWindowStatus {
    /// The current state of the window.
    pub state: OptOutWindowState,
    /// First valid opt-out date, inclusive.
    pub opens_on: NaiveDate,
    /// Last valid opt-out date, inclusive.
    pub closes_on: NaiveDate,
    /// Days until the window closes; zero once expired.
    pub days_remaining: i64,
}

/// One contribution payment made since enrolment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionPayment {
    /// The date the payment was made.
    pub date: NaiveDate,
    /// The employee component.
    pub employee: Decimal,
    /// The employer component.
    pub employer: Decimal,
    /// The state top-up component; never refunded.
    pub state: Decimal,
}

/// The refund due on a valid opt-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundBreakdown {
    /// Refunded employee contributions.
    pub employee: Decimal,
    /// Refunded employer contributions.
    pub employer: Decimal,
    /// The refund total; the state component is never included.
    pub total: Decimal,
}

/// The outcome of an opt-out request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptOutOutcome {
    /// Whether the opt-out is valid.
    pub valid: bool,
    /// A human-readable reason for the outcome.
    pub reason: String,
    /// The refund due, present only on a valid opt-out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund: Option<RefundBreakdown>,
    /// The next re-enrolment date, present only on a valid opt-out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_re_enrolment_date: Option<NaiveDate>,
}

/// Returns the closed opt-out window for an enrolment.
pub fn opt_out_window(
    enrolment_date: NaiveDate,
    enrolment_type: EnrolmentType,
    config: &SchemeConfig,
) -> OptOutWindow {
    let (open_weeks, close_weeks) = match enrolment_type {
        EnrolmentType::Initial => (
            config.opt_out.initial_open_weeks,
            config.opt_out.initial_close_weeks,
        ),
        EnrolmentType::ReEnrolment => (
            config.opt_out.re_enrolment_open_weeks,
            config.opt_out.re_enrolment_close_weeks,
        ),
    };

    OptOutWindow {
        opens_on: add_weeks(enrolment_date, open_weeks),
        closes_on: add_weeks(enrolment_date, close_weeks),
    }
}

/// Returns the window state at a reference date.
///
/// `days_remaining` counts the days until the close date while the window
/// has not yet expired, and is zero afterwards.
pub fn window_status(
    enrolment_date: NaiveDate,
    enrolment_type: EnrolmentType,
    as_of: NaiveDate,
    config: &SchemeConfig,
) -> OptOutWindowStatus {
    let window = opt_out_window(enrolment_date, enrolment_type, config);

    let state = if as_of < window.opens_on {
        OptOutWindowState::BeforeWindow
    } else if as_of <= window.closes_on {
        OptOutWindowState::Open
    } else {
        OptOutWindowState::Expired
    };

    let days_remaining = match state {
        OptOutWindowState::Expired => 0,
        _ => (window.closes_on - as_of).num_days(),
    };

    OptOutWindowStatus {
        state,
        opens_on: window.opens_on,
        closes_on: window.closes_on,
        days_remaining,
    }
}

/// Validates an opt-out request and computes the refund due.
///
/// A request before the window opens is rejected as "waiting period not
/// complete"; at or after the day following the close date it is rejected
/// as expired; inside the closed interval it is valid. The refund covers
/// employee and employer contributions with payment dates inside the
/// closed interval `[enrolment_date, opt_out_date]`; the state top-up is
/// never refunded. A valid opt-out also carries the next re-enrolment
/// date.
///
/// # Returns
///
/// Returns the outcome, or an error if the opt-out date precedes the
/// enrolment date, a payment amount is negative, or the staging calendar
/// is empty.
pub fn validate_opt_out(
    enrolment_date: NaiveDate,
    enrolment_type: EnrolmentType,
    opt_out_date: NaiveDate,
    payments: &[ContributionPayment],
    config: &SchemeConfig,
) -> EngineResult<OptOutOutcome> {
    if opt_out_date < enrolment_date {
        return Err(EngineError::InvalidDate {
            field: "opt_out_date".to_string(),
            date: opt_out_date,
            message: "is before the enrolment date".to_string(),
        });
    }

    for payment in payments {
        if payment.employee.is_sign_negative()
            || payment.employer.is_sign_negative()
            || payment.state.is_sign_negative()
        {
            return Err(EngineError::InvalidEmployee {
                field: "contribution_payments".to_string(),
                message: format!("payment on {} has a negative component", payment.date),
            });
        }
    }

    let window = opt_out_window(enrolment_date, enrolment_type, config);

    if opt_out_date < window.opens_on {
        return Ok(OptOutOutcome {
            valid: false,
            reason: format!(
                "Waiting period not complete: the opt-out window opens on {}",
                window.opens_on
            ),
            refund: None,
            next_re_enrolment_date: None,
        });
    }

    if opt_out_date > window.closes_on {
        return Ok(OptOutOutcome {
            valid: false,
            reason: format!(
                "Opt-out window expired: the window closed on {}",
                window.closes_on
            ),
            refund: None,
            next_re_enrolment_date: None,
        });
    }

    let in_window = payments
        .iter()
        .filter(|p| p.date >= enrolment_date && p.date <= opt_out_date);
    let mut employee = Decimal::ZERO;
    let mut employer = Decimal::ZERO;
    for payment in in_window {
        employee += payment.employee;
        employer += payment.employer;
    }

    let next = next_re_enrolment_date(opt_out_date, config)?;

    Ok(OptOutOutcome {
        valid: true,
        reason: format!(
            "Opt-out accepted within the window {} to {}",
            window.opens_on, window.closes_on
        ),
        refund: Some(RefundBreakdown {
            employee,
            employer,
            total: employee + employer,
        }),
        next_re_enrolment_date: Some(next),
    })
}

/// Computes the next re-enrolment date after an opt-out.
///
/// The statutory interval is added to the opt-out date and the result is
/// aligned forward to the next date in the injected staging calendar.
pub fn next_re_enrolment_date(
    opt_out_date: NaiveDate,
    config: &SchemeConfig,
) -> EngineResult<NaiveDate> {
    let interval_months = config.opt_out.re_enrolment_interval_years as i32 * 12;
    let earliest = add_months(opt_out_date, interval_months);

    config
        .staging
        .next_on_or_after(earliest)
        .ok_or_else(|| EngineError::CalculationError {
            message: "staging calendar has no valid dates".to_string(),
        })
}

/// Returns true when re-enrolment has fallen due.
///
/// A pure predicate over the same schedule as [`next_re_enrolment_date`];
/// no state beyond the last opt-out date is needed.
pub fn is_re_enrolment_due(
    last_opt_out: NaiveDate,
    today: NaiveDate,
    config: &SchemeConfig,
) -> EngineResult<bool> {
    Ok(today >= next_re_enrolment_date(last_opt_out, config)?)
}
