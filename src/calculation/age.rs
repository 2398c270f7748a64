//! Exact-day age and date-boundary arithmetic.
//!
//! Every function here is pure: no ambient clock is ever read, and the
//! reference date is always an explicit argument. Age comparisons are
//! exact-day, never year-subtraction approximations.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{EngineError, EngineResult};

/// Ages above this are reported to callers as warnings, not errors.
pub const MAX_PLAUSIBLE_AGE: u32 = 120;

/// Calculates age in full years at a reference date.
///
/// The age is the difference in calendar years, decremented by one if the
/// month/day anniversary has not yet occurred in the reference year. A
/// 29 February birthday therefore ticks over on 1 March in non-leap years.
///
/// # Arguments
///
/// * `birth` - The date of birth
/// * `reference` - The date at which to measure the age
///
/// # Returns
///
/// Returns the age in full years, or `InvalidDate` if `birth` is after
/// `reference`.
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::exact_age;
/// use chrono::NaiveDate;
///
/// let birth = NaiveDate::from_ymd_opt(2003, 3, 1).unwrap();
/// let reference = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
/// assert_eq!(exact_age(birth, reference).unwrap(), 22);
///
/// let birthday = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// assert_eq!(exact_age(birth, birthday).unwrap(), 23);
/// ```
pub fn exact_age(birth: NaiveDate, reference: NaiveDate) -> EngineResult<u32> {
    if birth > reference {
        return Err(EngineError::InvalidDate {
            field: "date_of_birth".to_string(),
            date: birth,
            message: "is after the reference date".to_string(),
        });
    }

    let mut age = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }

    Ok(age as u32)
}

/// Returns the date on which a person born on `birth` reaches `age`.
///
/// For a 29 February birth the anniversary in a non-leap year is clamped
/// to 28 February, consistent with [`add_months`].
pub fn date_at_age(birth: NaiveDate, age: u32) -> NaiveDate {
    add_months(birth, (age * 12) as i32)
}

/// Adds a signed number of calendar months, clamping the day to the end of
/// the target month when necessary (e.g., 31 January + 1 month = 28/29
/// February).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Adds a signed number of whole weeks.
pub fn add_weeks(date: NaiveDate, weeks: i64) -> NaiveDate {
    let days = weeks.unsigned_abs() * 7;
    if weeks >= 0 {
        date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
    }
}

/// Counts full elapsed months between two dates, truncated toward zero.
///
/// A negative day-of-month difference subtracts one whole month: from
/// 15 January to 14 March is one full month, not two.
///
/// # Returns
///
/// Returns the month count, or `InvalidDate` if `start` is after `end`.
pub fn full_months_between(start: NaiveDate, end: NaiveDate) -> EngineResult<u32> {
    if start > end {
        return Err(EngineError::InvalidDate {
            field: "employment_start_date".to_string(),
            date: start,
            message: "is after the reference date".to_string(),
        });
    }

    let mut months =
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }

    Ok(months.max(0) as u32)
}
