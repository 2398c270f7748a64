//! Employee record model and related types.
//!
//! This module defines the [`EmployeeRecord`] struct and its supporting enums
//! for representing a normalized payroll record entering the auto-enrolment
//! engine. Records arrive pre-validated from the upload/parsing layer; the
//! engine only re-checks numeric ranges before assessing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The employment category relevant to PRSI-style classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentCategory {
    /// Private-sector employment under a contract of service.
    Private,
    /// Civil or public service employment.
    PublicService,
    /// Health Service Executive or former health board employment.
    HealthService,
    /// Commissioned officer of the Defence Forces.
    DefenceForcesOfficer,
    /// Non-commissioned Defence Forces personnel.
    DefenceForcesEnlisted,
    /// Self-employed under a contract for services.
    SelfEmployed,
    /// Share fisherman or fisherwoman.
    ShareFisherman,
}

/// The current employment status of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Actively employed and on payroll.
    Active,
    /// On approved leave but still employed.
    OnLeave,
    /// Employment has ended.
    Terminated,
    /// Retired from employment.
    Retired,
}

/// The cadence at which gross pay is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Paid every week.
    Weekly,
    /// Paid every two weeks.
    Fortnightly,
    /// Paid every four weeks.
    FourWeekly,
    /// Paid every calendar month.
    Monthly,
    /// An annual figure.
    Annual,
}

/// The role a director holds on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectorRole {
    /// An ordinary board member.
    Director,
    /// A managing director with executive control.
    ManagingDirector,
}

/// Shareholdings held by the director's immediate family, as fractions of
/// the company in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FamilyShareholding {
    /// Fraction held by a spouse or civil partner.
    #[serde(default)]
    pub spouse: Decimal,
    /// Fraction held by children.
    #[serde(default)]
    pub children: Decimal,
    /// Fraction held by parents.
    #[serde(default)]
    pub parents: Decimal,
}

/// Directorship and ownership attributes used by the exclusion evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorDetails {
    /// The role held on the board.
    pub role: DirectorRole,
    /// Personal shareholding as a fraction of the company in `[0, 1]`.
    pub shareholding: Decimal,
    /// Family shareholdings, combined with the personal holding for the
    /// family-control test.
    #[serde(default)]
    pub family: FamilyShareholding,
    /// True when this person is the only director of the company.
    #[serde(default)]
    pub sole_director: bool,
    /// True when this person controls a majority of the board.
    #[serde(default)]
    pub board_majority: bool,
    /// True when this person holds veto rights over board decisions.
    #[serde(default)]
    pub veto_rights: bool,
    /// True when a voting-rights agreement grants this person control.
    #[serde(default)]
    pub voting_agreement: bool,
}

/// A single month of payroll history used by the variable earnings projector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// The last day of the payroll month this record covers.
    pub period_end: NaiveDate,
    /// Gross pay received in the month.
    pub gross: Decimal,
}

/// A normalized employee record entering the eligibility engine.
///
/// One record is assessed per call; the engine never mutates or retains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's date of birth.
    pub date_of_birth: NaiveDate,
    /// The date the employee started employment.
    pub employment_start_date: NaiveDate,
    /// The employment category for classification.
    pub employment_category: EmploymentCategory,
    /// Whether the position is permanent and pensionable.
    #[serde(default = "default_true")]
    pub permanent: bool,
    /// Gross pay at the supplied frequency.
    pub gross_pay: Decimal,
    /// The cadence of `gross_pay`.
    pub pay_frequency: PayFrequency,
    /// Contracted hours per week, if known.
    #[serde(default)]
    pub hours_per_week: Option<Decimal>,
    /// Weeks covered by an annual year-to-date `gross_pay`, for partial-year
    /// annualization. Only valid with an annual pay frequency; rejected at
    /// any other cadence.
    #[serde(default)]
    pub weeks_worked: Option<Decimal>,
    /// Employer-declared annual salary. When present, it short-circuits the
    /// variable earnings projector.
    #[serde(default)]
    pub annual_salary: Option<Decimal>,
    /// Monthly payroll history, oldest first or not; the projector sorts.
    #[serde(default)]
    pub payroll_history: Vec<PayrollRecord>,
    /// Whether the employee has opted out of the scheme.
    #[serde(default)]
    pub opted_out: bool,
    /// The date of the most recent opt-out, if any.
    #[serde(default)]
    pub opt_out_date: Option<NaiveDate>,
    /// The date the employee was enrolled, if known.
    #[serde(default)]
    pub enrolment_date: Option<NaiveDate>,
    /// The current employment status.
    pub employment_status: EmploymentStatus,
    /// Whether the employee is a member of a partnership.
    #[serde(default)]
    pub partnership_member: bool,
    /// Directorship and ownership attributes, if the employee is a director.
    #[serde(default)]
    pub director: Option<DirectorDetails>,
}

fn default_true() -> bool {
    true
}

impl EmployeeRecord {
    /// Returns true if the employee is self-employed.
    pub fn is_self_employed(&self) -> bool {
        self.employment_category == EmploymentCategory::SelfEmployed
    }

    /// Returns true if the employee is still on the employer's books.
    ///
    /// Approved leave does not break continuity of employment.
    pub fn is_active(&self) -> bool {
        matches!(
            self.employment_status,
            EmploymentStatus::Active | EmploymentStatus::OnLeave
        )
    }
}
