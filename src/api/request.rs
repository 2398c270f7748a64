//! Request types for the auto-enrolment engine API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::EmployeeRecord;

/// Request body for POST /assess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// The employee record to assess.
    pub employee: EmployeeRecord,
    /// The date to assess against; defaults to today when omitted.
    #[serde(default)]
    pub assessment_date: Option<NaiveDate>,
}

/// Request body for POST /assess/batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAssessmentRequest {
    /// The employee records to assess independently.
    pub employees: Vec<EmployeeRecord>,
    /// The date to assess against; defaults to today when omitted.
    #[serde(default)]
    pub assessment_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_assessment_request() {
        let json = r#"{
            "employee": {
                "id": "emp_001",
                "date_of_birth": "1990-01-15",
                "employment_start_date": "2023-06-01",
                "employment_category": "private",
                "gross_pay": "2500.00",
                "pay_frequency": "monthly",
                "employment_status": "active"
            },
            "assessment_date": "2026-03-01"
        }"#;

        let request: AssessmentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee.id, "emp_001");
        assert_eq!(
            request.assessment_date,
            Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
        );
    }

    #[test]
    fn test_assessment_date_defaults_to_none() {
        let json = r#"{
            "employee": {
                "id": "emp_001",
                "date_of_birth": "1990-01-15",
                "employment_start_date": "2023-06-01",
                "employment_category": "private",
                "gross_pay": "2500.00",
                "pay_frequency": "monthly",
                "employment_status": "active"
            }
        }"#;

        let request: AssessmentRequest = serde_json::from_str(json).unwrap();
        assert!(request.assessment_date.is_none());
    }

    #[test]
    fn test_deserialize_batch_request() {
        let json = r#"{
            "employees": [
                {
                    "id": "emp_001",
                    "date_of_birth": "1990-01-15",
                    "employment_start_date": "2023-06-01",
                    "employment_category": "private",
                    "gross_pay": "2500.00",
                    "pay_frequency": "monthly",
                    "employment_status": "active"
                },
                {
                    "id": "emp_002",
                    "date_of_birth": "1985-05-20",
                    "employment_start_date": "2020-01-15",
                    "employment_category": "public_service",
                    "gross_pay": "45000",
                    "pay_frequency": "annual",
                    "employment_status": "active"
                }
            ]
        }"#;

        let request: BatchAssessmentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employees.len(), 2);
        assert!(request.assessment_date.is_none());
    }
}
