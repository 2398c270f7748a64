//! End-to-end tests for the auto-enrolment engine API.
//!
//! This suite drives the full stack through the HTTP surface:
//! - Single assessments, eligible and ineligible
//! - The earnings paths: gross pay, declared salary, payroll history
//! - Opt-out and re-enrolment scheduling
//! - Contribution attachment for enrolled employees
//! - Batch assessment with per-record error isolation
//! - Malformed request handling

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use pension_engine::api::{AppState, create_router};
use pension_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/ae_scheme").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

/// Parses a JSON decimal string for scale-insensitive comparison.
fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn baseline_employee(id: &str) -> Value {
    json!({
        "id": id,
        "date_of_birth": "1996-01-15",
        "employment_start_date": "2024-01-01",
        "employment_category": "private",
        "gross_pay": "3000.00",
        "pay_frequency": "monthly",
        "employment_status": "active"
    })
}

fn assessment_request(employee: Value) -> Value {
    json!({
        "employee": employee,
        "assessment_date": "2026-03-01"
    })
}

// =============================================================================
// Single Assessment
// =============================================================================

#[tokio::test]
async fn test_standard_employee_is_eligible() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(baseline_employee("emp_001")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee_id"], "emp_001");
    assert_eq!(body["is_eligible"], true);
    assert_eq!(body["assessment_date"], "2026-03-01");
    assert_eq!(body["reasons"].as_array().unwrap().len(), 7);
    assert_eq!(body["checks"]["age"]["passed"], true);
    assert_eq!(body["checks"]["earnings"]["passed"], true);
}

#[tokio::test]
async fn test_minimum_thresholds_met_exactly_is_eligible() {
    // Turns 23 on the assessment date, earns exactly the trigger, and has
    // exactly the waiting period of service.
    let employee = json!({
        "id": "emp_exact",
        "date_of_birth": "2003-03-01",
        "employment_start_date": "2025-09-01",
        "employment_category": "private",
        "gross_pay": "20000",
        "pay_frequency": "annual",
        "employment_status": "active"
    });

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(employee),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_eligible"], true);
}

#[tokio::test]
async fn test_under_age_employee_is_ineligible() {
    let mut employee = baseline_employee("emp_young");
    employee["date_of_birth"] = json!("2004-06-10"); // 21 on the assessment date

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(employee),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_eligible"], false);
    assert_eq!(body["checks"]["age"]["passed"], false);
    let reason = body["checks"]["age"]["reason"].as_str().unwrap();
    assert!(reason.contains("below the minimum"), "reason: {reason}");
    // Later checks still ran.
    assert_eq!(body["checks"]["employment_status"]["passed"], true);
}

#[tokio::test]
async fn test_earnings_below_trigger_is_ineligible() {
    let mut employee = baseline_employee("emp_low");
    employee["gross_pay"] = json!("1500.00"); // 18000/year

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(employee),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_eligible"], false);
    assert_eq!(body["checks"]["earnings"]["passed"], false);
}

#[tokio::test]
async fn test_waiting_period_reports_eligibility_date() {
    let mut employee = baseline_employee("emp_new");
    employee["employment_start_date"] = json!("2025-12-01");

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(employee),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_eligible"], false);
    assert_eq!(body["eligibility_date"], "2026-06-01");
}

#[tokio::test]
async fn test_opted_out_employee_reports_review_date() {
    let mut employee = baseline_employee("emp_out");
    employee["opted_out"] = json!(true);
    employee["opt_out_date"] = json!("2026-01-20");

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(employee),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_eligible"], false);
    // Two years on, aligned to the next quarterly staging date.
    assert_eq!(body["next_review_date"], "2028-04-01");
}

#[tokio::test]
async fn test_enrolled_employee_gets_contribution_breakdown() {
    let mut employee = baseline_employee("emp_enrolled");
    employee["enrolment_date"] = json!("2026-01-01");

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(employee),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_eligible"], true);

    let contributions = &body["contributions"];
    assert_eq!(contributions["current_phase"], 1);
    assert_eq!(
        decimal(&contributions["reckonable_earnings"]),
        Decimal::from_str("36000").unwrap()
    );
    assert_eq!(
        decimal(&contributions["current"]["employee"]),
        Decimal::from_str("540.00").unwrap()
    );
    assert_eq!(
        decimal(&contributions["current"]["total"]),
        Decimal::from_str("1260.00").unwrap()
    );
    assert_eq!(
        decimal(&contributions["per_period"]["employee"]),
        Decimal::from_str("45.00").unwrap()
    );
    assert_eq!(contributions["all_phases"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_payroll_history_drives_earnings_projection() {
    let history: Vec<Value> = (1..=12)
        .map(|month| {
            json!({
                "period_end": format!("2025-{:02}-28", month),
                "gross": "3000"
            })
        })
        .collect();

    let mut employee = baseline_employee("emp_hist");
    employee["gross_pay"] = json!("0");
    employee["payroll_history"] = json!(history);

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(employee),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["earnings"]["passed"], true);
    let reason = body["checks"]["earnings"]["reason"].as_str().unwrap();
    assert!(reason.contains("projected from 12 months"), "reason: {reason}");
}

#[tokio::test]
async fn test_director_with_majority_stake_is_excluded() {
    let mut employee = baseline_employee("emp_dir");
    employee["director"] = json!({
        "role": "director",
        "shareholding": "0.51"
    });

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(employee),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_eligible"], false);
    assert_eq!(body["checks"]["exclusion"]["passed"], false);
}

#[tokio::test]
async fn test_assessment_date_defaults_to_today() {
    // Without a date the boundary uses today; the call must still succeed.
    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        json!({ "employee": baseline_employee("emp_today") }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["assessment_date"].is_string());
}

// =============================================================================
// Batch Assessment
// =============================================================================

#[tokio::test]
async fn test_batch_assessment_isolates_bad_records() {
    let mut bad = baseline_employee("emp_bad");
    bad["date_of_birth"] = json!("2030-01-01"); // after the assessment date

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess/batch",
        json!({
            "employees": [baseline_employee("emp_ok"), bad],
            "assessment_date": "2026-03-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], 1);
    assert_eq!(body["failed"], 1);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["employee_id"], "emp_ok");
    assert_eq!(results[0]["result"]["is_eligible"], true);
    assert!(results[0].get("error").is_none());
    assert_eq!(results[1]["employee_id"], "emp_bad");
    assert_eq!(results[1]["error"]["code"], "INVALID_DATE");
    assert!(results[1].get("result").is_none());
}

#[tokio::test]
async fn test_empty_batch_returns_empty_results() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/assess/batch",
        json!({ "employees": [], "assessment_date": "2026-03-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], 0);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
}

// =============================================================================
// Error Cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json_returns_bad_request() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/assess")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_field_returns_validation_error() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        json!({
            "employee": {
                "id": "emp_partial",
                "date_of_birth": "1990-01-15"
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_negative_pay_returns_invalid_employee() {
    let mut employee = baseline_employee("emp_neg");
    employee["gross_pay"] = json!("-100.00");

    let (status, body) = post_json(
        create_router_for_test(),
        "/assess",
        assessment_request(employee),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_EMPLOYEE");
    assert!(body["message"].as_str().unwrap().contains("gross_pay"));
}
