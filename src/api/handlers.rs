//! HTTP request handlers for the auto-enrolment engine API.
//!
//! This is the only place the engine touches a clock: a request without
//! an assessment date is assessed as of today. Everything below this
//! layer takes the date as an explicit argument.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{assess_batch, assess_eligibility};

use super::request::{AssessmentRequest, BatchAssessmentRequest};
use super::response::{ApiError, ApiErrorResponse, BatchAssessmentResponse, BatchEntry};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/assess", post(assess_handler))
        .route("/assess/batch", post(assess_batch_handler))
        .with_state(state)
}

fn rejection_to_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries the detailed serde error
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Handler for the POST /assess endpoint.
///
/// Assesses a single employee record and returns the full eligibility
/// result, including the ordered check outcomes.
async fn assess_handler(
    State(state): State<AppState>,
    payload: Result<Json<AssessmentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing assessment request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_to_error(correlation_id, rejection);
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let assessment_date = request
        .assessment_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let start_time = Instant::now();
    match assess_eligibility(&request.employee, assessment_date, state.config().config()) {
        Ok(result) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.employee_id,
                is_eligible = result.is_eligible,
                duration_us = duration.as_micros(),
                "Assessment completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Assessment failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Handler for the POST /assess/batch endpoint.
///
/// Assesses each record independently; an invalid record becomes an
/// error entry in the response rather than failing the whole batch, so
/// the response status is 200 whenever the request itself parses.
async fn assess_batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchAssessmentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch assessment request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_to_error(correlation_id, rejection);
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let assessment_date = request
        .assessment_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let start_time = Instant::now();
    let outcomes = assess_batch(&request.employees, assessment_date, state.config().config());

    let mut succeeded = 0;
    let mut failed = 0;
    let results: Vec<BatchEntry> = request
        .employees
        .iter()
        .zip(outcomes)
        .map(|(employee, outcome)| match outcome {
            Ok(result) => {
                succeeded += 1;
                BatchEntry {
                    employee_id: employee.id.clone(),
                    result: Some(result),
                    error: None,
                }
            }
            Err(err) => {
                failed += 1;
                let api_error: ApiErrorResponse = err.into();
                BatchEntry {
                    employee_id: employee.id.clone(),
                    result: None,
                    error: Some(api_error.error),
                }
            }
        })
        .collect();

    let duration = start_time.elapsed();
    info!(
        correlation_id = %correlation_id,
        total = results.len(),
        succeeded,
        failed,
        duration_us = duration.as_micros(),
        "Batch assessment completed"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(BatchAssessmentResponse {
            results,
            succeeded,
            failed,
        }),
    )
        .into_response()
}
