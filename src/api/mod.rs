//! HTTP API module for the auto-enrolment engine.
//!
//! A thin boundary over the pure calculation layer: handlers default the
//! assessment date to today, translate engine errors to HTTP responses,
//! and nothing more. No authentication or upload handling lives here.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AssessmentRequest, BatchAssessmentRequest};
pub use response::{ApiError, BatchAssessmentResponse, BatchEntry};
pub use state::AppState;
