//! Endpoint handlers, one module per resource

use axum::{http::StatusCode, response::Json};
use uuid::Uuid;

use crate::error::IntakeError;
use crate::server::types::{ApiError, BaseResponse};

pub mod intake;
pub mod logs;
pub mod records;
pub mod status;

/// Error half of every handler result
pub type ErrorResponse = (StatusCode, Json<BaseResponse<()>>);

pub(crate) fn error_response(
  status: StatusCode,
  key: &str,
  message: &str,
  transaction_id: Uuid,
) -> ErrorResponse {
  let error = ApiError::new(key, message);
  (status, Json(BaseResponse::<()>::error(vec![error], transaction_id)))
}

/// HTTP status and error key for a controller error
pub(crate) fn classify(error: &IntakeError) -> (StatusCode, &'static str) {
  match error {
    IntakeError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed"),
    IntakeError::Form(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_form"),
    IntakeError::RecordNotFound { .. } => (StatusCode::NOT_FOUND, "record_not_found"),
    IntakeError::ReportInProgress { .. } => (StatusCode::CONFLICT, "report_in_progress"),
    IntakeError::Generation(_) => (StatusCode::BAD_GATEWAY, "report_generation_failed"),
    IntakeError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_failed"),
  }
}

pub(crate) fn intake_error_response(error: &IntakeError, transaction_id: Uuid) -> ErrorResponse {
  let (status, key) = classify(error);
  error_response(status, key, &error.to_string(), transaction_id)
}
