//! Client intake endpoint handler

use axum::{
  extract::{Extension, Json, State},
  http::StatusCode,
  response::Json as ResponseJson,
};
use uuid::Uuid;

use crate::error::IntakeError;
use crate::server::handlers::{error_response, intake_error_response, ErrorResponse};
use crate::server::middleware::RequestContext;
use crate::server::types::{BaseResponse, RecordResponse, SubmitIntakeRequest};
use crate::server::AppState;

/// POST /intake - Validate and store a completed intake form
pub async fn submit_intake(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Json(request): Json<SubmitIntakeRequest>,
) -> Result<(StatusCode, ResponseJson<BaseResponse<RecordResponse>>), ErrorResponse> {
  let transaction_id = Uuid::new_v4();
  let mut controller = state.controller.lock().await;
  let language = request.language.unwrap_or_else(|| controller.language());

  match controller.submit_form(request.form) {
    Ok(record) => {
      controller.reset();
      context.log_success(&format!("Stored intake record {}", record.id), "intake-api").await;
      Ok((StatusCode::CREATED, ResponseJson(BaseResponse::success(RecordResponse { record }, transaction_id))))
    }
    Err(IntakeError::Validation(validation)) => {
      let warning = language.messages().warning_for(validation).unwrap_or_default();
      context.log_warn(&format!("Rejected intake form: {validation}"), "intake-api").await;
      Err(error_response(StatusCode::UNPROCESSABLE_ENTITY, "validation_failed", warning, transaction_id))
    }
    Err(e) => {
      context.log_error(&format!("Failed to store intake form: {e}"), "intake-api").await;
      Err(intake_error_response(&e, transaction_id))
    }
  }
}
