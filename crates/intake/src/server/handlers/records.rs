//! Staff record endpoint handlers

use axum::{
  extract::{Extension, Path, Query, State},
  http::StatusCode,
  response::Json,
};
use uuid::Uuid;

use crate::controller::GenerationClaim;
use crate::error::IntakeError;
use crate::server::handlers::{error_response, intake_error_response, ErrorResponse};
use crate::server::middleware::RequestContext;
use crate::server::types::{
  BaseResponse, ClearRecordsResponse, ListRecordsResponse, RecordResponse, ReportQuery,
};
use crate::server::AppState;

/// GET /records - Every stored record, newest first
pub async fn list_records(State(state): State<AppState>) -> Json<BaseResponse<ListRecordsResponse>> {
  let transaction_id = Uuid::new_v4();
  let records = state.controller.lock().await.records().to_vec();

  Json(BaseResponse::success(ListRecordsResponse { records }, transaction_id))
}

/// GET /records/{id} - One record with its report, if any
pub async fn get_record(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<BaseResponse<RecordResponse>>, ErrorResponse> {
  let transaction_id = Uuid::new_v4();
  let controller = state.controller.lock().await;

  match controller.record(&id) {
    Some(record) => Ok(Json(BaseResponse::success(RecordResponse { record: record.clone() }, transaction_id))),
    None => Err(error_response(
      StatusCode::NOT_FOUND,
      "record_not_found",
      &IntakeError::record_not_found(&id).to_string(),
      transaction_id,
    )),
  }
}

/// DELETE /records - Remove every stored record
pub async fn clear_records(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Result<Json<BaseResponse<ClearRecordsResponse>>, ErrorResponse> {
  let transaction_id = Uuid::new_v4();
  let mut controller = state.controller.lock().await;
  let cleared = controller.records().len();

  match controller.clear_records() {
    Ok(()) => {
      context.log_success(&format!("Cleared {cleared} records"), "records-api").await;
      Ok(Json(BaseResponse::success(ClearRecordsResponse { cleared }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Failed to clear records: {e}"), "records-api").await;
      Err(intake_error_response(&e, transaction_id))
    }
  }
}

/// POST /records/{id}/report - Generate or regenerate the AI report
///
/// The controller lock is released while the report service is working,
/// so intake and other reports carry on in the meantime. If the client
/// goes away mid-request the claim is dropped and the record is freed.
pub async fn generate_report(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
  Query(query): Query<ReportQuery>,
) -> Result<Json<BaseResponse<RecordResponse>>, ErrorResponse> {
  let transaction_id = Uuid::new_v4();

  let claim = match GenerationClaim::begin(&state.controller, &id).await {
    Ok(claim) => claim,
    Err(e) => {
      context.log_warn(&format!("Cannot generate report: {e}"), "records-api").await;
      return Err(intake_error_response(&e, transaction_id));
    }
  };

  context.log_info(&format!("Generating report for record {id}"), "records-api").await;
  let outcome = claim.generate(query.lang).await;

  match claim.finish(outcome).await {
    Ok(record) => {
      context.log_success(&format!("Stored report for record {id}"), "records-api").await;
      Ok(Json(BaseResponse::success(RecordResponse { record }, transaction_id)))
    }
    Err(e) => {
      context.log_error(&format!("Report for record {id} failed: {e}"), "records-api").await;
      Err(intake_error_response(&e, transaction_id))
    }
  }
}
