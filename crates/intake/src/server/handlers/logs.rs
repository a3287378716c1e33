//! Logs endpoint handler

use axum::{
  extract::{Extension, Query},
  http::StatusCode,
  response::Json,
};
use herald::Level;
use uuid::Uuid;

use crate::server::handlers::{error_response, ErrorResponse};
use crate::server::middleware::RequestContext;
use crate::server::types::{BaseResponse, LogsQuery, LogsResponse};

const DEFAULT_LOG_LIMIT: usize = 100;

/// GET /logs - Recent server log entries, optionally filtered by level
pub async fn get_logs(
  Extension(context): Extension<RequestContext>,
  Query(query): Query<LogsQuery>,
) -> Result<Json<BaseResponse<LogsResponse>>, ErrorResponse> {
  let transaction_id = Uuid::new_v4();

  let level = match query.level.as_deref() {
    None | Some("all") => None,
    Some(raw) => match raw.parse::<Level>() {
      Ok(level) => Some(level),
      Err(e) => return Err(error_response(StatusCode::BAD_REQUEST, "invalid_log_level", &e, transaction_id)),
    },
  };

  match context.logs.entries(Some(query.limit.unwrap_or(DEFAULT_LOG_LIMIT)), level).await {
    Ok(logs) => Ok(Json(BaseResponse::success(LogsResponse { logs }, transaction_id))),
    Err(e) => {
      context.log_error(&format!("Failed to read logs: {e}"), "logs-api").await;
      Err(error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "logs_read_failed",
        &format!("Failed to read logs: {e}"),
        transaction_id,
      ))
    }
  }
}
