//! Axum router configuration for all endpoints

use axum::{
  middleware,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{intake, logs, records, status};
use crate::server::middleware::request_context_middleware;
use crate::server::AppState;

pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    // Logs endpoint
    .route("/logs", get(logs::get_logs))
    // Client intake
    .route("/intake", post(intake::submit_intake))
    // Staff records
    .route("/records", get(records::list_records).delete(records::clear_records))
    .route("/records/{id}", get(records::get_record))
    .route("/records/{id}/report", post(records::generate_report))
    .layer(middleware::from_fn_with_state(state.clone(), request_context_middleware))
    .with_state(state)
}
