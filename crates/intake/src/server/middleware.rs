//! Request context middleware for the intake REST API
//!
//! Every request gets an id and is logged to the server log when it starts
//! and when it completes. Handlers can pull the [`RequestContext`] out of
//! the request extensions to log against the same id.

use axum::{
  extract::{Request, State},
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use herald::server_logs::{RequestTrace, ServerLogs};
use herald::Level;
use std::time::Instant;
use uuid::Uuid;

use crate::server::AppState;

#[derive(Clone)]
pub struct RequestContext {
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
  pub logs: ServerLogs,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, logs: ServerLogs) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri, logs }
  }

  fn trace(&self, status_code: Option<u16>, duration_ms: Option<f64>) -> RequestTrace {
    RequestTrace {
      request_id: Some(self.request_id.to_string()),
      method: Some(self.method.to_string()),
      path: Some(self.uri.path().to_string()),
      status_code,
      duration_ms,
    }
  }

  pub async fn log(&self, level: Level, message: &str, component: &str) {
    let _ = self.logs.record(level, message, component, Some(self.trace(None, None))).await;
  }

  pub async fn log_info(&self, message: &str, component: &str) {
    self.log(Level::Info, message, component).await;
  }

  pub async fn log_success(&self, message: &str, component: &str) {
    self.log(Level::Success, message, component).await;
  }

  pub async fn log_warn(&self, message: &str, component: &str) {
    self.log(Level::Warn, message, component).await;
  }

  pub async fn log_error(&self, message: &str, component: &str) {
    self.log(Level::Error, message, component).await;
  }

  async fn log_complete(&self, status_code: u16, duration_ms: f64) {
    let level = if status_code >= 500 { Level::Error } else { Level::Info };
    let trace = self.trace(Some(status_code), Some(duration_ms));
    let _ = self.logs.record(level, "Request completed", "http-request", Some(trace)).await;
  }
}

/// Attach a [`RequestContext`] and log the request's start and completion
pub async fn request_context_middleware(
  State(state): State<AppState>,
  mut request: Request,
  next: Next,
) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone(), state.logs.clone());

  let started = Instant::now();
  context.log(Level::Debug, "Request started", "http-request").await;
  request.extensions_mut().insert(context.clone());

  let response = next.run(request).await;

  let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
  context.log_complete(response.status().as_u16(), duration_ms).await;
  response
}
