//! REST router exercised in-process with `oneshot`

use async_trait::async_trait;
use axum::{
  body::Body,
  http::{Request, StatusCode},
  Router,
};
use herald::server_logs::ServerLogs;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Notify;
use tower::ServiceExt;

use intake::server::{routing::create_router, AppState};
use intake::{
  ClientRecord, GenerationError, IntakeController, Language, MemoryStorage, RecordStore, ReportGenerator,
};

struct EchoGenerator;

#[async_trait]
impl ReportGenerator for EchoGenerator {
  async fn generate_report(&self, record: &ClientRecord, language: Language) -> Result<String, GenerationError> {
    Ok(format!("Report for {} ({language})", record.form.name))
  }
}

struct DownGenerator;

#[async_trait]
impl ReportGenerator for DownGenerator {
  async fn generate_report(&self, _record: &ClientRecord, _language: Language) -> Result<String, GenerationError> {
    Err(GenerationError::RateLimited)
  }
}

/// Stalls on the first request and answers every later one
struct StallOnceGenerator {
  calls: AtomicUsize,
  started: Arc<Notify>,
}

#[async_trait]
impl ReportGenerator for StallOnceGenerator {
  async fn generate_report(&self, record: &ClientRecord, _language: Language) -> Result<String, GenerationError> {
    if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
      self.started.notify_one();
      std::future::pending::<()>().await;
    }
    Ok(format!("Report for {}", record.form.name))
  }
}

fn app(generator: Arc<dyn ReportGenerator>) -> (Router, TempDir) {
  let dir = TempDir::new().unwrap();
  let logs = ServerLogs::open_with_silent(dir.path().join("server.logs.jsonl"), true).unwrap();
  let store = RecordStore::load(Box::new(MemoryStorage::new()));
  let controller = IntakeController::new(store, generator, Language::En);
  (create_router(AppState::new(controller, logs)), dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(body) => builder.header("content-type", "application/json").body(Body::from(body.to_string())),
    None => builder.body(Body::empty()),
  }
  .unwrap();

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = response.into_body().collect().await.unwrap().to_bytes();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, json)
}

fn jane() -> Value {
  json!({ "form": { "name": "Jane", "painArea": ["Lower Back"], "consent": true } })
}

#[tokio::test]
async fn test_status_reports_record_count() {
  let (app, _dir) = app(Arc::new(EchoGenerator));

  let (status, body) = send(&app, "GET", "/status", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "healthy");
  assert_eq!(body["records"], 0);
  assert_eq!(body["storage_key"], "mp_records_v2");
  assert!(body["transaction_id"].is_string());
}

#[tokio::test]
async fn test_submit_list_and_fetch_record() {
  let (app, _dir) = app(Arc::new(EchoGenerator));

  let (status, body) = send(&app, "POST", "/intake", Some(jane())).await;
  assert_eq!(status, StatusCode::CREATED);
  let id = body["record"]["id"].as_str().unwrap().to_string();
  assert_eq!(body["record"]["name"], "Jane");
  assert_eq!(body["record"]["painLevel"], 5);
  assert!(body["record"].get("aiResult").is_none());

  let (status, body) = send(&app, "GET", "/records", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["records"].as_array().unwrap().len(), 1);

  let (status, body) = send(&app, "GET", &format!("/records/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["record"]["id"], id.as_str());
}

#[tokio::test]
async fn test_rejected_form_returns_localized_warning() {
  let (app, _dir) = app(Arc::new(EchoGenerator));
  let body = json!({ "form": { "name": "Bob", "painArea": ["Neck"] }, "language": "zh" });

  let (status, body) = send(&app, "POST", "/intake", Some(body)).await;

  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["errors"][0]["key"], "validation_failed");
  assert_eq!(body["errors"][0]["message"], Language::Zh.messages().consent_warning);

  let (_, body) = send(&app, "GET", "/records", None).await;
  assert!(body["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_report_stores_result() {
  let (app, _dir) = app(Arc::new(EchoGenerator));
  let (_, body) = send(&app, "POST", "/intake", Some(jane())).await;
  let id = body["record"]["id"].as_str().unwrap().to_string();

  let (status, body) = send(&app, "POST", &format!("/records/{id}/report?lang=zh"), None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["record"]["aiResult"], "Report for Jane (zh)");

  let (_, body) = send(&app, "GET", &format!("/records/{id}"), None).await;
  assert_eq!(body["record"]["aiResult"], "Report for Jane (zh)");
}

#[tokio::test]
async fn test_generate_report_errors_map_to_status_codes() {
  let (app, _dir) = app(Arc::new(DownGenerator));

  let (status, body) = send(&app, "POST", "/records/missing/report", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["errors"][0]["key"], "record_not_found");

  let (_, body) = send(&app, "POST", "/intake", Some(jane())).await;
  let id = body["record"]["id"].as_str().unwrap().to_string();

  let (status, body) = send(&app, "POST", &format!("/records/{id}/report"), None).await;
  assert_eq!(status, StatusCode::BAD_GATEWAY);
  assert_eq!(body["errors"][0]["key"], "report_generation_failed");

  let (_, body) = send(&app, "GET", &format!("/records/{id}"), None).await;
  assert!(body["record"].get("aiResult").is_none());
}

#[tokio::test]
async fn test_clear_records_reports_count() {
  let (app, _dir) = app(Arc::new(EchoGenerator));
  send(&app, "POST", "/intake", Some(jane())).await;
  send(&app, "POST", "/intake", Some(jane())).await;

  let (status, body) = send(&app, "DELETE", "/records", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["cleared"], 2);
  let (_, body) = send(&app, "GET", "/status", None).await;
  assert_eq!(body["records"], 0);
}

#[tokio::test]
async fn test_logs_endpoint_returns_request_entries() {
  let (app, _dir) = app(Arc::new(EchoGenerator));
  send(&app, "POST", "/intake", Some(jane())).await;

  let (status, body) = send(&app, "GET", "/logs?level=success", None).await;
  assert_eq!(status, StatusCode::OK);
  let logs = body["logs"].as_array().unwrap();
  assert!(!logs.is_empty());
  assert!(logs.iter().all(|entry| entry["level"] == "success"));
  assert_eq!(logs[0]["component"], "intake-api");

  let (status, body) = send(&app, "GET", "/logs?level=loud", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["key"], "invalid_log_level");
}

#[tokio::test]
async fn test_abandoned_report_request_frees_record() {
  let started = Arc::new(Notify::new());
  let generator = StallOnceGenerator { calls: AtomicUsize::new(0), started: Arc::clone(&started) };
  let (app, _dir) = app(Arc::new(generator));
  let (_, body) = send(&app, "POST", "/intake", Some(jane())).await;
  let uri = format!("/records/{}/report", body["record"]["id"].as_str().unwrap());

  // Client gives up while the report service is still working
  let abandoned = tokio::spawn({
    let app = app.clone();
    let uri = uri.clone();
    async move { send(&app, "POST", &uri, None).await }
  });
  started.notified().await;
  abandoned.abort();
  assert!(abandoned.await.unwrap_err().is_cancelled());

  let (status, body) = send(&app, "POST", &uri, None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["record"]["aiResult"], "Report for Jane");
}
