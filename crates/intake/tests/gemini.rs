//! Gemini client against a local stub of the generateContent endpoint

use axum::{
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
  routing::post,
  Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use intake::{ClientRecord, GeminiClient, GenerationError, IntakeForm, Language, ListField, ReportGenerator};

#[derive(Clone, Default)]
struct Seen {
  requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

/// Serve `reply` from a stub endpoint, returning its base URL
async fn stub(status: StatusCode, reply: Value, seen: Seen) -> String {
  let handler = move |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| {
    let reply = reply.clone();
    async move {
      let key = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()).map(str::to_string);
      seen.requests.lock().unwrap().push((key, body));
      (status, Json(reply)).into_response()
    }
  };
  let app = Router::new().route("/models/{model}", post(handler)).with_state(seen);

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  format!("http://{addr}")
}

fn sample_record() -> ClientRecord {
  let mut form = IntakeForm::default();
  form.name = "Jane".to_string();
  form.toggle_multi_value(ListField::PainArea, "Lower Back");
  form.consent = true;
  ClientRecord::new("rec-1", "2025-01-01 09:00:00", form)
}

#[tokio::test]
async fn test_report_text_joins_candidate_parts() {
  let seen = Seen::default();
  let reply = json!({
    "candidates": [{ "content": { "parts": [{ "text": "Assessment. " }, { "text": "Plan." }] } }]
  });
  let endpoint = stub(StatusCode::OK, reply, seen.clone()).await;
  let client = GeminiClient::with_endpoint(Some("test-key".into()), "test-model", endpoint);

  let report = client.generate_report(&sample_record(), Language::Zh).await.unwrap();

  assert_eq!(report, "Assessment. Plan.");
  let requests = seen.requests.lock().unwrap();
  assert_eq!(requests.len(), 1);
  let (key, body) = &requests[0];
  assert_eq!(key.as_deref(), Some("test-key"));
  let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
  assert!(prompt.contains("Jane"));
  assert!(prompt.contains("Lower Back"));
  assert!(prompt.contains("Chinese"));
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
  let endpoint = stub(StatusCode::TOO_MANY_REQUESTS, json!({"error": "quota"}), Seen::default()).await;
  let client = GeminiClient::with_endpoint(Some("test-key".into()), "test-model", endpoint);

  let err = client.generate_report(&sample_record(), Language::En).await.unwrap_err();
  assert!(matches!(err, GenerationError::RateLimited));
}

#[tokio::test]
async fn test_server_error_is_rejected_with_status() {
  let endpoint = stub(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"}), Seen::default()).await;
  let client = GeminiClient::with_endpoint(Some("test-key".into()), "test-model", endpoint);

  let err = client.generate_report(&sample_record(), Language::En).await.unwrap_err();
  assert!(matches!(err, GenerationError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn test_reply_without_text_is_empty_response() {
  let endpoint = stub(StatusCode::OK, json!({ "candidates": [] }), Seen::default()).await;
  let client = GeminiClient::with_endpoint(Some("test-key".into()), "test-model", endpoint);

  let err = client.generate_report(&sample_record(), Language::En).await.unwrap_err();
  assert!(matches!(err, GenerationError::EmptyResponse));
}

#[tokio::test]
async fn test_missing_key_sends_nothing() {
  let seen = Seen::default();
  let endpoint = stub(StatusCode::OK, json!({}), seen.clone()).await;
  let client = GeminiClient::with_endpoint(None, "test-model", endpoint);

  let err = client.generate_report(&sample_record(), Language::En).await.unwrap_err();

  assert!(matches!(err, GenerationError::MissingApiKey));
  assert!(seen.requests.lock().unwrap().is_empty());
}
