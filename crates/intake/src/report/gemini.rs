//! Google Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{build_prompt, GenerationError, ReportGenerator};
use crate::i18n::Language;
use crate::record::ClientRecord;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Serialize)]
struct GenerateRequest<'a> {
  contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
  parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
  text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
  content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
  text: Option<String>,
}

impl GenerateResponse {
  /// Text of the first candidate, all parts joined
  fn text(self) -> Option<String> {
    let content = self.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
      None
    } else {
      Some(text)
    }
  }
}

/// Report generator backed by the Gemini REST API
#[derive(Clone)]
pub struct GeminiClient {
  http: reqwest::Client,
  endpoint: String,
  model: String,
  api_key: Option<String>,
}

impl GeminiClient {
  /// A missing key is only reported when a report is requested
  pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
    Self::with_endpoint(api_key, model, DEFAULT_ENDPOINT)
  }

  pub fn with_endpoint(
    api_key: Option<String>,
    model: impl Into<String>,
    endpoint: impl Into<String>,
  ) -> Self {
    Self {
      http: reqwest::Client::new(),
      endpoint: endpoint.into().trim_end_matches('/').to_string(),
      model: model.into(),
      api_key: api_key.filter(|k| !k.trim().is_empty()),
    }
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  fn url(&self) -> String {
    format!("{}/models/{}:generateContent", self.endpoint, self.model)
  }

  /// Send one prompt and return the reply text
  pub async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
    let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

    let body = GenerateRequest { contents: vec![Content { parts: vec![RequestPart { text: prompt }] }] };
    let response =
      self.http.post(self.url()).header("x-goog-api-key", api_key).json(&body).send().await?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
      return Err(GenerationError::RateLimited);
    }
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(GenerationError::rejected(status.as_u16(), body));
    }

    let parsed: GenerateResponse =
      response.json().await.map_err(|e| GenerationError::invalid_response(e.to_string()))?;
    parsed.text().ok_or(GenerationError::EmptyResponse)
  }
}

#[async_trait]
impl ReportGenerator for GeminiClient {
  async fn generate_report(
    &self,
    record: &ClientRecord,
    language: Language,
  ) -> Result<String, GenerationError> {
    let prompt = build_prompt(record, language);
    tracing::debug!(record = %record.id, model = %self.model, "requesting report");
    self.generate_text(&prompt).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(json: serde_json::Value) -> Option<String> {
    serde_json::from_value::<GenerateResponse>(json).unwrap().text()
  }

  #[test]
  fn test_response_text_joins_parts_of_first_candidate() {
    let text = parse(serde_json::json!({
      "candidates": [
        {"content": {"parts": [{"text": "## Script\n"}, {"text": "Welcome."}]}},
        {"content": {"parts": [{"text": "ignored"}]}}
      ]
    }));
    assert_eq!(text.as_deref(), Some("## Script\nWelcome."));
  }

  #[test]
  fn test_response_without_text_is_none() {
    assert_eq!(parse(serde_json::json!({})), None);
    assert_eq!(parse(serde_json::json!({"candidates": [{"finishReason": "SAFETY"}]})), None);
    assert_eq!(parse(serde_json::json!({"candidates": [{"content": {"parts": [{"text": "  "}]}}]})), None);
  }

  #[test]
  fn test_url_and_blank_key() {
    let client = GeminiClient::with_endpoint(Some("  ".into()), "m1", "http://localhost:9/v1/");
    assert_eq!(client.url(), "http://localhost:9/v1/models/m1:generateContent");
    assert!(client.api_key.is_none());
  }
}
