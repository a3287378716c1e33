//! REST API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::IntakeForm;
use crate::i18n::Language;
use crate::record::ClientRecord;

pub const API_VERSION: &str = "1.0.0";

// Base Response Structure
// ======================

/// Envelope for every API response
#[derive(Debug, Serialize, Deserialize)]
pub struct BaseResponse<T> {
  /// Transaction ID for log correlation
  pub transaction_id: Uuid,

  pub api_version: String,

  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  #[serde(flatten)]
  pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable message
  pub message: String,
}

impl<T> BaseResponse<T> {
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { transaction_id, api_version: API_VERSION.to_string(), errors: Vec::new(), data }
  }
}

impl BaseResponse<()> {
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> Self {
    Self { transaction_id, api_version: API_VERSION.to_string(), errors, data: () }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string() }
  }
}

// Status Endpoints
// ================

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
  pub status: String,
  pub version: String,
  pub records: usize,
  pub storage_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
  pub version: String,
}

// Intake Endpoints
// ================

/// Body of POST /intake
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitIntakeRequest {
  pub form: IntakeForm,

  /// Language for the warning shown on a rejected form
  #[serde(default)]
  pub language: Option<Language>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResponse {
  pub record: ClientRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListRecordsResponse {
  pub records: Vec<ClientRecord>,
}

/// Query of POST /records/{id}/report
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ReportQuery {
  /// Staff language for the prompt, defaults to the session language
  pub lang: Option<Language>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearRecordsResponse {
  pub cleared: usize,
}

// Logs Endpoint
// =============

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
  pub limit: Option<usize>,
  /// Level name, or `all`
  pub level: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
  pub logs: Vec<herald::server_logs::LogEntry>,
}
