use thiserror::Error;

use crate::form::Validation;
use crate::report::GenerationError;

/// Problems with a single form edit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
  #[error("Unknown form field '{name}'")]
  UnknownField { name: String },

  #[error("Field '{field}' does not accept that kind of value")]
  WrongValueKind { field: String },

  #[error("Pain level must be a whole number from 0 to 10, got '{raw}'")]
  InvalidPainLevel { raw: String },

  #[error("At most 3 pain areas may be selected, got {count}")]
  TooManyPainAreas { count: usize },
}

/// Failures while writing the record store
#[derive(Error, Debug)]
pub enum StoreError {
  #[error("Failed to serialize records: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("Failed to write records to storage: {0}")]
  Write(#[from] std::io::Error),
}

/// Everything the intake controller can report back to a surface
#[derive(Error, Debug)]
pub enum IntakeError {
  #[error("Form is not ready to submit: {0}")]
  Validation(Validation),

  #[error("Record {id} not found")]
  RecordNotFound { id: String },

  #[error("A report for record {id} is already being generated")]
  ReportInProgress { id: String },

  #[error(transparent)]
  Form(#[from] FormError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("Report generation failed: {0}")]
  Generation(#[from] GenerationError),
}

impl IntakeError {
  pub fn record_not_found(id: impl Into<String>) -> Self {
    Self::RecordNotFound { id: id.into() }
  }

  pub fn report_in_progress(id: impl Into<String>) -> Self {
    Self::ReportInProgress { id: id.into() }
  }
}

/// Problems locating or reading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config {path}: {source}")]
  Read { path: String, source: std::io::Error },

  #[error("Failed to parse config {path}: {source}")]
  Parse { path: String, source: serde_json::Error },

  #[error("Invalid config value for {field}: {message}")]
  Invalid { field: String, message: String },
}
