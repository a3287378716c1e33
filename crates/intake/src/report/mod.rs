//! AI-drafted treatment reports
//!
//! A [`ReportGenerator`] turns one record into report text with a single
//! attempt: no retries and no internal timeout. Callers decide what to do
//! with a failure; nothing here touches the record store.

use async_trait::async_trait;
use thiserror::Error;

use crate::i18n::Language;
use crate::record::ClientRecord;

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;
pub use prompt::build_prompt;

#[derive(Error, Debug)]
pub enum GenerationError {
  #[error("No API key configured for the report service")]
  MissingApiKey,

  #[error("Could not reach the report service: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("The report service is rate limiting requests")]
  RateLimited,

  #[error("The report service rejected the request ({status}): {body}")]
  Rejected { status: u16, body: String },

  #[error("The report service sent a response that could not be read: {message}")]
  InvalidResponse { message: String },

  #[error("The report service returned no text")]
  EmptyResponse,
}

impl GenerationError {
  pub fn rejected(status: u16, body: impl Into<String>) -> Self {
    Self::Rejected { status, body: body.into() }
  }

  pub fn invalid_response(message: impl Into<String>) -> Self {
    Self::InvalidResponse { message: message.into() }
  }
}

/// Something that can draft a report for a record
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportGenerator: Send + Sync {
  async fn generate_report(
    &self,
    record: &ClientRecord,
    language: Language,
  ) -> Result<String, GenerationError>;
}
