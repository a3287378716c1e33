//! Intake - client intake and treatment reports for Massage Philosophy
//!
//! Clients fill in an intake form; staff review the stored records and ask
//! an AI text service to draft a treatment report for each one. Records
//! persist locally as a single JSON blob.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod i18n;
pub mod record;
pub mod report;
pub mod server;
pub mod storage;
pub mod store;

use std::sync::Arc;

pub use config::IntakeConfig;
pub use controller::{GenerationClaim, IntakeController, SharedController};
pub use error::{FormError, IntakeError, StoreError};
pub use form::{FieldValue, FormField, IntakeForm, ListField, Toggle, Validation};
pub use i18n::{Language, ViewMode};
pub use record::ClientRecord;
pub use report::{GeminiClient, GenerationError, ReportGenerator};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::RecordStore;

/// Controller over the file store and Gemini client described by `config`
pub fn open_controller(config: &IntakeConfig) -> IntakeController {
  let storage = FileStorage::new(&config.data_dir);
  let store = RecordStore::load_with_key(Box::new(storage), config.storage_key.clone());
  let generator =
    GeminiClient::with_endpoint(config.api_key.clone(), config.model.clone(), config.api_endpoint.clone());
  IntakeController::new(store, Arc::new(generator), config.language)
}
