//! The top-level intake session: live form, record store, report generator
//!
//! Busy state is scoped to one generation flag per record, so a slow report
//! for one client never blocks intake or reports for anyone else.
//! Submission has no suspension point and completes under `&mut self`,
//! so it needs no flag of its own.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{FormError, IntakeError};
use crate::form::{FieldValue, FormField, IntakeForm, ListField, Toggle, Validation};
use crate::i18n::{Language, ViewMode};
use crate::record::ClientRecord;
use crate::report::{GenerationError, ReportGenerator};
use crate::store::RecordStore;

pub struct IntakeController {
  form: IntakeForm,
  store: RecordStore,
  generator: Arc<dyn ReportGenerator>,
  language: Language,
  mode: ViewMode,
  warning: Option<String>,
  submitted: bool,
  generating: HashSet<String>,
}

impl IntakeController {
  pub fn new(store: RecordStore, generator: Arc<dyn ReportGenerator>, language: Language) -> Self {
    Self {
      form: IntakeForm::default(),
      store,
      generator,
      language,
      mode: ViewMode::default(),
      warning: None,
      submitted: false,
      generating: HashSet::new(),
    }
  }

  // Form
  // ====

  pub fn form(&self) -> &IntakeForm {
    &self.form
  }

  pub fn set_field(&mut self, field: FormField, value: FieldValue) -> Result<(), FormError> {
    self.form.set_field(field, value)
  }

  pub fn toggle_multi_value(&mut self, field: ListField, value: &str) -> Toggle {
    self.form.toggle_multi_value(field, value)
  }

  /// Validate the live form and, if it passes, store it as a new record.
  ///
  /// On a validation failure the localized warning is set and the store is
  /// left untouched.
  pub fn submit(&mut self) -> Result<ClientRecord, IntakeError> {
    let validation = self.form.validate_for_submit();
    if let Some(warning) = self.language.messages().warning_for(validation) {
      self.warning = Some(warning.to_string());
      return Err(IntakeError::Validation(validation));
    }

    let record = ClientRecord::from_form(self.form.clone());
    self.store.append(record.clone())?;

    tracing::info!(record = %record.id, "intake submitted");
    self.warning = None;
    self.submitted = true;
    Ok(record)
  }

  /// Replace the live form with `form` and submit it
  pub fn submit_form(&mut self, form: IntakeForm) -> Result<ClientRecord, IntakeError> {
    self.form = form;
    self.submit()
  }

  /// Fresh form for the next client
  pub fn reset(&mut self) {
    self.form.reset();
    self.warning = None;
    self.submitted = false;
  }

  pub fn validation(&self) -> Validation {
    self.form.validate_for_submit()
  }

  pub fn warning(&self) -> Option<&str> {
    self.warning.as_deref()
  }

  pub fn is_submitted(&self) -> bool {
    self.submitted
  }

  // Session
  // =======

  pub fn language(&self) -> Language {
    self.language
  }

  pub fn set_language(&mut self, language: Language) {
    self.language = language;
  }

  pub fn toggle_language(&mut self) -> Language {
    self.language = self.language.toggled();
    self.language
  }

  pub fn mode(&self) -> ViewMode {
    self.mode
  }

  /// Entering client mode always starts a fresh form
  pub fn set_mode(&mut self, mode: ViewMode) {
    if mode == ViewMode::Client {
      self.reset();
    }
    self.mode = mode;
  }

  // Records
  // =======

  pub fn records(&self) -> &[ClientRecord] {
    self.store.records()
  }

  pub fn record(&self, id: &str) -> Option<&ClientRecord> {
    self.store.get(id)
  }

  pub fn storage_key(&self) -> &str {
    self.store.key()
  }

  pub fn clear_records(&mut self) -> Result<(), IntakeError> {
    self.store.clear()?;
    tracing::info!("all intake records cleared");
    Ok(())
  }

  pub fn generator(&self) -> Arc<dyn ReportGenerator> {
    Arc::clone(&self.generator)
  }

  // Reports
  // =======

  pub fn is_generating(&self, id: &str) -> bool {
    self.generating.contains(id)
  }

  /// Mark `id` as generating and hand back a snapshot to report on
  pub fn begin_generation(&mut self, id: &str) -> Result<ClientRecord, IntakeError> {
    let record = self.store.get(id).cloned().ok_or_else(|| IntakeError::record_not_found(id))?;
    if !self.generating.insert(id.to_string()) {
      return Err(IntakeError::report_in_progress(id));
    }
    Ok(record)
  }

  /// Clear the flag for `id` and store the report if there is one.
  ///
  /// A failed generation leaves the record exactly as it was.
  pub fn finish_generation(
    &mut self,
    id: &str,
    outcome: Result<String, GenerationError>,
  ) -> Result<ClientRecord, IntakeError> {
    self.generating.remove(id);

    let report = match outcome {
      Ok(report) => report,
      Err(e) => {
        tracing::warn!(record = %id, "report generation failed: {e}");
        return Err(IntakeError::Generation(e));
      }
    };

    self
      .store
      .update_by_id(id, |record| record.with_report(report))?
      .ok_or_else(|| IntakeError::record_not_found(id))
  }

  /// Drop the flag for `id` without touching the record
  pub fn cancel_generation(&mut self, id: &str) {
    if self.generating.remove(id) {
      tracing::debug!(record = %id, "report generation abandoned");
    }
  }

  /// Generate (or regenerate) the report for `id`, awaiting the service.
  ///
  /// Dropping the future part-way releases the record's flag.
  pub async fn generate_report(&mut self, id: &str) -> Result<ClientRecord, IntakeError> {
    let record = self.begin_generation(id)?;
    let generator = self.generator();
    let language = self.language;
    let outcome = {
      let _flag = GeneratingFlag { generating: &mut self.generating, id };
      generator.generate_report(&record, language).await
    };
    self.finish_generation(id, outcome)
  }
}

/// Removes a generation flag when dropped
struct GeneratingFlag<'a> {
  generating: &'a mut HashSet<String>,
  id: &'a str,
}

impl Drop for GeneratingFlag<'_> {
  fn drop(&mut self) {
    self.generating.remove(self.id);
  }
}

/// The controller as shared between concurrent request handlers
pub type SharedController = Arc<Mutex<IntakeController>>;

/// One record's generation flag, held while the report service works.
///
/// The controller lock is only taken to begin and to finish. A claim that
/// is dropped before [`GenerationClaim::finish`] releases the flag, so an
/// abandoned request never leaves its record locked.
pub struct GenerationClaim {
  controller: SharedController,
  id: String,
  record: ClientRecord,
  generator: Arc<dyn ReportGenerator>,
  language: Language,
  held: bool,
}

impl GenerationClaim {
  pub async fn begin(controller: &SharedController, id: &str) -> Result<Self, IntakeError> {
    let mut guard = controller.lock().await;
    let record = guard.begin_generation(id)?;
    Ok(Self {
      controller: Arc::clone(controller),
      id: id.to_string(),
      record,
      generator: guard.generator(),
      language: guard.language(),
      held: true,
    })
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// Snapshot of the record taken when the claim began
  pub fn record(&self) -> &ClientRecord {
    &self.record
  }

  /// Ask the report service, in `language` or the session language
  pub async fn generate(&self, language: Option<Language>) -> Result<String, GenerationError> {
    let language = language.unwrap_or(self.language);
    self.generator.generate_report(&self.record, language).await
  }

  /// Store the outcome and release the flag
  pub async fn finish(
    mut self,
    outcome: Result<String, GenerationError>,
  ) -> Result<ClientRecord, IntakeError> {
    let controller = Arc::clone(&self.controller);
    let mut guard = controller.lock().await;
    self.held = false;
    guard.finish_generation(&self.id, outcome)
  }
}

impl Drop for GenerationClaim {
  fn drop(&mut self) {
    if !self.held {
      return;
    }

    if let Ok(mut controller) = self.controller.try_lock() {
      controller.cancel_generation(&self.id);
      return;
    }

    // Lock is busy; release from a task once it frees up
    let controller = Arc::clone(&self.controller);
    let id = std::mem::take(&mut self.id);
    match tokio::runtime::Handle::try_current() {
      Ok(handle) => {
        handle.spawn(async move {
          controller.lock().await.cancel_generation(&id);
        });
      }
      Err(_) => tracing::warn!(record = %id, "could not release report generation flag"),
    }
  }
}
