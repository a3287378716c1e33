//! Configuration for the intake CLI and server
//!
//! Read from a JSON file, then overridden by environment variables. Every
//! field has a default, so running without any config file works.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::i18n::Language;
use crate::report::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::store::RECORDS_KEY;

/// Points at a config file explicitly
pub const CONFIG_ENV: &str = "INTAKE_CONFIG";
pub const DATA_DIR_ENV: &str = "INTAKE_DATA_DIR";
pub const MODEL_ENV: &str = "INTAKE_MODEL";
/// Checked first, then [`FALLBACK_API_KEY_ENV`]
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

const LOCAL_CONFIG: &str = ".intake.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
  /// Where the records blob and server logs live
  pub data_dir: PathBuf,
  pub storage_key: String,
  pub model: String,
  pub api_endpoint: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_key: Option<String>,
  pub language: Language,
  pub bind: SocketAddr,
}

impl Default for IntakeConfig {
  fn default() -> Self {
    Self {
      data_dir: default_data_dir(),
      storage_key: RECORDS_KEY.to_string(),
      model: DEFAULT_MODEL.to_string(),
      api_endpoint: DEFAULT_ENDPOINT.to_string(),
      api_key: None,
      language: Language::En,
      bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
    }
  }
}

fn default_data_dir() -> PathBuf {
  dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".intake")
}

impl IntakeConfig {
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: display.clone(), source })?;
    let config: IntakeConfig =
      serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path: display, source })?;
    config.validated()
  }

  /// Resolve the config file, then apply environment overrides.
  ///
  /// Lookup order: `explicit`, `$INTAKE_CONFIG`, `./.intake.json`,
  /// `~/.intake/config.json`, defaults.
  pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    let config = match config_path(explicit) {
      Some(path) => Self::load_from_file(path)?,
      None => Self::default(),
    };
    config.with_env_overrides().validated()
  }

  pub fn with_env_overrides(mut self) -> Self {
    if let Some(dir) = non_empty_env(DATA_DIR_ENV) {
      self.data_dir = PathBuf::from(dir);
    }
    if let Some(model) = non_empty_env(MODEL_ENV) {
      self.model = model;
    }
    if let Some(key) = non_empty_env(API_KEY_ENV).or_else(|| non_empty_env(FALLBACK_API_KEY_ENV)) {
      self.api_key = Some(key);
    }
    self
  }

  fn validated(self) -> Result<Self, ConfigError> {
    if self.storage_key.trim().is_empty() {
      return Err(ConfigError::Invalid {
        field: "storage_key".to_string(),
        message: "must not be empty".to_string(),
      });
    }
    if self.model.trim().is_empty() {
      return Err(ConfigError::Invalid {
        field: "model".to_string(),
        message: "must not be empty".to_string(),
      });
    }
    Ok(self)
  }

  pub fn server_log_path(&self) -> PathBuf {
    self.data_dir.join("server.logs.jsonl")
  }

  /// Safe to print: the API key is masked
  pub fn redacted(&self) -> Self {
    let mut copy = self.clone();
    copy.api_key = copy.api_key.as_ref().map(|_| "********".to_string());
    copy
  }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
  if let Some(path) = explicit {
    return Some(path.to_path_buf());
  }
  if let Some(path) = non_empty_env(CONFIG_ENV) {
    return Some(PathBuf::from(path));
  }

  let local = PathBuf::from(LOCAL_CONFIG);
  if local.exists() {
    return Some(local);
  }

  dirs::home_dir().map(|home| home.join(".intake").join("config.json")).filter(|p| p.exists())
}

fn non_empty_env(name: &str) -> Option<String> {
  env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use std::fs;
  use tempfile::TempDir;

  fn clear_env() {
    for name in [CONFIG_ENV, DATA_DIR_ENV, MODEL_ENV, API_KEY_ENV, FALLBACK_API_KEY_ENV] {
      env::remove_var(name);
    }
  }

  #[test]
  fn test_defaults() {
    let config = IntakeConfig::default();
    assert_eq!(config.storage_key, "mp_records_v2");
    assert_eq!(config.model, "gemini-3-flash-preview");
    assert!(config.api_key.is_none());
    assert!(config.data_dir.ends_with(".intake"));
  }

  #[test]
  #[serial]
  fn test_partial_file_keeps_defaults() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"model": "gemini-pro", "language": "zh"}"#).unwrap();

    let config = IntakeConfig::load(Some(&path)).unwrap();

    assert_eq!(config.model, "gemini-pro");
    assert_eq!(config.language, Language::Zh);
    assert_eq!(config.storage_key, RECORDS_KEY);
  }

  #[test]
  #[serial]
  fn test_env_overrides_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"model": "gemini-pro", "api_key": "from-file"}"#).unwrap();
    env::set_var(CONFIG_ENV, &path);
    env::set_var(MODEL_ENV, "gemini-env");
    env::set_var(FALLBACK_API_KEY_ENV, "fallback-key");
    env::set_var(DATA_DIR_ENV, dir.path());

    let config = IntakeConfig::load(None).unwrap();

    assert_eq!(config.model, "gemini-env");
    assert_eq!(config.api_key.as_deref(), Some("fallback-key"));
    assert_eq!(config.data_dir, dir.path());

    env::set_var(API_KEY_ENV, "gemini-key");
    let config = IntakeConfig::load(None).unwrap();
    assert_eq!(config.api_key.as_deref(), Some("gemini-key"));
    clear_env();
  }

  #[test]
  #[serial]
  fn test_bad_file_is_an_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ nope").unwrap();

    let err = IntakeConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));

    fs::write(&path, r#"{"storage_key": ""}"#).unwrap();
    let err = IntakeConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("storage_key"));
  }

  #[test]
  fn test_redacted_hides_key() {
    let config = IntakeConfig { api_key: Some("secret".into()), ..IntakeConfig::default() };
    assert_eq!(config.redacted().api_key.as_deref(), Some("********"));
  }
}
