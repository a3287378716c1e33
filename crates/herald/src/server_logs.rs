//! Persistent JSONL log for the intake REST server
//!
//! Each entry is one JSON object per line. Writes are serialized behind a
//! tokio mutex so handlers can log concurrently. Entries are mirrored to
//! `tracing` unless the log was opened silent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::Level;

/// HTTP request details attached to a log entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestTrace {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub method: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status_code: Option<u16>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_ms: Option<f64>,
}

/// One line of the server log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
  pub timestamp: DateTime<Utc>,
  pub level: Level,
  pub message: String,
  pub component: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request: Option<RequestTrace>,
}

struct LogFile {
  path: PathBuf,
  silent: bool,
}

impl LogFile {
  fn open(path: &Path, silent: bool) -> io::Result<Self> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    // Touch without truncating an existing log
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Self { path: path.to_path_buf(), silent })
  }

  fn append(&self, entry: &LogEntry) -> io::Result<()> {
    let line = serde_json::to_string(entry)
      .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
    writeln!(file, "{line}")?;
    file.flush()
  }

  fn read(&self, limit: Option<usize>, level: Option<Level>) -> io::Result<Vec<LogEntry>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(&self.path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }
      // Malformed lines are skipped
      let Ok(entry) = serde_json::from_str::<LogEntry>(&line) else {
        continue;
      };
      if level.is_none_or(|wanted| entry.level == wanted) {
        entries.push(entry);
      }
    }

    // Keep the newest `limit` entries, oldest first
    if let Some(limit) = limit {
      let skip = entries.len().saturating_sub(limit);
      entries.drain(..skip);
    }
    Ok(entries)
  }
}

/// Thread-safe handle to the JSONL server log
#[derive(Clone)]
pub struct ServerLogs {
  inner: Arc<tokio::sync::Mutex<LogFile>>,
}

impl ServerLogs {
  pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
    Self::open_with_silent(path, false)
  }

  /// Open without mirroring entries to `tracing`
  pub fn open_with_silent<P: AsRef<Path>>(path: P, silent: bool) -> io::Result<Self> {
    let file = LogFile::open(path.as_ref(), silent)?;
    Ok(Self { inner: Arc::new(tokio::sync::Mutex::new(file)) })
  }

  pub async fn path(&self) -> PathBuf {
    self.inner.lock().await.path.clone()
  }

  /// Append an entry, reporting write failures
  pub async fn record(
    &self,
    level: Level,
    message: &str,
    component: &str,
    request: Option<RequestTrace>,
  ) -> io::Result<()> {
    let entry = LogEntry {
      timestamp: Utc::now(),
      level,
      message: message.to_string(),
      component: component.to_string(),
      request,
    };

    let guard = self.inner.lock().await;
    if !guard.silent {
      mirror(&entry);
    }
    guard.append(&entry)
  }

  /// Append an entry, ignoring write failures
  pub async fn log(&self, level: Level, message: &str, component: &str) {
    let _ = self.record(level, message, component, None).await;
  }

  pub async fn info(&self, message: &str, component: &str) {
    self.log(Level::Info, message, component).await;
  }

  pub async fn success(&self, message: &str, component: &str) {
    self.log(Level::Success, message, component).await;
  }

  pub async fn warn(&self, message: &str, component: &str) {
    self.log(Level::Warn, message, component).await;
  }

  pub async fn error(&self, message: &str, component: &str) {
    self.log(Level::Error, message, component).await;
  }

  /// Read back the newest entries, optionally filtered by level
  pub async fn entries(&self, limit: Option<usize>, level: Option<Level>) -> io::Result<Vec<LogEntry>> {
    self.inner.lock().await.read(limit, level)
  }
}

fn mirror(entry: &LogEntry) {
  let component = entry.component.as_str();
  match entry.level {
    Level::Debug => tracing::debug!(component, "{}", entry.message),
    Level::Info | Level::Success => tracing::info!(component, "{}", entry.message),
    Level::Warn => tracing::warn!(component, "{}", entry.message),
    Level::Error => tracing::error!(component, "{}", entry.message),
  }
}
