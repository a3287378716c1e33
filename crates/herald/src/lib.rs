//! Herald - terminal output for the intake tools
//!
//! Every message goes to stderr with a short coloured level prefix, so
//! stdout stays clean for data the CLI prints (record listings, reports).
//!
//! With the `server-logs` feature, [`server_logs`] adds a persistent JSONL
//! log the REST server writes to and serves back through `GET /logs`.

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "server-logs")]
pub mod server_logs;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Debug,
  Info,
  Success,
  Warn,
  Error,
}

impl Level {
  fn label(self) -> &'static str {
    match self {
      Level::Debug => "debug",
      Level::Info => "info",
      Level::Success => "ok",
      Level::Warn => "warn",
      Level::Error => "error",
    }
  }

  fn color(self) -> Color {
    match self {
      Level::Debug => Color::Magenta,
      Level::Info => Color::Blue,
      Level::Success => Color::Green,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Level::Debug => "debug",
      Level::Info => "info",
      Level::Success => "success",
      Level::Warn => "warn",
      Level::Error => "error",
    };
    f.write_str(name)
  }
}

impl FromStr for Level {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "debug" => Ok(Level::Debug),
      "info" => Ok(Level::Info),
      "success" | "ok" => Ok(Level::Success),
      "warn" | "warning" => Ok(Level::Warn),
      "error" => Ok(Level::Error),
      other => Err(format!("unknown log level '{other}'")),
    }
  }
}

/// Padded, coloured `[level]` prefix
pub fn prefix(level: Level) -> String {
  let label = level.label();
  let pad = 7usize.saturating_sub(label.len() + 2);
  format!("[{}]{:pad$}", label.color(level.color()).bold(), "")
}

/// Write a message at the given level, one prefixed line per input line
pub fn emit(level: Level, message: &str) {
  let prefix = prefix(level);
  for line in message.lines() {
    eprintln!("{prefix} {line}");
  }
}

pub fn debug(message: &str) {
  emit(Level::Debug, message);
}

pub fn info(message: &str) {
  emit(Level::Info, message);
}

/// Something finished the way the user asked
pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// The user should look at this, but nothing failed
pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

pub fn error(message: &str) {
  emit(Level::Error, message);
}

/// A heading framed by rule lines, used before multi-line output blocks
pub fn heading(title: &str) {
  let rule = "-".repeat(title.chars().count().max(40));
  eprintln!("{}", rule.dimmed());
  eprintln!("{}", title.bold());
  eprintln!("{}", rule.dimmed());
}

/// Macros for coverage-excluded logging - these expand with LCOV_EXCL_LINE at call sites
#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($msg:expr) => {
    $crate::warn($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($msg:expr) => {
    $crate::error($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($msg:expr) => {
    $crate::success($msg); // LCOV_EXCL_LINE
  };
}
