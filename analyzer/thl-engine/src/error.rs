//! Structured error types for the log analysis engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error("action: {sequence}: {reason}")]
  Action { sequence: String, reason: String },

  #[error("table: line {line}: {reason}")]
  Table { line: usize, reason: String },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn action(sequence: &str, reason: impl Into<String>) -> Self {
    Self::Action {
      sequence: sequence.to_string(),
      reason: reason.into(),
    }
  }

  pub fn table(line: usize, reason: impl Into<String>) -> Self {
    Self::Table {
      line,
      reason: reason.into(),
    }
  }
}
