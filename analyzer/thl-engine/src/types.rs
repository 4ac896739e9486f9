//! Output row contracts for the fingerprint matcher (document-sink shaped).

use serde::Serialize;

/// One detail row per matched pattern in a surviving window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
  #[serde(rename = "Log File")]
  pub log_file: String,
  #[serde(rename = "Matched Pattern")]
  pub pattern: String,
  #[serde(rename = "Log Line")]
  pub line: String,
  /// Clickable `file:line:column` locator, both 1-based.
  #[serde(rename = "Link")]
  pub link: String,
  #[serde(rename = "Action Matched")]
  pub action_matched: String,
  pub fingerprint: String,
}

impl MatchRecord {
  /// Stable identity over all displayed fields, used for duplicate-row removal.
  pub fn row_key(&self) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in [
      &self.log_file,
      &self.pattern,
      &self.line,
      &self.link,
      &self.action_matched,
      &self.fingerprint,
    ] {
      hasher.update(part.as_bytes());
      hasher.update(b"|");
    }
    hasher.finalize().to_hex().to_string()
  }
}

/// Per-file completed-window count for one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
  #[serde(rename = "Log File")]
  pub log_file: String,
  #[serde(rename = "Sequence Count")]
  pub sequence_count: u64,
  pub fingerprint: String,
}

/// Per-sequence failure surfaced alongside whatever results succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct SequenceError {
  pub fingerprint: String,
  pub reason: String,
}

/// Aggregate result of running a fingerprint catalog against one file.
#[derive(Debug, Default, Serialize)]
pub struct AnalysisReport {
  pub detail: Vec<MatchRecord>,
  pub summary: Vec<SummaryRow>,
  pub errors: Vec<SequenceError>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(action: &str) -> MatchRecord {
    MatchRecord {
      log_file: "bot.txt".into(),
      pattern: "p".into(),
      line: "l".into(),
      link: "bot.txt:1:1".into(),
      action_matched: action.into(),
      fingerprint: "f".into(),
    }
  }

  #[test]
  fn row_key_is_stable_and_field_sensitive() {
    assert_eq!(record("No").row_key(), record("No").row_key());
    assert_ne!(record("No").row_key(), record("Yes").row_key());
  }
}
