//! Fingerprint definitions and the sliding-window sequence matcher.
//!
//! A fingerprint is a named, ordered list of patterns plus a window size:
//! every window of consecutive lines in which the patterns occur in order
//! (each no earlier than the line after the previous match) is a completed
//! match. An optional action evaluates the window text and decides whether
//! the match survives and how it is annotated.

use std::collections::HashSet;

use regex::Regex;

use crate::actions::{self, Action, ActionResult};
use crate::config::Config;
use crate::error::EngineError;
use crate::types::{AnalysisReport, MatchRecord, SequenceError, SummaryRow};
use crate::window::sliding_windows;

/// Annotation for windows kept without an interesting action result.
pub const NO_ACTION_MARKER: &str = "No";

/// A named fault signature: ordered patterns inside a bounded window.
pub struct Sequence {
  pub name: String,
  pub patterns: Vec<Regex>,
  /// Number of consecutive lines considered; defaults to the pattern count.
  pub window: Option<usize>,
  pub action: Option<Action>,
  /// Drop neutral matches and keep at most one row per file.
  pub filter_actions: bool,
}

impl Sequence {
  pub fn new<S: AsRef<str>>(name: &str, patterns: &[S]) -> Result<Self, EngineError> {
    let patterns = patterns
      .iter()
      .map(|p| Regex::new(p.as_ref()))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self {
      name: name.to_string(),
      patterns,
      window: None,
      action: None,
      filter_actions: false,
    })
  }

  pub fn with_window(mut self, window: usize) -> Self {
    self.window = Some(window);
    self
  }

  pub fn with_action(mut self, action: Action) -> Self {
    self.action = Some(action);
    self
  }

  pub fn filtered(mut self) -> Self {
    self.filter_actions = true;
    self
  }

  pub fn window_size(&self) -> usize {
    self.window.unwrap_or(self.patterns.len())
  }
}

/// Raw result of matching one sequence against one file.
pub struct SequenceMatches {
  pub records: Vec<MatchRecord>,
  /// Completed windows that survived the action (pre row filtering).
  pub completed_windows: u64,
}

/// Find every window of `seq` in `lines`.
///
/// Overlapping windows report independently; deduplication is the caller's
/// concern (`filter_actions` or row-level duplicate removal). An action error
/// aborts this sequence only.
pub fn find_matches(
  lines: &[String],
  seq: &Sequence,
  log_file: &str,
) -> Result<SequenceMatches, EngineError> {
  let mut records = Vec::new();
  let mut completed_windows = 0u64;
  if seq.patterns.is_empty() {
    return Ok(SequenceMatches {
      records,
      completed_windows,
    });
  }

  for (start, window) in sliding_windows(lines, seq.window_size()) {
    // (pattern index, window-relative line offset, 1-based column)
    let mut found: Vec<(usize, usize, usize)> = Vec::new();
    let mut pattern_idx = 0;
    for (i, line) in window.iter().enumerate() {
      if pattern_idx >= seq.patterns.len() {
        break;
      }
      if let Some(m) = seq.patterns[pattern_idx].find(line) {
        found.push((pattern_idx, i, m.start() + 1));
        pattern_idx += 1;
      }
    }
    if pattern_idx < seq.patterns.len() {
      continue;
    }

    let annotation = match &seq.action {
      Some(action) => {
        match action(window).map_err(|reason| EngineError::action(&seq.name, reason))? {
          ActionResult::Discard => continue,
          ActionResult::Keep => NO_ACTION_MARKER.to_string(),
          ActionResult::Annotate(text) => text,
        }
      }
      None => NO_ACTION_MARKER.to_string(),
    };

    for (p, i, column) in &found {
      records.push(MatchRecord {
        log_file: log_file.to_string(),
        pattern: seq.patterns[*p].as_str().to_string(),
        line: window[*i].trim().to_string(),
        link: format!("{}:{}:{}", log_file, start + i + 1, column),
        action_matched: annotation.clone(),
        fingerprint: seq.name.clone(),
      });
    }
    completed_windows += 1;
  }

  Ok(SequenceMatches {
    records,
    completed_windows,
  })
}

/// Post-filter for `filter_actions` sequences: drop neutral rows, then keep
/// at most the first remaining row per source file.
pub fn filter_neutral(records: Vec<MatchRecord>) -> Vec<MatchRecord> {
  let mut seen_files: HashSet<String> = HashSet::new();
  records
    .into_iter()
    .filter(|r| r.action_matched != NO_ACTION_MARKER)
    .filter(|r| seen_files.insert(r.log_file.clone()))
    .collect()
}

/// Run every sequence of a catalog against one file, in declaration order.
///
/// Per-sequence failures are isolated: the failing sequence is reported in
/// `errors` and the rest still run. Duplicate rows are removed from both the
/// detail and summary outputs.
pub fn analyze(lines: &[String], sequences: &[Sequence], log_file: &str) -> AnalysisReport {
  let mut report = AnalysisReport::default();
  let mut seen_rows: HashSet<String> = HashSet::new();
  let mut seen_summary: HashSet<(String, u64, String)> = HashSet::new();

  for seq in sequences {
    let matches = match find_matches(lines, seq, log_file) {
      Ok(m) => m,
      Err(e) => {
        report.errors.push(SequenceError {
          fingerprint: seq.name.clone(),
          reason: e.to_string(),
        });
        continue;
      }
    };

    let mut records = matches.records;
    if seq.filter_actions {
      records = filter_neutral(records);
    }
    for record in records {
      if seen_rows.insert(record.row_key()) {
        report.detail.push(record);
      }
    }

    if matches.completed_windows > 0 {
      let row = SummaryRow {
        log_file: log_file.to_string(),
        sequence_count: matches.completed_windows,
        fingerprint: seq.name.clone(),
      };
      if seen_summary.insert((row.log_file.clone(), row.sequence_count, row.fingerprint.clone())) {
        report.summary.push(row);
      }
    }
  }

  report
}

/// The shipped fingerprint catalog, thresholds taken from `config`.
pub fn builtin_sequences(config: &Config) -> Result<Vec<Sequence>, EngineError> {
  const TS: &str = r"....-..-.. ..:..:..\.\d+ ";
  let fapr_0c_05_00 = format!("{TS}[A-Z] FAPR0 Sent fault to MCS for Id=fault_0C_05_00");

  Ok(vec![
    Sequence::new("0C_05_00_signatures", &[&fapr_0c_05_00])?
      .with_window(100)
      .with_action(actions::fault_burst()),
    Sequence::new("05_12_00", &[&fapr_0c_05_00])?.with_window(100),
    Sequence::new(
      "0C_05_00_high_wheel_velocity_failure",
      &[
        &format!("{TS}[A-Z] FMON0 Sent fault to MCS for Id=fault_05_0[67]_00"),
        &fapr_0c_05_00,
      ],
    )?
    .with_window(100),
    Sequence::new("0C_05_00_large_slip", &[&fapr_0c_05_00])?
      .with_window(20)
      .with_action(actions::large_slip(config.large_slip_threshold)),
    Sequence::new("0C_05_00_small_slip", &[&fapr_0c_05_00])?
      .with_window(50)
      .with_action(actions::small_slip(config.small_slip_threshold)),
    Sequence::new(
      "IMU_impact_detected",
      &[
        &format!("{TS}[A-Z] _IMU0 Impact detected"),
        &fapr_0c_05_00,
      ],
    )?
    .with_window(50)
    .with_action(actions::impact(config.impact_g_threshold))
    .filtered(),
  ])
}
