//! Single-pass event correlation over decoded controller logs.
//!
//! One linear scan classifies each line against the bot-log patterns in a
//! fixed priority order (first match wins). Move requests stay pending until
//! the scan completes; everything else formats immediately. The secondary,
//! message-oriented log family gets its own pass with per-file deduplication
//! and telemetry decoding.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use regex::{Captures, Regex};

use crate::catalog::{self, AcpTable, FaultTable, TELEMETRY_MESSAGE_TYPES};
use crate::telemetry;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// cmd_ID reserved by the controller for its own initialization moves.
const BOT_INIT_CMD_ID: &str = "0";
const STATUS_BOT_INITIALIZING: &str = "Bot Initializing";
const STATUS_NO_COMPLETION: &str = "Move Blended or only received ACK";
const FAULT_DESC_NOT_FOUND: &str = "Fault description was not found";

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

/// One recognized bot-log line, borrowing from the source line.
#[derive(Debug, PartialEq, Eq)]
enum LineEvent<'h> {
  MoveRequest {
    timestamp: &'h str,
    cmd_id: &'h str,
    uuid: &'h str,
    src: &'h str,
    dest: &'h str,
  },
  MoveComplete {
    cmd_id: &'h str,
    uuid: &'h str,
    status: &'h str,
  },
  Tote {
    timestamp: &'h str,
    action: &'h str,
    side: &'h str,
    grid_id: &'h str,
  },
  Fault {
    timestamp: &'h str,
    fault_num: &'h str,
    fault_type: &'h str,
  },
  Splc {
    timestamp: &'h str,
    fpga_msg: &'h str,
  },
}

type Classifier = for<'h> fn(&Captures<'h>) -> Option<LineEvent<'h>>;

fn group<'h>(caps: &Captures<'h>, name: &str) -> Option<&'h str> {
  caps.name(name).map(|m| m.as_str())
}

fn build_move_request<'h>(caps: &Captures<'h>) -> Option<LineEvent<'h>> {
  Some(LineEvent::MoveRequest {
    timestamp: group(caps, "timestamp")?,
    cmd_id: group(caps, "cmd_id")?,
    uuid: group(caps, "uuid")?,
    src: group(caps, "src")?,
    dest: group(caps, "dest")?,
  })
}

fn build_move_complete<'h>(caps: &Captures<'h>) -> Option<LineEvent<'h>> {
  Some(LineEvent::MoveComplete {
    cmd_id: group(caps, "cmd_id")?,
    uuid: group(caps, "uuid")?,
    status: group(caps, "status")?,
  })
}

fn build_tote<'h>(caps: &Captures<'h>) -> Option<LineEvent<'h>> {
  Some(LineEvent::Tote {
    timestamp: group(caps, "timestamp")?,
    action: group(caps, "action")?,
    side: group(caps, "side")?,
    grid_id: group(caps, "grid_id")?,
  })
}

fn build_fault<'h>(caps: &Captures<'h>) -> Option<LineEvent<'h>> {
  Some(LineEvent::Fault {
    timestamp: group(caps, "timestamp")?,
    fault_num: group(caps, "fault_num")?,
    fault_type: group(caps, "fault_type")?,
  })
}

fn build_splc<'h>(caps: &Captures<'h>) -> Option<LineEvent<'h>> {
  Some(LineEvent::Splc {
    timestamp: group(caps, "timestamp")?,
    fpga_msg: group(caps, "fpga_msg")?,
  })
}

/// Priority-ordered (pattern, handler) pairs. A line is handled by the first
/// pattern that matches and is never tested against later ones.
fn classifiers() -> [(&'static Regex, Classifier); 5] {
  [
    (catalog::move_request_re(), build_move_request as Classifier),
    (catalog::move_complete_re(), build_move_complete as Classifier),
    (catalog::tote_command_re(), build_tote as Classifier),
    (catalog::fault_re(), build_fault as Classifier),
    (catalog::splc_re(), build_splc as Classifier),
  ]
}

fn classify(line: &str) -> Option<LineEvent<'_>> {
  for (re, build) in classifiers() {
    if let Some(caps) = re.captures(line) {
      // A matched line with malformed captures is skipped, not retried
      // against lower-priority patterns.
      return build(&caps);
    }
  }
  None
}

fn timestamp_ok(ts: &str) -> bool {
  NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).is_ok()
}

// ---------------------------------------------------------------------------
// Bot-log correlation
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct PendingMove<'a> {
  timestamp: &'a str,
  src: &'a str,
  dest: &'a str,
}

/// Correlate one bot log into sorted, formatted summary lines.
///
/// Move requests are keyed by (cmd_ID, UUID); a later request with the same
/// key overwrites the pending entry (the controller reuses IDs, only the most
/// recent occurrence is meaningful). Tote, fault and SPLC lines format
/// immediately. After the scan every pending request resolves against the
/// completion map, defaulting to "Move Blended or only received ACK". Output
/// is sorted lexicographically by the fixed-width leading timestamp, which is
/// chronological order.
pub fn correlate(lines: &[String], faults: &FaultTable) -> Vec<String> {
  let mut pending: HashMap<(&str, &str), PendingMove<'_>> = HashMap::new();
  let mut completions: HashMap<(&str, &str), &str> = HashMap::new();
  let mut out = Vec::new();

  for line in lines {
    let Some(event) = classify(line) else {
      continue;
    };
    match event {
      LineEvent::MoveRequest {
        timestamp,
        cmd_id,
        uuid,
        src,
        dest,
      } => {
        if !timestamp_ok(timestamp) {
          log::warn!("move request with malformed timestamp skipped: {timestamp:?}");
          continue;
        }
        pending.insert(
          (cmd_id, uuid),
          PendingMove {
            timestamp,
            src,
            dest,
          },
        );
      }
      LineEvent::MoveComplete {
        cmd_id,
        uuid,
        status,
      } => {
        completions.insert((cmd_id, uuid), status);
      }
      LineEvent::Tote {
        timestamp,
        action,
        side,
        grid_id,
      } => {
        if !timestamp_ok(timestamp) {
          log::warn!("tote command with malformed timestamp skipped: {timestamp:?}");
          continue;
        }
        out.push(format!(
          "{timestamp} [TOTE] {action:<13} {side:<17} | {grid_id}"
        ));
      }
      LineEvent::Fault {
        timestamp,
        fault_num,
        fault_type,
      } => {
        if !timestamp_ok(timestamp) {
          log::warn!("fault with malformed timestamp skipped: {timestamp:?}");
          continue;
        }
        let desc = faults
          .get(fault_num)
          .map(String::as_str)
          .unwrap_or(FAULT_DESC_NOT_FOUND);
        out.push(format!(
          "{timestamp} [FAULT] {fault_num:<12} {fault_type:<17} | {desc}"
        ));
      }
      LineEvent::Splc {
        timestamp,
        fpga_msg,
      } => {
        if !timestamp_ok(timestamp) {
          log::warn!("safety signal with malformed timestamp skipped: {timestamp:?}");
          continue;
        }
        out.push(format!(
          "{timestamp} W [FPGA1 safety debug change]          | {fpga_msg}"
        ));
      }
    }
  }

  for (key, mv) in &pending {
    let status = if key.0 == BOT_INIT_CMD_ID {
      STATUS_BOT_INITIALIZING
    } else {
      completions
        .get(key)
        .copied()
        .unwrap_or(STATUS_NO_COMPLETION)
    };
    out.push(format!(
      "{} {:<17} -> {:<17} | {}",
      mv.timestamp, mv.src, mv.dest, status
    ));
  }

  out.sort();
  out
}

// ---------------------------------------------------------------------------
// Message-log summarization (secondary log family)
// ---------------------------------------------------------------------------

/// Summarize one message log into sorted, formatted lines.
///
/// Message handlers reprint raw bytes, so semantically identical events can
/// appear more than once; a (timestamp truncated to whole seconds, packet id,
/// message-type code) key suppresses the repeats within this file. Telemetry-
/// bearing message types get their telemetry block decoded and appended.
pub fn summarize_messages(lines: &[String], acp: &AcpTable) -> Vec<String> {
  let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();
  let mut out = Vec::new();

  for line in lines {
    let Some(caps) = catalog::message_re().captures(line) else {
      continue;
    };
    let (Some(ts), Some(id), Some(func)) = (
      group(&caps, "timestamp"),
      group(&caps, "id"),
      group(&caps, "func"),
    ) else {
      continue;
    };
    if !timestamp_ok(ts) {
      log::warn!("message with malformed timestamp skipped: {ts:?}");
      continue;
    }

    let second = ts.split('.').next().unwrap_or(ts);
    if !seen.insert((second, id, func)) {
      continue;
    }

    let telemetry = if TELEMETRY_MESSAGE_TYPES.contains(&func) {
      catalog::message_telemetry_re()
        .captures(line)
        .and_then(|c| c.name("telemetry_block"))
        .map(|m| format!(" | TELEMETRY: [{}]", telemetry::decode(m.as_str()).join(", ")))
    } else {
      None
    };
    let telemetry = telemetry.unwrap_or_default();

    match acp.get(func) {
      Some(entry) => out.push(format!(
        "{ts} {id:<14} | DIR: {dir:<4} | MSG TYPE: {func} | ID: {msg_id:<6} | DESC: {desc:<34}{telemetry}",
        dir = entry.dir,
        msg_id = entry.msg_id,
        desc = entry.desc,
      )),
      None => out.push(format!("{ts} {id:<14} | MSG TYPE: {func}{telemetry}")),
    }
  }

  out.sort();
  out
}
