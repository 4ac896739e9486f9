//! Static pattern catalog and lookup tables.
//!
//! Compiled line patterns for the bot-log and message-log families, the
//! telemetry bit-to-label table, and loaders for the fault / ACP description
//! tables. Everything here is read-only after construction and safe to share
//! across files processed concurrently.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Bot-log patterns
// ---------------------------------------------------------------------------

/// Move request: opens (or overwrites) a pending entry keyed by (cmd_ID, UUID).
pub fn move_request_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(
      r"^(?P<timestamp>....-..-.. ..:..:..\....).*MOVE_REQUEST.*cmd_ID: (?P<cmd_id>\d+).*src: (?P<src>.*) dest: (?P<dest>.*) weight.*UUID\((?P<uuid>\w+-\w+-\w+-\w+-\w+)",
    )
    .expect("valid move request regex")
  })
}

/// Move completion: resolves a pending move with its final status.
pub fn move_complete_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(
      r".*Outgoing msup command response CMD_RESPONSE\(\d+#\d+ (?P<status>COMPLETE \w+)\).*cmd_ID: (?P<cmd_id>\d+) ucco? :.*UUID\((?P<uuid>\w+-\w+-\w+-\w+-\w+)",
    )
    .expect("valid move complete regex")
  })
}

/// Tote load/unload command.
pub fn tote_command_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(
      r"^(?P<timestamp>....-..-.. ..:..:..\....).*TCOM0.*NEW_COMMAND : Command ID .* , (?P<action>.*)\(\d+\) , (?P<side>.*)\(\d+\) , Grid ID (?P<grid_id>.*) , UUID",
    )
    .expect("valid tote command regex")
  })
}

/// Cached fault occurrence.
pub fn fault_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(
      r".*(?P<timestamp>....-..-.. ..:..:..\....).* Fault Cache id:fault_(?P<fault_num>\w+) Type:(?P<fault_type>\w+)",
    )
    .expect("valid fault regex")
  })
}

/// Low-level FPGA / SPLC safety signal change.
pub fn splc_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(
      r".*(?P<timestamp>....-..-.. ..:..:..\....).*FPGA1 safety debug change: (?P<fpga_msg>.*SPLC=0x[^F].*)$",
    )
    .expect("valid splc regex")
  })
}

// ---------------------------------------------------------------------------
// Message-log patterns (secondary log family)
// ---------------------------------------------------------------------------

/// Protocol message line: packet id + message-type code after the frame header.
pub fn message_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(
      r".*(?P<timestamp>....-..-.. ..:..:..\....).*(?P<id>Packet ID: -?\d+) - Bytes: 41 42 (?:[0-9a-fA-F]+ ){4}(?P<func>[0-9a-fA-F]+ [0-9a-fA-F]+)",
    )
    .expect("valid message regex")
  })
}

/// Telemetry sub-pattern applied to telemetry-bearing message lines.
pub fn message_telemetry_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r".*\| .*41 08 (?P<telemetry_block>(?:3[a-zA-Z0-9] ){8})")
      .expect("valid message telemetry regex")
  })
}

/// Message types whose payload carries a telemetry block.
pub const TELEMETRY_MESSAGE_TYPES: [&str; 8] = [
  "01 08", // s1f8     init complete ack
  "01 42", // s1f66    telemetry data report
  "06 41", // s6f65    telemetry data report
  "40 02", // s64f2    move command ack
  "c0 03", // s64f3    move initiated
  "c0 05", // s64f5    move complete
  "40 0c", // s64f12   load/unload ack
  "c0 0d", // s64f13   load/unload complete
];

// ---------------------------------------------------------------------------
// Telemetry bit-to-label table
// ---------------------------------------------------------------------------

/// Per-byte status labels for bits 8, 4, 2, 1 of the low nibble.
pub const TELEMETRY_MAP: [[&str; 4]; 8] = [
  ["ONLINE", "HOMED", "TOTE PRES", "LOW CONFIDENCE TOTE"],
  ["SAFE TO AUTO HOME", "BRAKE ON", "E-STOP 1", "E-STOP 0"],
  ["OPERATION", "LOADING", "UNLOADING", "TRAVELING"],
  ["ENGAGE FAILED", "DISENGAGE FAILED", "LOW CONFIDENCE MOVE", "HOMING"],
  ["PINIONS OUT", "PINIONS IN", "WHEELS OUT", "WHEELS IN"],
  ["DEINIT", "LP LEFT", "LP MID", "LP RIGHT"],
  ["RESERVED", "RESERVED", "RESERVED", "RESERVED"],
  ["SEND GYRO", "SEND PROX", "SEND TEMP", "SEND SSID"],
];

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// Fault code -> human description.
pub type FaultTable = HashMap<String, String>;

/// Message-type code (lowercased, e.g. "01 42") -> protocol description.
pub type AcpTable = HashMap<String, AcpEntry>;

#[derive(Debug, Clone)]
pub struct AcpEntry {
  pub msg_id: String,
  pub dir: String,
  pub desc: String,
}

const FAULT_ID_COLUMN: &str = "ID sent to MCS";
const FAULT_DESC_COLUMN: &str = "Short Description of Fault";

/// Parse the embedded fault table (tab-separated, header row).
///
/// Rows with too few columns are skipped with a warning; a header missing the
/// required columns is a structural failure.
pub fn fault_table_from_tsv(text: &str) -> Result<FaultTable, EngineError> {
  let mut rows = text.lines().enumerate();
  let (_, header) = rows
    .next()
    .ok_or_else(|| EngineError::table(1, "empty fault table"))?;
  let columns: Vec<&str> = header.split('\t').collect();
  let id_col = columns
    .iter()
    .position(|c| *c == FAULT_ID_COLUMN)
    .ok_or_else(|| EngineError::table(1, format!("missing column: {FAULT_ID_COLUMN}")))?;
  let desc_col = columns
    .iter()
    .position(|c| *c == FAULT_DESC_COLUMN)
    .ok_or_else(|| EngineError::table(1, format!("missing column: {FAULT_DESC_COLUMN}")))?;

  let mut table = FaultTable::new();
  for (i, row) in rows {
    if row.trim().is_empty() {
      continue;
    }
    let fields: Vec<&str> = row.split('\t').collect();
    match (fields.get(id_col), fields.get(desc_col)) {
      (Some(id), Some(desc)) => {
        table.insert(id.to_string(), desc.to_string());
      }
      _ => log::warn!("fault table line {}: too few columns, skipped", i + 1),
    }
  }
  Ok(table)
}

/// Parse the ACP table (tab-separated, no header).
///
/// Columns: msg_id, msg_type, _, dir, desc. Keyed by lowercased msg_type.
pub fn acp_table_from_tsv(text: &str) -> AcpTable {
  let mut table = AcpTable::new();
  for (i, row) in text.lines().enumerate() {
    if row.trim().is_empty() {
      continue;
    }
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() < 5 {
      log::warn!("acp table line {}: too few columns, skipped", i + 1);
      continue;
    }
    table.insert(
      fields[1].to_ascii_lowercase(),
      AcpEntry {
        msg_id: fields[0].to_string(),
        dir: fields[3].to_string(),
        desc: fields[4].to_string(),
      },
    );
  }
  table
}
