//! Telemetry block decoding.

use crate::catalog::TELEMETRY_MAP;

/// Decode an 8-byte hex telemetry block into the active status labels.
///
/// For each byte the low nibble's bits 8, 4, 2, 1 select the labels of the
/// corresponding table row, highest bit first. Byte 0's labels come first.
pub fn decode(block: &str) -> Vec<&'static str> {
  let mut labels = Vec::new();
  for (byte, row) in block.split_whitespace().zip(TELEMETRY_MAP.iter()) {
    let Some(nibble) = byte.chars().nth(1).and_then(|c| c.to_digit(16)) else {
      continue;
    };
    if nibble & 8 != 0 {
      labels.push(row[0]);
    }
    if nibble & 4 != 0 {
      labels.push(row[1]);
    }
    if nibble & 2 != 0 {
      labels.push(row[2]);
    }
    if nibble & 1 != 0 {
      labels.push(row[3]);
    }
  }
  labels
}
