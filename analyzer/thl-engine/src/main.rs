//! Binary entrypoint: analyze one THL log file.
//!
//! Usage: thl-engine <summary|messages|fingerprints> [LOG_FILE]
//!
//! Reads LOG_FILE (or stdin) and writes formatted summary lines (summary,
//! messages) or JSON lines (fingerprints) to stdout. Fault and ACP
//! description tables are read from the optional THL_FAULT_TABLE and
//! THL_ACP_TABLE environment variables (tab-separated files); without them
//! lookups fall back to their "not found" placeholders.

use std::io::{self, Read, Write};

use thl_engine::catalog::{self, AcpTable, FaultTable};
use thl_engine::{analyze, builtin_sequences, correlate, summarize_messages, Config};

fn read_input(path: Option<&str>) -> io::Result<Vec<String>> {
  let bytes = match path {
    Some(p) => std::fs::read(p)?,
    None => {
      let mut buf = Vec::new();
      io::stdin().lock().read_to_end(&mut buf)?;
      buf
    }
  };
  // Undecodable bytes become replacement characters; those lines simply
  // match no pattern.
  Ok(String::from_utf8_lossy(&bytes)
    .lines()
    .map(str::to_string)
    .collect())
}

fn load_fault_table() -> FaultTable {
  let Ok(path) = std::env::var("THL_FAULT_TABLE") else {
    return FaultTable::new();
  };
  match std::fs::read_to_string(&path) {
    Ok(text) => match catalog::fault_table_from_tsv(&text) {
      Ok(table) => table,
      Err(e) => {
        log::warn!("fault table {path}: {e}");
        FaultTable::new()
      }
    },
    Err(e) => {
      log::warn!("fault table {path}: {e}");
      FaultTable::new()
    }
  }
}

fn load_acp_table() -> AcpTable {
  let Ok(path) = std::env::var("THL_ACP_TABLE") else {
    return AcpTable::new();
  };
  match std::fs::read_to_string(&path) {
    Ok(text) => catalog::acp_table_from_tsv(&text),
    Err(e) => {
      log::warn!("acp table {path}: {e}");
      AcpTable::new()
    }
  }
}

fn usage() -> ! {
  eprintln!("usage: thl-engine <summary|messages|fingerprints> [LOG_FILE]");
  std::process::exit(2);
}

fn main() {
  env_logger::init();

  let args: Vec<String> = std::env::args().skip(1).collect();
  let Some(mode) = args.first() else { usage() };
  let path = args.get(1).map(String::as_str);

  let lines = match read_input(path) {
    Ok(lines) => lines,
    Err(e) => {
      eprintln!("thl-engine: read error: {e}");
      std::process::exit(1);
    }
  };
  let log_file = path.unwrap_or("stdin");

  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());

  match mode.as_str() {
    "summary" => {
      for line in correlate(&lines, &load_fault_table()) {
        let _ = writeln!(out, "{line}");
      }
    }
    "messages" => {
      for line in summarize_messages(&lines, &load_acp_table()) {
        let _ = writeln!(out, "{line}");
      }
    }
    "fingerprints" => {
      let sequences = match builtin_sequences(&Config::default()) {
        Ok(sequences) => sequences,
        Err(e) => {
          eprintln!("thl-engine: {e}");
          std::process::exit(1);
        }
      };
      let report = analyze(&lines, &sequences, log_file);
      for row in &report.detail {
        let _ = serde_json::to_writer(&mut out, row);
        let _ = writeln!(out);
      }
      for row in &report.summary {
        let _ = serde_json::to_writer(&mut out, row);
        let _ = writeln!(out);
      }
      for err in &report.errors {
        log::warn!("fingerprint {}: {}", err.fingerprint, err.reason);
      }
    }
    _ => usage(),
  }

  let _ = out.flush();
}
