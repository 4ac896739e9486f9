//! THL Log Correlation & Fingerprint Engine — deterministic, batch.
//!
//! Consumes decoded robot-controller log text (THL) one file at a time and
//! produces chronological event summaries (move request/response correlation,
//! tote commands, faults, FPGA safety signals) and fingerprint match tables
//! (ordered pattern sequences inside a bounded line window, optionally gated
//! by a window evaluator).
//!
//! No DB, no network; pure computation over an in-memory line list. The
//! static catalogs are read-only after construction, so files can be
//! processed on as many workers as the caller likes.

pub mod actions;
pub mod catalog;
pub mod config;
pub mod correlator;
pub mod error;
pub mod fingerprint;
pub mod telemetry;
pub mod types;
pub mod window;

pub use config::Config;
pub use correlator::{correlate, summarize_messages};
pub use error::EngineError;
pub use fingerprint::{analyze, builtin_sequences, find_matches, Sequence};
pub use types::AnalysisReport;
