//! Integration tests for the THL analysis engine.

use thl_engine::actions::ActionResult;
use thl_engine::catalog::{acp_table_from_tsv, fault_table_from_tsv};
use thl_engine::{analyze, builtin_sequences, correlate, summarize_messages, Config, Sequence};

fn bot_log() -> Vec<String> {
  [
    "2024-01-01 00:00:00.000 I MSUP0 MOVE_REQUEST received cmd_ID: 5 src: A1-B2 dest: C3-D4 weight: 12 UUID(aa1-bb2-cc3-dd4-ee5)",
    "2024-01-01 00:00:00.200 D NAVI0 position update x=1.02 y=3.44",
    "2024-01-01 00:00:00.500 I TCOM0 NEW_COMMAND : Command ID 77 , LOAD(1) , LEFT(2) , Grid ID 0042 , UUID(y1-y2-y3-y4-y5)",
    "2024-01-01 00:00:01.000 I MSUP0 Outgoing msup command response CMD_RESPONSE(1#1 COMPLETE OK) cmd_ID: 5 ucc : 0 UUID(aa1-bb2-cc3-dd4-ee5)",
    "2024-01-01 00:00:02.000 E FAPR0 Fault Cache id:fault_0C_05_00 Type:FATAL",
    "2024-01-01 00:00:03.000 W SPLC0 FPGA1 safety debug change: flags SPLC=0x3A state",
    "2024-01-01 00:00:04.000 I MSUP0 MOVE_REQUEST received cmd_ID: 9 src: E5-F6 dest: G7-H8 weight: 3 UUID(ff1-ff2-ff3-ff4-ff5)",
  ]
  .iter()
  .map(|l| l.to_string())
  .collect()
}

#[test]
fn bot_log_summary_end_to_end() {
  let faults = fault_table_from_tsv(
    "ID sent to MCS\tShort Description of Fault\n0C_05_00\tPosition slip fault\n",
  )
  .unwrap();

  let out = correlate(&bot_log(), &faults);
  assert_eq!(out.len(), 5);

  // Chronological order via the fixed-width timestamp prefix.
  let timestamps: Vec<&str> = out.iter().map(|l| &l[..23]).collect();
  let mut sorted = timestamps.clone();
  sorted.sort();
  assert_eq!(timestamps, sorted);

  assert_eq!(
    out[0],
    format!(
      "2024-01-01 00:00:00.000 {:<17} -> {:<17} | COMPLETE OK",
      "A1-B2", "C3-D4"
    )
  );
  assert!(out[1].contains("[TOTE]"));
  assert!(out[2].contains("[FAULT]"));
  assert!(out[2].ends_with("| Position slip fault"));
  assert!(out[3].contains("[FPGA1 safety debug change]"));
  assert!(out[4].ends_with("| Move Blended or only received ACK"));
}

#[test]
fn correlate_twice_is_byte_identical() {
  let faults = fault_table_from_tsv("ID sent to MCS\tShort Description of Fault\n").unwrap();
  let input = bot_log();
  assert_eq!(
    correlate(&input, &faults).join("\n"),
    correlate(&input, &faults).join("\n")
  );
}

#[test]
fn message_log_summary_with_dedup_and_telemetry() {
  let acp = acp_table_from_tsv("s1f66\t01 42\tx\trecv\ttelemetry data report\n");
  let input: Vec<String> = [
    // handler reprint: same packet, same second
    "2024-01-01 00:00:05.100 I VCOM0 Packet ID: 12 - Bytes: 41 42 00 01 02 03 01 42 99 aa | payload 41 08 38 34 30 30 30 30 30 30 end",
    "2024-01-01 00:00:05.800 I VCOM0 Packet ID: 12 - Bytes: 41 42 00 01 02 03 01 42 99 aa | payload 41 08 38 34 30 30 30 30 30 30 end",
    "2024-01-01 00:00:06.100 I VCOM0 Packet ID: 13 - Bytes: 41 42 00 01 02 03 aa bb 99 aa",
  ]
  .iter()
  .map(|l| l.to_string())
  .collect();

  let out = summarize_messages(&input, &acp);
  assert_eq!(out.len(), 2);
  assert!(out[0].contains("| DIR: recv | MSG TYPE: 01 42 | ID: s1f66  |"));
  assert!(out[0].ends_with(" | TELEMETRY: [ONLINE, BRAKE ON]"));
  assert!(out[1].ends_with("| MSG TYPE: aa bb"));
}

fn fault_line(ts: &str, module: &str, fault: &str) -> String {
  format!("{ts} E {module} Sent fault to MCS for Id=fault_{fault}")
}

#[test]
fn builtin_fingerprints_end_to_end() {
  let mut input: Vec<String> = vec![
    fault_line("2024-01-01 00:00:00.000", "FMON0", "05_06_00"),
    "2024-01-01 00:00:00.100 E FPOS0 ERROR [ x_pos : 0.120 ]".to_string(),
    "2024-01-01 00:00:00.200 W _IMU0 Impact detected on LEFT IMU of 7.5 G".to_string(),
    fault_line("2024-01-01 00:00:00.300", "FAPR0", "0C_05_00"),
  ];
  // pad so every built-in window size fits
  input.extend((0..100).map(|i| format!("2024-01-01 00:00:01.{i:03} D NAVI0 noise")));

  let sequences = builtin_sequences(&Config::default()).unwrap();
  let report = analyze(&input, &sequences, "alphabot_000027.txt");
  assert!(report.errors.is_empty());

  let fingerprints: Vec<&str> = report
    .summary
    .iter()
    .map(|row| row.fingerprint.as_str())
    .collect();
  assert!(fingerprints.contains(&"0C_05_00_signatures"));
  assert!(fingerprints.contains(&"05_12_00"));
  assert!(fingerprints.contains(&"0C_05_00_high_wheel_velocity_failure"));
  assert!(fingerprints.contains(&"0C_05_00_large_slip"));
  assert!(fingerprints.contains(&"IMU_impact_detected"));

  // The burst action lists both fault IDs sent during the window.
  let burst = report
    .detail
    .iter()
    .find(|r| r.fingerprint == "0C_05_00_signatures")
    .unwrap();
  assert!(burst.action_matched.contains("fault_05_06_00"));
  assert!(burst.action_matched.contains("fault_0C_05_00"));

  // filter_actions collapses the IMU fingerprint to one annotated row per file.
  let imu_rows: Vec<_> = report
    .detail
    .iter()
    .filter(|r| r.fingerprint == "IMU_impact_detected")
    .collect();
  assert_eq!(imu_rows.len(), 1);
  assert_eq!(imu_rows[0].action_matched, "Impact detected with 7.5 G.");
}

#[test]
fn filtered_sequence_with_all_discard_action_yields_no_rows() {
  let seq = Sequence::new("always-drop", &["hit"])
    .unwrap()
    .with_window(2)
    .with_action(Box::new(|_: &[String]| Ok(ActionResult::Discard)))
    .filtered();
  let input: Vec<String> = ["hit", "noise", "hit", "noise"]
    .iter()
    .map(|l| l.to_string())
    .collect();

  let report = analyze(&input, &[seq], "bot.txt");
  assert!(report.detail.is_empty());
  assert!(report.summary.is_empty());
  assert!(report.errors.is_empty());
}

#[test]
fn failing_action_does_not_abort_the_catalog() {
  let failing = Sequence::new("broken", &["hit"])
    .unwrap()
    .with_window(1)
    .with_action(Box::new(|_: &[String]| Err("evaluator exploded".to_string())));
  let healthy = Sequence::new("healthy", &["hit"]).unwrap().with_window(1);
  let input: Vec<String> = vec!["hit".to_string()];

  let report = analyze(&input, &[failing, healthy], "bot.txt");
  assert_eq!(report.errors.len(), 1);
  assert!(report.errors[0].reason.contains("evaluator exploded"));
  assert_eq!(report.detail.len(), 1);
  assert_eq!(report.detail[0].fingerprint, "healthy");
}

#[test]
fn match_rows_serialize_with_display_column_names() {
  let seq = Sequence::new("single", &["hit"]).unwrap().with_window(1);
  let input: Vec<String> = vec!["one hit line".to_string()];
  let report = analyze(&input, &[seq], "bot.txt");
  let json = serde_json::to_value(&report.detail[0]).unwrap();
  assert_eq!(json["Log File"], "bot.txt");
  assert_eq!(json["Log Line"], "one hit line");
  assert_eq!(json["Link"], "bot.txt:1:5");
  assert_eq!(json["Action Matched"], "No");
  assert_eq!(json["fingerprint"], "single");
}
