//! Window evaluators for the built-in fingerprint catalog.
//!
//! An action inspects the full text of a completed window and decides whether
//! the match is worth keeping and how to annotate it. Failures are isolated
//! per sequence by the matcher.

use std::sync::OnceLock;

use regex::Regex;

/// Outcome of evaluating a completed window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
  /// Keep the match, display this string.
  Annotate(String),
  /// Keep the match with the neutral "No" marker.
  Keep,
  /// Exclude the match from output entirely (not counted).
  Discard,
}

impl From<bool> for ActionResult {
  fn from(kept: bool) -> Self {
    if kept {
      Self::Annotate("Yes".to_string())
    } else {
      Self::Discard
    }
  }
}

/// A window evaluator. Errors abort only the owning sequence.
pub type Action = Box<dyn Fn(&[String]) -> Result<ActionResult, String> + Send + Sync>;

fn slip_error_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"ERROR \[ x_pos : ([\d\.\-]+) \]").expect("valid slip error regex")
  })
}

fn impact_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"_IMU0 Impact detected on [A-Z]+ IMU of ([\d\.]+) G")
      .expect("valid impact regex")
  })
}

fn fault_id_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"\bSent fault to MCS for Id[=\s](\S+)").expect("valid fault id regex")
  })
}

/// Largest x_pos slip error reported anywhere in the window, 0.0 when absent.
fn max_slip_error(window: &[String]) -> Result<f64, String> {
  let mut max_error = 0.0f64;
  for line in window {
    if let Some(caps) = slip_error_re().captures(line) {
      let raw = &caps[1];
      let value = raw
        .parse::<f64>()
        .map_err(|_| format!("bad x_pos error value {raw:?}"))?;
      max_error = max_error.max(value);
    }
  }
  Ok(max_error)
}

/// Report the max slip error when it exceeds `threshold`, otherwise discard.
pub fn large_slip(threshold: f64) -> Action {
  Box::new(move |window| {
    let max_error = max_slip_error(window)?;
    Ok(if max_error > threshold {
      ActionResult::Annotate(format!("Max ERROR : {max_error:.3}"))
    } else {
      ActionResult::Discard
    })
  })
}

/// Report the max slip error when it stays below `threshold`, otherwise discard.
pub fn small_slip(threshold: f64) -> Action {
  Box::new(move |window| {
    let max_error = max_slip_error(window)?;
    Ok(if max_error < threshold {
      ActionResult::Annotate(format!("Max ERROR : {max_error:.3}"))
    } else {
      ActionResult::Discard
    })
  })
}

/// Report the strongest IMU impact above `threshold` G; keep neutrally below it.
pub fn impact(threshold: f64) -> Action {
  Box::new(move |window| {
    let mut max_g = 0.0f64;
    for line in window {
      if let Some(caps) = impact_re().captures(line) {
        let raw = &caps[1];
        let g_force = raw
          .parse::<f64>()
          .map_err(|_| format!("bad impact G value {raw:?}"))?;
        max_g = max_g.max(g_force);
      }
    }
    Ok(if max_g > threshold {
      ActionResult::Annotate(format!("Impact detected with {max_g} G."))
    } else {
      ActionResult::Keep
    })
  })
}

/// List every fault ID sent to MCS within the window; keep neutrally when none.
pub fn fault_burst() -> Action {
  Box::new(|window| {
    let mut fault_ids: Vec<String> = Vec::new();
    for line in window {
      if let Some(caps) = fault_id_re().captures(line) {
        fault_ids.push(caps[1].to_string());
      }
    }
    Ok(if fault_ids.is_empty() {
      ActionResult::Keep
    } else {
      ActionResult::Annotate(format!("{fault_ids:?}"))
    })
  })
}
