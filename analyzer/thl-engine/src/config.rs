//! Engine configuration with sane defaults.

/// Tunable thresholds for the built-in fingerprint actions.
#[derive(Debug, Clone)]
pub struct Config {
  /// Max x_pos slip error above this is reported by the large-slip fingerprint.
  pub large_slip_threshold: f64,
  /// Max x_pos slip error below this is reported by the small-slip fingerprint.
  pub small_slip_threshold: f64,
  /// Impact G force above this is reported by the IMU impact fingerprint.
  pub impact_g_threshold: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      large_slip_threshold: 0.05,
      small_slip_threshold: 0.05,
      impact_g_threshold: 5.0,
    }
  }
}
