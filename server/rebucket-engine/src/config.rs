//! Engine configuration with sane defaults.

use crate::error::EngineError;

/// Tunable clustering parameters.
///
/// The coefficients are not calibrated against a tagged corpus; the all-1.0
/// defaults are placeholders until one exists.
#[derive(Debug, Clone)]
pub struct Config {
  /// Merge two clusters only when their complete-linkage distance is below this.
  pub distance_threshold: f64,
  /// Decay per frame of depth (`c`). Higher = top frames dominate.
  pub recency_coefficient: f64,
  /// Penalty per frame of misalignment between the two traces (`o`).
  pub offset_coefficient: f64,
  /// Frames shown per cluster and hashed into exact-match signatures.
  pub summary_max_frames: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      distance_threshold: 1.0,
      recency_coefficient: 1.0,
      offset_coefficient: 1.0,
      summary_max_frames: 5,
    }
  }
}

impl Config {
  /// Reject values the distance computation cannot give meaning to.
  pub fn validate(&self) -> Result<(), EngineError> {
    if !self.distance_threshold.is_finite() {
      return Err(EngineError::validation("distance_threshold", "must be finite"));
    }
    if !self.recency_coefficient.is_finite() || self.recency_coefficient < 0.0 {
      return Err(EngineError::validation(
        "recency_coefficient",
        "must be finite and >= 0",
      ));
    }
    if !self.offset_coefficient.is_finite() || self.offset_coefficient < 0.0 {
      return Err(EngineError::validation(
        "offset_coefficient",
        "must be finite and >= 0",
      ));
    }
    if self.summary_max_frames == 0 {
      return Err(EngineError::validation("summary_max_frames", "must be at least 1"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    assert!(Config::default().validate().is_ok());
  }

  #[test]
  fn negative_recency_rejected() {
    let config = Config {
      recency_coefficient: -0.5,
      ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("recency_coefficient"));
  }

  #[test]
  fn nan_threshold_rejected() {
    let config = Config {
      distance_threshold: f64::NAN,
      ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("distance_threshold"));
  }

  #[test]
  fn infinite_offset_rejected() {
    let config = Config {
      offset_coefficient: f64::INFINITY,
      ..Config::default()
    };
    assert!(config.validate().is_err());
  }

  #[test]
  fn zero_summary_frames_rejected() {
    let config = Config {
      summary_max_frames: 0,
      ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("summary_max_frames"));
  }

  #[test]
  fn non_positive_threshold_is_allowed() {
    // Disables merging entirely; still a meaningful request.
    let config = Config {
      distance_threshold: 0.0,
      ..Config::default()
    };
    assert!(config.validate().is_ok());
  }
}
