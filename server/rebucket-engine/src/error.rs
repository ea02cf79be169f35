//! Errors raised while turning inbound reports and settings into engine input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  /// A report or config value the engine refuses to cluster with.
  #[error("invalid {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("timestamp `{value}` is not RFC3339: {source}")]
  Timestamp {
    value: String,
    #[source]
    source: chrono::ParseError,
  },

  #[error("malformed report JSON: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::Validation {
      field: field.into(),
      reason: reason.into(),
    }
  }

  pub fn timestamp(value: impl Into<String>, source: chrono::ParseError) -> Self {
    Self::Timestamp {
      value: value.into(),
      source,
    }
  }

  /// The inbound field the error points at, when there is one.
  pub fn field(&self) -> Option<&str> {
    match self {
      Self::Validation { field, .. } => Some(field),
      Self::Timestamp { .. } => Some("timestamp"),
      Self::Json(_) => None,
    }
  }
}
