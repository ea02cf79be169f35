//! Core types for the clustering engine (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// One parsed crash report. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundReport {
  /// Caller-side identity of the report (file name, event id, ...).
  pub id: String,
  #[serde(default)]
  pub timestamp: Option<String>,
  #[serde(default)]
  pub exception_type: Option<String>,
  #[serde(default)]
  pub message: Option<String>,
  /// Frames ordered from the crash point outward. May be empty.
  #[serde(default)]
  pub stacktrace: Vec<InboundFrame>,
}

impl InboundReport {
  pub fn from_json(line: &str) -> Result<Self, EngineError> {
    Ok(serde_json::from_str(line)?)
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundFrame {
  #[serde(default)]
  pub function: Option<String>,
  #[serde(default)]
  pub file: Option<String>,
  #[serde(default)]
  pub line: Option<u32>,
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// One frame of a trace. Alignment compares `name` only; the location is kept
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StackFrame {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub line: Option<u32>,
}

impl StackFrame {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      file: None,
      line: None,
    }
  }
}

/// Frames ordered from the crash point (index 0) to the root caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
  pub frames: Vec<StackFrame>,
}

impl Trace {
  pub fn new(frames: Vec<StackFrame>) -> Self {
    Self { frames }
  }

  /// Build a trace from bare frame identifiers.
  pub fn from_names<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      frames: names.into_iter().map(StackFrame::named).collect(),
    }
  }

  pub fn len(&self) -> usize {
    self.frames.len()
  }

  pub fn is_empty(&self) -> bool {
    self.frames.is_empty()
  }
}

impl AsRef<[StackFrame]> for Trace {
  fn as_ref(&self) -> &[StackFrame] {
    &self.frames
  }
}

/// Canonical internal report after normalization + validation.
#[derive(Debug, Clone)]
pub struct Report {
  pub id: String,
  pub timestamp: Option<DateTime<Utc>>,
  pub exception_type: Option<String>,
  pub message: Option<String>,
  pub trace: Trace,
}

impl AsRef<[StackFrame]> for Report {
  fn as_ref(&self) -> &[StackFrame] {
    &self.trace.frames
  }
}

// ---------------------------------------------------------------------------
// Clustering
// ---------------------------------------------------------------------------

/// Memo key for a report pair. `(i, j)` and `(j, i)` normalize to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
  lo: usize,
  hi: usize,
}

impl PairKey {
  pub fn new(i: usize, j: usize) -> Self {
    debug_assert_ne!(i, j, "a report is never paired with itself");
    if i < j {
      Self { lo: i, hi: j }
    } else {
      Self { lo: j, hi: i }
    }
  }

  pub fn indices(self) -> (usize, usize) {
    (self.lo, self.hi)
  }
}

/// A non-empty group of report indices. Member order is not meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
  pub indices: Vec<usize>,
}

impl Cluster {
  pub fn singleton(idx: usize) -> Self {
    Self { indices: vec![idx] }
  }

  pub fn len(&self) -> usize {
    self.indices.len()
  }

  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  /// Take over every member of `other`.
  pub fn absorb(&mut self, other: Cluster) {
    self.indices.extend(other.indices);
  }
}

/// A stable hex string identifying an exact top-of-stack signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
  pub cluster_id: String,
  pub size: usize,
  pub members: Vec<String>,
  pub indices: Vec<usize>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub exception_types: Vec<String>,
  pub top_frames: Vec<String>,
  pub distinct_signatures: usize,
  pub diameter: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_seen: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_seen: Option<String>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for invalid input lines.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub line: Option<usize>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
      line: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }

  pub fn at_line(mut self, line: usize) -> Self {
    self.line = Some(line);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pair_key_is_order_independent() {
    assert_eq!(PairKey::new(3, 7), PairKey::new(7, 3));
    assert_eq!(PairKey::new(7, 3).indices(), (3, 7));
  }

  #[test]
  fn absorb_moves_all_members() {
    let mut a = Cluster::singleton(0);
    let b = Cluster {
      indices: vec![4, 2],
    };
    a.absorb(b);
    assert_eq!(a.indices, vec![0, 4, 2]);
    assert_eq!(a.len(), 3);
  }

  #[test]
  fn inbound_report_defaults_optional_fields() {
    let raw = InboundReport::from_json(r#"{"id": "r1"}"#).unwrap();
    assert_eq!(raw.id, "r1");
    assert!(raw.stacktrace.is_empty());
    assert!(raw.timestamp.is_none());
  }

  #[test]
  fn inbound_report_bad_json_is_json_error() {
    let err = InboundReport::from_json("{not json").unwrap_err();
    assert!(matches!(err, EngineError::Json(_)));
  }

  #[test]
  fn error_output_omits_unset_fields() {
    let json = serde_json::to_string(&ErrorOutput::new("boom")).unwrap();
    assert_eq!(json, r#"{"error":true,"message":"boom"}"#);
    let json = serde_json::to_string(&ErrorOutput::new("boom").with_field("id").at_line(3)).unwrap();
    assert!(json.contains(r#""field":"id""#));
    assert!(json.contains(r#""line":3"#));
  }
}
