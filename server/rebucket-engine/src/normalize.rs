//! Normalize inbound reports into canonical internal Report models.

use chrono::{DateTime, Utc};

use crate::error::EngineError;
use crate::types::*;

/// Parse and normalize an InboundReport into a canonical Report.
pub fn normalize(raw: &InboundReport) -> Result<Report, EngineError> {
  let id = raw.id.trim();
  if id.is_empty() {
    return Err(EngineError::validation("id", "must not be empty"));
  }

  let timestamp = match &raw.timestamp {
    Some(ts) => Some(
      DateTime::parse_from_rfc3339(ts)
        .map_err(|e| EngineError::timestamp(ts.as_str(), e))?
        .with_timezone(&Utc),
    ),
    None => None,
  };

  let frames = raw
    .stacktrace
    .iter()
    .map(normalize_frame)
    .collect::<Result<Vec<_>, EngineError>>()?;

  Ok(Report {
    id: id.to_string(),
    timestamp,
    exception_type: non_empty(raw.exception_type.as_deref()),
    message: non_empty(raw.message.as_deref()),
    trace: Trace::new(frames),
  })
}

/// The function name identifies a frame; the file path stands in when the
/// producer could not symbolize it.
fn normalize_frame(f: &InboundFrame) -> Result<StackFrame, EngineError> {
  let file = non_empty(f.file.as_deref()).map(|p| normalize_path(&p));
  let name = match (non_empty(f.function.as_deref()), &file) {
    (Some(function), _) => function,
    (None, Some(path)) => path.clone(),
    (None, None) => {
      return Err(EngineError::validation(
        "stacktrace[].function",
        "frame needs a function or a file",
      ))
    }
  };
  Ok(StackFrame {
    name,
    file,
    line: f.line,
  })
}

fn non_empty(s: Option<&str>) -> Option<String> {
  s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Normalize a file path for stable comparison:
/// - backslash -> forward slash
/// - collapse repeated slashes
/// - strip leading ./
fn normalize_path(p: &str) -> String {
  let s = p.replace('\\', "/");
  let mut out = String::with_capacity(s.len());
  let mut prev_slash = false;
  for ch in s.chars() {
    if ch == '/' {
      if !prev_slash {
        out.push('/');
      }
      prev_slash = true;
    } else {
      prev_slash = false;
      out.push(ch);
    }
  }
  out.strip_prefix("./").unwrap_or(&out).to_string()
}
