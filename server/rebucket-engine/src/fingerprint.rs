//! Exact top-of-stack signatures, used to count verbatim duplicates inside a cluster.

use crate::types::{Fingerprint, Trace};

/// Compute a stable fingerprint from the first `max_frames` frame names.
///
/// Uses blake3 for a fast, deterministic hash. File and line decorations are
/// not part of the signature.
pub fn compute(trace: &Trace, max_frames: usize) -> Fingerprint {
  let mut hasher = blake3::Hasher::new();
  hasher.update(&(trace.len().min(max_frames) as u64).to_le_bytes());

  for frame in trace.frames.iter().take(max_frames) {
    hasher.update(b"|");
    hasher.update(frame.name.as_bytes());
  }

  let hash = hasher.finalize();
  // First 16 bytes (32 hex chars) is compact and collision-resistant enough.
  let hex = hash.to_hex();
  Fingerprint(hex[..32].to_string())
}
