//! Per-run memo of pairwise trace distances.

use std::collections::HashMap;

use crate::distance::{self, DistanceParams};
use crate::types::{PairKey, StackFrame};

/// Distances computed during one clustering run, keyed by report pair.
///
/// Owned by a single run; indices have no meaning outside the trace slice
/// that run was given.
#[derive(Debug, Default)]
pub struct DistanceCache {
  entries: HashMap<PairKey, f64>,
}

impl DistanceCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cached distance for `(i, j)`, computing and storing it on first use.
  pub fn distance<T: AsRef<[StackFrame]>>(
    &mut self,
    traces: &[T],
    i: usize,
    j: usize,
    params: DistanceParams,
  ) -> f64 {
    *self.entries.entry(PairKey::new(i, j)).or_insert_with(|| {
      distance::distance(traces[i].as_ref(), traces[j].as_ref(), params)
    })
  }

  /// Previously computed distance, if any.
  pub fn get(&self, i: usize, j: usize) -> Option<f64> {
    self.entries.get(&PairKey::new(i, j)).copied()
  }

  /// Number of distinct pairs computed so far.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
