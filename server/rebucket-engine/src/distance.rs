//! Position-weighted stack alignment distance between two traces.
//!
//! A weighted longest-common-subsequence: matching frames near the crash point
//! count for more (recency decay `c`) and matches at different depths in the
//! two traces are discounted (offset decay `o`). The score is normalized by the
//! best score achievable for the shorter trace, so the result lies in [0, 1].

use crate::types::StackFrame;

/// Coefficients of the alignment weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceParams {
  /// Recency coefficient `c`.
  pub recency: f64,
  /// Offset coefficient `o`.
  pub offset: f64,
}

impl DistanceParams {
  pub fn new(recency: f64, offset: f64) -> Self {
    Self { recency, offset }
  }

  /// Weight of a match between 0-based positions `i` and `j`.
  fn match_weight(&self, i: usize, j: usize) -> f64 {
    let depth = i.min(j) as f64;
    let shift = i.abs_diff(j) as f64;
    (-self.recency * depth).exp() * (-self.offset * shift).exp()
  }

  /// Best achievable score when the first `len` positions all match in place.
  fn max_score(&self, len: usize) -> f64 {
    (0..len).map(|k| (-self.recency * k as f64).exp()).sum()
  }
}

/// Distance in [0, 1] between two traces; 0 means identical.
///
/// An empty trace on either side has no basis for comparison and yields 1.
pub fn distance(c1: &[StackFrame], c2: &[StackFrame], params: DistanceParams) -> f64 {
  if c1.is_empty() || c2.is_empty() {
    return 1.0;
  }

  let n2 = c2.len();
  // Two rolling rows of the (n1+1) x (n2+1) score matrix.
  let mut prev = vec![0.0_f64; n2 + 1];
  let mut cur = vec![0.0_f64; n2 + 1];

  for (i, f1) in c1.iter().enumerate() {
    cur[0] = 0.0;
    for (j, f2) in c2.iter().enumerate() {
      let x = if f1.name == f2.name {
        params.match_weight(i, j)
      } else {
        0.0
      };
      cur[j + 1] = (prev[j] + x).max(prev[j + 1]).max(cur[j]);
    }
    std::mem::swap(&mut prev, &mut cur);
  }

  let sig = params.max_score(c1.len().min(n2));
  1.0 - prev[n2] / sig
}
