//! Greedy complete-linkage agglomerative clustering over crash traces.
//!
//! Every report starts in its own cluster. Each round scans all pairs of live
//! clusters, takes the pair with the smallest complete-linkage distance (the
//! worst pairwise distance between their members) and merges it if that
//! distance is below the threshold. The run stops when no pair qualifies.

use log::{debug, info};

use crate::cache::DistanceCache;
use crate::distance::DistanceParams;
use crate::types::{Cluster, StackFrame};

/// Clustering parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
  /// Merge only when complete-linkage distance is strictly below this.
  pub threshold: f64,
  pub distance: DistanceParams,
}

impl ClusterParams {
  pub fn new(threshold: f64, recency: f64, offset: f64) -> Self {
    Self {
      threshold,
      distance: DistanceParams::new(recency, offset),
    }
  }
}

/// Result of a finished run.
#[derive(Debug)]
pub struct ClusterOutcome {
  /// Live clusters at termination; together they partition `0..traces.len()`.
  pub clusters: Vec<Cluster>,
  /// Number of merges applied.
  pub merges: usize,
  /// Every pair distance the run computed.
  pub cache: DistanceCache,
}

/// One clustering run over a fixed slice of traces.
///
/// Anything that exposes its frames works as a trace, so callers can cluster
/// their own report records without copying the frame vectors out.
pub struct ClusterEngine<'a, T> {
  traces: &'a [T],
  params: ClusterParams,
  cache: DistanceCache,
  clusters: Vec<Cluster>,
}

impl<'a, T: AsRef<[StackFrame]>> ClusterEngine<'a, T> {
  pub fn new(traces: &'a [T], params: ClusterParams) -> Self {
    Self {
      traces,
      params,
      cache: DistanceCache::new(),
      clusters: (0..traces.len()).map(Cluster::singleton).collect(),
    }
  }

  /// Merge until no pair of clusters is closer than the threshold.
  pub fn run(mut self) -> ClusterOutcome {
    let mut merges = 0;

    while let Some((a, b, d)) = self.closest_pair() {
      let absorbed = self.clusters.swap_remove(b);
      debug!(
        "merge: {} + {} reports at distance {:.4}",
        self.clusters[a].len(),
        absorbed.len(),
        d
      );
      self.clusters[a].absorb(absorbed);
      merges += 1;
    }

    info!(
      "clustered {} reports into {} clusters ({} merges, {} distances computed)",
      self.traces.len(),
      self.clusters.len(),
      merges,
      self.cache.len()
    );

    ClusterOutcome {
      clusters: self.clusters,
      merges,
      cache: self.cache,
    }
  }

  /// Closest qualifying pair `(a, b, distance)` with `a < b`, if any.
  ///
  /// Ties keep the first pair found in scan order.
  fn closest_pair(&mut self) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    let mut min_d = f64::INFINITY;

    for a in 0..self.clusters.len() {
      for b in (a + 1)..self.clusters.len() {
        let d = self.linkage(a, b);
        if d < self.params.threshold && d < min_d {
          min_d = d;
          best = Some((a, b, d));
        }
      }
    }

    best
  }

  /// Complete-linkage distance between live clusters `a` and `b`.
  fn linkage(&mut self, a: usize, b: usize) -> f64 {
    let mut max_d = f64::NEG_INFINITY;
    for &i in &self.clusters[a].indices {
      for &j in &self.clusters[b].indices {
        let d = self.cache.distance(self.traces, i, j, self.params.distance);
        if d > max_d {
          max_d = d;
        }
      }
    }
    max_d
  }
}

/// Cluster `traces` and return the final partition.
pub fn cluster_traces<T: AsRef<[StackFrame]>>(traces: &[T], params: ClusterParams) -> Vec<Cluster> {
  ClusterEngine::new(traces, params).run().clusters
}
