//! Per-cluster statistics derived after a run: diameter and seen window.

use chrono::{DateTime, Utc};

use crate::cache::DistanceCache;
use crate::types::{Cluster, Report};

/// Largest member-to-member distance inside `cluster`.
///
/// Every intra-cluster pair was scored while its halves were being merged, so
/// this only reads the cache. Singletons have diameter 0.
pub fn diameter(cluster: &Cluster, cache: &DistanceCache) -> f64 {
  let mut max_d = 0.0_f64;
  for (n, &i) in cluster.indices.iter().enumerate() {
    for &j in &cluster.indices[n + 1..] {
      if let Some(d) = cache.get(i, j) {
        max_d = max_d.max(d);
      }
    }
  }
  max_d
}

/// Earliest and latest timestamp among the cluster's reports, if any carry one.
pub fn seen_window(
  cluster: &Cluster,
  reports: &[Report],
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
  cluster
    .indices
    .iter()
    .filter_map(|&i| reports[i].timestamp)
    .fold(None, |acc, ts| match acc {
      None => Some((ts, ts)),
      Some((first, last)) => Some((first.min(ts), last.max(ts))),
    })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cluster::{ClusterEngine, ClusterParams};
  use crate::types::Trace;
  use chrono::TimeZone;

  fn ts(min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 10, min, 0).unwrap()
  }

  fn report(id: &str, timestamp: Option<DateTime<Utc>>) -> Report {
    Report {
      id: id.into(),
      timestamp,
      exception_type: None,
      message: None,
      trace: Trace::from_names(["a"]),
    }
  }

  #[test]
  fn singleton_diameter_is_zero() {
    let cache = DistanceCache::new();
    assert_eq!(diameter(&Cluster::singleton(3), &cache), 0.0);
  }

  #[test]
  fn diameter_is_worst_member_pair() {
    let traces = vec![
      Trace::from_names(["a", "b", "c"]),
      Trace::from_names(["a", "b", "c"]),
      Trace::from_names(["a", "b", "z"]),
    ];
    let outcome = ClusterEngine::new(&traces, ClusterParams::new(1.0, 1.0, 1.0)).run();
    assert_eq!(outcome.clusters.len(), 1);
    let expected = outcome.cache.get(0, 2).unwrap();
    assert!(expected > 0.0);
    assert_eq!(diameter(&outcome.clusters[0], &outcome.cache), expected);
  }

  #[test]
  fn seen_window_spans_member_timestamps() {
    let reports = vec![
      report("a", Some(ts(30))),
      report("b", None),
      report("c", Some(ts(5))),
      report("d", Some(ts(59))),
    ];
    let cluster = Cluster {
      indices: vec![0, 1, 2],
    };
    assert_eq!(seen_window(&cluster, &reports), Some((ts(5), ts(30))));
  }

  #[test]
  fn seen_window_absent_without_timestamps() {
    let reports = vec![report("a", None), report("b", None)];
    let cluster = Cluster {
      indices: vec![0, 1],
    };
    assert!(seen_window(&cluster, &reports).is_none());
  }
}
