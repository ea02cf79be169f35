//! Property-based tests for the alignment distance and the clustering loop.

use proptest::prelude::*;
use rebucket_engine::{cluster_traces, distance, ClusterEngine, ClusterParams, DistanceParams, Trace};

// ============================================================================
// Strategies
// ============================================================================

/// Traces over a small alphabet so that shared frames are common.
fn trace_strategy(max_len: usize) -> impl Strategy<Value = Trace> {
  prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e"]), 0..max_len)
    .prop_map(Trace::from_names)
}

fn coefficient() -> impl Strategy<Value = f64> {
  0.0..3.0_f64
}

fn d(t1: &Trace, t2: &Trace, c: f64, o: f64) -> f64 {
  distance(&t1.frames, &t2.frames, DistanceParams::new(c, o))
}

// ============================================================================
// Distance properties
// ============================================================================

proptest! {
  #![proptest_config(ProptestConfig::with_cases(500))]

  #[test]
  fn self_distance_is_zero(t in trace_strategy(12), c in coefficient(), o in coefficient()) {
    prop_assume!(!t.is_empty());
    prop_assert!(d(&t, &t, c, o).abs() < 1e-9);
  }

  #[test]
  fn empty_side_is_one(t in trace_strategy(12), c in coefficient(), o in coefficient()) {
    let empty = Trace::default();
    prop_assert_eq!(d(&empty, &t, c, o), 1.0);
    prop_assert_eq!(d(&t, &empty, c, o), 1.0);
  }

  #[test]
  fn distance_is_symmetric(
    t1 in trace_strategy(12),
    t2 in trace_strategy(12),
    c in coefficient(),
    o in coefficient(),
  ) {
    prop_assert_eq!(d(&t1, &t2, c, o), d(&t2, &t1, c, o));
  }

  #[test]
  fn distance_in_unit_range(
    t1 in trace_strategy(12),
    t2 in trace_strategy(12),
    c in coefficient(),
    o in coefficient(),
  ) {
    let v = d(&t1, &t2, c, o);
    prop_assert!((-1e-9..=1.0 + 1e-9).contains(&v), "distance {} out of range", v);
  }
}

// ============================================================================
// Clustering properties
// ============================================================================

proptest! {
  #![proptest_config(ProptestConfig::with_cases(200))]

  #[test]
  fn clusters_partition_the_reports(
    traces in prop::collection::vec(trace_strategy(6), 0..10),
    threshold in 0.0..1.2_f64,
    c in coefficient(),
    o in coefficient(),
  ) {
    let clusters = cluster_traces(&traces, ClusterParams::new(threshold, c, o));
    let mut seen: Vec<usize> = clusters.iter().flat_map(|cl| cl.indices.iter().copied()).collect();
    seen.sort_unstable();
    prop_assert_eq!(seen, (0..traces.len()).collect::<Vec<_>>());
    prop_assert!(clusters.iter().all(|cl| !cl.is_empty()));
  }

  #[test]
  fn no_mergeable_pair_left_at_termination(
    traces in prop::collection::vec(trace_strategy(6), 0..10),
    threshold in 0.0..1.2_f64,
    c in coefficient(),
    o in coefficient(),
  ) {
    let params = ClusterParams::new(threshold, c, o);
    let outcome = ClusterEngine::new(&traces, params).run();
    prop_assert!(outcome.merges + outcome.clusters.len() == traces.len());

    for (n, a) in outcome.clusters.iter().enumerate() {
      for b in &outcome.clusters[n + 1..] {
        let linkage = a
          .indices
          .iter()
          .flat_map(|&i| b.indices.iter().map(move |&j| (i, j)))
          .map(|(i, j)| d(&traces[i], &traces[j], c, o))
          .fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(linkage >= threshold, "clusters at {} left unmerged under {}", linkage, threshold);
      }
    }
  }

  #[test]
  fn non_positive_threshold_keeps_singletons(
    traces in prop::collection::vec(trace_strategy(6), 0..10),
    threshold in -1.0..=0.0_f64,
  ) {
    let outcome = ClusterEngine::new(&traces, ClusterParams::new(threshold, 1.0, 1.0)).run();
    prop_assert_eq!(outcome.merges, 0);
    prop_assert_eq!(outcome.clusters.len(), traces.len());
  }
}
