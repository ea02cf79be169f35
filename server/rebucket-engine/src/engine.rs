//! Batch engine: collects normalized reports, clusters them, builds summaries.

use std::collections::{BTreeSet, HashSet};

use log::debug;

use crate::cache::DistanceCache;
use crate::cluster::{ClusterEngine, ClusterParams};
use crate::config::Config;
use crate::error::EngineError;
use crate::fingerprint;
use crate::normalize;
use crate::stats;
use crate::types::*;

/// The crash clustering engine. Holds the reports of one batch.
pub struct Engine {
  config: Config,
  reports: Vec<Report>,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self {
      config,
      reports: Vec::new(),
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  /// Normalize and queue a report.
  ///
  /// Returns the report's index in the batch.
  pub fn ingest(&mut self, raw: &InboundReport) -> Result<usize, EngineError> {
    let report = normalize::normalize(raw)?;
    debug!("ingested {} ({} frames)", report.id, report.trace.len());
    self.reports.push(report);
    Ok(self.reports.len() - 1)
  }

  pub fn len(&self) -> usize {
    self.reports.len()
  }

  pub fn is_empty(&self) -> bool {
    self.reports.is_empty()
  }

  /// Cluster every queued report and summarize the result.
  ///
  /// Summaries are sorted by size (largest first), then cluster id.
  pub fn finish(&self) -> Vec<ClusterSummary> {
    let params = ClusterParams::new(
      self.config.distance_threshold,
      self.config.recency_coefficient,
      self.config.offset_coefficient,
    );
    let outcome = ClusterEngine::new(&self.reports, params).run();

    let mut summaries: Vec<ClusterSummary> = outcome
      .clusters
      .into_iter()
      .map(|mut cluster| {
        cluster.indices.sort_unstable();
        self.assemble_summary(&cluster, &outcome.cache)
      })
      .collect();

    summaries.sort_by(|a, b| {
      b.size
        .cmp(&a.size)
        .then_with(|| a.cluster_id.cmp(&b.cluster_id))
    });
    summaries
  }

  fn assemble_summary(&self, cluster: &Cluster, cache: &DistanceCache) -> ClusterSummary {
    let members: Vec<&Report> = cluster.indices.iter().map(|&i| &self.reports[i]).collect();

    // Stable cluster ID: hash of the sorted member ids.
    let cluster_id = {
      let mut ids: Vec<&str> = members.iter().map(|r| r.id.as_str()).collect();
      ids.sort_unstable();
      let mut hasher = blake3::Hasher::new();
      for id in ids {
        hasher.update(id.as_bytes());
        hasher.update(b"\n");
      }
      let hex = hasher.finalize().to_hex();
      format!("clu-{}", &hex[..16])
    };

    let exception_types: Vec<String> = members
      .iter()
      .filter_map(|r| r.exception_type.clone())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();

    // Representative: the lowest-index member.
    let top_frames: Vec<String> = members
      .first()
      .map(|r| {
        r.trace
          .frames
          .iter()
          .take(self.config.summary_max_frames)
          .map(|f| f.name.clone())
          .collect()
      })
      .unwrap_or_default();

    let distinct_signatures = members
      .iter()
      .map(|r| fingerprint::compute(&r.trace, self.config.summary_max_frames))
      .collect::<HashSet<_>>()
      .len();

    let diameter = (stats::diameter(cluster, cache) * 10_000.0).round() / 10_000.0;
    let window = stats::seen_window(cluster, &self.reports);

    ClusterSummary {
      cluster_id,
      size: cluster.len(),
      members: members.iter().map(|r| r.id.clone()).collect(),
      indices: cluster.indices.clone(),
      exception_types,
      top_frames,
      distinct_signatures,
      diameter,
      first_seen: window.map(|(first, _)| first.to_rfc3339()),
      last_seen: window.map(|(_, last)| last.to_rfc3339()),
    }
  }
}
