//! Rebucket crash clustering engine — deterministic duplicate-crash grouping.
//!
//! Scores pairs of stack traces with a position-weighted alignment (frames
//! near the crash point weigh more, misaligned matches are discounted), then
//! greedily merges reports into complete-linkage clusters under a distance
//! threshold, and emits structured ClusterSummary JSON.
//!
//! No DB, no network; pure computation + in-memory state per batch.

pub mod cache;
pub mod cluster;
pub mod config;
pub mod distance;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod normalize;
pub mod stats;
pub mod types;

pub use cache::DistanceCache;
pub use cluster::{cluster_traces, ClusterEngine, ClusterOutcome, ClusterParams};
pub use config::Config;
pub use distance::{distance, DistanceParams};
pub use engine::Engine;
pub use error::EngineError;
pub use types::{Cluster, ClusterSummary, InboundFrame, InboundReport, StackFrame, Trace};
