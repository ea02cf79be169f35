//! Binary entrypoint: read JSON lines from stdin, write JSON lines to stdout.
//!
//! Each input line is an InboundReport. Invalid lines produce an ErrorOutput
//! line immediately; once stdin is exhausted the whole batch is clustered and
//! one ClusterSummary line is written per cluster.

use clap::Parser;
use env_logger::Env;
use log::warn;
use rebucket_engine::types::ErrorOutput;
use rebucket_engine::{Config, Engine, EngineError, InboundReport};
use std::io::{self, BufRead, Write};

/// Cluster crash reports read as JSON lines from stdin.
#[derive(Parser, Debug)]
#[command(name = "rebucket-engine")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Merge clusters whose complete-linkage distance is below this
  #[arg(short = 't', long, env = "REBUCKET_THRESHOLD", default_value_t = 1.0)]
  threshold: f64,

  /// Recency coefficient (weight decay per frame of depth)
  #[arg(short = 'c', long, env = "REBUCKET_RECENCY", default_value_t = 1.0)]
  recency: f64,

  /// Offset coefficient (penalty per frame of misalignment)
  #[arg(short = 'o', long, env = "REBUCKET_OFFSET", default_value_t = 1.0)]
  offset: f64,

  /// Frames listed per cluster summary
  #[arg(long, default_value_t = 5)]
  max_frames: usize,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn config(&self) -> Config {
    Config {
      distance_threshold: self.threshold,
      recency_coefficient: self.recency,
      offset_coefficient: self.offset,
      summary_max_frames: self.max_frames,
    }
  }
}

fn error_output(e: &EngineError) -> ErrorOutput {
  let out = match e {
    EngineError::Validation { reason, .. } => ErrorOutput::new(reason.clone()),
    _ => ErrorOutput::new(e.to_string()),
  };
  match e.field() {
    Some(field) => out.with_field(field),
    None => out,
  }
}

fn main() {
  let cli = Cli::parse();
  let level = if cli.verbose { "info" } else { "warn" };
  env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

  let config = cli.config();
  if let Err(e) = config.validate() {
    let _ = writeln!(io::stderr(), "rebucket-engine: {}", e);
    std::process::exit(2);
  }

  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  let mut engine = Engine::new(config);

  for (n, line) in stdin.lock().lines().enumerate() {
    let line = match line {
      Ok(l) => l,
      Err(e) => {
        let _ = writeln!(io::stderr(), "rebucket-engine: read error: {}", e);
        std::process::exit(1);
      }
    };

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    let result = InboundReport::from_json(trimmed).and_then(|raw| engine.ingest(&raw));
    if let Err(e) = result {
      warn!("line {}: {}", n + 1, e);
      let err = error_output(&e).at_line(n + 1);
      let _ = serde_json::to_writer(&mut out, &err);
      let _ = writeln!(out);
    }
  }

  for summary in engine.finish() {
    let _ = serde_json::to_writer(&mut out, &summary);
    let _ = writeln!(out);
  }

  let _ = out.flush();
}
