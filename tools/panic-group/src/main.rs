//! panic-group: cluster a directory of Go panic dumps by stack similarity
//!
//! Usage:
//!   panic-group -d <dir>            # print clusters with their files
//!   panic-group -d <dir> --json     # one ClusterSummary JSON line per cluster
//!
//! Files that cannot be read or do not parse as a panic are skipped with a
//! warning on stderr.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use rebucket_engine::types::ClusterSummary;
use rebucket_engine::{Config, Engine, InboundFrame, InboundReport};

mod gopanic;

/// Group Go panic dumps into duplicate-crash clusters
#[derive(Parser, Debug)]
#[command(name = "panic-group")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory containing stack traces
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Merge clusters whose complete-linkage distance is below this
    #[arg(short = 't', long, env = "REBUCKET_THRESHOLD", default_value_t = 1.0)]
    threshold: f64,

    /// Recency coefficient (weight decay per frame of depth)
    #[arg(short = 'c', long, env = "REBUCKET_RECENCY", default_value_t = 1.0)]
    recency: f64,

    /// Offset coefficient (penalty per frame of misalignment)
    #[arg(short = 'o', long, env = "REBUCKET_OFFSET", default_value_t = 1.0)]
    offset: f64,

    /// Print ClusterSummary JSON lines instead of the plain listing
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Read and parse every regular file in `dir`, in file-name order.
fn load_reports(dir: &Path) -> Result<Vec<InboundReport>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("cannot list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut reports = Vec::new();
    for path in paths {
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                warn!("error reading {}: {}", path.display(), e);
                continue;
            }
        };
        let parsed = match gopanic::parse(&text) {
            Ok(p) => p,
            Err(e) => {
                warn!("error parsing panic {}: {}", path.display(), e);
                continue;
            }
        };
        reports.push(InboundReport {
            id: path.display().to_string(),
            timestamp: None,
            exception_type: None,
            message: Some(parsed.message),
            stacktrace: parsed
                .frames
                .into_iter()
                .map(|f| InboundFrame {
                    function: Some(f.function),
                    file: Some(f.file),
                    line: f.line,
                })
                .collect(),
        });
    }
    Ok(reports)
}

fn cluster_dir(dir: &Path, config: Config) -> Result<Vec<ClusterSummary>> {
    config.validate()?;
    let reports = load_reports(dir)?;
    info!("loaded {} panics from {}", reports.len(), dir.display());

    let mut engine = Engine::new(config);
    for raw in &reports {
        if let Err(e) = engine.ingest(raw) {
            warn!("skipping {}: {}", raw.id, e);
        }
    }
    Ok(engine.finish())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    // The coefficients are uncalibrated; a tagged corpus would be needed to fit them.
    let config = Config {
        distance_threshold: cli.threshold,
        recency_coefficient: cli.recency,
        offset_coefficient: cli.offset,
        ..Config::default()
    };
    let summaries = cluster_dir(&cli.dir, config)?;

    if cli.json {
        for summary in &summaries {
            println!("{}", serde_json::to_string(summary)?);
        }
        return Ok(());
    }

    for (i, summary) in summaries.iter().enumerate() {
        println!("cluster {}", i);
        for member in &summary.members {
            println!("\t{}", member);
        }
        println!();
    }
    Ok(())
}
