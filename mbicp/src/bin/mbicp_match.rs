//! Scan pair matcher
//!
//! Matches the `current` scan of a YAML scan pair against its `reference`
//! scan and prints the estimated pose.
//!
//! Pair file format:
//!
//! ```yaml
//! initial_pose: { x: 0.0, y: 0.0, theta: 0.0 }
//! reference:
//!   unit_factor: 1.0
//!   samples:
//!     - { range: 2.31, bearing: -1.5708 }
//!     - { range: 2.29, bearing: -1.5533, valid: false }
//! current:
//!   samples:
//!     - { range: 2.35, bearing: -1.5708 }
//! ```
//!
//! Usage:
//!   cargo run --bin mbicp_match -- --pair scans/pair.yaml
//!   cargo run --bin mbicp_match -- -p scans/pair.yaml -c configs/mbicp.yaml --trace
//!   RUST_LOG=trace cargo run --bin mbicp_match -- -p scans/pair.yaml

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use serde::Deserialize;

use mbicp::{MatchResult, MbIcpConfig, MbIcpMatcher, Pose2D, RangeScan};

/// Match two laser scans with metric-based ICP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scan pair YAML file
    #[arg(short, long)]
    pair: PathBuf,

    /// Matcher configuration file (defaults are used if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print per-iteration statistics
    #[arg(short, long)]
    trace: bool,
}

/// Two scans and the starting estimate of the current scan's pose.
#[derive(Debug, Deserialize)]
struct ScanPair {
    reference: RangeScan,
    current: RangeScan,
    #[serde(default)]
    initial_pose: Pose2D,
}

impl ScanPair {
    fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MbIcpConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => MbIcpConfig::default(),
    };
    let config = config.with_trace(args.trace);

    let pair = ScanPair::load(&args.pair).unwrap_or_else(|e| {
        eprintln!("Failed to load scan pair {}: {}", args.pair.display(), e);
        process::exit(1);
    });

    println!(
        "Reference: {} samples ({} valid), current: {} samples ({} valid)",
        pair.reference.len(),
        pair.reference.valid_count(),
        pair.current.len(),
        pair.current.valid_count()
    );

    let matcher = MbIcpMatcher::new(config);
    let result = matcher
        .match_scans(&pair.reference, &pair.current, pair.initial_pose)
        .unwrap_or_else(|e| {
            eprintln!("Invalid input: {}", e);
            process::exit(1);
        });

    print_result(&result);
}

fn print_result(result: &MatchResult) {
    if !result.trace.is_empty() {
        println!();
        println!(
            "{:>5} {:>14} {:>10} {:>10} {:>10} {:>10} {:>6} {:>6} {:>12} {:>6}",
            "iter", "residual", "ratio", "dx", "dy", "dθ", "streak", "corr", "mean dist", "empty"
        );
        for s in &result.trace {
            println!(
                "{:>5} {:>14.6e} {:>10.6} {:>10.6} {:>10.6} {:>10.6} {:>6} {:>6} {:>12.4e} {:>6}",
                s.iteration,
                s.residual,
                s.ratio,
                s.increment.x,
                s.increment.y,
                s.increment.theta,
                s.converged_streak,
                s.correspondences,
                s.mean_distance,
                s.empty_windows
            );
        }
    }

    println!();
    println!("Status:       {}", result.status);
    println!(
        "Initial pose: ({:.4}, {:.4}, {:.2}°)",
        result.initial_pose.x,
        result.initial_pose.y,
        result.initial_pose.theta.to_degrees()
    );
    println!(
        "Final pose:   ({:.4}, {:.4}, {:.2}°)",
        result.pose.x,
        result.pose.y,
        result.pose.theta.to_degrees()
    );
    println!("Iterations:   {}", result.iterations);
    println!("Elapsed:      {:.3}ms", result.elapsed_seconds() * 1000.0);
    println!(
        "Matched:      {:.1}% ({} correspondences kept)",
        result.match_ratio * 100.0,
        result.correspondences
    );
}
