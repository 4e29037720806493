//! Headless match-3 runner (default binary).
//!
//! Builds a seeded board, plays random swaps, and prints the final board.
//! Settings come from `MATCH_GRID_*` environment variables; logging from `RUST_LOG`.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use match_grid::sim::{self, SimConfig};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env().context("reading MATCH_GRID_* settings")?;
    let report = sim::run(&config)?;

    if config.json {
        let json = serde_json::to_string_pretty(&report).context("encoding report")?;
        println!("{json}");
    } else {
        println!("{}", report.snapshot);
        println!(
            "moves {} scoring {} best combo {} batches {}",
            report.moves, report.scoring_moves, report.best_combo, report.batches
        );
    }
    Ok(())
}
