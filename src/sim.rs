//! Headless simulation driver
//!
//! Plays random adjacent swaps on a seeded board and reports the outcome. Every cascade
//! is driven through the display protocol with a [`LogDisplay`], so a run with
//! `RUST_LOG=debug` shows each batch as it would be animated.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::{
    Display, DisplayBatch, DisplayIntent, GridConfig, GridController, GridEvent, GridSnapshot,
    SimpleRng, WeightedGenerator,
};
use crate::types::{Direction, Position, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Simulation settings
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub seed: u32,
    pub width: u16,
    pub height: u16,
    /// Number of distinct tile kinds
    pub kinds: u32,
    /// Swap attempts to play
    pub moves: u32,
    pub fill_direction: Direction,
    /// Print the final snapshot as JSON
    pub json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            kinds: 5,
            moves: 50,
            fill_direction: Direction::Up,
            json: false,
        }
    }
}

impl SimConfig {
    /// Create from `MATCH_GRID_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(v) = get("MATCH_GRID_SEED") {
            config.seed = v.parse().with_context(|| format!("MATCH_GRID_SEED={v}"))?;
        }
        if let Some(v) = get("MATCH_GRID_WIDTH") {
            config.width = v.parse().with_context(|| format!("MATCH_GRID_WIDTH={v}"))?;
        }
        if let Some(v) = get("MATCH_GRID_HEIGHT") {
            config.height = v.parse().with_context(|| format!("MATCH_GRID_HEIGHT={v}"))?;
        }
        if let Some(v) = get("MATCH_GRID_KINDS") {
            config.kinds = v.parse().with_context(|| format!("MATCH_GRID_KINDS={v}"))?;
        }
        if let Some(v) = get("MATCH_GRID_MOVES") {
            config.moves = v.parse().with_context(|| format!("MATCH_GRID_MOVES={v}"))?;
        }
        if let Some(v) = get("MATCH_GRID_FILL") {
            config.fill_direction = Direction::from_str(&v)
                .ok_or_else(|| anyhow!("MATCH_GRID_FILL={v}: expected up, down, left or right"))?;
        }
        if let Some(v) = get("MATCH_GRID_JSON") {
            config.json = v == "1" || v.eq_ignore_ascii_case("true");
        }
        Ok(config)
    }

    pub fn grid_config(&self) -> GridConfig {
        GridConfig::new(self.width, self.height).with_fill_direction(self.fill_direction)
    }
}

/// Display that writes every intent to the log
#[derive(Debug, Default)]
pub struct LogDisplay {
    pub batches: usize,
}

impl Display for LogDisplay {
    fn present(&mut self, batch: &DisplayBatch) {
        self.batches += 1;
        if batch.full_redraw {
            debug!(batch = batch.id, "redraw board");
        }
        for intent in &batch.intents {
            match intent {
                DisplayIntent::Move { tile, from, to } => {
                    debug!(batch = batch.id, kind = tile.kind, from = %from, to = %to, "move");
                }
                DisplayIntent::Destroy { tile, at } => {
                    debug!(batch = batch.id, kind = tile.kind, at = %at, "destroy");
                }
            }
        }
    }
}

/// Outcome of a simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub moves: u32,
    /// Swaps that destroyed at least one tile
    pub scoring_moves: u32,
    pub best_combo: u32,
    pub batches: usize,
    pub snapshot: GridSnapshot,
}

pub fn run(config: &SimConfig) -> Result<SimReport> {
    let generator = WeightedGenerator::uniform(config.kinds, config.seed)
        .context("building tile generator")?;
    let mut controller = GridController::new(config.grid_config(), generator)
        .context("creating grid controller")?;
    controller.initialize().context("initializing board")?;

    let mut display = LogDisplay::default();
    controller.run_until_idle(&mut display)?;

    let mut rng = SimpleRng::new(config.seed.wrapping_add(1));
    let (w, h) = (u32::from(config.width), u32::from(config.height));
    let mut scoring_moves = 0;
    let mut best_combo = 0;

    for _ in 0..config.moves {
        let a = Position::new(rng.next_range(w) as i32, rng.next_range(h) as i32);
        let b = match Direction::ALL[rng.next_range(4) as usize] {
            Direction::Up => a.offset(0, -1),
            Direction::Down => a.offset(0, 1),
            Direction::Left => a.offset(-1, 0),
            Direction::Right => a.offset(1, 0),
        };
        if !controller.grid().contains(b) {
            continue;
        }

        controller.move_cursor(a)?;
        controller.move_cursor(b)?;
        controller.run_until_idle(&mut display)?;

        let scored = controller
            .drain_events()
            .iter()
            .any(|e| matches!(e, GridEvent::ScoreAdded { .. }));
        if scored {
            scoring_moves += 1;
            best_combo = best_combo.max(controller.combo());
        }
    }

    let snapshot = controller.snapshot();
    let batches = display.batches;
    info!(
        score = snapshot.score,
        scoring_moves,
        best_combo,
        batches,
        "simulation finished"
    );
    Ok(SimReport {
        moves: config.moves,
        scoring_moves,
        best_combo,
        batches: display.batches,
        snapshot,
    })
}
