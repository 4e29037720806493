//! Core grid logic - pure, deterministic, and testable
//!
//! This crate holds the rules of a match-3 board: storage, run detection, combo
//! bookkeeping, chained destruction, gravity with refill, and the controller that
//! sequences them. It performs no I/O; presentation is reached only through
//! [`DisplayBatch`]es the caller takes and acknowledges.
//!
//! # Module Structure
//!
//! - [`grid`]: width x height tile storage with range-checked access
//! - [`tile`]: tile data and its select / match / destroy behavior
//! - [`detector`]: horizontal and vertical run detection around a pivot
//! - [`ledger`]: per-pass match event log with combo deduplication
//! - [`resolver`]: FIFO destruction with chained targets, run to a fixed point
//! - [`fill`]: gravity compaction and refill from one of four sides
//! - [`generator`]: weighted and scripted tile sources
//! - [`controller`]: cursor state machine and check / destroy / fill sequencing
//! - [`display`]: display intents, batches and the presentation trait
//!
//! # Rules
//!
//! - **Runs**: three or more equal kinds in a row or column match; each run found from a
//!   check point adds one to the combo
//! - **Swap**: selecting two adjacent tiles swaps them; if neither forms a run they swap back
//! - **Cascade**: destroyed cells are refilled, and refilled lines are checked again until
//!   nothing matches
//! - **Setup**: a new board never starts with a run
//!
//! # Example
//!
//! ```
//! use match_grid_core::{Grid, GridController, NullDisplay, ScriptedGenerator, Tile};
//! use match_grid_core::types::Position;
//!
//! let grid = Grid::from_rows(&[&[1, 2, 1], &[2, 1, 2], &[3, 4, 3]]).unwrap();
//! let refill = ScriptedGenerator::cycle((5..=10).map(Tile::normal));
//! let mut controller = GridController::with_grid(grid, refill).unwrap();
//!
//! // Select two adjacent tiles; the swap completes both top rows
//! controller.move_cursor(Position::new(1, 0)).unwrap();
//! controller.move_cursor(Position::new(1, 1)).unwrap();
//!
//! // Swap, destroy and refill each publish one batch
//! let shown = controller.run_until_idle(&mut NullDisplay).unwrap();
//! assert_eq!(shown, 3);
//! assert_eq!(controller.score(), 60.0);
//! assert_eq!(controller.combo(), 2);
//! assert_eq!(controller.grid().to_rows()[0], vec![3, 4, 3]);
//! ```

pub mod config;
pub mod controller;
pub mod detector;
pub mod display;
pub mod error;
pub mod fill;
pub mod generator;
pub mod grid;
pub mod ledger;
pub mod resolver;
pub mod snapshot;
pub mod tile;

pub use match_grid_types as types;

pub use config::GridConfig;
pub use controller::{GridController, GridEvent};
pub use detector::MatchOutcome;
pub use display::{BatchId, Display, DisplayBatch, DisplayIntent, NullDisplay, RecordingDisplay};
pub use error::GridError;
pub use generator::{ScriptedGenerator, SimpleRng, TileGenerator, WeightedGenerator};
pub use grid::Grid;
pub use ledger::{ComboLedger, MatchEvent};
pub use resolver::Resolution;
pub use snapshot::GridSnapshot;
pub use tile::{Behavior, DestroyRule, DetectRule, SelectRule, Tile};
