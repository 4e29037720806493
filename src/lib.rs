//! Match-3 grid engine (workspace facade crate).
//!
//! Re-exports the `match_grid::{core,types}` public API; the implementation lives in
//! dedicated crates under `crates/`. The [`sim`] module drives a headless game.

pub use match_grid_core as core;
pub use match_grid_types as types;

pub mod sim;
