//! Display protocol - intents handed to a presentation layer
//!
//! Grid mutations that a viewer should animate are published as a [`DisplayBatch`].
//! All intents in a batch happen logically at the same time. The controller accepts no
//! further mutating request until the batch is acknowledged with
//! [`GridController::resume`](crate::controller::GridController::resume).

use crate::tile::Tile;
use crate::types::Position;

/// Monotonic batch identifier
pub type BatchId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayIntent {
    /// `tile` now lives at `to`; it came from `from`
    ///
    /// For freshly generated tiles `from` lies past the grid edge. It is an entry hint
    /// for animation and is never range-checked.
    Move {
        tile: Tile,
        from: Position,
        to: Position,
    },
    /// `tile` was removed from `at`
    Destroy { tile: Tile, at: Position },
}

impl DisplayIntent {
    pub fn tile(&self) -> &Tile {
        match self {
            DisplayIntent::Move { tile, .. } | DisplayIntent::Destroy { tile, .. } => tile,
        }
    }

    /// Position the intent ends at
    pub fn target(&self) -> Position {
        match self {
            DisplayIntent::Move { to, .. } => *to,
            DisplayIntent::Destroy { at, .. } => *at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBatch {
    pub id: BatchId,
    pub intents: Vec<DisplayIntent>,
    /// Redraw the whole grid instead of animating intents
    pub full_redraw: bool,
}

/// Presentation collaborator
///
/// `present` returns once every effect of the batch has visually settled.
pub trait Display {
    fn present(&mut self, batch: &DisplayBatch);
}

/// Display that settles every batch immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn present(&mut self, _batch: &DisplayBatch) {}
}

/// Display that keeps every batch it was shown
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    pub batches: Vec<DisplayBatch>,
}

impl Display for RecordingDisplay {
    fn present(&mut self, batch: &DisplayBatch) {
        self.batches.push(batch.clone());
    }
}

impl RecordingDisplay {
    pub fn intents(&self) -> impl Iterator<Item = &DisplayIntent> {
        self.batches.iter().flat_map(|b| b.intents.iter())
    }
}
