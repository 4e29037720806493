//! Error taxonomy for grid operations
//!
//! Configuration errors mean the board cannot be used as configured and must reach the
//! caller. Usage errors are caller mistakes: the operation is refused without touching the
//! grid. "No match" and "no tile here" are never errors; they are ordinary return values.

use thiserror::Error;

use crate::display::BatchId;
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: u16, height: u16 },

    #[error("generator has no seeds to draw from")]
    NoSeeds,

    #[error("seed weight must be finite and positive (got {0})")]
    InvalidWeight(f32),

    #[error("sample {sample} is not covered by the cumulative weight table (max {max})")]
    WeightGap { sample: f32, max: f32 },

    #[error("generator produced an empty tile")]
    EmptyTile,

    #[error("tile kind {kind} has no capabilities")]
    MissingCapabilities { kind: u32 },

    #[error("scripted generator ran out of tiles")]
    GeneratorExhausted,

    #[error("no match-free tile for {position} after {attempts} attempts")]
    PlacementStarved { position: Position, attempts: u32 },

    #[error("position {0} is outside the grid")]
    OutOfRange(Position),

    #[error("display batch {0} has not been resumed yet")]
    BatchPending(BatchId),

    #[error("no display batch is pending")]
    NoBatchPending,

    #[error("resume for batch {got} but batch {expected} is pending")]
    StaleBatch { expected: BatchId, got: BatchId },
}

impl GridError {
    /// True for errors that make the board unusable as configured
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GridError::InvalidDimensions { .. }
                | GridError::NoSeeds
                | GridError::InvalidWeight(_)
                | GridError::WeightGap { .. }
                | GridError::EmptyTile
                | GridError::MissingCapabilities { .. }
                | GridError::GeneratorExhausted
                | GridError::PlacementStarved { .. }
        )
    }
}
