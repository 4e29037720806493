//! Grid snapshot - plain-data observation of a controller
//!
//! Kinds are stored row-major (`kinds[y * width + x]`, 0 = empty). The text rendering
//! prints one row per line with `*` after the selected cell, then the score line.

use std::fmt;

use serde::Serialize;

use crate::display::BatchId;
use crate::types::Position;

/// Plain-data view of a controller, for viewers and logs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub width: i32,
    pub height: i32,
    /// Tile kinds, row-major (`y * width + x`), 0 = empty
    pub kinds: Vec<u32>,
    pub cursor: Option<Position>,
    pub score: f32,
    pub combo: u32,
    pub pending_batch: Option<BatchId>,
}

impl GridSnapshot {
    pub fn kind_at(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.kinds.get((y * self.width + x) as usize).copied()
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let marker = if self.cursor == Some(Position::new(x, y)) { '*' } else { ' ' };
                match self.kind_at(x, y) {
                    Some(0) | None => write!(f, " .{marker}")?,
                    Some(kind) => write!(f, "{kind:>2}{marker}")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "score {} combo {}", self.score, self.combo)
    }
}
