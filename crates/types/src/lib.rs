//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no required dependencies, so they can be used by the
//! grid logic, a presentation layer, or an input layer alike.
//!
//! # Coordinates
//!
//! Positions are signed `(x, y)` pairs. `x` grows to the right and `y` grows along the
//! column axis. The distinguished value `(-1, -1)` ([`Position::NONE`]) means
//! "no position"; every coordinate-consuming operation treats it as absent.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 9 | Default grid columns |
//! | `DEFAULT_HEIGHT` | 9 | Default grid rows |
//! | `MIN_RUN` | 3 | Shortest run that counts as a match |
//! | `EMPTY_KIND` | 0 | Reserved kind of the empty tile |
//! | `NORMAL_TILE_VALUE` | 10.0 | Score of a standard tile |
//! | `DEFAULT_PLACEMENT_ATTEMPTS` | 1000 | Retry bound per cell during board setup |
//!
//! # Examples
//!
//! ```
//! use match_grid_types::{Direction, Position};
//!
//! let a = Position::new(3, 4);
//! assert!(a.is_adjacent(Position::new(3, 5)));
//! assert!(!a.is_adjacent(Position::new(4, 5)));
//! assert!(Position::NONE.is_none());
//!
//! assert_eq!(Direction::from_str("Left"), Some(Direction::Left));
//! assert_eq!(Direction::Up.as_str(), "up");
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default grid width in cells (9 columns)
pub const DEFAULT_WIDTH: u16 = 9;

/// Default grid height in cells (9 rows)
pub const DEFAULT_HEIGHT: u16 = 9;

/// Minimum length of a same-kind run that is eliminated
pub const MIN_RUN: usize = 3;

/// Kind value reserved for the empty tile
pub const EMPTY_KIND: u32 = 0;

/// Score granted by a standard tile
pub const NORMAL_TILE_VALUE: f32 = 10.0;

/// Default number of generator draws allowed per cell while setting up a board
pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// The "no position" sentinel `(-1, -1)`
    pub const NONE: Position = Position { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True for the `(-1, -1)` sentinel
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Position shifted by `(dx, dy)`
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Orthogonal adjacency: distance exactly 1 on one axis and 0 on the other
    ///
    /// # Examples
    ///
    /// ```
    /// use match_grid_types::Position;
    ///
    /// let p = Position::new(0, 0);
    /// assert!(p.is_adjacent(Position::new(1, 0)));
    /// assert!(!p.is_adjacent(Position::new(1, 1)));
    /// assert!(!p.is_adjacent(p));
    /// ```
    pub fn is_adjacent(&self, other: Position) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx == 1 && dy == 0) || (dx == 0 && dy == 1)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Refill direction: the side new tiles enter from
///
/// Remaining tiles slide toward the opposite edge.
/// - **Up**: tiles settle toward `y = 0`, new tiles enter past `y = height - 1`
/// - **Down**: tiles settle toward `y = height - 1`, new tiles enter before `y = 0`
/// - **Left**: tiles settle toward `x = width - 1`, new tiles enter before `x = 0`
/// - **Right**: tiles settle toward `x = 0`, new tiles enter past `x = width - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d", "left" | "l",
    /// "right" | "r"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// True when lines are columns (Up/Down), false when lines are rows
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Cursor operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CursorOp {
    /// A new position was selected
    Confirm,
    /// The selection was cleared
    Cancel,
}

/// Cursor event delivered to a tile's select hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CursorEvent {
    pub op: CursorOp,
    /// Position the cursor was moved to
    pub target: Position,
    /// Selection held before this event, `Position::NONE` if there was none
    pub previous: Position,
}

impl CursorEvent {
    /// The previous selection, if any
    pub fn previous_selection(&self) -> Option<Position> {
        (!self.previous.is_none()).then_some(self.previous)
    }
}

/// Decision returned by a tile's destroy hook
///
/// - **Confirm**: remove the tile and apply its score
/// - **Cancel**: remove nothing, score nothing
/// - **PassThrough**: apply score but leave the tile in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Decision {
    Confirm,
    Cancel,
    PassThrough,
}
