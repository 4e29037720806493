//! Tile module - grid occupants and their capabilities
//!
//! A tile carries an identity (`kind`), a score `value`, its current `position`, and a
//! [`Behavior`] that answers the three capability hooks:
//!
//! - [`Tile::on_select`]: what to do when the cursor operates on it
//! - [`Tile::on_match`]: which positions would be eliminated together with it
//! - [`Tile::on_destroy`]: whether removal is confirmed, and what else it takes along
//!
//! A behavior is a composition of three small rule enums, so archetypes mix and match the
//! same way: a row-clearing tile is a standard tile whose destroy rule is
//! [`DestroyRule::ClearRow`]. The empty tile (kind 0) has no behavior; any other tile
//! without one is a configuration error.

use std::collections::BTreeSet;

use crate::detector::{self, MatchOutcome};
use crate::error::GridError;
use crate::grid::Grid;
use crate::types::{CursorEvent, CursorOp, Decision, Position, EMPTY_KIND, NORMAL_TILE_VALUE};

/// How a tile reacts to cursor events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectRule {
    /// Swap with an adjacent selection; swap back if nothing matches
    #[default]
    SwapOrRevert,
    /// Swap with an adjacent selection and keep the swap regardless
    SwapNoRevert,
}

/// How a tile detects matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DetectRule {
    /// Straight runs of at least `MIN_RUN` same-kind tiles through the tile
    #[default]
    Runs,
    /// Never reports a match from its own position
    Inert,
}

impl DetectRule {
    /// Label used to compare match events
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectRule::Runs => "run3",
            DetectRule::Inert => "none",
        }
    }
}

/// What happens when a tile is destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DestroyRule {
    /// Removed on its own
    #[default]
    Single,
    /// Removed and takes its whole row along
    ClearRow,
    /// Removed and takes its whole column along
    ClearColumn,
    /// Removed and takes every in-grid cell within `radius` (Chebyshev) along, itself included
    Area { radius: u8 },
    /// Refuses destruction: no removal, no score
    Shielded,
    /// Grants its score but stays in the grid
    ScoreOnly,
}

/// A tile's capability set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Behavior {
    pub select: SelectRule,
    pub detect: DetectRule,
    pub destroy: DestroyRule,
}

impl Behavior {
    /// Swap-or-revert, run detection, single destruction
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn with_select(mut self, select: SelectRule) -> Self {
        self.select = select;
        self
    }

    pub fn with_detect(mut self, detect: DetectRule) -> Self {
        self.detect = detect;
        self
    }

    pub fn with_destroy(mut self, destroy: DestroyRule) -> Self {
        self.destroy = destroy;
        self
    }
}

/// Request produced by a select hook, carried out by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAction {
    Ignore,
    Swap {
        a: Position,
        b: Position,
        revert_on_miss: bool,
    },
}

/// Answer of a destroy hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyOutcome {
    pub decision: Decision,
    /// Further positions to destroy alongside this tile
    pub chained: Option<BTreeSet<Position>>,
}

impl DestroyOutcome {
    pub fn confirm() -> Self {
        Self {
            decision: Decision::Confirm,
            chained: None,
        }
    }

    pub fn cancel() -> Self {
        Self {
            decision: Decision::Cancel,
            chained: None,
        }
    }

    pub fn pass_through() -> Self {
        Self {
            decision: Decision::PassThrough,
            chained: None,
        }
    }

    pub fn confirm_with(chained: BTreeSet<Position>) -> Self {
        Self {
            decision: Decision::Confirm,
            chained: Some(chained),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub kind: u32,
    pub value: f32,
    pub position: Position,
    pub behavior: Option<Behavior>,
}

impl Tile {
    /// The empty tile
    pub fn empty() -> Self {
        Self::empty_at(Position::NONE)
    }

    pub(crate) fn empty_at(position: Position) -> Self {
        Self {
            kind: EMPTY_KIND,
            value: 0.0,
            position,
            behavior: None,
        }
    }

    /// A standard matchable tile of the given kind
    pub fn normal(kind: u32) -> Self {
        Self::new(kind, NORMAL_TILE_VALUE, Behavior::standard())
    }

    pub fn new(kind: u32, value: f32, behavior: Behavior) -> Self {
        Self {
            kind,
            value,
            position: Position::NONE,
            behavior: Some(behavior),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == EMPTY_KIND
    }

    /// Label of the tile's detection policy (`"none"` without one)
    pub fn match_kind(&self) -> &'static str {
        self.behavior
            .map(|b| b.detect.as_str())
            .unwrap_or(DetectRule::Inert.as_str())
    }

    /// Check that a non-empty tile carries its capability set
    pub fn validate(&self) -> Result<(), GridError> {
        if self.is_empty() {
            return Err(GridError::EmptyTile);
        }
        if self.behavior.is_none() {
            return Err(GridError::MissingCapabilities { kind: self.kind });
        }
        Ok(())
    }

    /// Select hook
    pub fn on_select(&self, event: &CursorEvent) -> SelectAction {
        let Some(behavior) = self.behavior else {
            return SelectAction::Ignore;
        };
        if event.op == CursorOp::Cancel {
            return SelectAction::Ignore;
        }
        let Some(previous) = event.previous_selection() else {
            return SelectAction::Ignore;
        };
        if !previous.is_adjacent(event.target) {
            return SelectAction::Ignore;
        }
        SelectAction::Swap {
            a: event.target,
            b: previous,
            revert_on_miss: behavior.select == SelectRule::SwapOrRevert,
        }
    }

    /// Match hook, evaluated at the tile's current position
    pub fn on_match(&self, grid: &Grid) -> MatchOutcome {
        match self.behavior.map(|b| b.detect) {
            Some(DetectRule::Runs) => detector::detect(grid, self.position),
            Some(DetectRule::Inert) | None => MatchOutcome::none(),
        }
    }

    /// Destroy hook
    pub fn on_destroy(&self, grid: &Grid) -> DestroyOutcome {
        let Some(behavior) = self.behavior else {
            return DestroyOutcome::cancel();
        };
        let Position { x, y } = self.position;
        match behavior.destroy {
            DestroyRule::Single => DestroyOutcome::confirm(),
            DestroyRule::ClearRow => DestroyOutcome::confirm_with(
                (0..grid.width()).map(|cx| Position::new(cx, y)).collect(),
            ),
            DestroyRule::ClearColumn => DestroyOutcome::confirm_with(
                (0..grid.height()).map(|cy| Position::new(x, cy)).collect(),
            ),
            DestroyRule::Area { radius } => {
                let r = i32::from(radius);
                let area = (-r..=r)
                    .flat_map(|dy| (-r..=r).map(move |dx| Position::new(x + dx, y + dy)))
                    .filter(|p| grid.contains(*p))
                    .collect();
                DestroyOutcome::confirm_with(area)
            }
            DestroyRule::Shielded => DestroyOutcome::cancel(),
            DestroyRule::ScoreOnly => DestroyOutcome::pass_through(),
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::empty()
    }
}
