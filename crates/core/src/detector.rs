//! Match detection - pure run scanning
//!
//! From a pivot position, count contiguous same-kind tiles in each of the four axis
//! directions. A horizontal run (left + right + 1) or vertical run (up + down + 1) of at
//! least [`MIN_RUN`] qualifies; both axes are evaluated independently, so a pivot at the
//! crossing of two runs reports both with `combo_delta = 2`.
//!
//! Detection only reads the grid.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{Position, MIN_RUN};

/// Result of a detection call
///
/// `combo_delta > 0` iff `affected` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    pub affected: BTreeSet<Position>,
    pub combo_delta: u32,
}

impl MatchOutcome {
    /// No match
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        self.combo_delta > 0 && !self.affected.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Unit step toward the negative end of the axis
    fn step(self) -> (i32, i32) {
        match self {
            Axis::Horizontal => (-1, 0),
            Axis::Vertical => (0, -1),
        }
    }
}

/// A qualifying run through a pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub axis: Axis,
    /// First cell of the run (smallest coordinate on the axis)
    pub start: Position,
    pub len: usize,
}

impl Run {
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let (dx, dy) = self.axis.step();
        (0..self.len as i32).map(move |i| self.start.offset(-dx * i, -dy * i))
    }
}

/// Count same-kind tiles from `from` (exclusive) stepping by `(dx, dy)`
fn count_same(grid: &Grid, from: Position, (dx, dy): (i32, i32), kind: u32) -> usize {
    let mut n = 0;
    let mut p = from.offset(dx, dy);
    while let Some(tile) = grid.get_at(p) {
        if tile.kind != kind {
            break;
        }
        n += 1;
        p = p.offset(dx, dy);
    }
    n
}

/// Qualifying runs through `at`, horizontal first
pub fn runs(grid: &Grid, at: Position) -> ArrayVec<Run, 2> {
    let mut out = ArrayVec::new();
    let Some(pivot) = grid.get_at(at) else {
        return out;
    };
    if pivot.is_empty() {
        return out;
    }

    for axis in [Axis::Horizontal, Axis::Vertical] {
        let (dx, dy) = axis.step();
        let back = count_same(grid, at, (dx, dy), pivot.kind);
        let fwd = count_same(grid, at, (-dx, -dy), pivot.kind);
        let len = back + fwd + 1;
        if len >= MIN_RUN {
            out.push(Run {
                axis,
                start: at.offset(dx * back as i32, dy * back as i32),
                len,
            });
        }
    }
    out
}

/// Positions eliminated together with the tile at `at`
pub fn detect(grid: &Grid, at: Position) -> MatchOutcome {
    let found = runs(grid, at);
    if found.is_empty() {
        return MatchOutcome::none();
    }

    let mut affected: BTreeSet<Position> = found.iter().flat_map(|r| r.positions()).collect();
    affected.insert(at);
    MatchOutcome {
        affected,
        combo_delta: found.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(points: &[(i32, i32)]) -> BTreeSet<Position> {
        points.iter().map(|&p| Position::from(p)).collect()
    }

    #[test]
    fn no_run_below_three() {
        let grid = Grid::from_rows(&[&[1, 1, 2], &[2, 3, 1]]).unwrap();
        assert_eq!(detect(&grid, Position::new(0, 0)), MatchOutcome::none());
        assert!(runs(&grid, Position::new(1, 0)).is_empty());
    }

    #[test]
    fn horizontal_run_from_each_member() {
        let grid = Grid::from_rows(&[&[4, 1, 1, 1, 4]]).unwrap();
        for x in 1..=3 {
            let outcome = detect(&grid, Position::new(x, 0));
            assert_eq!(outcome.affected, set(&[(1, 0), (2, 0), (3, 0)]));
            assert_eq!(outcome.combo_delta, 1);
        }
        assert_eq!(detect(&grid, Position::new(0, 0)), MatchOutcome::none());
    }

    #[test]
    fn run_geometry() {
        let grid = Grid::from_rows(&[&[2], &[5], &[5], &[5], &[5]]).unwrap();
        let found = runs(&grid, Position::new(0, 3));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].axis, Axis::Vertical);
        assert_eq!(found[0].start, Position::new(0, 1));
        assert_eq!(found[0].len, 4);
    }

    #[test]
    fn cross_counts_both_axes_once() {
        let grid = Grid::from_rows(&[&[0, 7, 0], &[7, 7, 7], &[0, 7, 0]]).unwrap();
        let outcome = detect(&grid, Position::new(1, 1));
        assert_eq!(outcome.combo_delta, 2);
        assert_eq!(
            outcome.affected,
            set(&[(0, 1), (1, 1), (2, 1), (1, 0), (1, 2)])
        );
    }

    #[test]
    fn empty_cells_never_match() {
        let grid = Grid::from_rows(&[&[0, 0, 0], &[1, 2, 3]]).unwrap();
        assert!(!detect(&grid, Position::new(1, 0)).is_match());
        assert!(!detect(&grid, Position::new(5, 5)).is_match());
    }
}
