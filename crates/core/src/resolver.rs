//! Destruction resolver - runs destroy hooks to a fixed point
//!
//! Seeds a FIFO queue with the positions to destroy and drains it completely. Each
//! position is processed at most once per resolution; a confirmed tile may request more
//! positions (chained destruction), which are queued only if they have not been
//! processed yet. Cyclic or self-referencing chains therefore terminate.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::display::DisplayIntent;
use crate::grid::Grid;
use crate::types::{Decision, Position};

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub score: f32,
    /// Removed positions, in processing order
    pub destroyed: Vec<Position>,
    /// Scored but left in place
    pub passed: Vec<Position>,
    /// Refused destruction
    pub cancelled: Vec<Position>,
    pub intents: Vec<DisplayIntent>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.destroyed.is_empty() && self.passed.is_empty() && self.cancelled.is_empty()
    }
}

/// Destroy `seeds` and everything they chain into
pub fn resolve<I>(grid: &mut Grid, seeds: I) -> Resolution
where
    I: IntoIterator<Item = Position>,
{
    let mut out = Resolution::default();
    let mut queue = VecDeque::new();
    let mut queued = HashSet::new();
    let mut processed = HashSet::new();

    for p in seeds {
        if queued.insert(p) {
            queue.push_back(p);
        }
    }

    while let Some(p) = queue.pop_front() {
        if !processed.insert(p) {
            continue;
        }
        let Some(tile) = grid.get_at(p) else {
            debug!(position = %p, "destroy target outside grid");
            continue;
        };
        if tile.is_empty() {
            continue;
        }

        let outcome = tile.on_destroy(grid);
        match outcome.decision {
            Decision::Cancel => out.cancelled.push(p),
            Decision::PassThrough => {
                out.score += tile.value;
                out.passed.push(p);
            }
            Decision::Confirm => {
                out.score += tile.value;
                for c in outcome.chained.into_iter().flatten() {
                    if !processed.contains(&c) && queued.insert(c) {
                        debug!(from = %p, to = %c, "chained destruction");
                        queue.push_back(c);
                    }
                }
                if let Some(tile) = grid.take(p) {
                    out.intents.push(DisplayIntent::Destroy { tile, at: p });
                }
                out.destroyed.push(p);
            }
        }
    }

    debug!(
        destroyed = out.destroyed.len(),
        passed = out.passed.len(),
        cancelled = out.cancelled.len(),
        score = out.score,
        "resolution settled"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Behavior, DestroyRule, Tile};

    fn special(kind: u32, rule: DestroyRule) -> Tile {
        Tile::new(kind, 10.0, Behavior::standard().with_destroy(rule))
    }

    #[test]
    fn confirms_score_and_clear() {
        let mut grid = Grid::from_rows(&[&[1, 1, 1]]).unwrap();
        let res = resolve(&mut grid, (0..3).map(|x| Position::new(x, 0)));
        assert_eq!(res.score, 30.0);
        assert_eq!(res.destroyed.len(), 3);
        assert_eq!(res.intents.len(), 3);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn duplicate_seeds_processed_once() {
        let mut grid = Grid::from_rows(&[&[1, 2]]).unwrap();
        let p = Position::new(0, 0);
        let res = resolve(&mut grid, [p, p, p]);
        assert_eq!(res.destroyed, vec![p]);
        assert_eq!(res.score, 10.0);
    }

    #[test]
    fn self_chain_is_not_requeued() {
        let mut grid = Grid::new(3, 1);
        grid.set(0, 0, special(1, DestroyRule::Area { radius: 0 }));
        let res = resolve(&mut grid, [Position::new(0, 0)]);
        assert_eq!(res.destroyed, vec![Position::new(0, 0)]);
        assert_eq!(res.score, 10.0);
    }

    #[test]
    fn row_chain_reaches_whole_row() {
        let mut grid = Grid::from_rows(&[&[1, 2, 3, 4], &[5, 6, 7, 8]]).unwrap();
        grid.set(1, 0, special(2, DestroyRule::ClearRow));
        let res = resolve(&mut grid, [Position::new(1, 0)]);
        assert_eq!(res.destroyed.len(), 4);
        assert_eq!(grid.to_rows(), vec![vec![0, 0, 0, 0], vec![5, 6, 7, 8]]);
    }

    #[test]
    fn mutual_chains_terminate() {
        let mut grid = Grid::new(2, 1);
        grid.set(0, 0, special(1, DestroyRule::ClearRow));
        grid.set(1, 0, special(2, DestroyRule::ClearRow));
        let res = resolve(&mut grid, [Position::new(0, 0)]);
        assert_eq!(res.destroyed.len(), 2);
        assert_eq!(res.score, 20.0);
    }

    #[test]
    fn cancel_and_pass_through() {
        let mut grid = Grid::new(2, 1);
        grid.set(0, 0, special(1, DestroyRule::Shielded));
        grid.set(1, 0, special(2, DestroyRule::ScoreOnly));
        let res = resolve(&mut grid, [Position::new(0, 0), Position::new(1, 0)]);
        assert_eq!(res.cancelled, vec![Position::new(0, 0)]);
        assert_eq!(res.passed, vec![Position::new(1, 0)]);
        assert_eq!(res.score, 10.0);
        assert!(res.intents.is_empty());
        assert_eq!(grid.to_rows(), vec![vec![1, 2]]);
    }

    #[test]
    fn out_of_range_and_empty_targets_are_skipped() {
        let mut grid = Grid::from_rows(&[&[0, 1]]).unwrap();
        let res = resolve(&mut grid, [Position::new(0, 0), Position::new(9, 9), Position::NONE]);
        assert!(res.is_empty());
        assert_eq!(res.score, 0.0);
    }
}
