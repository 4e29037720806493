//! Gravity and refill
//!
//! For a direction, every line (a column for Up/Down, a row for Left/Right) is walked from
//! its compaction edge toward the side new tiles enter from. Each empty cell takes the
//! nearest occupied tile further along the line. Once the rest of a line is empty, new
//! tiles are drawn from the generator; their `Move` intents start one, two, ... cells past
//! the entry edge so a viewer can slide them in.
//!
//! Every cell from a line's first gap to its entry edge is returned as a check point.

use tracing::debug;

use crate::display::DisplayIntent;
use crate::error::GridError;
use crate::generator::TileGenerator;
use crate::grid::Grid;
use crate::types::{Direction, Position};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    pub intents: Vec<DisplayIntent>,
    pub checks: Vec<Position>,
    /// Tiles drawn from the generator
    pub spawned: usize,
}

/// Cells of every line, ordered from compaction edge to entry edge
fn lines(grid: &Grid, direction: Direction) -> Vec<Vec<Position>> {
    let (w, h) = (grid.width(), grid.height());
    match direction {
        Direction::Up => (0..w)
            .map(|x| (0..h).map(|y| Position::new(x, y)).collect())
            .collect(),
        Direction::Down => (0..w)
            .map(|x| (0..h).rev().map(|y| Position::new(x, y)).collect())
            .collect(),
        Direction::Left => (0..h)
            .map(|y| (0..w).rev().map(|x| Position::new(x, y)).collect())
            .collect(),
        Direction::Right => (0..h)
            .map(|y| (0..w).map(|x| Position::new(x, y)).collect())
            .collect(),
    }
}

/// Unit step from the entry edge out of the grid
fn entry_step(direction: Direction) -> (i32, i32) {
    match direction {
        Direction::Up => (0, 1),
        Direction::Down => (0, -1),
        Direction::Left => (-1, 0),
        Direction::Right => (1, 0),
    }
}

/// Off-grid entry point of the `n`-th new tile of a line (n >= 1)
fn entry_point(line: &[Position], (dx, dy): (i32, i32), n: i32) -> Position {
    line[line.len() - 1].offset(dx * n, dy * n)
}

pub fn fill<G>(
    grid: &mut Grid,
    direction: Direction,
    generator: &mut G,
) -> Result<FillReport, GridError>
where
    G: TileGenerator + ?Sized,
{
    let mut report = FillReport::default();
    let step = entry_step(direction);

    for line in lines(grid, direction) {
        let mut has_gap = false;
        let mut exhausted = false;
        let mut spawned = 0;

        for i in 0..line.len() {
            let cell = line[i];
            if !grid.is_empty(cell.x, cell.y) {
                continue;
            }
            if !has_gap {
                has_gap = true;
                report.checks.extend_from_slice(&line[i..]);
            }

            if !exhausted {
                let source = line[i + 1..]
                    .iter()
                    .copied()
                    .find(|p| !grid.is_empty(p.x, p.y));
                if let Some(from) = source {
                    grid.move_tile(from, cell);
                    if let Some(tile) = grid.get_at(cell) {
                        report.intents.push(DisplayIntent::Move {
                            tile: tile.clone(),
                            from,
                            to: cell,
                        });
                    }
                    continue;
                }
                exhausted = true;
            }

            let tile = generator.next_tile()?;
            tile.validate()?;
            spawned += 1;
            grid.set_at(cell, tile);
            if let Some(tile) = grid.get_at(cell) {
                report.intents.push(DisplayIntent::Move {
                    tile: tile.clone(),
                    from: entry_point(&line, step, spawned),
                    to: cell,
                });
            }
        }
        report.spawned += spawned as usize;
    }

    debug!(
        direction = direction.as_str(),
        moved = report.intents.len() - report.spawned,
        spawned = report.spawned,
        "fill pass"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ScriptedGenerator;
    use crate::tile::Tile;

    fn gen(kinds: &[u32]) -> ScriptedGenerator {
        ScriptedGenerator::new(kinds.iter().map(|&k| Tile::normal(k)))
    }

    #[test]
    fn up_compacts_toward_row_zero() {
        // column 0 is [1, 0, 2] top to bottom in rows
        let mut grid = Grid::from_rows(&[&[1], &[0], &[2]]).unwrap();
        let mut g = gen(&[9]);
        let report = fill(&mut grid, Direction::Up, &mut g).unwrap();

        assert_eq!(grid.to_rows(), vec![vec![1], vec![2], vec![9]]);
        assert_eq!(report.spawned, 1);
        assert_eq!(report.checks, vec![Position::new(0, 1), Position::new(0, 2)]);
        assert_eq!(
            report.intents[1],
            DisplayIntent::Move {
                tile: grid.get(0, 2).unwrap().clone(),
                from: Position::new(0, 3),
                to: Position::new(0, 2),
            }
        );
    }

    #[test]
    fn down_spawns_from_negative_rows() {
        let mut grid = Grid::from_rows(&[&[0], &[0], &[3]]).unwrap();
        let mut g = gen(&[5, 6]);
        let report = fill(&mut grid, Direction::Down, &mut g).unwrap();

        assert_eq!(grid.to_rows(), vec![vec![6], vec![5], vec![3]]);
        let sources: Vec<Position> = report
            .intents
            .iter()
            .map(|i| match i {
                DisplayIntent::Move { from, .. } => *from,
                DisplayIntent::Destroy { at, .. } => *at,
            })
            .collect();
        assert_eq!(sources, vec![Position::new(0, -1), Position::new(0, -2)]);
    }

    #[test]
    fn left_and_right_work_on_rows() {
        let mut grid = Grid::from_rows(&[&[1, 0, 2, 0]]).unwrap();
        let mut g = gen(&[7, 8]);
        fill(&mut grid, Direction::Left, &mut g).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![8, 7, 1, 2]]);

        let mut grid = Grid::from_rows(&[&[0, 1, 0, 2]]).unwrap();
        let mut g = gen(&[7, 8]);
        let report = fill(&mut grid, Direction::Right, &mut g).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![1, 2, 7, 8]]);
        assert_eq!(report.intents.last().unwrap().target(), Position::new(3, 0));
        assert!(matches!(
            report.intents.last().unwrap(),
            DisplayIntent::Move { from, .. } if *from == Position::new(5, 0)
        ));
    }

    #[test]
    fn single_cell_lines_enter_from_outside() {
        let mut grid = Grid::from_rows(&[&[0, 2, 3]]).unwrap();
        let mut g = gen(&[9]);
        let report = fill(&mut grid, Direction::Up, &mut g).unwrap();
        assert_eq!(
            report.intents,
            vec![DisplayIntent::Move {
                tile: grid.get(0, 0).unwrap().clone(),
                from: Position::new(0, 1),
                to: Position::new(0, 0),
            }]
        );

        let mut grid = Grid::from_rows(&[&[0], &[4]]).unwrap();
        let mut g = gen(&[9]);
        let report = fill(&mut grid, Direction::Left, &mut g).unwrap();
        let from = match &report.intents[0] {
            DisplayIntent::Move { from, .. } => *from,
            DisplayIntent::Destroy { at, .. } => *at,
        };
        assert_eq!(from, Position::new(-1, 0));
        assert!(!grid.contains(from));
    }

    #[test]
    fn full_grid_is_untouched() {
        let mut grid = Grid::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
        let mut g = gen(&[]);
        let report = fill(&mut grid, Direction::Up, &mut g).unwrap();
        assert!(report.intents.is_empty());
        assert!(report.checks.is_empty());
    }

    #[test]
    fn positions_follow_moves() {
        let mut grid = Grid::from_rows(&[&[0, 0], &[1, 0], &[2, 3]]).unwrap();
        let mut g = gen(&[4, 5, 6]);
        fill(&mut grid, Direction::Up, &mut g).unwrap();
        for p in grid.positions() {
            assert_eq!(grid.get_at(p).unwrap().position, p);
            assert!(!grid.get_at(p).unwrap().is_empty());
        }
    }

    #[test]
    fn generator_failure_propagates() {
        let mut grid = Grid::from_rows(&[&[0]]).unwrap();
        let mut g = gen(&[]);
        assert_eq!(
            fill(&mut grid, Direction::Up, &mut g),
            Err(GridError::GeneratorExhausted)
        );
    }
}
