//! Grid storage and run detection through the facade

use match_grid::core::detector::{self, Axis};
use match_grid::core::{Grid, Tile};
use match_grid::types::Position;

fn cells(points: &[(i32, i32)]) -> Vec<Position> {
    points.iter().map(|&p| Position::from(p)).collect()
}

#[test]
fn test_grid_new_is_empty_and_ranged() {
    let grid = Grid::new(9, 9);
    assert_eq!((grid.width(), grid.height()), (9, 9));
    assert_eq!(grid.occupied_count(), 0);
    for p in grid.positions() {
        let tile = grid.get_at(p).unwrap();
        assert!(tile.is_empty());
        assert_eq!(tile.position, p);
    }
    assert!(grid.get(-1, 0).is_none());
    assert!(grid.get(9, 0).is_none());
    assert!(grid.get_at(Position::NONE).is_none());
    assert!(!grid.is_empty(9, 9));
}

#[test]
fn test_grid_set_tracks_position() {
    let mut grid = Grid::new(3, 3);
    let old = grid.set(2, 1, Tile::normal(4)).unwrap();
    assert!(old.is_empty());
    assert_eq!(grid.get(2, 1).unwrap().position, Position::new(2, 1));
    assert!(grid.set(3, 0, Tile::normal(4)).is_none());
    assert_eq!(grid.occupied_count(), 1);
}

#[test]
fn test_grid_swap_exchanges_positions() {
    let mut grid = Grid::from_rows(&[&[1, 2]]).unwrap();
    assert!(grid.swap(Position::new(0, 0), Position::new(1, 0)));
    assert_eq!(grid.to_rows(), vec![vec![2, 1]]);
    assert_eq!(grid.get(0, 0).unwrap().position, Position::new(0, 0));
    assert!(!grid.swap(Position::new(0, 0), Position::new(5, 0)));
    assert_eq!(grid.to_rows(), vec![vec![2, 1]]);
}

#[test]
fn test_detect_three_in_a_row_on_default_board() {
    let mut grid = Grid::new(9, 9);
    for x in 0..3 {
        grid.set(x, 0, Tile::normal(1));
    }

    let outcome = detector::detect(&grid, Position::new(1, 0));
    assert!(outcome.is_match());
    assert_eq!(outcome.combo_delta, 1);
    assert_eq!(
        outcome.affected.into_iter().collect::<Vec<_>>(),
        cells(&[(0, 0), (1, 0), (2, 0)])
    );
}

#[test]
fn test_detect_cross_counts_two_runs() {
    // 1 1 1
    // 1 . .
    // 1 . .
    let grid = Grid::from_rows(&[&[1, 1, 1], &[1, 0, 0], &[1, 0, 0]]).unwrap();
    let outcome = detector::detect(&grid, Position::new(0, 0));
    assert_eq!(outcome.combo_delta, 2);
    assert_eq!(outcome.affected.len(), 5);

    let runs = detector::runs(&grid, Position::new(0, 0));
    assert_eq!(runs[0].axis, Axis::Horizontal);
    assert_eq!(runs[1].axis, Axis::Vertical);
    assert_eq!(runs[1].positions().collect::<Vec<_>>(), cells(&[(0, 0), (0, 1), (0, 2)]));
}

#[test]
fn test_detect_long_run_from_any_member() {
    let grid = Grid::from_rows(&[&[2, 3, 3, 3, 3, 2]]).unwrap();
    for x in 1..5 {
        let outcome = detector::detect(&grid, Position::new(x, 0));
        assert_eq!(outcome.affected.len(), 4, "pivot x={x}");
        assert_eq!(outcome.combo_delta, 1);
    }
    assert!(!detector::detect(&grid, Position::new(0, 0)).is_match());
}

#[test]
fn test_detect_ignores_empty_and_outside() {
    let grid = Grid::from_rows(&[&[0, 0, 0], &[1, 2, 1]]).unwrap();
    assert!(!detector::detect(&grid, Position::new(1, 0)).is_match());
    assert!(!detector::detect(&grid, Position::new(7, 7)).is_match());
    assert!(!detector::detect(&grid, Position::NONE).is_match());
}
