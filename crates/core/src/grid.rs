//! Grid module - fixed-size storage of tiles
//!
//! The grid is a `width x height` array of [`Tile`] stored as a flat vector in row-major
//! order (`y * width + x`). Every slot always holds a tile; empty cells hold the empty
//! tile rather than nothing, so an out-of-range lookup (`None`) is distinguishable from
//! an empty cell in the grid (`Some(tile)` with `tile.is_empty()`).
//!
//! Writes keep `tile.position` in sync with the slot the tile lives in.

use crate::error::GridError;
use crate::tile::Tile;
use crate::types::{Position, EMPTY_KIND};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Flat array of tiles, row-major order (y * width + x)
    cells: Vec<Tile>,
}

impl Grid {
    /// Create a grid full of empty tiles
    pub fn new(width: u16, height: u16) -> Self {
        let (w, h) = (i32::from(width), i32::from(height));
        let cells = (0..h)
            .flat_map(|y| (0..w).map(move |x| Tile::empty_at(Position::new(x, y))))
            .collect();
        Self {
            width: w,
            height: h,
            cells,
        }
    }

    /// Build a grid of standard tiles from rows of kinds (`rows[y][x]`, 0 = empty)
    ///
    /// Rows shorter than the longest row are padded with empty cells.
    pub fn from_rows(rows: &[&[u32]]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(GridError::InvalidDimensions {
                width: u16::MAX,
                height: u16::MAX,
            });
        };
        if w == 0 || h == 0 {
            return Err(GridError::InvalidDimensions {
                width: w,
                height: h,
            });
        }

        let mut grid = Self::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            for (x, &kind) in row.iter().enumerate() {
                if kind != EMPTY_KIND {
                    grid.set(x as i32, y as i32, Tile::normal(kind));
                }
            }
        }
        Ok(grid)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_range(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check if (x, y) lies inside the grid
    #[inline]
    pub fn in_range(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    pub fn contains(&self, p: Position) -> bool {
        self.in_range(p.x, p.y)
    }

    /// Get the tile at (x, y); `None` if out of range
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    pub fn get_at(&self, p: Position) -> Option<&Tile> {
        self.get(p.x, p.y)
    }

    /// Place a tile at (x, y), returning the tile it replaced
    ///
    /// Returns `None` (and drops nothing into the grid) if out of range.
    pub fn set(&mut self, x: i32, y: i32, mut tile: Tile) -> Option<Tile> {
        let idx = self.index(x, y)?;
        tile.position = Position::new(x, y);
        Some(std::mem::replace(&mut self.cells[idx], tile))
    }

    pub fn set_at(&mut self, p: Position, tile: Tile) -> Option<Tile> {
        self.set(p.x, p.y, tile)
    }

    /// Replace the tile at `p` with the empty tile, returning what was there
    pub fn take(&mut self, p: Position) -> Option<Tile> {
        self.set_at(p, Tile::empty())
    }

    /// True if (x, y) is in range and holds the empty tile
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(tile) if tile.is_empty())
    }

    /// Exchange the tiles at `a` and `b`, updating both positions
    ///
    /// Returns false (grid untouched) if either position is out of range.
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a.x, a.y), self.index(b.x, b.y)) else {
            return false;
        };
        self.cells.swap(ia, ib);
        self.cells[ia].position = a;
        self.cells[ib].position = b;
        true
    }

    /// Move the tile at `from` into `to`, leaving `from` empty
    ///
    /// Whatever occupied `to` is returned.
    pub fn move_tile(&mut self, from: Position, to: Position) -> Option<Tile> {
        debug_assert!(self.contains(from) && self.contains(to));
        let tile = self.take(from)?;
        self.set_at(to, tile)
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Position::new(x, y)))
    }

    /// Number of non-empty tiles
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|t| !t.is_empty()).count()
    }

    /// Tile kinds in row-major order
    pub fn kinds(&self) -> Vec<u32> {
        self.cells.iter().map(|t| t.kind).collect()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.cells
    }

    /// Kind rows for assertions (`rows[y][x]`)
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|t| t.kind).collect())
            .collect()
    }

    /// Clear the entire grid to empty tiles
    pub fn clear(&mut self) {
        for p in self.positions().collect::<Vec<_>>() {
            self.take(p);
        }
    }

    /// Check every non-empty tile for a full capability set
    pub fn validate(&self) -> Result<(), GridError> {
        self.cells
            .iter()
            .filter(|t| !t.is_empty())
            .try_for_each(Tile::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_calculation() {
        let grid = Grid::new(9, 9);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(8, 0), Some(8));
        assert_eq!(grid.index(0, 1), Some(9));
        assert_eq!(grid.index(8, 8), Some(80));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(9, 0), None);
        assert_eq!(grid.index(0, 9), None);
    }

    #[test]
    fn new_grid_is_all_empty_with_positions() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.tiles().len(), 12);
        for p in grid.positions() {
            let tile = grid.get_at(p).unwrap();
            assert!(tile.is_empty());
            assert_eq!(tile.position, p);
        }
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn set_returns_previous_and_fixes_position() {
        let mut grid = Grid::new(3, 3);
        let prev = grid.set(1, 2, Tile::normal(5)).unwrap();
        assert!(prev.is_empty());
        let tile = grid.get(1, 2).unwrap();
        assert_eq!(tile.kind, 5);
        assert_eq!(tile.position, Position::new(1, 2));

        assert!(grid.set(3, 0, Tile::normal(1)).is_none());
    }

    #[test]
    fn out_of_range_is_not_empty() {
        let grid = Grid::new(2, 2);
        assert!(grid.is_empty(0, 0));
        assert!(!grid.is_empty(2, 0));
        assert!(grid.get(-1, -1).is_none());
    }

    #[test]
    fn swap_exchanges_contents_and_positions() {
        let mut grid = Grid::from_rows(&[&[1, 2]]).unwrap();
        assert!(grid.swap(Position::new(0, 0), Position::new(1, 0)));
        assert_eq!(grid.to_rows(), vec![vec![2, 1]]);
        assert_eq!(grid.get(0, 0).unwrap().position, Position::new(0, 0));
        assert_eq!(grid.get(1, 0).unwrap().position, Position::new(1, 0));

        assert!(!grid.swap(Position::new(0, 0), Position::new(2, 0)));
        assert_eq!(grid.to_rows(), vec![vec![2, 1]]);
    }

    #[test]
    fn move_tile_leaves_source_empty() {
        let mut grid = Grid::from_rows(&[&[7], &[0]]).unwrap();
        grid.move_tile(Position::new(0, 0), Position::new(0, 1));
        assert!(grid.is_empty(0, 0));
        assert_eq!(grid.get(0, 1).unwrap().kind, 7);
        assert_eq!(grid.get(0, 1).unwrap().position, Position::new(0, 1));
    }

    #[test]
    fn validate_reports_bare_tiles() {
        let mut grid = Grid::from_rows(&[&[1, 0, 2]]).unwrap();
        assert_eq!(grid.validate(), Ok(()));

        let bare = Tile {
            behavior: None,
            ..Tile::normal(3)
        };
        grid.set(1, 0, bare);
        assert_eq!(grid.validate(), Err(GridError::MissingCapabilities { kind: 3 }));
    }

    #[test]
    fn from_rows_rejects_empty_layout() {
        assert!(matches!(
            Grid::from_rows(&[]),
            Err(GridError::InvalidDimensions { .. })
        ));
    }
}
