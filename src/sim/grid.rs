//! Fixed-size tile grid: permanent walls, destructible bricks, open floor.

use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::consts::{COLS, ROWS};

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    Brick,
}

/// The level maze. Walls never change; bricks are cleared by the bomb
/// engine, which is the only mutation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Cell; COLS as usize]; ROWS as usize],
}

impl Grid {
    /// Generate a level maze: walls on the border and on every even/even
    /// interior tile, bricks seeded at `brick_density` elsewhere, except in
    /// the 3x3 safe zone around the player spawn. The wall pattern keeps
    /// every corridor locally open, so the maze stays traversable.
    pub fn generate(brick_density: f64, rng: &mut impl Rng) -> Self {
        let mut cells = [[Cell::Empty; COLS as usize]; ROWS as usize];
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = if r == 0
                    || r == ROWS as usize - 1
                    || c == 0
                    || c == COLS as usize - 1
                    || (r % 2 == 0 && c % 2 == 0)
                {
                    Cell::Wall
                } else if r < 3 && c < 3 {
                    // spawn safe zone
                    Cell::Empty
                } else if rng.random_bool(brick_density) {
                    Cell::Brick
                } else {
                    Cell::Empty
                };
            }
        }
        Self { cells }
    }

    /// A grid with no bricks at all. Handy for scripted setups.
    pub fn open() -> Self {
        let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
        Self::generate(0.0, &mut rng)
    }

    /// Cell at (col, row); anything out of bounds reads as Wall so callers
    /// never walk off the map.
    #[inline]
    pub fn tile_at(&self, col: i32, row: i32) -> Cell {
        if col < 0 || col >= COLS || row < 0 || row >= ROWS {
            return Cell::Wall;
        }
        self.cells[row as usize][col as usize]
    }

    #[inline]
    pub fn is_empty(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row) == Cell::Empty
    }

    /// Clear a tile to floor. Used by the bomb engine when a brick burns.
    pub fn clear(&mut self, col: i32, row: i32) {
        if col >= 0 && col < COLS && row >= 0 && row < ROWS {
            self.cells[row as usize][col as usize] = Cell::Empty;
        }
    }

    /// Count of cells currently holding a brick.
    pub fn brick_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&c| c == Cell::Brick)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{consts::TILE_SIZE, point_to_tile, tile_center};
    use glam::Vec2;
    use rand_pcg::Pcg32;

    #[test]
    fn border_and_even_interior_are_walls() {
        let mut rng = Pcg32::seed_from_u64(7);
        let grid = Grid::generate(0.5, &mut rng);
        for c in 0..COLS {
            assert_eq!(grid.tile_at(c, 0), Cell::Wall);
            assert_eq!(grid.tile_at(c, ROWS - 1), Cell::Wall);
        }
        for r in 0..ROWS {
            assert_eq!(grid.tile_at(0, r), Cell::Wall);
            assert_eq!(grid.tile_at(COLS - 1, r), Cell::Wall);
        }
        for r in (2..ROWS - 1).step_by(2) {
            for c in (2..COLS - 1).step_by(2) {
                assert_eq!(grid.tile_at(c, r), Cell::Wall);
            }
        }
    }

    #[test]
    fn spawn_safe_zone_has_no_bricks() {
        // even at full density the safe zone stays clear
        let mut rng = Pcg32::seed_from_u64(42);
        let grid = Grid::generate(1.0, &mut rng);
        for r in 0..3 {
            for c in 0..3 {
                assert_ne!(grid.tile_at(c, r), Cell::Brick, "brick at ({c},{r})");
            }
        }
        assert_eq!(grid.tile_at(1, 1), Cell::Empty);
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = Grid::open();
        assert_eq!(grid.tile_at(-1, 5), Cell::Wall);
        assert_eq!(grid.tile_at(5, -1), Cell::Wall);
        assert_eq!(grid.tile_at(COLS, 5), Cell::Wall);
        assert_eq!(grid.tile_at(5, ROWS), Cell::Wall);
    }

    #[test]
    fn clear_only_touches_in_bounds_cells() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut grid = Grid::generate(1.0, &mut rng);
        assert_eq!(grid.tile_at(3, 3), Cell::Brick);
        grid.clear(3, 3);
        assert_eq!(grid.tile_at(3, 3), Cell::Empty);
        // no-op, and no panic
        grid.clear(-1, -1);
        grid.clear(COLS, ROWS);
    }

    #[test]
    fn tile_pixel_conversions_round_trip() {
        let center = tile_center(4, 7);
        assert_eq!(center, Vec2::new(4.5 * TILE_SIZE, 7.5 * TILE_SIZE));
        assert_eq!(point_to_tile(center), (4, 7));
        // points anywhere inside the tile map back to it
        assert_eq!(point_to_tile(center + Vec2::splat(TILE_SIZE * 0.49)), (4, 7));
    }
}
