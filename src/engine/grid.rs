//! Toroidal play field.

use std::ops::Range;

use bevy::log::warn;

use super::{Direction, RandomSource};

/// One cell of the play field. Columns grow rightward, rows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub col: i32,
    pub row: i32,
}

impl GridPosition {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Immutable grid dimensions. Moving off one edge re-enters from the opposite one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    /// Creates a grid; zero dimensions are raised to one cell.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as i32,
            height: height.max(1) as i32,
        }
    }

    /// Grid that fits inside a window of the given pixel size.
    pub fn from_pixels(width: u32, height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        Self::new(width / cell_size, height / cell_size)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn center(&self) -> GridPosition {
        GridPosition::new(self.width / 2, self.height / 2)
    }

    pub fn contains(&self, position: GridPosition) -> bool {
        (0..self.width).contains(&position.col) && (0..self.height).contains(&position.row)
    }

    /// Applies `delta` and reduces each axis modulo its dimension.
    pub fn wrap(&self, position: GridPosition, delta: (i32, i32)) -> GridPosition {
        GridPosition::new(
            wrap_axis(position.col, delta.0, self.width),
            wrap_axis(position.row, delta.1, self.height),
        )
    }

    /// Uniform cell with at least `margin` cells between it and every edge.
    pub fn random_position<R: RandomSource + ?Sized>(
        &self,
        margin: u32,
        rng: &mut R,
    ) -> GridPosition {
        let col = rng.next(axis_range(self.width, margin));
        let row = rng.next(axis_range(self.height, margin));
        GridPosition::new(col as i32, row as i32)
    }

    /// Uniform choice among the margin-restricted cells that satisfy `accept`.
    ///
    /// Falls back to [`Grid::random_position`] when no cell qualifies.
    pub fn random_position_where<R, F>(&self, margin: u32, rng: &mut R, accept: F) -> GridPosition
    where
        R: RandomSource + ?Sized,
        F: Fn(GridPosition) -> bool,
    {
        let rows = axis_range(self.height, margin);
        let candidates: Vec<GridPosition> = axis_range(self.width, margin)
            .flat_map(|col| {
                rows.clone()
                    .map(move |row| GridPosition::new(col as i32, row as i32))
            })
            .filter(|&position| accept(position))
            .collect();

        if candidates.is_empty() {
            warn!("No free cell inside a {margin}-cell margin, sampling without constraints");
            return self.random_position(margin, rng);
        }
        candidates[rng.next(0..candidates.len())]
    }

    /// Direction that takes `from` to the adjacent cell `to`, honouring wraparound.
    pub fn direction_between(&self, from: GridPosition, to: GridPosition) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.wrap(from, direction.delta()) == to)
    }
}

/// Widened so that no `i32` position or delta can overflow before the reduction.
fn wrap_axis(value: i32, delta: i32, dimension: i32) -> i32 {
    let wrapped = (i64::from(value) + i64::from(delta)).rem_euclid(i64::from(dimension));
    // Always in `0..dimension`, which fits an i32.
    wrapped as i32
}

/// `[margin, dim - 1 - margin]` as a half-open range, or the whole axis if
/// the margin leaves nothing.
fn axis_range(dimension: i32, margin: u32) -> Range<usize> {
    let dimension = dimension as usize;
    let margin = margin as usize;
    if dimension > margin * 2 {
        margin..dimension - margin
    } else {
        0..dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::random::ScriptedRandom;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_wrap_always_in_bounds() {
        let grid = Grid::new(7, 5);
        for col in 0..7 {
            for row in 0..5 {
                for delta in [
                    (-1, 0),
                    (1, 0),
                    (0, -1),
                    (0, 1),
                    (-15, 22),
                    (9, -31),
                    (i32::MAX, i32::MIN),
                    (i32::MIN, i32::MAX),
                ] {
                    let wrapped = grid.wrap(GridPosition::new(col, row), delta);
                    assert!(grid.contains(wrapped), "{wrapped:?} escaped the grid");
                }
            }
        }
    }

    #[test]
    fn test_wrap_extreme_delta() {
        let grid = Grid::new(10, 10);
        // 5 + i32::MAX = 2_147_483_652, 5 + i32::MIN = -2_147_483_643
        let wrapped = grid.wrap(GridPosition::new(5, 5), (i32::MAX, i32::MIN));
        assert_eq!(wrapped, GridPosition::new(2, 7));
    }

    #[test]
    fn test_wrap_left_edge() {
        let grid = Grid::new(10, 10);
        let wrapped = grid.wrap(GridPosition::new(0, 5), Direction::Left.delta());
        assert_eq!(wrapped, GridPosition::new(9, 5));
    }

    #[test]
    fn test_wrap_bottom_edge() {
        let grid = Grid::new(10, 10);
        let wrapped = grid.wrap(GridPosition::new(4, 9), Direction::Down.delta());
        assert_eq!(wrapped, GridPosition::new(4, 0));
    }

    #[test]
    fn test_from_pixels() {
        let grid = Grid::from_pixels(1200, 800, 60);
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 13);
        assert_eq!(grid.center(), GridPosition::new(10, 6));
    }

    #[test]
    fn test_random_position_respects_margin() {
        let grid = Grid::new(20, 13);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let position = grid.random_position(2, &mut rng);
            assert!((2..=17).contains(&position.col));
            assert!((2..=10).contains(&position.row));
        }
    }

    #[test]
    fn test_random_position_margin_too_large() {
        let grid = Grid::new(3, 3);
        let mut rng = ScriptedRandom::new([2, 1]);
        assert_eq!(grid.random_position(2, &mut rng), GridPosition::new(2, 1));
    }

    #[test]
    fn test_random_position_where_filters() {
        let grid = Grid::new(5, 5);
        let forbidden = GridPosition::new(2, 2);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let position = grid.random_position_where(1, &mut rng, |p| p != forbidden);
            assert_ne!(position, forbidden);
            assert!((1..=3).contains(&position.col));
        }
    }

    #[test]
    fn test_random_position_where_falls_back() {
        let grid = Grid::new(5, 5);
        let mut rng = ScriptedRandom::new([0, 0]);
        let position = grid.random_position_where(1, &mut rng, |_| false);
        assert_eq!(position, GridPosition::new(1, 1));
    }

    #[test]
    fn test_direction_between_wraps() {
        let grid = Grid::new(10, 10);
        assert_eq!(
            grid.direction_between(GridPosition::new(9, 3), GridPosition::new(0, 3)),
            Some(Direction::Right)
        );
        assert_eq!(
            grid.direction_between(GridPosition::new(4, 4), GridPosition::new(4, 3)),
            Some(Direction::Up)
        );
        assert_eq!(
            grid.direction_between(GridPosition::new(4, 4), GridPosition::new(6, 4)),
            None
        );
    }
}
