//! The player's train of cars.

use std::collections::VecDeque;

use super::{Direction, Grid, GridPosition};

/// Ordered body cells, head first, plus the heading.
///
/// A snake is built around its head, so the body is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    segments: VecDeque<GridPosition>,
    direction: Direction,
    /// Heading used by the most recent `advance`.
    moved: Direction,
}

impl Snake {
    pub fn new(head: GridPosition, direction: Direction) -> Self {
        Self {
            segments: VecDeque::from([head]),
            direction,
            moved: direction,
        }
    }

    /// Builds a snake from explicit cells; `None` when `segments` is empty.
    pub fn from_segments(
        segments: impl IntoIterator<Item = GridPosition>,
        direction: Direction,
    ) -> Option<Self> {
        let segments: VecDeque<GridPosition> = segments.into_iter().collect();
        if segments.is_empty() {
            return None;
        }
        Some(Self {
            segments,
            direction,
            moved: direction,
        })
    }

    pub fn head(&self) -> GridPosition {
        self.segments[0]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn segments(&self) -> &VecDeque<GridPosition> {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Changes the intended heading unless `requested` reverses it.
    ///
    /// A request is also refused when it reverses the last heading actually
    /// moved, so several turns queued between two moves can never fold the
    /// head back onto the second car. Returns whether the heading changed.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if requested == self.direction.opposite() || requested == self.moved.opposite() {
            return false;
        }
        self.direction = requested;
        true
    }

    /// Prepends the next head cell. The caller decides whether to pop the tail.
    pub fn advance(&mut self, grid: &Grid) -> GridPosition {
        let head = grid.wrap(self.head(), self.direction.delta());
        self.segments.push_front(head);
        self.moved = self.direction;
        head
    }

    /// Removes the last car, keeping at least the head.
    pub fn pop_tail(&mut self) -> Option<GridPosition> {
        if self.segments.len() > 1 {
            self.segments.pop_back()
        } else {
            None
        }
    }

    /// Facing of every car: the head follows the heading, every other car
    /// faces the car in front of it.
    pub fn orientations(&self, grid: &Grid) -> Vec<Direction> {
        let mut facing = Vec::with_capacity(self.segments.len());
        facing.push(self.direction);
        for (ahead, current) in self.segments.iter().zip(self.segments.iter().skip(1)) {
            let previous = facing[facing.len() - 1];
            facing.push(grid.direction_between(*current, *ahead).unwrap_or(previous));
        }
        facing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_without_pickup() {
        let grid = Grid::new(10, 10);
        let mut snake = Snake::new(GridPosition::new(5, 5), Direction::Down);

        let head = snake.advance(&grid);
        snake.pop_tail();

        assert_eq!(head, GridPosition::new(5, 6));
        assert_eq!(
            snake.segments().iter().copied().collect::<Vec<_>>(),
            vec![GridPosition::new(5, 6)]
        );
    }

    #[test]
    fn test_advance_wraps_left() {
        let grid = Grid::new(10, 10);
        let mut snake = Snake::new(GridPosition::new(0, 5), Direction::Left);
        assert_eq!(snake.advance(&grid), GridPosition::new(9, 5));
    }

    #[test]
    fn test_growth_keeps_tail() {
        let grid = Grid::new(10, 10);
        let mut snake = Snake::new(GridPosition::new(5, 5), Direction::Right);
        snake.advance(&grid);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), GridPosition::new(6, 5));
    }

    #[test]
    fn test_reverse_request_ignored() {
        for direction in Direction::ALL {
            let mut snake = Snake::new(GridPosition::new(5, 5), direction);
            for _ in 0..3 {
                assert!(!snake.set_direction(direction.opposite()));
                assert_eq!(snake.direction(), direction);
            }
        }
    }

    #[test]
    fn test_queued_turns_cannot_reverse() {
        let grid = Grid::new(10, 10);
        let mut snake = Snake::new(GridPosition::new(5, 5), Direction::Right);
        snake.advance(&grid);

        assert!(snake.set_direction(Direction::Up));
        // Left is legal relative to Up but would fold back onto the body.
        assert!(!snake.set_direction(Direction::Left));
        assert_eq!(snake.direction(), Direction::Up);
    }

    #[test]
    fn test_pop_tail_keeps_head() {
        let mut snake = Snake::new(GridPosition::new(1, 1), Direction::Up);
        assert_eq!(snake.pop_tail(), None);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_from_segments_rejects_empty() {
        assert!(Snake::from_segments(Vec::new(), Direction::Up).is_none());
    }

    #[test]
    fn test_orientations_follow_the_car_ahead() {
        let grid = Grid::new(10, 10);
        let snake = Snake::from_segments(
            [
                GridPosition::new(0, 4),
                GridPosition::new(9, 4),
                GridPosition::new(9, 5),
            ],
            Direction::Right,
        )
        .unwrap();

        assert_eq!(
            snake.orientations(&grid),
            vec![Direction::Right, Direction::Right, Direction::Up]
        );
    }
}
