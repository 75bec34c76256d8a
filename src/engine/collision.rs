//! Pickup and self-intersection tests.

use std::collections::HashSet;

use bevy::math::{Rect, Vec2};

use super::GridPosition;

/// True when the head's pixel anchor lies inside or on the edge of `bounds`.
pub fn pickup_detected(head_anchor: Vec2, bounds: Rect) -> bool {
    bounds.contains(head_anchor)
}

/// True when some cell appears twice in `segments`.
pub fn self_collision_detected<'a>(segments: impl IntoIterator<Item = &'a GridPosition>) -> bool {
    let mut distinct = HashSet::new();
    let mut total = 0;
    for segment in segments {
        distinct.insert(*segment);
        total += 1;
    }
    distinct.len() != total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Direction, Grid, Snake};

    fn cells(raw: &[(i32, i32)]) -> Vec<GridPosition> {
        raw.iter()
            .map(|&(col, row)| GridPosition::new(col, row))
            .collect()
    }

    #[test]
    fn test_duplicate_segment_collides() {
        assert!(self_collision_detected(&cells(&[(3, 3), (3, 4), (3, 3)])));
    }

    #[test]
    fn test_distinct_segments_do_not_collide() {
        assert!(!self_collision_detected(&cells(&[(3, 3), (3, 4), (3, 5)])));
        assert!(!self_collision_detected(&cells(&[(3, 3)])));
        assert!(!self_collision_detected(&[]));
    }

    #[test]
    fn test_pickup_boundary_is_inclusive() {
        let bounds = Rect::from_corners(Vec2::new(120.0, 60.0), Vec2::new(270.0, 160.0));
        assert!(pickup_detected(Vec2::new(120.0, 60.0), bounds));
        assert!(pickup_detected(Vec2::new(270.0, 160.0), bounds));
        assert!(pickup_detected(Vec2::new(180.0, 120.0), bounds));
        assert!(!pickup_detected(Vec2::new(60.0, 120.0), bounds));
        assert!(!pickup_detected(Vec2::new(300.0, 120.0), bounds));
    }

    #[test]
    fn test_reversal_into_second_car_is_unreachable() {
        let grid = Grid::new(6, 6);
        let mut snake = Snake::from_segments(
            cells(&[(2, 2), (1, 2), (0, 2), (5, 2)]),
            Direction::Right,
        )
        .unwrap();

        // Every turn sequence of length two, applied between moves, for many frames.
        let turns = Direction::ALL;
        for frame in 0..64 {
            let first = turns[frame % 4];
            let second = turns[(frame / 4) % 4];
            let before = snake.segments()[1];
            let previous_head = snake.head();

            snake.set_direction(first);
            snake.set_direction(second);
            let head = snake.advance(&grid);
            snake.pop_tail();

            assert_ne!(head, before, "frame {frame} reversed into the second car");
            assert_ne!(head, previous_head);
        }
    }
}
