//! Collision detection primitives
//!
//! Everything in the arena is a circle, so contact is a plain distance test.
//! There is no collision response here: callers turn an overlap into a hit
//! event and decide what happens.

use glam::Vec2;

use super::state::Arena;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Check if two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    distance(pos_a, pos_b) < radius_a + radius_b
}

/// Check if a point lies strictly inside a circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    distance(point, center) < radius
}

/// Check if a position is within `margin` of any arena edge (or beyond it)
pub fn near_wall(pos: Vec2, arena: &Arena, margin: f32) -> bool {
    pos.x < margin
        || pos.x > arena.width - margin
        || pos.y < margin
        || pos.y > arena.height - margin
}

/// Check if a position has left the arena by more than `margin`
pub fn outside_arena(pos: Vec2, arena: &Arena, margin: f32) -> bool {
    pos.x < -margin
        || pos.x > arena.width + margin
        || pos.y < -margin
        || pos.y > arena.height + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(400.0, 300.0)
    }

    #[test]
    fn test_circles_overlap() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_overlap(a, 10.0, Vec2::new(15.0, 0.0), 8.0));
        assert!(!circles_overlap(a, 10.0, Vec2::new(30.0, 0.0), 8.0));
        // Exactly touching is not an overlap
        assert!(!circles_overlap(a, 10.0, Vec2::new(18.0, 0.0), 8.0));
    }

    #[test]
    fn test_point_in_circle() {
        let center = Vec2::new(100.0, 100.0);
        assert!(point_in_circle(Vec2::new(140.0, 100.0), center, 52.0));
        assert!(!point_in_circle(Vec2::new(160.0, 100.0), center, 52.0));
    }

    #[test]
    fn test_near_wall() {
        let arena = arena();
        assert!(!near_wall(Vec2::new(200.0, 150.0), &arena, 10.0));
        assert!(near_wall(Vec2::new(5.0, 150.0), &arena, 10.0));
        assert!(near_wall(Vec2::new(200.0, 295.0), &arena, 10.0));
        assert!(near_wall(Vec2::new(395.0, 150.0), &arena, 10.0));
        assert!(near_wall(Vec2::new(200.0, -3.0), &arena, 10.0));
    }

    #[test]
    fn test_outside_arena() {
        let arena = arena();
        // Slightly past the edge is still alive
        assert!(!outside_arena(Vec2::new(-15.0, 100.0), &arena, 20.0));
        assert!(outside_arena(Vec2::new(-25.0, 100.0), &arena, 20.0));
        assert!(outside_arena(Vec2::new(200.0, 321.0), &arena, 20.0));
    }

    #[test]
    fn test_distance() {
        let d = distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 0.0001);
    }
}
