//! Angle, heading and proximity helpers shared by movement and combat.

use crate::types::Vec2;

/// Heading from `from` towards `to` in radians, in `(-PI, PI]`.
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

pub fn vector_from_angle(angle: f32) -> Vec2 {
    Vec2 { x: angle.cos(), y: angle.sin() }
}

/// Box test: both axis distances must be within `epsilon`. Not a radius check.
pub fn within_epsilon(a: Vec2, b: Vec2, epsilon: f32) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}

pub fn euclidean(a: (usize, usize), b: (usize, usize)) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    (dx * dx + dy * dy).sqrt()
}
