//! In-place vector helpers used by the spawn strategies.
//!
//! Every function here takes the point by `&mut` and writes back into it,
//! so hot spawn paths never build intermediate vectors. Angles are in
//! degrees, matching the authoring format.

use glam::Vec2;

/// Multiply degrees by this to get radians.
pub const DEG_TO_RADS: f32 = std::f32::consts::PI / 180.0;

/// Rotate `point` around the origin by `angle` degrees.
///
/// An angle of exactly `0.0` leaves the point untouched (bit for bit).
///
/// ```
/// use plume::{math::rotate_point, Vec2};
///
/// let mut p = Vec2::new(1.0, 0.0);
/// rotate_point(90.0, &mut p);
/// assert!(p.x.abs() < 1e-6 && (p.y - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn rotate_point(angle: f32, point: &mut Vec2) {
    if angle == 0.0 {
        return;
    }
    let (s, c) = (angle * DEG_TO_RADS).sin_cos();
    let x = point.x * c - point.y * s;
    let y = point.x * s + point.y * c;
    point.x = x;
    point.y = y;
}

/// Euclidean length of `point`.
#[inline]
pub fn length(point: &Vec2) -> f32 {
    (point.x * point.x + point.y * point.y).sqrt()
}

/// Scale `point` to unit length.
///
/// Not guarded: a zero-length vector ends up with non-finite coordinates.
/// Callers must not pass one.
#[inline]
pub fn normalize(point: &mut Vec2) {
    let one_over_len = 1.0 / length(point);
    point.x *= one_over_len;
    point.y *= one_over_len;
}

/// Multiply both coordinates of `point` by `value`.
#[inline]
pub fn scale_by(point: &mut Vec2, value: f32) {
    point.x *= value;
    point.y *= value;
}
