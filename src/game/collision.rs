//! Collision Detection
//!
//! Axis-aligned box overlap between characters. Each character occupies a
//! square of edge `size` centered on its position.

use crate::core::vec2::Point;
use crate::game::entity::Character;

/// Check if two centered squares overlap.
///
/// Strict on both axes: boxes that only touch along an edge do not overlap.
#[inline]
pub fn boxes_overlap(pos_a: Point, size_a: f64, pos_b: Point, size_b: f64) -> bool {
    let reach = (size_a + size_b) / 2.0;
    (pos_a.x - pos_b.x).abs() < reach && (pos_a.y - pos_b.y).abs() < reach
}

/// Find the first character in `others` whose box overlaps a box of edge
/// `size` centered at `position`.
///
/// Iteration order decides ties: the lowest index wins.
pub fn first_overlap<'a>(
    position: Point,
    size: f64,
    others: &'a [Character],
) -> Option<(usize, &'a Character)> {
    others
        .iter()
        .enumerate()
        .find(|(_, other)| boxes_overlap(position, size, other.position, other.size))
}
