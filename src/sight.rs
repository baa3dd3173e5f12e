/// Line-of-sight oracle.
///
/// Always queried with current positions; nothing is cached between ticks.

use crate::geometry::{segment_intersects, Rect, Vec2};

/// True unless the segment `from → to` touches any wall rectangle.
/// Stops at the first blocking wall.
pub fn has_line_of_sight(from: Vec2, to: Vec2, walls: &[Rect]) -> bool {
    !walls.iter().any(|wall| segment_intersects(from, to, wall))
}
