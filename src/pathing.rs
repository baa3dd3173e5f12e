/// Obstacle-aware waypoint selection.
///
/// Not a graph search.  When the straight line is blocked the world is split
/// into square buckets (`path_bucket_tiles` tiles per edge) and a single
/// intermediate waypoint is placed on the boundary between the start and
/// goal buckets, correcting one axis per call:
///
/// * different bucket columns: `(mid column boundary, start.y)`
/// * else different bucket rows: `(goal.x, mid row boundary)`
/// * else the goal itself
///
/// Column correction wins when both differ.  Callers re-resolve every tick
/// as the agent moves, so the second axis is handled once the first is
/// fixed.  In some layouts the waypoint lands inside a wall; wall collision
/// keeps the agent out and the next call picks again.

use crate::geometry::{Rect, Vec2};
use crate::sight::has_line_of_sight;

/// Next point to steer towards on the way from `start` to `goal`.
pub fn resolve_step(start: Vec2, goal: Vec2, walls: &[Rect], bucket: f64) -> Vec2 {
    if has_line_of_sight(start, goal, walls) {
        return goal;
    }

    let start_col = (start.x / bucket).floor();
    let start_row = (start.y / bucket).floor();
    let goal_col = (goal.x / bucket).floor();
    let goal_row = (goal.y / bucket).floor();

    if start_col != goal_col {
        Vec2::new((start_col + goal_col) * bucket / 2.0, start.y)
    } else if start_row != goal_row {
        Vec2::new(goal.x, (start_row + goal_row) * bucket / 2.0)
    } else {
        goal
    }
}
