/// Cover evaluator.
///
/// Candidates sit one tile away from each wall centre in the four cardinal
/// directions.  A candidate is cover when some wall blocks its line to the
/// threat; the candidate nearest the seeker wins, earliest wall first on
/// ties.
///
/// The scan is O(walls²).  The AI caches the result and only scans again
/// after Engage entry, once per cover period, or when the cached spot has
/// become exposed.

use crate::geometry::{Rect, Vec2};
use crate::sight::has_line_of_sight;

pub fn find_cover(seeker: Vec2, threat: Vec2, walls: &[Rect], tile_size: f64) -> Option<Vec2> {
    let offsets = [
        Vec2::new(tile_size, 0.0),
        Vec2::new(-tile_size, 0.0),
        Vec2::new(0.0, tile_size),
        Vec2::new(0.0, -tile_size),
    ];

    let mut best: Option<(Vec2, f64)> = None;
    for wall in walls {
        let center = wall.center();
        for offset in offsets {
            let candidate = center + offset;
            if has_line_of_sight(candidate, threat, walls) {
                continue;
            }
            let distance = seeker.distance(candidate);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((candidate, distance));
            }
        }
    }
    best.map(|(position, _)| position)
}
