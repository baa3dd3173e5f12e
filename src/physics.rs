/// Combatant movement and collision against walls, world bounds and each
/// other.
///
/// Movement is integrated one axis at a time; after each axis the body is
/// pushed back out of any wall it entered, so sliding along walls works.

use crate::entities::{Combatant, Enemy};
use crate::geometry::{Rect, Vec2};

#[derive(Clone, Copy, Debug)]
enum Axis {
    X,
    Y,
}

/// Integrate `body.velocity` over `dt` seconds and resolve collisions.
///
/// Long steps are split so no sub-step travels further than half the
/// hitbox; a body cannot skip over a wall however large `dt` gets.
pub fn move_body(body: &mut Combatant, dt: f64, wall_bodies: &[Rect], world: (f64, f64), hitbox: f64) {
    let half = hitbox / 2.0;
    let travel = body.velocity.length() * dt;
    let steps = (travel / half).ceil().max(1.0) as usize;
    let step_dt = dt / steps as f64;

    for _ in 0..steps {
        body.position.x += body.velocity.x * step_dt;
        push_out(&mut body.position, body.velocity.x, Axis::X, half, wall_bodies);

        body.position.y += body.velocity.y * step_dt;
        push_out(&mut body.position, body.velocity.y, Axis::Y, half, wall_bodies);
    }

    clamp_to_world(&mut body.position, half, world);
}

/// Resolve any wall overlap left behind by separation, pushing out along
/// the axis of least penetration.
pub fn settle(body: &mut Combatant, wall_bodies: &[Rect], world: (f64, f64), hitbox: f64) {
    let half = hitbox / 2.0;
    for wall in wall_bodies {
        let bounds = Rect::from_center(body.position, hitbox, hitbox);
        if !bounds.overlaps(wall) {
            continue;
        }
        let depth_x = (bounds.max.x.min(wall.max.x) - bounds.min.x.max(wall.min.x)).abs();
        let depth_y = (bounds.max.y.min(wall.max.y) - bounds.min.y.max(wall.min.y)).abs();
        let axis = if depth_x < depth_y { Axis::X } else { Axis::Y };
        push_out(&mut body.position, 0.0, axis, half, std::slice::from_ref(wall));
    }
    clamp_to_world(&mut body.position, half, world);
}

fn push_out(position: &mut Vec2, velocity: f64, axis: Axis, half: f64, walls: &[Rect]) {
    for wall in walls {
        let body = Rect::from_center(*position, half * 2.0, half * 2.0);
        if !body.overlaps(wall) {
            continue;
        }
        let (coord, lo, hi) = match axis {
            Axis::X => (&mut position.x, wall.min.x, wall.max.x),
            Axis::Y => (&mut position.y, wall.min.y, wall.max.y),
        };
        let before = lo - half;
        let after = hi + half;
        *coord = if velocity > 0.0 {
            before
        } else if velocity < 0.0 {
            after
        } else if (*coord - before).abs() <= (after - *coord).abs() {
            before
        } else {
            after
        };
    }
}

pub fn clamp_to_world(position: &mut Vec2, half: f64, world: (f64, f64)) {
    let (width, height) = world;
    position.x = position.x.clamp(half, (width - half).max(half));
    position.y = position.y.clamp(half, (height - half).max(half));
}

/// Push overlapping active enemies apart along the axis of least
/// penetration, half the overlap each.
pub fn separate_enemies(enemies: &mut [Enemy], hitbox: f64) {
    for i in 0..enemies.len() {
        for j in (i + 1)..enemies.len() {
            if !enemies[i].active || !enemies[j].active {
                continue;
            }
            let a = enemies[i].body.position;
            let b = enemies[j].body.position;
            let overlap_x = hitbox - (b.x - a.x).abs();
            let overlap_y = hitbox - (b.y - a.y).abs();
            if overlap_x <= 0.0 || overlap_y <= 0.0 {
                continue;
            }
            let push = if overlap_x < overlap_y {
                let dir = if b.x >= a.x { 1.0 } else { -1.0 };
                Vec2::new(dir * overlap_x / 2.0, 0.0)
            } else {
                let dir = if b.y >= a.y { 1.0 } else { -1.0 };
                Vec2::new(0.0, dir * overlap_y / 2.0)
            };
            enemies[i].body.position = a - push;
            enemies[j].body.position = b + push;
        }
    }
}
