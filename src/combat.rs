/// Firing, projectile pools and damage.
///
/// Pools hold a fixed number of slots per owner.  A shot with no free slot
/// is a no-op outcome, not an error.

use crate::entities::{Combatant, Millis, Owner, Projectile, ProjectilePool};
use crate::geometry::{segment_entry, Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    Fired { slot: usize },
    CoolingDown,
    PoolExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    Wounded,
    Defeated,
}

/// What a projectile ran into during one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileEvent {
    Flying,
    HitWall,
    /// Index into the target list passed to `step_projectile`.
    HitTarget(usize),
    LeftWorld,
}

// ── Pool ──────────────────────────────────────────────────────────────────────

impl ProjectilePool {
    pub fn new(owner: Owner, capacity: usize) -> Self {
        let idle = Projectile {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            active: false,
        };
        Self {
            owner,
            slots: vec![idle; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    pub fn active(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter(|p| p.active)
    }

    /// Launch from `origin` at `angle`, reusing the first idle slot.
    pub fn launch(&mut self, origin: Vec2, angle: f64, speed: f64) -> Option<usize> {
        let slot = self.slots.iter().position(|p| !p.active)?;
        self.slots[slot] = Projectile {
            position: origin,
            velocity: Vec2::from_angle(angle, speed),
            rotation: angle,
            active: true,
        };
        Some(slot)
    }

    pub fn clear(&mut self) {
        for p in &mut self.slots {
            p.active = false;
        }
    }
}

// ── Firing ────────────────────────────────────────────────────────────────────

/// Fire from `shooter` towards `target` if the cooldown has elapsed and a
/// slot is free.  `last_fired_at` only moves on a successful shot.
pub fn try_fire(
    shooter: &mut Combatant,
    target: Vec2,
    now: Millis,
    fire_rate: Millis,
    pool: &mut ProjectilePool,
    bullet_speed: f64,
) -> FireOutcome {
    let ready = shooter
        .last_fired_at
        .map_or(true, |last| now - last > fire_rate);
    if !ready {
        return FireOutcome::CoolingDown;
    }

    let angle = shooter.position.angle_to(target);
    match pool.launch(shooter.position, angle, bullet_speed) {
        Some(slot) => {
            shooter.last_fired_at = Some(now);
            tracing::trace!(owner = ?pool.owner, slot, angle, "projectile fired");
            FireOutcome::Fired { slot }
        }
        None => FireOutcome::PoolExhausted,
    }
}

/// Subtract `damage`, flooring health at zero.
pub fn apply_damage(target: &mut Combatant, damage: i32) -> DamageOutcome {
    target.health = (target.health - damage).max(0);
    if target.is_defeated() {
        DamageOutcome::Defeated
    } else {
        DamageOutcome::Wounded
    }
}

// ── Projectile motion ─────────────────────────────────────────────────────────

/// Advance one projectile by `dt` seconds and report the first thing it
/// touched along the way.
///
/// The path is swept as a segment so fast shots cannot skip over a thin
/// wall or target.  `targets` are hitboxes; the projectile box is folded
/// into them by expanding each rectangle by `half_extent`.  The projectile
/// stops at the contact point of whatever it hits first.
pub fn step_projectile(
    projectile: &mut Projectile,
    dt: f64,
    wall_bodies: &[Rect],
    targets: &[Rect],
    world: (f64, f64),
    half_extent: f64,
) -> ProjectileEvent {
    let from = projectile.position;
    let to = from + projectile.velocity * dt;

    let mut first: Option<(f64, ProjectileEvent)> = None;
    let mut consider = |t: Option<f64>, event: ProjectileEvent| {
        if let Some(t) = t {
            if first.map_or(true, |(best, _)| t < best) {
                first = Some((t, event));
            }
        }
    };
    for wall in wall_bodies {
        consider(segment_entry(from, to, &wall.expand(half_extent)), ProjectileEvent::HitWall);
    }
    for (i, target) in targets.iter().enumerate() {
        consider(
            segment_entry(from, to, &target.expand(half_extent)),
            ProjectileEvent::HitTarget(i),
        );
    }

    if let Some((t, event)) = first {
        projectile.position = from + (to - from) * t;
        projectile.active = false;
        return event;
    }

    projectile.position = to;
    let (width, height) = world;
    if to.x < 0.0 || to.x > width || to.y < 0.0 || to.y > height {
        projectile.active = false;
        return ProjectileEvent::LeftWorld;
    }
    ProjectileEvent::Flying
}

/// Square hitbox centred on a combatant.
pub fn hitbox(position: Vec2, edge: f64) -> Rect {
    Rect::from_center(position, edge, edge)
}
