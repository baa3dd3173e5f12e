use paintball_tactics::combat::*;
use paintball_tactics::entities::*;
use paintball_tactics::geometry::{Rect, Vec2};

const SPEED: f64 = 500.0;
const RATE: Millis = 100.0;

fn shooter() -> Combatant {
    Combatant::new(Vec2::new(100.0, 100.0), 45)
}

fn target_box(x: f64, y: f64) -> Rect {
    hitbox(Vec2::new(x, y), 24.0)
}

// ── Pool ──────────────────────────────────────────────────────────────────────

#[test]
fn new_pool_is_idle() {
    let pool = ProjectilePool::new(Owner::Enemy, 10);
    assert_eq!(pool.capacity(), 10);
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.owner, Owner::Enemy);
}

#[test]
fn launch_reuses_freed_slots() {
    let mut pool = ProjectilePool::new(Owner::Player, 2);
    assert_eq!(pool.launch(Vec2::ZERO, 0.0, SPEED), Some(0));
    assert_eq!(pool.launch(Vec2::ZERO, 0.0, SPEED), Some(1));
    assert_eq!(pool.launch(Vec2::ZERO, 0.0, SPEED), None);

    pool.slots[0].active = false;
    assert_eq!(pool.launch(Vec2::ZERO, 0.0, SPEED), Some(0));
    assert_eq!(pool.capacity(), 2);
}

// ── try_fire ──────────────────────────────────────────────────────────────────

#[test]
fn fresh_combatant_fires_towards_target() {
    let mut s = shooter();
    let mut pool = ProjectilePool::new(Owner::Player, 10);
    let outcome = try_fire(&mut s, Vec2::new(300.0, 100.0), 5.0, RATE, &mut pool, SPEED);

    assert_eq!(outcome, FireOutcome::Fired { slot: 0 });
    assert_eq!(s.last_fired_at, Some(5.0));
    let p = &pool.slots[0];
    assert!(p.active);
    assert_eq!(p.position, Vec2::new(100.0, 100.0));
    assert!((p.velocity.x - SPEED).abs() < 1e-9);
    assert!(p.velocity.y.abs() < 1e-9);
    assert_eq!(p.rotation, 0.0);
}

#[test]
fn cooldown_must_strictly_elapse() {
    let mut s = shooter();
    let mut pool = ProjectilePool::new(Owner::Player, 10);
    let aim = Vec2::new(0.0, 0.0);

    assert!(matches!(try_fire(&mut s, aim, 1000.0, RATE, &mut pool, SPEED), FireOutcome::Fired { .. }));
    assert_eq!(try_fire(&mut s, aim, 1050.0, RATE, &mut pool, SPEED), FireOutcome::CoolingDown);
    assert_eq!(try_fire(&mut s, aim, 1100.0, RATE, &mut pool, SPEED), FireOutcome::CoolingDown);
    assert!(matches!(try_fire(&mut s, aim, 1100.5, RATE, &mut pool, SPEED), FireOutcome::Fired { .. }));
    assert_eq!(pool.active_count(), 2);
}

#[test]
fn eleventh_shot_is_a_no_op() {
    let mut s = shooter();
    let mut pool = ProjectilePool::new(Owner::Enemy, 10);
    let aim = Vec2::new(500.0, 100.0);

    for i in 0..10 {
        let now = 200.0 * (i + 1) as f64;
        assert!(matches!(try_fire(&mut s, aim, now, RATE, &mut pool, SPEED), FireOutcome::Fired { .. }));
    }
    let before = s.last_fired_at;
    assert_eq!(try_fire(&mut s, aim, 5000.0, RATE, &mut pool, SPEED), FireOutcome::PoolExhausted);
    assert_eq!(pool.active_count(), 10);
    assert_eq!(s.last_fired_at, before);
}

// ── Damage ────────────────────────────────────────────────────────────────────

#[test]
fn one_hit_costs_one_point() {
    let mut enemy = Combatant::new(Vec2::ZERO, 500);
    assert_eq!(apply_damage(&mut enemy, 1), DamageOutcome::Wounded);
    assert_eq!(enemy.health, 499);
}

#[test]
fn five_hundred_hits_defeat_an_enemy() {
    let mut enemy = Combatant::new(Vec2::ZERO, 500);
    for _ in 0..499 {
        assert_eq!(apply_damage(&mut enemy, 1), DamageOutcome::Wounded);
    }
    assert_eq!(apply_damage(&mut enemy, 1), DamageOutcome::Defeated);
    assert_eq!(enemy.health, 0);
}

#[test]
fn health_never_goes_negative() {
    let mut player = Combatant::new(Vec2::ZERO, 3);
    assert_eq!(apply_damage(&mut player, 10), DamageOutcome::Defeated);
    assert_eq!(player.health, 0);
}

// ── Projectile motion ─────────────────────────────────────────────────────────

fn flying(x: f64, y: f64, vx: f64, vy: f64) -> Projectile {
    Projectile {
        position: Vec2::new(x, y),
        velocity: Vec2::new(vx, vy),
        rotation: vy.atan2(vx),
        active: true,
    }
}

#[test]
fn projectile_advances_by_velocity() {
    let mut p = flying(100.0, 100.0, 500.0, 0.0);
    let event = step_projectile(&mut p, 0.1, &[], &[], (1000.0, 1000.0), 4.0);
    assert_eq!(event, ProjectileEvent::Flying);
    assert_eq!(p.position, Vec2::new(150.0, 100.0));
    assert!(p.active);
}

#[test]
fn projectile_stops_at_wall() {
    let wall = Rect::from_center(Vec2::new(140.0, 100.0), 36.0, 36.0);
    let mut p = flying(100.0, 100.0, 500.0, 0.0);
    let event = step_projectile(&mut p, 0.1, &[wall], &[], (1000.0, 1000.0), 4.0);
    assert_eq!(event, ProjectileEvent::HitWall);
    assert!(!p.active);
}

#[test]
fn projectile_leaving_world_is_retired() {
    let mut p = flying(990.0, 100.0, 500.0, 0.0);
    let event = step_projectile(&mut p, 0.1, &[], &[], (1000.0, 1000.0), 4.0);
    assert_eq!(event, ProjectileEvent::LeftWorld);
    assert!(!p.active);
}

#[test]
fn fast_projectile_cannot_tunnel_through_target() {
    // One step covers 500 units; the target sits in the middle of it
    let mut p = flying(0.0, 100.0, 500.0, 0.0);
    let targets = [target_box(250.0, 100.0)];
    let event = step_projectile(&mut p, 1.0, &[], &targets, (1000.0, 1000.0), 4.0);
    assert_eq!(event, ProjectileEvent::HitTarget(0));
}

#[test]
fn nearer_of_wall_and_target_is_hit() {
    let wall = Rect::from_center(Vec2::new(300.0, 100.0), 36.0, 36.0);
    let targets = [target_box(400.0, 100.0), target_box(200.0, 100.0)];

    let mut p = flying(100.0, 100.0, 500.0, 0.0);
    let event = step_projectile(&mut p, 1.0, &[wall], &targets, (1000.0, 1000.0), 4.0);
    assert_eq!(event, ProjectileEvent::HitTarget(1));

    let mut p = flying(100.0, 100.0, 500.0, 0.0);
    let event = step_projectile(&mut p, 1.0, &[wall], &targets[..1], (1000.0, 1000.0), 4.0);
    assert_eq!(event, ProjectileEvent::HitWall);
}
