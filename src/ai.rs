/// Enemy behaviour state machine.
///
/// Each tick an enemy looks at the player, possibly changes state, and sets
/// its own velocity.  Shooting is returned as intent; the tick driver owns
/// the projectile pool.
///
/// | state     | leaves for                                              |
/// |-----------|---------------------------------------------------------|
/// | Patrol    | Engage: sight and within view distance                  |
/// | Engage    | Search: sight lost or beyond view distance              |
/// |           | TakeCover: too close and a cover spot exists            |
/// | TakeCover | Engage: cover reached or cover period elapsed           |
/// | Search    | Engage: sight within view distance                      |
/// |           | Patrol: search duration elapsed                         |

use crate::config::SimConfig;
use crate::cover::find_cover;
use crate::entities::{AiState, Combatant, CoverMemory, Enemy, Millis};
use crate::geometry::{Rect, Vec2};
use crate::level::patrol_path;
use crate::pathing::resolve_step;
use crate::sight::has_line_of_sight;

/// What the enemy wants the driver to do after its update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AiDecision {
    pub fire_at: Option<Vec2>,
}

/// What an enemy knows about the player this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perception {
    pub player_position: Vec2,
    pub distance: f64,
    pub line_of_sight: bool,
}

impl Perception {
    pub fn observe(from: Vec2, player_position: Vec2, walls: &[Rect]) -> Self {
        Self {
            player_position,
            distance: from.distance(player_position),
            line_of_sight: has_line_of_sight(from, player_position, walls),
        }
    }

    fn sees_within(&self, range: f64) -> bool {
        self.line_of_sight && self.distance < range
    }
}

pub fn spawn_enemy(id: u32, spawn: Vec2, config: &SimConfig) -> Enemy {
    Enemy {
        id,
        body: Combatant::new(spawn, config.enemy_health),
        active: true,
        state: AiState::Patrol,
        patrol_path: patrol_path(spawn, config),
        current_patrol_index: 0,
        last_state_change: 0.0,
        search_start_time: 0.0,
        last_known_player_position: None,
        cover: None,
    }
}

/// Full speed for a state, before per-branch factors.
pub fn state_speed(state: AiState, config: &SimConfig) -> f64 {
    match state {
        AiState::Patrol => config.enemy_speed * config.patrol_speed_factor,
        AiState::Search => config.enemy_speed * config.search_speed_factor,
        AiState::Engage | AiState::TakeCover => config.enemy_speed,
    }
}

/// Run one tick of the state machine for an active enemy.
pub fn update_enemy(
    enemy: &mut Enemy,
    player_position: Vec2,
    walls: &[Rect],
    now: Millis,
    config: &SimConfig,
) -> AiDecision {
    let seen = Perception::observe(enemy.body.position, player_position, walls);
    if seen.line_of_sight {
        enemy.last_known_player_position = Some(player_position);
    }

    let entry_state = enemy.state;
    let decision = match entry_state {
        AiState::Patrol => patrol(enemy, &seen, walls, now, config),
        AiState::Engage => engage(enemy, &seen, walls, now, config),
        AiState::TakeCover => take_cover(enemy, &seen, walls, now, config),
        AiState::Search => search(enemy, &seen, walls, now, config),
    };

    // Only diagonal velocity is rescaled; axis-aligned motion keeps whatever
    // speed its branch chose.
    let v = enemy.body.velocity;
    if v.x != 0.0 && v.y != 0.0 {
        enemy.body.velocity = v.with_length(state_speed(entry_state, config));
    }

    decision
}

fn transition(enemy: &mut Enemy, to: AiState, now: Millis) {
    tracing::debug!(enemy = enemy.id, from = ?enemy.state, to = ?to, at = now, "ai transition");
    match to {
        AiState::Engage if enemy.state != AiState::TakeCover => enemy.cover = None,
        AiState::Search => enemy.search_start_time = now,
        _ => {}
    }
    enemy.state = to;
    enemy.last_state_change = now;
}

fn steer(enemy: &mut Enemy, target: Vec2, speed: f64) {
    enemy.body.velocity = (target - enemy.body.position).with_length(speed);
}

/// Cached cover spot against `threat`, re-scanned on first use after
/// Engage entry, once per cover period, and whenever the cached spot is
/// exposed to the threat's current position.
fn cover_position(
    enemy: &mut Enemy,
    threat: Vec2,
    walls: &[Rect],
    now: Millis,
    config: &SimConfig,
) -> Option<Vec2> {
    let stale = enemy.cover.map_or(true, |memory| {
        now - memory.evaluated_at >= config.cover_time_ms
            || memory
                .position
                .is_some_and(|spot| has_line_of_sight(spot, threat, walls))
    });
    if stale {
        let position = find_cover(enemy.body.position, threat, walls, config.tile_size);
        tracing::debug!(enemy = enemy.id, ?position, "cover evaluated");
        enemy.cover = Some(CoverMemory {
            position,
            evaluated_at: now,
        });
    }
    enemy.cover.and_then(|memory| memory.position)
}

// ── States ────────────────────────────────────────────────────────────────────

fn patrol(
    enemy: &mut Enemy,
    seen: &Perception,
    walls: &[Rect],
    now: Millis,
    config: &SimConfig,
) -> AiDecision {
    if seen.sees_within(config.view_distance) {
        transition(enemy, AiState::Engage, now);
        return AiDecision::default();
    }

    let waypoint = enemy.patrol_path[enemy.current_patrol_index];
    let step = resolve_step(enemy.body.position, waypoint, walls, config.path_bucket());
    steer(enemy, step, state_speed(AiState::Patrol, config));

    if enemy.body.position.distance(waypoint) < config.movement_threshold {
        enemy.body.velocity = Vec2::ZERO;
        enemy.current_patrol_index = (enemy.current_patrol_index + 1) % enemy.patrol_path.len();
    }
    AiDecision::default()
}

fn engage(
    enemy: &mut Enemy,
    seen: &Perception,
    walls: &[Rect],
    now: Millis,
    config: &SimConfig,
) -> AiDecision {
    if !seen.line_of_sight || seen.distance > config.view_distance {
        transition(enemy, AiState::Search, now);
        return AiDecision::default();
    }

    let position = enemy.body.position;
    let player = seen.player_position;
    let full_speed = config.enemy_speed;

    if seen.distance < config.combat_distance * config.too_close_factor {
        // Already standing on the spot with the player in sight: back off.
        match cover_position(enemy, player, walls, now, config)
            .filter(|cover| position.distance(*cover) >= config.movement_threshold)
        {
            Some(cover) => {
                let step = resolve_step(position, cover, walls, config.path_bucket());
                steer(enemy, step, full_speed);
                transition(enemy, AiState::TakeCover, now);
            }
            None => {
                let away = player.angle_to(position);
                let retreat = position + Vec2::from_angle(away, config.combat_distance);
                steer(enemy, retreat, full_speed);
            }
        }
    } else if seen.distance > config.combat_distance * config.too_far_factor {
        let step = resolve_step(position, player, walls, config.path_bucket());
        steer(enemy, step, full_speed);
    } else if let Some(cover) = cover_position(enemy, player, walls, now, config) {
        // In the band: drift to cover without pathing.  With no cover the
        // enemy keeps its current velocity.
        if position.distance(cover) > config.movement_threshold {
            steer(enemy, cover, full_speed * config.hold_cover_speed_factor);
        }
    }

    AiDecision {
        fire_at: Some(player),
    }
}

fn take_cover(
    enemy: &mut Enemy,
    seen: &Perception,
    walls: &[Rect],
    now: Millis,
    config: &SimConfig,
) -> AiDecision {
    let Some(cover) = enemy.cover.and_then(|memory| memory.position) else {
        transition(enemy, AiState::Engage, now);
        return AiDecision::default();
    };

    let position = enemy.body.position;
    if position.distance(cover) < config.movement_threshold {
        enemy.body.velocity = Vec2::ZERO;
        transition(enemy, AiState::Engage, now);
    } else if now - enemy.last_state_change > config.cover_time_ms {
        transition(enemy, AiState::Engage, now);
    } else {
        let step = resolve_step(position, cover, walls, config.path_bucket());
        steer(enemy, step, config.enemy_speed);
    }

    AiDecision {
        fire_at: seen.line_of_sight.then_some(seen.player_position),
    }
}

fn search(
    enemy: &mut Enemy,
    seen: &Perception,
    walls: &[Rect],
    now: Millis,
    config: &SimConfig,
) -> AiDecision {
    if seen.sees_within(config.view_distance) {
        transition(enemy, AiState::Engage, now);
    } else if now - enemy.search_start_time > config.search_duration_ms {
        transition(enemy, AiState::Patrol, now);
    } else if let Some(last_known) = enemy.last_known_player_position {
        if enemy.body.position.distance(last_known) > config.movement_threshold {
            let step = resolve_step(enemy.body.position, last_known, walls, config.path_bucket());
            steer(enemy, step, state_speed(AiState::Search, config));
        } else {
            enemy.body.velocity = Vec2::ZERO;
        }
    }
    AiDecision::default()
}
