/// Tick driver: pure state-transition functions for a run.
///
/// `tick` takes an immutable reference to the current `SimulationState`
/// and returns a brand-new state plus what happened.  No I/O, no globals;
/// the only side effect is logging.

use std::sync::Arc;

use crate::ai::{spawn_enemy, update_enemy};
use crate::catalogue::builtin_levels;
use crate::combat::{apply_damage, hitbox, step_projectile, try_fire, DamageOutcome, ProjectileEvent};
use crate::config::SimConfig;
use crate::entities::{
    Combatant, Enemy, EnemyView, Owner, PlayerInput, ProjectilePool, ProjectileView, RunState,
    SimulationState, Snapshot, TickOutcome,
};
use crate::error::{Result, SimError};
use crate::level::{LevelGrid, LevelLayout};
use crate::physics::{move_body, separate_enemies, settle};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Start a run on the built-in levels at level 1.
pub fn new_run(config: SimConfig) -> Result<SimulationState> {
    new_run_with_levels(builtin_levels()?, config, 1)
}

/// Start a run on `layouts` at the 1-based `start_level`.  Every layout is
/// validated here so later level changes cannot fail.
pub fn new_run_with_levels(
    layouts: Vec<LevelLayout>,
    config: SimConfig,
    start_level: usize,
) -> Result<SimulationState> {
    config.validate()?;
    let levels = layouts
        .iter()
        .enumerate()
        .map(|(i, layout)| {
            LevelGrid::new(layout, &config)
                .map_err(|source| SimError::InvalidLevel { level: i + 1, source })
        })
        .collect::<Result<Vec<_>>>()?;
    if start_level == 0 || start_level > levels.len() {
        return Err(SimError::UnknownLevel(start_level));
    }

    let levels = Arc::new(levels);
    let grid = &levels[start_level - 1];
    let (player, enemies) = populate(grid, &config);
    tracing::info!(level = start_level, enemies = enemies.len(), "level started");

    Ok(SimulationState {
        player_projectiles: ProjectilePool::new(Owner::Player, config.pool_capacity),
        enemy_projectiles: ProjectilePool::new(Owner::Enemy, config.pool_capacity),
        config,
        levels,
        current_level: start_level,
        player,
        enemies,
        clock: 0.0,
        tick_count: 0,
        run_state: RunState::Running,
    })
}

fn populate(grid: &LevelGrid, config: &SimConfig) -> (Combatant, Vec<Enemy>) {
    let spawns = grid.spawn_points();
    let player = Combatant::new(spawns.player, config.player_health);
    let enemies = spawns
        .enemies
        .iter()
        .enumerate()
        .map(|(i, &spawn)| spawn_enemy(i as u32, spawn, config))
        .collect();
    (player, enemies)
}

/// Rebuild combatants and pools for `level`, keeping the clock.
fn load_level(state: &SimulationState, level: usize) -> SimulationState {
    let grid = &state.levels[level - 1];
    let (player, enemies) = populate(grid, &state.config);
    let mut player_projectiles = state.player_projectiles.clone();
    let mut enemy_projectiles = state.enemy_projectiles.clone();
    player_projectiles.clear();
    enemy_projectiles.clear();

    tracing::info!(level, enemies = enemies.len(), "level started");
    SimulationState {
        current_level: level,
        player,
        enemies,
        player_projectiles,
        enemy_projectiles,
        run_state: RunState::Running,
        ..state.clone()
    }
}

/// Start over: from level 1 after a victory, otherwise from the current
/// level.
pub fn restart(state: &SimulationState) -> SimulationState {
    let level = match state.run_state {
        RunState::Victory => 1,
        RunState::Running | RunState::Defeat => state.current_level,
    };
    tracing::info!(from = ?state.run_state, level, "run restarted");
    load_level(state, level)
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance the simulation by `dt` seconds.
pub fn tick(state: &SimulationState, input: &PlayerInput, dt: f64) -> (SimulationState, TickOutcome) {
    if state.run_state != RunState::Running {
        return (state.clone(), TickOutcome::Halted);
    }

    let mut next = state.clone();
    let levels = Arc::clone(&next.levels);
    let grid = &levels[next.current_level - 1];
    let config = &state.config;
    let world = grid.world_bounds();
    let now = state.clock + dt * 1000.0;
    next.clock = now;
    next.tick_count += 1;

    // ── 1. Player intent ─────────────────────────────────────────────────────
    next.player.velocity.x = f64::from(input.move_x.signum()) * config.player_speed;
    next.player.velocity.y = f64::from(input.move_y.signum()) * config.player_speed;
    if input.firing {
        try_fire(
            &mut next.player,
            input.aim_point,
            now,
            config.player_fire_rate_ms,
            &mut next.player_projectiles,
            config.bullet_speed,
        );
    }

    // ── 2. Enemy AI ──────────────────────────────────────────────────────────
    let player_position = next.player.position;
    for enemy in next.enemies.iter_mut().filter(|e| e.active) {
        let decision = update_enemy(enemy, player_position, grid.walls(), now, config);
        if let Some(target) = decision.fire_at {
            try_fire(
                &mut enemy.body,
                target,
                now,
                config.enemy_fire_rate_ms,
                &mut next.enemy_projectiles,
                config.bullet_speed,
            );
        }
    }

    // ── 3. Movement & body collisions ────────────────────────────────────────
    move_body(&mut next.player, dt, grid.wall_bodies(), world, config.combatant_hitbox);
    for enemy in next.enemies.iter_mut().filter(|e| e.active) {
        move_body(&mut enemy.body, dt, grid.wall_bodies(), world, config.combatant_hitbox);
    }
    separate_enemies(&mut next.enemies, config.combatant_hitbox);
    for enemy in next.enemies.iter_mut().filter(|e| e.active) {
        settle(&mut enemy.body, grid.wall_bodies(), world, config.combatant_hitbox);
    }

    // ── 4. Projectiles & damage ──────────────────────────────────────────────
    resolve_player_projectiles(&mut next, grid, dt);
    resolve_enemy_projectiles(&mut next, grid, dt);

    // ── 5. Run progression ───────────────────────────────────────────────────
    if next.player.is_defeated() {
        next.run_state = RunState::Defeat;
        tracing::info!(level = next.current_level, "player defeated");
        return (next, TickOutcome::Defeat);
    }
    if next.active_enemy_count() == 0 {
        let cleared = next.current_level;
        if cleared < next.levels.len() {
            tracing::info!(cleared, "level cleared");
            let advanced = load_level(&next, cleared + 1);
            return (advanced, TickOutcome::LevelAdvanced { level: cleared + 1 });
        }
        next.run_state = RunState::Victory;
        tracing::info!(cleared, "final level cleared");
        return (next, TickOutcome::Victory);
    }

    (next, TickOutcome::Continue)
}

fn resolve_player_projectiles(state: &mut SimulationState, grid: &LevelGrid, dt: f64) {
    let config = &state.config;
    let half = config.bullet_hitbox / 2.0;
    let world = grid.world_bounds();

    for slot in 0..state.player_projectiles.slots.len() {
        if !state.player_projectiles.slots[slot].active {
            continue;
        }
        // Rebuilt per shot so an enemy dropped earlier this tick is no
        // longer a target.
        let (ids, targets): (Vec<usize>, Vec<_>) = state
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.active)
            .map(|(i, e)| (i, hitbox(e.body.position, config.combatant_hitbox)))
            .unzip();

        let projectile = &mut state.player_projectiles.slots[slot];
        let event = step_projectile(projectile, dt, grid.wall_bodies(), &targets, world, half);
        if let ProjectileEvent::HitTarget(hit) = event {
            let enemy = &mut state.enemies[ids[hit]];
            if apply_damage(&mut enemy.body, config.bullet_damage) == DamageOutcome::Defeated {
                enemy.active = false;
                enemy.body.velocity = Default::default();
                tracing::debug!(enemy = enemy.id, "enemy eliminated");
            }
        }
    }
}

fn resolve_enemy_projectiles(state: &mut SimulationState, grid: &LevelGrid, dt: f64) {
    let config = &state.config;
    let half = config.bullet_hitbox / 2.0;
    let world = grid.world_bounds();

    for projectile in state.enemy_projectiles.slots.iter_mut().filter(|p| p.active) {
        let targets = [hitbox(state.player.position, config.combatant_hitbox)];
        let event = step_projectile(projectile, dt, grid.wall_bodies(), &targets, world, half);
        if event == ProjectileEvent::HitTarget(0) {
            apply_damage(&mut state.player, config.bullet_damage);
            tracing::debug!(health = state.player.health, "player hit");
        }
    }
}

// ── Renderer view ────────────────────────────────────────────────────────────

pub fn snapshot(state: &SimulationState) -> Snapshot {
    let enemies = state
        .enemies
        .iter()
        .map(|e| EnemyView {
            id: e.id,
            position: e.body.position,
            health: e.body.health,
            active: e.active,
            state: e.state,
        })
        .collect();
    let projectiles = state
        .player_projectiles
        .slots
        .iter()
        .map(|p| (Owner::Player, p))
        .chain(state.enemy_projectiles.slots.iter().map(|p| (Owner::Enemy, p)))
        .map(|(owner, p)| ProjectileView {
            owner,
            position: p.position,
            rotation: p.rotation,
            active: p.active,
        })
        .collect();

    Snapshot {
        player: state.player.clone(),
        enemies,
        projectiles,
        current_level: state.current_level,
        run_state: state.run_state,
    }
}
