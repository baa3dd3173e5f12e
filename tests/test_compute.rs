use paintball_tactics::compute::*;
use paintball_tactics::config::SimConfig;
use paintball_tactics::entities::*;
use paintball_tactics::error::{ConfigError, LevelError, SimError};
use paintball_tactics::geometry::Vec2;
use paintball_tactics::level::LevelLayout;
use paintball_tactics::Simulation;

/// One open room: player at (100, 100), enemy at (380, 100).
fn arena() -> Vec<LevelLayout> {
    vec![LevelLayout::from_ascii(
        1,
        &[
            "############",
            "#..........#",
            "#.P......E.#",
            "#..........#",
            "############",
        ],
    )
    .unwrap()]
}

/// Two corridors.  Level 1: player (60, 60), enemy (140, 60).
/// Level 2: player (220, 100), enemy (60, 100).
fn two_levels() -> Vec<LevelLayout> {
    vec![
        LevelLayout::from_ascii(1, &["#####", "#P.E#", "#####"]).unwrap(),
        LevelLayout::from_ascii(2, &["#######", "#.....#", "#E...P#", "#######"]).unwrap(),
    ]
}

fn fragile_enemies() -> SimConfig {
    SimConfig {
        enemy_health: 1,
        ..SimConfig::default()
    }
}

fn idle() -> PlayerInput {
    PlayerInput::default()
}

fn shoot_at(target: Vec2) -> PlayerInput {
    PlayerInput {
        aim_point: target,
        firing: true,
        ..PlayerInput::default()
    }
}

/// Fire at the first active enemy every tick until something other than
/// `Continue` happens.
fn fight(mut state: SimulationState, max_ticks: usize) -> (SimulationState, TickOutcome) {
    for _ in 0..max_ticks {
        let target = state
            .enemies
            .iter()
            .find(|e| e.active)
            .map(|e| e.body.position)
            .unwrap_or_default();
        let (next, outcome) = tick(&state, &shoot_at(target), 0.05);
        state = next;
        if outcome != TickOutcome::Continue {
            return (state, outcome);
        }
    }
    panic!("no decisive outcome within {max_ticks} ticks");
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_run_starts_on_first_builtin_level() {
    let state = new_run(SimConfig::default()).unwrap();
    assert_eq!(state.current_level, 1);
    assert_eq!(state.levels.len(), 5);
    assert_eq!(state.run_state, RunState::Running);
    assert_eq!(state.clock, 0.0);
    assert_eq!(state.player.health, 45);
    assert_eq!(state.player.position, Vec2::new(100.0, 420.0));
    assert_eq!(state.enemies.len(), state.grid().spawn_points().enemies.len());
    assert!(state
        .enemies
        .iter()
        .all(|e| e.active && e.state == AiState::Patrol && e.body.health == 500));
    assert_eq!(state.player_projectiles.capacity(), 10);
    assert_eq!(state.enemy_projectiles.active_count(), 0);
}

#[test]
fn start_level_must_exist() {
    let config = SimConfig::default();
    assert!(matches!(
        new_run_with_levels(two_levels(), config.clone(), 0),
        Err(SimError::UnknownLevel(0))
    ));
    assert!(matches!(
        new_run_with_levels(two_levels(), config.clone(), 3),
        Err(SimError::UnknownLevel(3))
    ));
    let state = new_run_with_levels(two_levels(), config, 2).unwrap();
    assert_eq!(state.player.position, Vec2::new(220.0, 100.0));
}

#[test]
fn every_level_is_validated_up_front() {
    let mut layouts = two_levels();
    layouts.push(LevelLayout::from_ascii(3, &["#####", "#P..#", "#####"]).unwrap());
    let err = new_run_with_levels(layouts, SimConfig::default(), 1).unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidLevel {
            level: 3,
            source: LevelError::NoEnemySpawns
        }
    ));
}

#[test]
fn invalid_config_is_rejected() {
    let config = SimConfig {
        tile_size: 0.0,
        ..SimConfig::default()
    };
    let err = new_run_with_levels(two_levels(), config, 1).unwrap_err();
    assert!(matches!(
        err,
        SimError::Config(ConfigError::Invalid { field: "tile_size", .. })
    ));
}

// ── Tick basics ───────────────────────────────────────────────────────────────

#[test]
fn tick_advances_clock_and_counter() {
    let state = new_run_with_levels(arena(), SimConfig::default(), 1).unwrap();
    let (next, outcome) = tick(&state, &idle(), 0.5);
    assert_eq!(outcome, TickOutcome::Continue);
    assert_eq!(next.clock, 500.0);
    assert_eq!(next.tick_count, 1);
}

#[test]
fn tick_leaves_input_state_untouched() {
    let state = new_run_with_levels(arena(), SimConfig::default(), 1).unwrap();
    let input = PlayerInput {
        move_x: 1,
        ..shoot_at(Vec2::new(380.0, 100.0))
    };
    let _ = tick(&state, &input, 0.1);
    assert_eq!(state.clock, 0.0);
    assert_eq!(state.tick_count, 0);
    assert_eq!(state.player.position, Vec2::new(100.0, 100.0));
    assert_eq!(state.player_projectiles.active_count(), 0);
    assert!(state.enemies.iter().all(|e| e.state == AiState::Patrol));
}

#[test]
fn player_moves_at_fixed_speed() {
    let state = new_run_with_levels(arena(), SimConfig::default(), 1).unwrap();
    let input = PlayerInput {
        move_x: 1,
        ..idle()
    };
    let (next, _) = tick(&state, &input, 0.1);
    assert!((next.player.position.x - 115.0).abs() < 1e-9);
    assert_eq!(next.player.position.y, 100.0);
    assert_eq!(next.player.velocity, Vec2::new(150.0, 0.0));

    let (stopped, _) = tick(&next, &idle(), 0.1);
    assert_eq!(stopped.player.velocity, Vec2::ZERO);
}

#[test]
fn large_step_stops_player_at_wall() {
    let layouts = vec![LevelLayout::from_ascii(
        1,
        &["#########", "#P.#...E#", "#########"],
    )
    .unwrap()];
    let state = new_run_with_levels(layouts, SimConfig::default(), 1).unwrap();
    assert_eq!(state.player.position, Vec2::new(60.0, 60.0));

    let input = PlayerInput {
        move_x: 1,
        ..idle()
    };
    let (next, _) = tick(&state, &input, 1.0);
    // Wall tile spans x in [120, 160]; its body starts at 122
    assert!((next.player.position.x - 110.0).abs() < 1e-9);
}

#[test]
fn player_fire_respects_cooldown() {
    let state = new_run_with_levels(arena(), SimConfig::default(), 1).unwrap();
    let input = shoot_at(Vec2::new(380.0, 100.0));

    let (s1, _) = tick(&state, &input, 0.05); // 50 ms: first shot
    assert_eq!(s1.player_projectiles.active_count(), 1);
    assert_eq!(s1.player.last_fired_at, Some(50.0));

    let (s2, _) = tick(&s1, &input, 0.05); // 100 ms
    let (s3, _) = tick(&s2, &input, 0.05); // 150 ms: exactly one period
    assert_eq!(s3.player_projectiles.active_count(), 1);

    let (s4, _) = tick(&s3, &input, 0.05); // 200 ms
    assert_eq!(s4.player_projectiles.active_count(), 2);
}

#[test]
fn player_pool_caps_live_projectiles() {
    let config = SimConfig {
        player_fire_rate_ms: 0.0,
        ..SimConfig::default()
    };
    let mut state = new_run_with_levels(arena(), config, 1).unwrap();
    let input = shoot_at(Vec2::new(380.0, 100.0));
    for _ in 0..12 {
        state = tick(&state, &input, 0.01).0;
    }
    assert_eq!(state.player_projectiles.active_count(), 10);
    assert_eq!(state.player_projectiles.capacity(), 10);
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[test]
fn enemy_engages_then_fires_at_player() {
    let layouts = vec![LevelLayout::from_ascii(
        1,
        &["#######", "#.....#", "#.E...#", "#.....#", "#.P...#", "#######"],
    )
    .unwrap()];
    let state = new_run_with_levels(layouts, SimConfig::default(), 1).unwrap();
    let dt = 1.0 / 60.0;

    let (s1, _) = tick(&state, &idle(), dt);
    assert_eq!(s1.enemies[0].state, AiState::Engage);
    assert_eq!(s1.enemy_projectiles.active_count(), 0);

    let (s2, _) = tick(&s1, &idle(), dt);
    let shot = s2.enemy_projectiles.active().next().unwrap();
    assert!(shot.velocity.x.abs() < 1e-6);
    assert!((shot.velocity.y - 500.0).abs() < 1e-6);
}

#[test]
fn player_hit_costs_enemy_one_point() {
    let mut state = new_run_with_levels(arena(), SimConfig::default(), 1).unwrap();
    state = tick(&state, &shoot_at(Vec2::new(380.0, 100.0)), 0.1).0;
    for _ in 0..20 {
        if state.enemies[0].body.health < 500 {
            break;
        }
        state = tick(&state, &idle(), 0.1).0;
    }
    assert_eq!(state.enemies[0].body.health, 499);
    assert!(state.enemies[0].active);
}

// ── Progression ───────────────────────────────────────────────────────────────

#[test]
fn clearing_a_level_loads_the_next() {
    let mut state = new_run_with_levels(two_levels(), fragile_enemies(), 1).unwrap();
    state.player.health = 10;

    let (next, outcome) = fight(state, 60);
    assert_eq!(outcome, TickOutcome::LevelAdvanced { level: 2 });
    assert_eq!(next.current_level, 2);
    assert_eq!(next.run_state, RunState::Running);
    assert_eq!(next.player.health, 45);
    assert_eq!(next.player.position, Vec2::new(220.0, 100.0));
    assert_eq!(next.enemies.len(), 1);
    assert_eq!(next.enemies[0].body.position, Vec2::new(60.0, 100.0));
    assert_eq!(next.enemies[0].state, AiState::Patrol);
    assert_eq!(next.player_projectiles.active_count(), 0);
    assert_eq!(next.enemy_projectiles.active_count(), 0);
    assert!(next.clock > 0.0);
}

#[test]
fn clearing_the_last_level_wins_and_halts() {
    let state = new_run_with_levels(two_levels(), fragile_enemies(), 2).unwrap();
    let (won, outcome) = fight(state, 80);
    assert_eq!(outcome, TickOutcome::Victory);
    assert_eq!(won.run_state, RunState::Victory);
    assert_eq!(won.current_level, 2);

    let (after, outcome) = tick(&won, &shoot_at(Vec2::ZERO), 0.05);
    assert_eq!(outcome, TickOutcome::Halted);
    assert_eq!(after.clock, won.clock);
    assert_eq!(after.tick_count, won.tick_count);
}

#[test]
fn restart_after_victory_goes_back_to_level_one() {
    let state = new_run_with_levels(two_levels(), fragile_enemies(), 2).unwrap();
    let (won, _) = fight(state, 80);

    let fresh = restart(&won);
    assert_eq!(fresh.current_level, 1);
    assert_eq!(fresh.run_state, RunState::Running);
    assert_eq!(fresh.player.position, Vec2::new(60.0, 60.0));
    assert_eq!(fresh.player.health, 45);
    assert_eq!(fresh.clock, won.clock);
    assert_eq!(fresh.player_projectiles.active_count(), 0);
}

#[test]
fn defeat_halts_and_restart_replays_the_level() {
    let config = SimConfig {
        player_health: 1,
        ..SimConfig::default()
    };
    let mut state = new_run_with_levels(two_levels(), config, 2).unwrap();
    let at_player = state.player.position;
    state.enemy_projectiles.launch(at_player, 0.0, 500.0);

    let (lost, outcome) = tick(&state, &idle(), 1.0 / 60.0);
    assert_eq!(outcome, TickOutcome::Defeat);
    assert_eq!(lost.run_state, RunState::Defeat);
    assert_eq!(lost.player.health, 0);

    assert_eq!(tick(&lost, &idle(), 1.0 / 60.0).1, TickOutcome::Halted);

    let again = restart(&lost);
    assert_eq!(again.current_level, 2);
    assert_eq!(again.run_state, RunState::Running);
    assert_eq!(again.player.health, 1);
    assert_eq!(again.player.position, Vec2::new(220.0, 100.0));
    assert_eq!(again.enemy_projectiles.active_count(), 0);
}

// ── Snapshot & wrapper ────────────────────────────────────────────────────────

#[test]
fn snapshot_lists_every_slot() {
    let state = new_run_with_levels(arena(), SimConfig::default(), 1).unwrap();
    let (state, _) = tick(&state, &shoot_at(Vec2::new(380.0, 100.0)), 0.05);
    let snap = snapshot(&state);

    assert_eq!(snap.projectiles.len(), 20);
    assert!(snap.projectiles[..10].iter().all(|p| p.owner == Owner::Player));
    assert!(snap.projectiles[10..].iter().all(|p| p.owner == Owner::Enemy));
    assert_eq!(snap.projectiles.iter().filter(|p| p.active).count(), 1);
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].state, AiState::Engage);
    assert_eq!(snap.current_level, 1);
    assert_eq!(snap.player, state.player);
}

#[test]
fn simulation_wrapper_drives_the_run() {
    let mut sim = Simulation::with_levels(two_levels(), SimConfig::default(), 1).unwrap();
    assert_eq!(sim.tick(&idle(), 0.05), TickOutcome::Continue);
    assert_eq!(sim.state().tick_count, 1);
    assert_eq!(sim.snapshot().current_level, 1);

    sim.restart();
    assert_eq!(sim.state().run_state, RunState::Running);
    assert_eq!(sim.state().player.position, Vec2::new(60.0, 60.0));
}

#[test]
fn simulation_initializes_builtin_levels() {
    let sim = Simulation::initialize(SimConfig::default(), 3).unwrap();
    assert_eq!(sim.state().current_level, 3);
    assert!(Simulation::initialize(SimConfig::default(), 6).is_err());
}
