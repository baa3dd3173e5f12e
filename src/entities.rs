/// All simulation entity types.  Pure data, no logic.

use std::sync::Arc;

use crate::config::SimConfig;
use crate::geometry::Vec2;
use crate::level::LevelGrid;

/// Simulation clock in milliseconds since the run started.
pub type Millis = f64;

// ── Level tiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Wall,
    EnemySpawn,
    PlayerSpawn,
}

impl Tile {
    /// Glyph used by the ASCII level tables.
    pub fn from_glyph(glyph: char) -> Option<Tile> {
        match glyph {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            'E' => Some(Tile::EnemySpawn),
            'P' => Some(Tile::PlayerSpawn),
            _ => None,
        }
    }

    /// Numeric tile code (0 empty, 1 wall,
    /// 2 enemy spawn, 3 player spawn).
    pub fn from_code(code: u8) -> Option<Tile> {
        match code {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Wall),
            2 => Some(Tile::EnemySpawn),
            3 => Some(Tile::PlayerSpawn),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Wall => '#',
            Tile::EnemySpawn => 'E',
            Tile::PlayerSpawn => 'P',
        }
    }
}

// ── Combatants ────────────────────────────────────────────────────────────────

/// State shared by the player and every enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Never negative; zero means defeated.
    pub health: i32,
    /// `None` until the first shot, so a fresh combatant may fire at once.
    pub last_fired_at: Option<Millis>,
}

impl Combatant {
    pub fn new(position: Vec2, health: i32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            health,
            last_fired_at: None,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AiState {
    Patrol,
    Engage,
    TakeCover,
    Search,
}

/// Result of the last cover search, kept so the O(walls²) scan only runs on
/// Engage entry and once per cover period afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverMemory {
    pub position: Option<Vec2>,
    pub evaluated_at: Millis,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Spawn order within the level; stable for the level's lifetime.
    pub id: u32,
    pub body: Combatant,
    /// Cleared for good once health reaches zero.
    pub active: bool,
    pub state: AiState,
    pub patrol_path: [Vec2; 4],
    pub current_patrol_index: usize,
    pub last_state_change: Millis,
    pub search_start_time: Millis,
    /// Refreshed on every tick with line of sight, in any state.
    pub last_known_player_position: Option<Vec2>,
    pub cover: Option<CoverMemory>,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Firing angle in radians.
    pub rotation: f64,
    pub active: bool,
}

/// Fixed-capacity projectile slots for one owner.  Slots are reused in
/// place; the pool never grows.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectilePool {
    pub owner: Owner,
    pub slots: Vec<Projectile>,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Normalized per-tick intent from the input source.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// -1, 0 or 1; anything else is reduced to its sign.
    pub move_x: i8,
    pub move_y: i8,
    pub aim_point: Vec2,
    pub firing: bool,
}

// ── Run state ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Defeat,
    Victory,
}

/// What happened during one tick, for the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    LevelAdvanced { level: usize },
    Victory,
    Defeat,
    /// The run is already over; nothing moved.
    Halted,
}

/// The entire simulation state.  Cloneable so `tick` can hand back a new
/// value without mutating the caller's copy.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub config: SimConfig,
    /// Every level of the run, validated up front so advancing never fails.
    pub levels: Arc<Vec<LevelGrid>>,
    /// 1-based number of the level being played.
    pub current_level: usize,
    pub player: Combatant,
    pub enemies: Vec<Enemy>,
    pub player_projectiles: ProjectilePool,
    pub enemy_projectiles: ProjectilePool,
    pub clock: Millis,
    pub tick_count: u64,
    pub run_state: RunState,
}

impl SimulationState {
    /// Grid of the level being played.
    pub fn grid(&self) -> &LevelGrid {
        &self.levels[self.current_level - 1]
    }

    pub fn active_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }
}

// ── Renderer snapshot ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyView {
    pub id: u32,
    pub position: Vec2,
    pub health: i32,
    pub active: bool,
    pub state: AiState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileView {
    pub owner: Owner,
    pub position: Vec2,
    pub rotation: f64,
    pub active: bool,
}

/// Read-only view handed to the renderer between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub player: Combatant,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub current_level: usize,
    pub run_state: RunState,
}
