/// Tunable simulation constants.
///
/// Defaults are the tuned game values.  A TOML file may override any
/// subset of the fields; missing keys keep their default value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::entities::Millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === LEVEL ===
    /// Edge length of one square tile in world units.
    pub tile_size: f64,
    /// Wall collision bodies are the tile shrunk by this much on each side.
    /// Sight tests use the full tile.
    pub wall_body_inset: f64,
    /// Patrol rooms are square blocks of this many tiles.
    pub room_tiles: usize,
    /// Patrol rectangle inset from the room edge, in tiles.
    pub patrol_margin_tiles: f64,
    /// Path resolver bucket edge, in tiles.
    pub path_bucket_tiles: f64,

    // === MOVEMENT ===
    pub player_speed: f64,
    pub enemy_speed: f64,
    /// Distance under which a waypoint counts as reached.
    pub movement_threshold: f64,
    /// Square hitbox edge for player and enemies.
    pub combatant_hitbox: f64,

    // === COMBAT ===
    pub player_fire_rate_ms: Millis,
    pub enemy_fire_rate_ms: Millis,
    pub bullet_speed: f64,
    pub bullet_hitbox: f64,
    pub bullet_damage: i32,
    pub player_health: i32,
    pub enemy_health: i32,
    /// Live projectile slots per owner.
    pub pool_capacity: usize,

    // === AI ===
    pub view_distance: f64,
    /// Preferred engagement range.  Enemies back off under 0.7x and close in
    /// beyond 1.3x of this value.
    pub combat_distance: f64,
    pub too_close_factor: f64,
    pub too_far_factor: f64,
    pub patrol_speed_factor: f64,
    pub search_speed_factor: f64,
    pub hold_cover_speed_factor: f64,
    pub search_duration_ms: Millis,
    /// Cover re-evaluation period and the longest stay in TakeCover.
    pub cover_time_ms: Millis,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tile_size: 40.0,
            wall_body_inset: 2.0,
            room_tiles: 8,
            patrol_margin_tiles: 2.0,
            path_bucket_tiles: 3.0,

            player_speed: 150.0,
            enemy_speed: 150.0,
            movement_threshold: 5.0,
            combatant_hitbox: 24.0,

            player_fire_rate_ms: 100.0,
            enemy_fire_rate_ms: 100.0,
            bullet_speed: 500.0,
            bullet_hitbox: 8.0,
            bullet_damage: 1,
            player_health: 45,
            enemy_health: 500,
            pool_capacity: 10,

            view_distance: 500.0,
            combat_distance: 100.0,
            too_close_factor: 0.7,
            too_far_factor: 1.3,
            patrol_speed_factor: 0.5,
            search_speed_factor: 0.75,
            hold_cover_speed_factor: 0.5,
            search_duration_ms: 3000.0,
            cover_time_ms: 1000.0,
        }
    }
}

impl SimConfig {
    /// Parse TOML overrides on top of the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f64); 9] = [
            ("tile_size", self.tile_size),
            ("player_speed", self.player_speed),
            ("enemy_speed", self.enemy_speed),
            ("bullet_speed", self.bullet_speed),
            ("combatant_hitbox", self.combatant_hitbox),
            ("bullet_hitbox", self.bullet_hitbox),
            ("view_distance", self.view_distance),
            ("path_bucket_tiles", self.path_bucket_tiles),
            ("cover_time_ms", self.cover_time_ms),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if !(self.movement_threshold >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "movement_threshold",
                reason: format!("must not be negative, got {}", self.movement_threshold),
            });
        }
        if self.bullet_damage <= 0 {
            return Err(ConfigError::Invalid {
                field: "bullet_damage",
                reason: format!("must be positive, got {}", self.bullet_damage),
            });
        }
        if self.wall_body_inset < 0.0 || self.wall_body_inset * 2.0 >= self.tile_size {
            return Err(ConfigError::Invalid {
                field: "wall_body_inset",
                reason: format!("must lie in [0, tile_size / 2), got {}", self.wall_body_inset),
            });
        }
        if self.room_tiles == 0 {
            return Err(ConfigError::Invalid {
                field: "room_tiles",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.pool_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "pool_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.player_health <= 0 || self.enemy_health <= 0 {
            return Err(ConfigError::Invalid {
                field: "health",
                reason: "player and enemy health must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Edge of one path-resolver bucket in world units.
    pub fn path_bucket(&self) -> f64 {
        self.path_bucket_tiles * self.tile_size
    }
}
