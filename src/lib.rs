//! Simulation core for a top-down tactical shooter.
//!
//! Everything in the library is pure game logic: the level grid, perception,
//! pathing, cover search, enemy AI, projectiles and the per-tick driver.
//! Rendering and input capture live in the binary.

pub mod ai;
pub mod catalogue;
pub mod combat;
pub mod compute;
pub mod config;
pub mod cover;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod level;
pub mod pathing;
pub mod physics;
pub mod sight;
pub mod simulation;

pub use compute::{new_run, restart, snapshot, tick};
pub use config::SimConfig;
pub use entities::{PlayerInput, RunState, SimulationState, Snapshot, TickOutcome};
pub use error::{Result, SimError};
pub use simulation::Simulation;
