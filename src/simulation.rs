/// Owning wrapper around the pure tick functions, for hosts that prefer a
/// mutable handle over threading `SimulationState` values by hand.

use crate::catalogue::builtin_levels;
use crate::compute;
use crate::config::SimConfig;
use crate::entities::{PlayerInput, SimulationState, Snapshot, TickOutcome};
use crate::error::Result;
use crate::level::LevelLayout;

#[derive(Clone, Debug)]
pub struct Simulation {
    state: SimulationState,
}

impl Simulation {
    /// Built-in levels, starting at the 1-based `level`.
    pub fn initialize(config: SimConfig, level: usize) -> Result<Self> {
        Self::with_levels(builtin_levels()?, config, level)
    }

    pub fn with_levels(layouts: Vec<LevelLayout>, config: SimConfig, level: usize) -> Result<Self> {
        Ok(Self {
            state: compute::new_run_with_levels(layouts, config, level)?,
        })
    }

    pub fn tick(&mut self, input: &PlayerInput, dt: f64) -> TickOutcome {
        let (next, outcome) = compute::tick(&self.state, input, dt);
        self.state = next;
        outcome
    }

    pub fn restart(&mut self) {
        self.state = compute::restart(&self.state);
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        compute::snapshot(&self.state)
    }
}
