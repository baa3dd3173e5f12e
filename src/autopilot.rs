/// Scripted input source for headless runs.
///
/// Wanders in a random direction for a random number of ticks and fires at
/// the nearest enemy it can see.  All randomness comes through the seeded
/// RNG, so a given seed replays the same run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use paintball_tactics::entities::{PlayerInput, SimulationState};
use paintball_tactics::sight::has_line_of_sight;

/// Shortest and longest stretch, in ticks, before picking a new heading.
const HEADING_TICKS: std::ops::Range<u32> = 10..45;

pub struct Autopilot {
    rng: StdRng,
    move_x: i8,
    move_y: i8,
    ticks_left: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            move_x: 0,
            move_y: 0,
            ticks_left: 0,
        }
    }

    pub fn next_input(&mut self, state: &SimulationState) -> PlayerInput {
        if self.ticks_left == 0 {
            self.move_x = self.rng.gen_range(-1..=1);
            self.move_y = self.rng.gen_range(-1..=1);
            self.ticks_left = self.rng.gen_range(HEADING_TICKS);
        }
        self.ticks_left -= 1;

        let me = state.player.position;
        let walls = state.grid().walls();
        let target = state
            .enemies
            .iter()
            .filter(|e| e.active && has_line_of_sight(me, e.body.position, walls))
            .map(|e| e.body.position)
            .min_by(|a, b| me.distance(*a).total_cmp(&me.distance(*b)));

        PlayerInput {
            move_x: self.move_x,
            move_y: self.move_y,
            aim_point: target.unwrap_or(me),
            firing: target.is_some(),
        }
    }
}
