use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hoist_core::Floor;

use crate::error::{SimError, SimResult};

/// Seeded random passenger arrivals: at most one new trip per tick, with a
/// uniformly chosen origin and a different uniformly chosen destination.
#[derive(Debug, Clone)]
pub struct TrafficGenerator {
    rng: StdRng,
    floors: u32,
    spawn_rate: f64,
}

impl TrafficGenerator {
    /// Create a generator for a building with `floors` floors.
    pub fn new(seed: u64, floors: u32, spawn_rate: f64) -> SimResult<Self> {
        if !(0.0..=1.0).contains(&spawn_rate) {
            return Err(SimError::InvalidSpawnRate(spawn_rate));
        }
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            floors,
            spawn_rate,
        })
    }

    /// The per-tick spawn probability.
    pub fn spawn_rate(&self) -> f64 {
        self.spawn_rate
    }

    /// Turn off further arrivals.
    pub fn stop(&mut self) {
        self.spawn_rate = 0.0;
    }

    /// Roll for this tick's arrival. Returns `(origin, destination)`.
    pub fn next_trip(&mut self) -> Option<(Floor, Floor)> {
        if self.floors < 2 || !self.rng.random_bool(self.spawn_rate) {
            return None;
        }
        let origin = self.rng.random_range(0..self.floors);
        let mut destination = self.rng.random_range(0..self.floors - 1);
        if destination >= origin {
            destination += 1;
        }
        Some((origin, destination))
    }
}
