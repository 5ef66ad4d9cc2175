use hoist_core::BuildingSpec;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for deterministic traffic.
    pub seed: u64,
    /// Building dimensions.
    pub building: BuildingSpec,
    /// Probability that a new passenger appears on any given tick (0.0..=1.0).
    pub spawn_rate: f64,
    /// Maximum event trace size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            building: BuildingSpec::default(),
            spawn_rate: 0.3,
            max_events: 0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic traffic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the building dimensions.
    pub fn with_building(mut self, building: BuildingSpec) -> Self {
        self.building = building;
        self
    }

    /// Set the per-tick spawn probability. 0.0 disables random traffic.
    pub fn with_spawn_rate(mut self, rate: f64) -> Self {
        self.spawn_rate = rate;
        self
    }

    /// Set the maximum event trace size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
