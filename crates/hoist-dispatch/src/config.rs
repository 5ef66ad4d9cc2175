use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cost::CostModel;
use crate::error::{DispatchError, DispatchResult};

/// Tunable dispatch policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Penalties used to score car/call pairings.
    pub cost: CostModel,
    /// How strongly an idle car prefers floors with more waiting passengers.
    /// Each waiting passenger subtracts this much from the floor's distance. 0 = pure nearest.
    pub waiting_weight: u32,
    /// Stop for opposite-direction waiters on floors passed en route.
    pub allow_opposite_direction_pickup: bool,
    /// Spread the fleet evenly over the building at init.
    pub disperse_on_init: bool,
    /// Maximum decision log size (oldest entries dropped when exceeded). 0 = unlimited.
    pub max_log_entries: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cost: CostModel::default(),
            waiting_weight: 0,
            allow_opposite_direction_pickup: false,
            disperse_on_init: false,
            max_log_entries: 0,
        }
    }
}

impl DispatchConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> DispatchResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DispatchError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> DispatchResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set the cost model penalties.
    pub fn with_cost(mut self, cost: CostModel) -> Self {
        self.cost = cost;
        self
    }

    /// Set the waiting-count bias used when an idle car picks a call.
    pub fn with_waiting_weight(mut self, weight: u32) -> Self {
        self.waiting_weight = weight;
        self
    }

    /// Enable or disable opposite-direction pickups while passing floors.
    pub fn with_opposite_direction_pickup(mut self, allow: bool) -> Self {
        self.allow_opposite_direction_pickup = allow;
        self
    }

    /// Enable or disable spreading the fleet at init.
    pub fn with_disperse_on_init(mut self, disperse: bool) -> Self {
        self.disperse_on_init = disperse;
        self
    }

    /// Set the maximum decision log size (0 = unlimited).
    pub fn with_max_log_entries(mut self, max: usize) -> Self {
        self.max_log_entries = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::idle_score;

    #[test]
    fn config_default_values() {
        let config = DispatchConfig::default();
        assert_eq!(config.waiting_weight, 0);
        assert!(!config.allow_opposite_direction_pickup);
        assert!(!config.disperse_on_init);
        assert_eq!(config.max_log_entries, 0);
        assert_eq!(config.cost.idle_penalty, 2);
    }

    #[test]
    fn config_builder_chain() {
        let config = DispatchConfig::default()
            .with_waiting_weight(2)
            .with_opposite_direction_pickup(true)
            .with_disperse_on_init(true)
            .with_max_log_entries(100);
        assert_eq!(config.waiting_weight, 2);
        assert!(config.allow_opposite_direction_pickup);
        assert!(config.disperse_on_init);
        assert_eq!(config.max_log_entries, 100);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = DispatchConfig::from_json(
            r#"{ "allow_opposite_direction_pickup": true, "cost": { "passed_penalty": 10 } }"#,
        )
        .unwrap();
        assert!(config.allow_opposite_direction_pickup);
        assert_eq!(config.cost.passed_penalty, 10);
        assert_eq!(config.cost.opposite_penalty, 30);
        assert_eq!(config.waiting_weight, 0);
    }

    #[test]
    fn crowd_weighted_policy_from_json() {
        let config = DispatchConfig::from_json(r#"{ "waiting_weight": 2 }"#).unwrap();
        assert_eq!(config.waiting_weight, 2);
        // From floor 4: one rider at 3 against four riders at 8.
        let near = idle_score(4, 3, 1, config.waiting_weight);
        let crowded = idle_score(4, 8, 4, config.waiting_weight);
        assert_eq!((near, crowded), (-1, -4));
        assert!(crowded < near);

        let weight = DispatchConfig::default().waiting_weight;
        assert!(idle_score(4, 3, 1, weight) < idle_score(4, 8, 4, weight));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            DispatchConfig::from_json("{ not json"),
            Err(DispatchError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DispatchConfig::from_file(Path::new("/nonexistent/hoist.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/hoist.json"));
    }
}
