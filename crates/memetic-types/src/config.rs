//! World configuration with wire-exact validation ranges.
//!
//! [`WorldConfig`] is the declarative description an operator submits when
//! creating a world. Every numeric field carries the range the control
//! surface enforces; serde defaults let callers omit anything they do not
//! care about.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use crate::enums::{NetworkType, Region};

/// Declarative configuration for one simulation world.
///
/// Ranges are validated by the control surface before a world is built:
/// `population_size` in `[100, 100000]`, `network_density` in `[0.01, 1.0]`,
/// `mutation_rate` and `decay_rate` in `[0, 1]`, `time_step_ms` in
/// `[10, 10000]`. `regions` and `region_weights` must additionally pass
/// [`WorldConfig::check_region_axes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldConfig {
    /// Number of agents to generate at world construction.
    #[serde(default = "default_population_size")]
    #[validate(range(min = 100, max = 100_000))]
    pub population_size: u32,

    /// Random-graph model used to wire the population.
    #[serde(default)]
    pub network_type: NetworkType,

    /// Edge density parameter interpreted per topology (average
    /// connections relative to population).
    #[serde(default = "default_network_density")]
    #[validate(range(min = 0.01, max = 1.0))]
    pub network_density: f64,

    /// Probability that an accepted spread also triggers a mutation.
    #[serde(default = "default_mutation_rate")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub mutation_rate: f64,

    /// Per-step probability that an agent forgets each held belief.
    #[serde(default = "default_decay_rate")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub decay_rate: f64,

    /// Real-time milliseconds the loop sleeps between ticks.
    #[serde(default = "default_time_step_ms")]
    #[validate(range(min = 10, max = 10_000))]
    pub time_step_ms: u64,

    /// Step count at which the world transitions to `completed`.
    /// `None` runs until stopped.
    #[serde(default)]
    pub max_steps: Option<u64>,

    /// Regions agents are assigned to, paired with `region_weights`.
    #[serde(default = "default_regions")]
    pub regions: Vec<Region>,

    /// Categorical weights for region assignment. Need not sum to 1.
    #[serde(default = "default_region_weights")]
    pub region_weights: Vec<f64>,

    /// Seed for the world's random number generator. `None` draws from
    /// OS entropy; `Some` gives seed-level reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            network_type: NetworkType::default(),
            network_density: default_network_density(),
            mutation_rate: default_mutation_rate(),
            decay_rate: default_decay_rate(),
            time_step_ms: default_time_step_ms(),
            max_steps: None,
            regions: default_regions(),
            region_weights: default_region_weights(),
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Check that the region axis is well-formed: both vectors the same
    /// non-zero length, all weights finite and non-negative, and at
    /// least one weight positive.
    pub fn check_region_axes(&self) -> Result<(), String> {
        if self.regions.is_empty() {
            return Err(String::from("regions must not be empty"));
        }
        if self.regions.len() != self.region_weights.len() {
            return Err(format!(
                "regions and region_weights length mismatch: {} vs {}",
                self.regions.len(),
                self.region_weights.len()
            ));
        }
        let mut positive = false;
        for weight in &self.region_weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(format!("invalid region weight: {weight}"));
            }
            if *weight > 0.0 {
                positive = true;
            }
        }
        if !positive {
            return Err(String::from("region weights must not all be zero"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_population_size() -> u32 {
    10_000
}

const fn default_network_density() -> f64 {
    0.1
}

const fn default_mutation_rate() -> f64 {
    0.01
}

const fn default_decay_rate() -> f64 {
    0.001
}

const fn default_time_step_ms() -> u64 {
    100
}

fn default_regions() -> Vec<Region> {
    Region::ALL.to_vec()
}

fn default_region_weights() -> Vec<f64> {
    Region::ALL.iter().map(|r| r.default_weight()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.check_region_axes().is_ok());
        assert_eq!(config.population_size, 10_000);
        assert_eq!(config.regions.len(), config.region_weights.len());
    }

    #[test]
    fn population_out_of_range_rejected() {
        let config = WorldConfig {
            population_size: 50,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn density_below_floor_rejected() {
        let config = WorldConfig {
            network_density: 0.001,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn mismatched_region_weights_rejected() {
        let config = WorldConfig {
            regions: vec![Region::Na, Region::Eu],
            region_weights: vec![1.0],
            ..WorldConfig::default()
        };
        assert!(config.check_region_axes().is_err());
    }

    #[test]
    fn zero_weights_rejected() {
        let config = WorldConfig {
            regions: vec![Region::Na, Region::Eu],
            region_weights: vec![0.0, 0.0],
            ..WorldConfig::default()
        };
        assert!(config.check_region_axes().is_err());
    }

    #[test]
    fn empty_regions_rejected() {
        let config = WorldConfig {
            regions: Vec::new(),
            region_weights: Vec::new(),
            ..WorldConfig::default()
        };
        assert!(config.check_region_axes().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let parsed: Result<WorldConfig, _> =
            serde_json::from_str(r#"{"population_size": 500, "network_type": "small_world"}"#);
        assert!(parsed.is_ok());
        let config = parsed.unwrap_or_default();
        assert_eq!(config.population_size, 500);
        assert_eq!(config.network_type, NetworkType::SmallWorld);
        assert!((config.decay_rate - 0.001).abs() < f64::EPSILON);
    }
}
