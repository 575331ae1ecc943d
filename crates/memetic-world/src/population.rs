//! Population seeding: generate a world's agents with region-weighted
//! demographics.
//!
//! Regions are drawn from the configured categorical weights (they need
//! not sum to 1); each agent then gets a random profile -- bell-shaped
//! trust and openness, right-skewed influence, 2-5 interests from the
//! catalog. All draws come from the world's own generator so a seeded
//! world reproduces its population.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use tracing::debug;

use memetic_agents::{Agent, AgentProfile};
use memetic_types::{Region, WorldConfig, WorldId};

/// Generate `config.population_size` agents for the given world.
///
/// Falls back to the first configured region if the weight table cannot
/// be sampled (the control surface validates weights before a world is
/// built, so this path is defensive only for direct library use).
pub fn build_population<R: Rng + ?Sized>(
    rng: &mut R,
    world_id: WorldId,
    config: &WorldConfig,
) -> Vec<Agent> {
    let weights = WeightedIndex::new(config.region_weights.iter().copied()).ok();
    let fallback_region = config.regions.first().copied().unwrap_or(Region::Na);

    let mut agents = Vec::with_capacity(usize::try_from(config.population_size).unwrap_or(0));
    for _ in 0..config.population_size {
        let region = weights
            .as_ref()
            .map(|dist| dist.sample(rng))
            .and_then(|slot| config.regions.get(slot).copied())
            .unwrap_or(fallback_region);
        agents.push(Agent::new(world_id, AgentProfile::random(rng, region)));
    }

    debug!(
        %world_id,
        population = agents.len(),
        regions = config.regions.len(),
        "Population seeded"
    );

    agents
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn config_with_regions(regions: Vec<Region>, region_weights: Vec<f64>) -> WorldConfig {
        WorldConfig {
            population_size: 200,
            regions,
            region_weights,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn population_size_is_honored() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = WorldConfig {
            population_size: 150,
            ..WorldConfig::default()
        };
        let agents = build_population(&mut rng, WorldId::new(), &config);
        assert_eq!(agents.len(), 150);
    }

    #[test]
    fn agents_only_use_configured_regions() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = config_with_regions(vec![Region::Eu, Region::Asia], vec![0.5, 0.5]);
        let agents = build_population(&mut rng, WorldId::new(), &config);
        assert!(
            agents
                .iter()
                .all(|a| matches!(a.profile.region, Region::Eu | Region::Asia))
        );
    }

    #[test]
    fn zero_weight_region_is_never_drawn() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = config_with_regions(vec![Region::Na, Region::Oceania], vec![1.0, 0.0]);
        let agents = build_population(&mut rng, WorldId::new(), &config);
        assert!(agents.iter().all(|a| a.profile.region == Region::Na));
    }

    #[test]
    fn heavier_regions_dominate() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = config_with_regions(vec![Region::Asia, Region::Africa], vec![0.9, 0.1]);
        let agents = build_population(&mut rng, WorldId::new(), &config);
        let asia = agents
            .iter()
            .filter(|a| a.profile.region == Region::Asia)
            .count();
        assert!(asia > 120, "asia count {asia} below weight expectation");
    }

    #[test]
    fn same_seed_reproduces_profiles() {
        let config = WorldConfig {
            population_size: 120,
            ..WorldConfig::default()
        };
        let world_id = WorldId::new();

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let first = build_population(&mut rng_a, world_id, &config);
        let second = build_population(&mut rng_b, world_id, &config);

        let profiles_a: Vec<_> = first.iter().map(|a| a.profile.clone()).collect();
        let profiles_b: Vec<_> = second.iter().map(|a| a.profile.clone()).collect();
        assert_eq!(profiles_a, profiles_b);
    }
}
