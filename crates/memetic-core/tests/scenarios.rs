//! End-to-end scenarios exercising the manager, worlds, and diffusion
//! dynamics together.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::time::Duration;

use memetic_agents::{Idea, IdeaError, IdeaTarget};
use memetic_core::{EngineSettings, IdeaSeed, ManagerError, SimulationManager};
use memetic_types::{MutationType, NetworkType, UserId, WorldConfig, WorldId, WorldStatus};

fn make_manager(cap: usize) -> SimulationManager {
    SimulationManager::new(EngineSettings {
        max_concurrent_worlds: cap,
        ..EngineSettings::default()
    })
}

fn quiet_config() -> WorldConfig {
    WorldConfig {
        population_size: 100,
        network_type: NetworkType::Random,
        network_density: 0.1,
        mutation_rate: 0.0,
        decay_rate: 0.0,
        time_step_ms: 10,
        seed: Some(17),
        ..WorldConfig::default()
    }
}

fn viral_seed(initial_adopters: u32) -> IdeaSeed {
    IdeaSeed {
        creator_id: UserId::new(),
        text: String::from("Everyone is talking about this"),
        tags: Vec::new(),
        target: IdeaTarget::default(),
        virality_score: 1.0,
        emotional_valence: 1.0,
        initial_adopters,
    }
}

async fn create(manager: &SimulationManager, config: WorldConfig) -> WorldId {
    manager
        .create_world(UserId::new(), "Scenario World", "", config, true)
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Isolation: a near-edgeless graph cannot carry an idea far
// ---------------------------------------------------------------------------

#[tokio::test]
async fn isolation_keeps_an_idea_contained() {
    let manager = make_manager(10);
    let config = WorldConfig {
        network_density: 0.01,
        ..quiet_config()
    };
    // Erdos-Renyi at the density floor: the seeded agent has almost no
    // edges to spread over.
    let world_id = create(&manager, config).await;
    let idea = manager.inject_idea(world_id, viral_seed(1)).await.unwrap();

    for _ in 0..5 {
        manager.step_world(world_id, 10).await.unwrap();
    }

    let tracked = manager.get_idea(world_id, idea.id).await.unwrap();
    let stats = manager.get_stats(world_id).await.unwrap();

    assert_eq!(stats.step, 50);
    // Exposure bookkeeping stays consistent with the spread counters.
    assert!(tracked.adopter_count >= 1);
    assert_eq!(
        tracked.reach,
        stats.total_spread_events,
        "every recorded attempt exposes exactly once"
    );
    // One seed on a sparse graph cannot light up the population.
    assert!(
        stats.active_agents < 50,
        "sparse world unexpectedly saturated: {} active",
        stats.active_agents
    );
}

// ---------------------------------------------------------------------------
// Saturation: a viral idea on a dense small world reaches 80%
// ---------------------------------------------------------------------------

#[tokio::test]
async fn saturation_reached_on_dense_small_world() {
    let manager = make_manager(10);
    let config = WorldConfig {
        population_size: 200,
        network_type: NetworkType::SmallWorld,
        network_density: 0.2,
        seed: Some(23),
        ..quiet_config()
    };
    let world_id = create(&manager, config).await;
    manager.inject_idea(world_id, viral_seed(5)).await.unwrap();

    let mut saturated = false;
    for _ in 0..20 {
        manager.step_world(world_id, 10).await.unwrap();
        let stats = manager.get_stats(world_id).await.unwrap();
        if stats.saturation >= 0.8 {
            saturated = true;
            break;
        }
    }

    assert!(saturated, "idea failed to saturate within 200 ticks");
}

// ---------------------------------------------------------------------------
// Mutation budget: the third mutation past a budget of two fails
// ---------------------------------------------------------------------------

#[test]
fn mutation_budget_blocks_the_third_child() {
    let mut idea = Idea::new(UserId::new(), WorldId::new(), "Budgeted");
    idea.mutation_budget = 2;

    idea.create_mutation(MutationType::Simplify, "v1", 0.05, 0.0)
        .unwrap();
    idea.create_mutation(MutationType::Memeify, "v2", 0.10, 0.05)
        .unwrap();

    let third = idea.create_mutation(MutationType::Polarize, "v3", 0.08, 0.15);
    assert!(matches!(third, Err(IdeaError::BudgetExhausted { .. })));
    assert_eq!(idea.mutation_count, 2);
}

// ---------------------------------------------------------------------------
// Decay: full decay clears the seeded belief in one tick
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_decay_forgets_everything() {
    let manager = make_manager(10);
    let config = WorldConfig {
        decay_rate: 1.0,
        ..quiet_config()
    };
    let world_id = create(&manager, config).await;
    manager.inject_idea(world_id, viral_seed(1)).await.unwrap();

    let reports = manager.step_world(world_id, 1).await.unwrap();

    assert!(reports.first().unwrap().decays >= 1);
    let stats = manager.get_stats(world_id).await.unwrap();
    assert_eq!(stats.active_agents, 0);
}

// ---------------------------------------------------------------------------
// Capacity: a cap of two rejects the third world
// ---------------------------------------------------------------------------

#[tokio::test]
async fn capacity_cap_rejects_third_world() {
    let manager = make_manager(2);
    create(&manager, quiet_config()).await;
    create(&manager, quiet_config()).await;

    let third = manager
        .create_world(UserId::new(), "One Too Many", "", quiet_config(), true)
        .await;

    match third {
        Err(ManagerError::CapacityExhausted { held, cap }) => {
            assert_eq!(held, 2);
            assert_eq!(cap, 2);
        }
        other => panic!("expected CapacityExhausted, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Step/stop: the loop advances, stops cleanly, and manual steps
// leave the world paused
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stop_then_manual_step_stays_paused() {
    let manager = make_manager(10);
    let world_id = create(&manager, quiet_config()).await;
    manager.inject_idea(world_id, viral_seed(3)).await.unwrap();

    manager.start_world(world_id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    let stopped = manager.stop_world(world_id).await.unwrap();

    assert!(stopped.current_step >= 1, "loop never ticked");
    assert_eq!(stopped.status, WorldStatus::Paused);

    let before = stopped.current_step;
    let reports = manager.step_world(world_id, 1).await.unwrap();
    assert_eq!(reports.len(), 1);

    let after = manager.get_world(world_id).await.unwrap();
    assert_eq!(after.current_step, before + 1);
    assert_eq!(after.status, WorldStatus::Paused);

    manager.shutdown().await;
}

// ---------------------------------------------------------------------------
// Start/stop idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_stop_start_equals_start() {
    let manager = make_manager(10);
    let world_id = create(&manager, quiet_config()).await;

    manager.start_world(world_id).await.unwrap();
    manager.stop_world(world_id).await.unwrap();
    let restarted = manager.start_world(world_id).await.unwrap();

    assert_eq!(restarted.status, WorldStatus::Running);
    manager.shutdown().await;
}

// ---------------------------------------------------------------------------
// Multi-world parallelism
// ---------------------------------------------------------------------------

#[tokio::test]
async fn independent_worlds_advance_concurrently() {
    let manager = make_manager(10);
    let first = create(&manager, quiet_config()).await;
    let second = create(&manager, quiet_config()).await;
    manager.inject_idea(first, viral_seed(2)).await.unwrap();
    manager.inject_idea(second, viral_seed(2)).await.unwrap();

    manager.start_world(first).await.unwrap();
    manager.start_world(second).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    manager.shutdown().await;

    let first_summary = manager.get_world(first).await.unwrap();
    let second_summary = manager.get_world(second).await.unwrap();
    assert!(first_summary.current_step >= 1);
    assert!(second_summary.current_step >= 1);
}
