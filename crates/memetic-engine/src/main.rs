//! Engine binary for the Memetic simulation.
//!
//! Boots the simulation manager, creates a demonstration world from the
//! environment-provided defaults, seeds it with an idea, and runs until
//! interrupted. Periodic status logging stands in for a front-end; the
//! control surface in `memetic-core` is the integration point for real
//! clients.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load engine settings from the environment
//! 3. Create the simulation manager
//! 4. Build the demo world (population + topology, synchronous)
//! 5. Inject a seed idea and start the world loop
//! 6. Log stats periodically until ctrl-c
//! 7. Shut the manager down cleanly

use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use memetic_agents::IdeaTarget;
use memetic_core::{EngineSettings, IdeaSeed, SimulationManager};
use memetic_types::{NetworkType, UserId, WorldConfig};

/// How often the status line is logged while the demo world runs.
const STATUS_INTERVAL: Duration = Duration::from_secs(5);

/// Application entry point for the engine binary.
///
/// # Errors
///
/// Returns an error if any startup step fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("memetic-engine starting");

    // 2. Load engine settings from the environment.
    let settings = EngineSettings::from_env();
    info!(
        max_concurrent_worlds = settings.max_concurrent_worlds,
        default_population_size = settings.default_population_size,
        simulation_tick_ms = settings.simulation_tick_ms,
        "Settings loaded"
    );

    // 3. Create the manager.
    let manager = SimulationManager::new(settings.clone());

    // 4. Build the demo world. Population and topology are built
    //    synchronously inside create_world.
    let operator = UserId::new();
    let config = WorldConfig {
        population_size: settings.default_population_size.min(2_000),
        network_type: NetworkType::ScaleFree,
        network_density: 0.05,
        mutation_rate: 0.02,
        decay_rate: 0.002,
        time_step_ms: settings.simulation_tick_ms,
        ..WorldConfig::default()
    };
    let world = manager
        .create_world(operator, "Demo World", "Engine demonstration world", config, true)
        .await?;
    info!(world_id = %world.id, agents = world.agent_count, "Demo world created");

    // 5. Seed an idea and start the loop.
    let idea = manager
        .inject_idea(
            world.id,
            IdeaSeed {
                creator_id: operator,
                text: String::from("A catchy idea worth passing along"),
                tags: vec![String::from("tech"), String::from("social")],
                target: IdeaTarget::default(),
                virality_score: 0.6,
                emotional_valence: 0.7,
                initial_adopters: 5,
            },
        )
        .await?;
    info!(idea_id = %idea.id, seeded = idea.adopter_count, "Seed idea injected");

    manager.start_world(world.id).await?;
    info!(world_id = %world.id, "Demo world running; ctrl-c to stop");

    // 6. Periodic status until interrupted.
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            () = tokio::time::sleep(STATUS_INTERVAL) => {
                if let Ok(stats) = manager.get_stats(world.id).await {
                    info!(
                        step = stats.step,
                        active_agents = stats.active_agents,
                        saturation = format!("{:.3}", stats.saturation),
                        total_ideas = stats.total_ideas,
                        total_adoptions = stats.total_adoptions,
                        total_mutations = stats.total_mutations,
                        active_worlds = manager.active_world_count().await,
                        "Status"
                    );
                }
            }
        }
    }

    // 7. Clean shutdown.
    info!("Shutting down");
    manager.shutdown().await;
    info!("memetic-engine stopped");

    Ok(())
}
