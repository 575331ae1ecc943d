//! The simulation manager: a parallel scheduler over many independent
//! worlds.
//!
//! The manager owns every [`World`] behind a per-world mutex and runs one
//! background tick loop per running world. Worlds share no mutable state,
//! so multi-world execution is embarrassingly parallel; within a world,
//! control operations and ticks serialise on the world mutex, making the
//! tick the unit of linearisation -- a snapshot or injection never
//! observes a half-executed tick.
//!
//! Cancellation is cooperative: [`stop_world`] flips the world to paused,
//! pokes the loop's [`Notify`] so the inter-tick sleep aborts, and awaits
//! the task. [`shutdown`] does the same for every loop.
//!
//! [`stop_world`]: SimulationManager::stop_world
//! [`shutdown`]: SimulationManager::shutdown

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use memetic_agents::{Idea, IdeaTarget};
use memetic_types::{
    IdeaId, IdeaSortKey, LeaderboardEntry, StepReport, UserId, WorldConfig, WorldId,
    WorldSnapshot, WorldStats, WorldStatus, WorldSummary,
};
use memetic_world::World;

use crate::error::ManagerError;
use crate::settings::EngineSettings;

/// Per-world shared state: the world behind its mutex plus the stop
/// signal its loop listens on.
#[derive(Debug)]
struct WorldHandle {
    /// The world aggregate. Every tick and every control operation locks
    /// this mutex, which serialises them per world.
    world: Mutex<World>,
    /// Wakes the loop out of its inter-tick sleep on stop or shutdown.
    stop: Notify,
}

/// Parameters for injecting an idea into a world.
#[derive(Debug, Clone)]
pub struct IdeaSeed {
    /// The user creating the idea.
    pub creator_id: UserId,
    /// Idea text content.
    pub text: String,
    /// Tags matched against agent interests.
    pub tags: Vec<String>,
    /// Target demographics for seeding.
    pub target: IdeaTarget,
    /// Base virality in [0, 1].
    pub virality_score: f64,
    /// Emotional intensity in [0, 1].
    pub emotional_valence: f64,
    /// Number of seed adopters to select.
    pub initial_adopters: u32,
}

/// Filter for world listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldFilter {
    /// Only worlds created by this user.
    pub creator_id: Option<UserId>,
    /// Only publicly visible worlds.
    pub public_only: bool,
}

/// Owns many worlds, enforces the concurrency cap, and runs per-world
/// tick loops.
#[derive(Debug)]
pub struct SimulationManager {
    settings: EngineSettings,
    worlds: RwLock<HashMap<WorldId, Arc<WorldHandle>>>,
    tasks: Mutex<HashMap<WorldId, JoinHandle<()>>>,
    running: Arc<AtomicBool>,
}

impl SimulationManager {
    /// Create a manager with the given settings. The manager is live
    /// immediately; [`shutdown`](Self::shutdown) retires it.
    pub fn new(settings: EngineSettings) -> Self {
        info!(
            max_concurrent_worlds = settings.max_concurrent_worlds,
            "Simulation manager started"
        );
        Self {
            settings,
            worlds: RwLock::new(HashMap::new()),
            tasks: Mutex::new(HashMap::new()),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The settings the manager was built with.
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // -----------------------------------------------------------------------
    // World CRUD
    // -----------------------------------------------------------------------

    /// Create a new world.
    ///
    /// The population and graph are built synchronously inside this call
    /// while the world map is write-locked, so creating a large world can
    /// take a while and delays other control operations.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::CapacityExhausted`] when the manager
    /// already holds its maximum number of worlds.
    pub async fn create_world(
        &self,
        creator_id: UserId,
        name: &str,
        description: &str,
        config: WorldConfig,
        is_public: bool,
    ) -> Result<WorldSummary, ManagerError> {
        let mut worlds = self.worlds.write().await;
        if worlds.len() >= self.settings.max_concurrent_worlds {
            return Err(ManagerError::CapacityExhausted {
                held: worlds.len(),
                cap: self.settings.max_concurrent_worlds,
            });
        }

        let world = World::new(creator_id, name, description, config, is_public);
        let summary = world.summary();
        worlds.insert(
            summary.id,
            Arc::new(WorldHandle {
                world: Mutex::new(world),
                stop: Notify::new(),
            }),
        );

        info!(world_id = %summary.id, name, agents = summary.agent_count, "World created");
        Ok(summary)
    }

    /// Fetch a world's summary.
    pub async fn get_world(&self, id: WorldId) -> Result<WorldSummary, ManagerError> {
        let handle = self.handle(id).await?;
        let world = handle.world.lock().await;
        Ok(world.summary())
    }

    /// List worlds matching the filter.
    pub async fn list_worlds(&self, filter: WorldFilter) -> Vec<WorldSummary> {
        let handles: Vec<Arc<WorldHandle>> = self.worlds.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            let world = handle.world.lock().await;
            if let Some(creator) = filter.creator_id {
                if world.creator_id != creator {
                    continue;
                }
            }
            if filter.public_only && !world.is_public {
                continue;
            }
            summaries.push(world.summary());
        }
        summaries.sort_by_key(|s| s.created_at);
        summaries
    }

    /// Delete a world, stopping its loop first.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NotFound`] for an unknown id.
    pub async fn delete_world(&self, id: WorldId) -> Result<(), ManagerError> {
        let handle = self.handle(id).await?;
        self.halt_loop(id, &handle).await;

        self.worlds.write().await.remove(&id);
        info!(world_id = %id, "World deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Run control
    // -----------------------------------------------------------------------

    /// Start (or resume) a world's tick loop.
    ///
    /// Starting a world that is already running is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidStateTransition`] for completed or
    /// archived worlds, [`ManagerError::NotFound`] for an unknown id.
    pub async fn start_world(&self, id: WorldId) -> Result<WorldSummary, ManagerError> {
        let handle = self.handle(id).await?;

        let summary = {
            let mut world = handle.world.lock().await;
            match world.status {
                WorldStatus::Created => world.start(),
                WorldStatus::Paused => world.resume(),
                WorldStatus::Running => {}
                WorldStatus::Completed | WorldStatus::Archived => {
                    return Err(ManagerError::InvalidStateTransition {
                        message: format!(
                            "cannot start world {id} in status {:?}",
                            world.status
                        ),
                    });
                }
            }
            world.summary()
        };

        // Spawn the loop unless a live one already exists.
        let mut tasks = self.tasks.lock().await;
        let stale = tasks.get(&id).is_none_or(JoinHandle::is_finished);
        if stale {
            tasks.insert(
                id,
                tokio::spawn(run_world_loop(id, Arc::clone(&handle), Arc::clone(&self.running))),
            );
            info!(world_id = %id, "World started");
        }

        Ok(summary)
    }

    /// Stop a world's tick loop, transitioning `Running -> Paused`.
    ///
    /// Stopping a paused world is a no-op success. The call returns only
    /// after the loop task has been awaited, so no tick is in flight once
    /// it completes.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NotFound`] for an unknown id.
    pub async fn stop_world(&self, id: WorldId) -> Result<WorldSummary, ManagerError> {
        let handle = self.handle(id).await?;
        self.halt_loop(id, &handle).await;

        let world = handle.world.lock().await;
        info!(world_id = %id, step = world.current_step, "World stopped");
        Ok(world.summary())
    }

    /// Advance a world by exactly `steps` ticks, synchronously.
    ///
    /// The world is briefly forced to running for the operation; a prior
    /// paused status is restored afterwards (unless the world completed
    /// during the stepping). A ~1 ms cooperative yield separates
    /// sub-steps. Intended for debugging and tests.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidStateTransition`] for completed or
    /// archived worlds, [`ManagerError::NotFound`] for an unknown id.
    pub async fn step_world(
        &self,
        id: WorldId,
        steps: u32,
    ) -> Result<Vec<StepReport>, ManagerError> {
        let handle = self.handle(id).await?;
        let mut world = handle.world.lock().await;

        if world.status.is_terminal() {
            return Err(ManagerError::InvalidStateTransition {
                message: format!("cannot step world {id} in status {:?}", world.status),
            });
        }

        let prior = world.status;
        world.status = WorldStatus::Running;

        let mut reports = Vec::with_capacity(usize::try_from(steps).unwrap_or(0));
        for _ in 0..steps {
            match world.run_step() {
                Ok(report) => reports.push(report),
                // The world completed mid-run; stop stepping.
                Err(_) => break,
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        if prior == WorldStatus::Paused && !world.status.is_terminal() {
            world.status = WorldStatus::Paused;
        }

        debug!(world_id = %id, steps = reports.len(), "World stepped manually");
        Ok(reports)
    }

    // -----------------------------------------------------------------------
    // Ideas
    // -----------------------------------------------------------------------

    /// Inject an idea into a world and seed its initial adopters.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NotFound`] for an unknown world.
    pub async fn inject_idea(
        &self,
        world_id: WorldId,
        seed: IdeaSeed,
    ) -> Result<Idea, ManagerError> {
        let handle = self.handle(world_id).await?;
        let mut world = handle.world.lock().await;

        let mut idea = Idea::new(seed.creator_id, world_id, seed.text);
        idea.tags = seed.tags;
        idea.target = seed.target;
        idea.virality_score = seed.virality_score;
        idea.emotional_valence = seed.emotional_valence;
        let idea_id = idea.id;

        world.inject_idea(idea, seed.initial_adopters);

        world
            .idea(idea_id)
            .cloned()
            .ok_or(ManagerError::IdeaNotFound { world_id, idea_id })
    }

    /// Fetch one idea from a world.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown world or idea.
    pub async fn get_idea(
        &self,
        world_id: WorldId,
        idea_id: IdeaId,
    ) -> Result<Idea, ManagerError> {
        let handle = self.handle(world_id).await?;
        let world = handle.world.lock().await;
        world
            .idea(idea_id)
            .cloned()
            .ok_or(ManagerError::IdeaNotFound { world_id, idea_id })
    }

    /// List a world's ideas sorted by the given key, newest-or-biggest
    /// first, truncated to `limit`.
    pub async fn list_ideas(
        &self,
        world_id: WorldId,
        limit: usize,
        sort_by: IdeaSortKey,
    ) -> Result<Vec<Idea>, ManagerError> {
        let handle = self.handle(world_id).await?;
        let world = handle.world.lock().await;

        let mut ideas: Vec<Idea> = world.ideas().cloned().collect();
        match sort_by {
            IdeaSortKey::Adopters => ideas.sort_by(|a, b| b.adopter_count.cmp(&a.adopter_count)),
            IdeaSortKey::Reach => ideas.sort_by(|a, b| b.reach.cmp(&a.reach)),
            IdeaSortKey::CreatedAt => ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        ideas.truncate(limit);
        Ok(ideas)
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Take a point-in-time snapshot of a world.
    ///
    /// Snapshots observe tick boundaries: the snapshot reflects the state
    /// after the last completed tick.
    pub async fn get_snapshot(&self, id: WorldId) -> Result<WorldSnapshot, ManagerError> {
        let handle = self.handle(id).await?;
        let world = handle.world.lock().await;
        Ok(world.snapshot())
    }

    /// The idea leaderboard of a world.
    pub async fn get_leaderboard(
        &self,
        id: WorldId,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, ManagerError> {
        let handle = self.handle(id).await?;
        let world = handle.world.lock().await;
        Ok(world.leaderboard(limit))
    }

    /// Aggregate statistics of a world.
    pub async fn get_stats(&self, id: WorldId) -> Result<WorldStats, ManagerError> {
        let handle = self.handle(id).await?;
        let world = handle.world.lock().await;
        Ok(world.stats())
    }

    /// Number of worlds currently held.
    pub async fn world_count(&self) -> usize {
        self.worlds.read().await.len()
    }

    /// Number of worlds currently in the running state.
    pub async fn active_world_count(&self) -> usize {
        let handles: Vec<Arc<WorldHandle>> = self.worlds.read().await.values().cloned().collect();
        let mut active = 0_usize;
        for handle in handles {
            if handle.world.lock().await.status == WorldStatus::Running {
                active = active.saturating_add(1);
            }
        }
        active
    }

    // -----------------------------------------------------------------------
    // Shutdown
    // -----------------------------------------------------------------------

    /// Retire the manager: cancel and await every world loop.
    ///
    /// Worlds keep their status; only the loops end. The manager will not
    /// run loops again after this call.
    pub async fn shutdown(&self) {
        self.running.store(false, Ordering::Release);

        let handles: Vec<Arc<WorldHandle>> = self.worlds.read().await.values().cloned().collect();
        for handle in &handles {
            handle.stop.notify_one();
        }

        let tasks: Vec<JoinHandle<()>> = self.tasks.lock().await.drain().map(|(_, t)| t).collect();
        for task in tasks {
            let _ = task.await;
        }

        info!("Simulation manager stopped");
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Look up a world handle.
    async fn handle(&self, id: WorldId) -> Result<Arc<WorldHandle>, ManagerError> {
        self.worlds
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ManagerError::NotFound(id))
    }

    /// Pause a world and await its loop task, if one is running.
    async fn halt_loop(&self, id: WorldId, handle: &Arc<WorldHandle>) {
        {
            let mut world = handle.world.lock().await;
            world.pause();
        }
        handle.stop.notify_one();

        let task = self.tasks.lock().await.remove(&id);
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

/// One world's background tick loop.
///
/// Runs while the manager is live and the world is running: execute a
/// tick under the world mutex, release it, then sleep for the configured
/// interval or until the stop signal aborts the sleep. A failing tick
/// demotes the world to paused instead of propagating.
async fn run_world_loop(
    world_id: WorldId,
    handle: Arc<WorldHandle>,
    running: Arc<AtomicBool>,
) {
    info!(%world_id, "World loop started");

    loop {
        if !running.load(Ordering::Acquire) {
            break;
        }

        let sleep_ms = {
            let mut world = handle.world.lock().await;
            if world.status != WorldStatus::Running {
                break;
            }
            match world.run_step() {
                Ok(report) => {
                    if report.step % 100 == 0 {
                        debug!(
                            %world_id,
                            step = report.step,
                            adoptions = report.adoptions,
                            active_agents = report.active_agents,
                            "World step"
                        );
                    }
                    world.config.time_step_ms
                }
                Err(err) => {
                    warn!(%world_id, error = %err, "World step failed; pausing world");
                    world.status = WorldStatus::Paused;
                    break;
                }
            }
        };

        tokio::select! {
            () = handle.stop.notified() => {}
            () = tokio::time::sleep(Duration::from_millis(sleep_ms)) => {}
        }
    }

    info!(%world_id, "World loop ended");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use memetic_types::NetworkType;

    use super::*;

    fn make_manager(cap: usize) -> SimulationManager {
        SimulationManager::new(EngineSettings {
            max_concurrent_worlds: cap,
            ..EngineSettings::default()
        })
    }

    fn make_config() -> WorldConfig {
        WorldConfig {
            population_size: 100,
            network_type: NetworkType::Random,
            network_density: 0.1,
            mutation_rate: 0.0,
            decay_rate: 0.0,
            time_step_ms: 10,
            seed: Some(7),
            ..WorldConfig::default()
        }
    }

    fn make_seed(text: &str) -> IdeaSeed {
        IdeaSeed {
            creator_id: UserId::new(),
            text: String::from(text),
            tags: Vec::new(),
            target: IdeaTarget::default(),
            virality_score: 0.8,
            emotional_valence: 0.8,
            initial_adopters: 3,
        }
    }

    async fn make_world(manager: &SimulationManager) -> WorldId {
        manager
            .create_world(UserId::new(), "Test World", "", make_config(), true)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_and_get_world() {
        let manager = make_manager(10);
        let id = make_world(&manager).await;

        let summary = manager.get_world(id).await.unwrap();
        assert_eq!(summary.status, WorldStatus::Created);
        assert_eq!(summary.agent_count, 100);
        assert_eq!(manager.world_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_world_is_not_found() {
        let manager = make_manager(10);
        let missing = WorldId::new();

        let err = manager.get_world(missing).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn capacity_cap_is_enforced() {
        let manager = make_manager(2);
        make_world(&manager).await;
        make_world(&manager).await;

        let third = manager
            .create_world(UserId::new(), "Overflow", "", make_config(), true)
            .await;
        assert!(matches!(third, Err(ManagerError::CapacityExhausted { .. })));
    }

    #[tokio::test]
    async fn delete_frees_capacity() {
        let manager = make_manager(1);
        let id = make_world(&manager).await;

        manager.delete_world(id).await.unwrap();
        assert_eq!(manager.world_count().await, 0);

        // Capacity is available again.
        make_world(&manager).await;

        // Deleting the old id again is NotFound.
        let err = manager.delete_world(id).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn list_worlds_applies_filters() {
        let manager = make_manager(10);
        let creator = UserId::new();
        manager
            .create_world(creator, "Mine", "", make_config(), false)
            .await
            .unwrap();
        manager
            .create_world(UserId::new(), "Public", "", make_config(), true)
            .await
            .unwrap();

        let all = manager.list_worlds(WorldFilter::default()).await;
        assert_eq!(all.len(), 2);

        let mine = manager
            .list_worlds(WorldFilter {
                creator_id: Some(creator),
                public_only: false,
            })
            .await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine.first().unwrap().name, "Mine");

        let public = manager
            .list_worlds(WorldFilter {
                creator_id: None,
                public_only: true,
            })
            .await;
        assert_eq!(public.len(), 1);
        assert_eq!(public.first().unwrap().name, "Public");
    }

    #[tokio::test]
    async fn start_is_idempotent_on_running() {
        let manager = make_manager(10);
        let id = make_world(&manager).await;

        let first = manager.start_world(id).await.unwrap();
        assert_eq!(first.status, WorldStatus::Running);

        let second = manager.start_world(id).await.unwrap();
        assert_eq!(second.status, WorldStatus::Running);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn stop_on_paused_is_idempotent() {
        let manager = make_manager(10);
        let id = make_world(&manager).await;

        manager.start_world(id).await.unwrap();
        let stopped = manager.stop_world(id).await.unwrap();
        assert_eq!(stopped.status, WorldStatus::Paused);

        let again = manager.stop_world(id).await.unwrap();
        assert_eq!(again.status, WorldStatus::Paused);
    }

    #[tokio::test]
    async fn start_stop_start_matches_single_start() {
        let manager = make_manager(10);
        let id = make_world(&manager).await;

        manager.start_world(id).await.unwrap();
        manager.stop_world(id).await.unwrap();
        let resumed = manager.start_world(id).await.unwrap();
        assert_eq!(resumed.status, WorldStatus::Running);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn step_world_restores_paused() {
        let manager = make_manager(10);
        let id = make_world(&manager).await;

        manager.start_world(id).await.unwrap();
        manager.stop_world(id).await.unwrap();
        let before = manager.get_world(id).await.unwrap().current_step;

        let reports = manager.step_world(id, 2).await.unwrap();
        assert_eq!(reports.len(), 2);

        let after = manager.get_world(id).await.unwrap();
        assert_eq!(after.current_step, before + 2);
        assert_eq!(after.status, WorldStatus::Paused);
    }

    #[tokio::test]
    async fn step_completed_world_is_rejected() {
        let manager = make_manager(10);
        let config = WorldConfig {
            max_steps: Some(1),
            ..make_config()
        };
        let id = manager
            .create_world(UserId::new(), "Bounded", "", config, true)
            .await
            .unwrap()
            .id;

        manager.step_world(id, 1).await.unwrap();
        let summary = manager.get_world(id).await.unwrap();
        assert_eq!(summary.status, WorldStatus::Completed);

        let err = manager.step_world(id, 1).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_state_transition");
    }

    #[tokio::test]
    async fn inject_and_fetch_idea() {
        let manager = make_manager(10);
        let id = make_world(&manager).await;

        let idea = manager.inject_idea(id, make_seed("Hello")).await.unwrap();
        assert_eq!(idea.adopter_count, 3);
        assert_eq!(idea.world_id, id);

        let fetched = manager.get_idea(id, idea.id).await.unwrap();
        assert_eq!(fetched.id, idea.id);

        let err = manager.get_idea(id, IdeaId::new()).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn list_ideas_sorts_and_limits() {
        let manager = make_manager(10);
        let id = make_world(&manager).await;

        let mut big = make_seed("Big");
        big.initial_adopters = 10;
        manager.inject_idea(id, big).await.unwrap();
        let mut small = make_seed("Small");
        small.initial_adopters = 1;
        manager.inject_idea(id, small).await.unwrap();

        let by_adopters = manager.list_ideas(id, 10, IdeaSortKey::Adopters).await.unwrap();
        assert_eq!(by_adopters.first().unwrap().text, "Big");

        let newest = manager.list_ideas(id, 1, IdeaSortKey::CreatedAt).await.unwrap();
        assert_eq!(newest.len(), 1);
        assert_eq!(newest.first().unwrap().text, "Small");
    }

    #[tokio::test]
    async fn snapshot_leaderboard_and_stats() {
        let manager = make_manager(10);
        let id = make_world(&manager).await;
        manager.inject_idea(id, make_seed("Tracked")).await.unwrap();

        let snapshot = manager.get_snapshot(id).await.unwrap();
        assert_eq!(snapshot.total_agents, 100);
        assert_eq!(snapshot.total_ideas, 1);

        let board = manager.get_leaderboard(id, 5).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.first().unwrap().rank, 1);

        let stats = manager.get_stats(id).await.unwrap();
        assert_eq!(stats.total_agents, 100);
    }

    #[tokio::test]
    async fn loop_advances_world_until_stopped() {
        let manager = make_manager(10);
        let id = make_world(&manager).await;
        manager.inject_idea(id, make_seed("Spreading")).await.unwrap();

        manager.start_world(id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        let stopped = manager.stop_world(id).await.unwrap();

        assert!(stopped.current_step >= 1);
        assert_eq!(stopped.status, WorldStatus::Paused);
    }

    #[tokio::test]
    async fn shutdown_ends_all_loops() {
        let manager = make_manager(10);
        let first = make_world(&manager).await;
        let second = make_world(&manager).await;

        manager.start_world(first).await.unwrap();
        manager.start_world(second).await.unwrap();
        assert_eq!(manager.active_world_count().await, 2);

        manager.shutdown().await;
        // Loops are gone; worlds keep their last status.
        assert_eq!(manager.world_count().await, 2);
    }
}
