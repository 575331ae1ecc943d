//! The world aggregate: one population, one graph, one idea catalog, and
//! the tick algorithm that drives diffusion.
//!
//! A tick runs in two phases:
//!
//! 1. **Propagation** -- every believing agent (in shuffled order) offers
//!    each of its beliefs to each neighbour that does not already hold
//!    the idea. Exposure is recorded on both sides, then a uniform draw
//!    against the idea's spread probability decides adoption. Accepted
//!    spreads may trigger a deterministic mutation under the idea's
//!    budget. Per spreader, beliefs are snapshotted at visit time, so
//!    ideas adopted during the tick never propagate within it -- spread
//!    is strictly generational.
//!
//! 2. **Decay** -- every agent forgets each held belief independently
//!    with probability `decay_rate`.
//!
//! The step counter then increments; reaching `max_steps` completes the
//! world. A tick is the unit of linearisation: snapshots and control
//! operations observe tick boundaries, never intermediate state.
//!
//! All stochastic choices draw from the world's own generator, seeded at
//! construction, which gives seed-level reproducibility.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use memetic_agents::{Agent, DeterministicMutator, Idea, MutationProvider};
use memetic_types::{
    AgentId, IdeaId, IdeaStats, LeaderboardEntry, MutationType, Region, RegionalStats,
    SpreadEvent, StepReport, UserId, WorldConfig, WorldId, WorldSnapshot, WorldStats,
    WorldStatus, WorldSummary,
};

use crate::error::WorldError;
use crate::population::build_population;
use crate::topology::{CsrGraph, build_edges};

/// Bounded tail of spread events retained per world.
const MAX_RECENT_EVENTS: usize = 1000;

/// Convert a node id to a vector index.
///
/// Node ids are bounded by the population cap, far below `u32::MAX`;
/// `u32` always fits in `usize` on supported platforms.
#[allow(clippy::cast_possible_truncation)]
const fn idx(node: u32) -> usize {
    node as usize
}

/// A simulation world: exclusive owner of its agents, ideas, graph, and
/// event tail.
///
/// Construction is eager and synchronous: the population and topology are
/// built before `new` returns, which can take a while for large worlds.
/// Nothing inside a world references another world.
#[derive(Debug)]
pub struct World {
    /// The world's identifier.
    pub id: WorldId,
    /// The user who created the world.
    pub creator_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Whether the world is visible to all users.
    pub is_public: bool,
    /// The configuration the world was built from.
    pub config: WorldConfig,

    /// Current lifecycle status.
    pub status: WorldStatus,
    /// Steps executed so far.
    pub current_step: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// First transition out of `Created`, if any.
    pub started_at: Option<DateTime<Utc>>,
    /// Transition into `Completed`, if any.
    pub completed_at: Option<DateTime<Utc>>,

    /// Cumulative spread events recorded (accepted and rejected).
    pub total_spread_events: u64,
    /// Cumulative adoption events from propagation.
    pub total_adoptions: u64,
    /// Cumulative mutant ideas created.
    pub total_mutations: u64,

    agents: Vec<Agent>,
    agent_index: HashMap<AgentId, u32>,
    ideas: std::collections::BTreeMap<IdeaId, Idea>,
    graph: CsrGraph,
    recent_events: VecDeque<SpreadEvent>,
    rng: StdRng,
    mutator: DeterministicMutator,
}

impl World {
    /// Build a world: seed the population, wire the topology, and mirror
    /// the edge set into each agent's connection set.
    ///
    /// The generator is seeded from `config.seed` when present, otherwise
    /// from OS entropy.
    pub fn new(
        creator_id: UserId,
        name: impl Into<String>,
        description: impl Into<String>,
        config: WorldConfig,
        is_public: bool,
    ) -> Self {
        let id = WorldId::new();
        let mut rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        let agents = build_population(&mut rng, id, &config);
        let regions: Vec<Region> = agents.iter().map(|a| a.profile.region).collect();
        let edges = build_edges(&mut rng, config.network_type, config.network_density, &regions);
        let node_count = u32::try_from(agents.len()).unwrap_or(u32::MAX);
        let graph = CsrGraph::from_edges(node_count, &edges);

        let mut world = Self {
            id,
            creator_id,
            name: name.into(),
            description: description.into(),
            is_public,
            config,
            status: WorldStatus::Created,
            current_step: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            total_spread_events: 0,
            total_adoptions: 0,
            total_mutations: 0,
            agents,
            agent_index: HashMap::new(),
            ideas: std::collections::BTreeMap::new(),
            graph,
            recent_events: VecDeque::new(),
            rng,
            mutator: DeterministicMutator::new(),
        };
        world.mirror_edges();
        world.agent_index = world
            .agents
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id, u32::try_from(i).unwrap_or(u32::MAX)))
            .collect();

        info!(
            world_id = %world.id,
            population = world.agents.len(),
            edges = world.graph.edge_count(),
            network = ?world.config.network_type,
            "World built"
        );

        world
    }

    /// Copy the frozen edge set into each agent's connection set so the
    /// per-agent view matches the CSR index.
    fn mirror_edges(&mut self) {
        let ids: Vec<AgentId> = self.agents.iter().map(|a| a.id).collect();
        for (u, v) in self.graph.iter_edges().collect::<Vec<_>>() {
            let (Some(&u_id), Some(&v_id)) = (ids.get(idx(u)), ids.get(idx(v))) else {
                continue;
            };
            if let Some(agent) = self.agents.get_mut(idx(u)) {
                agent.add_connection(v_id);
            }
            if let Some(agent) = self.agents.get_mut(idx(v)) {
                agent.add_connection(u_id);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// All agents, in stable construction order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Look up an agent by ID.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agent_index
            .get(&id)
            .and_then(|&slot| self.agents.get(idx(slot)))
    }

    /// Look up an idea by ID.
    pub fn idea(&self, id: IdeaId) -> Option<&Idea> {
        self.ideas.get(&id)
    }

    /// Iterate over the idea catalog in creation order.
    pub fn ideas(&self) -> impl Iterator<Item = &Idea> {
        self.ideas.values()
    }

    /// The frozen adjacency index.
    pub const fn graph(&self) -> &CsrGraph {
        &self.graph
    }

    /// The retained tail of spread events, oldest first.
    pub const fn recent_events(&self) -> &VecDeque<SpreadEvent> {
        &self.recent_events
    }

    /// Population size.
    pub fn agent_count(&self) -> u64 {
        u64::try_from(self.agents.len()).unwrap_or(u64::MAX)
    }

    /// Catalog size, mutants included.
    pub fn idea_count(&self) -> u64 {
        u64::try_from(self.ideas.len()).unwrap_or(u64::MAX)
    }

    /// Number of agents holding at least one belief.
    pub fn active_agent_count(&self) -> u64 {
        let active = self.agents.iter().filter(|a| !a.beliefs.is_empty()).count();
        u64::try_from(active).unwrap_or(u64::MAX)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Transition `Created -> Running` and stamp `started_at`.
    pub fn start(&mut self) {
        if self.status == WorldStatus::Created {
            self.status = WorldStatus::Running;
            self.started_at = Some(Utc::now());
        }
    }

    /// Transition `Running -> Paused`.
    pub fn pause(&mut self) {
        if self.status == WorldStatus::Running {
            self.status = WorldStatus::Paused;
        }
    }

    /// Transition `Paused -> Running`.
    pub fn resume(&mut self) {
        if self.status == WorldStatus::Paused {
            self.status = WorldStatus::Running;
        }
    }

    /// Administratively retire the world. No-op on terminal states.
    pub fn archive(&mut self) {
        if !self.status.is_terminal() {
            self.status = WorldStatus::Archived;
        }
    }

    // -----------------------------------------------------------------------
    // Idea injection
    // -----------------------------------------------------------------------

    /// Inject an idea and seed it to `initial_adopters` agents.
    ///
    /// Candidates are scored by `target_match * (0.5 + influence)`; the
    /// top `max(10 * initial_adopters, 100)` form a pool from which the
    /// seeds are sampled uniformly without replacement. Seeding an agent
    /// that already believes the idea does not inflate `adopter_count`.
    ///
    /// Returns the IDs of the agents that newly adopted the idea.
    pub fn inject_idea(&mut self, mut idea: Idea, initial_adopters: u32) -> Vec<AgentId> {
        idea.world_id = self.id;

        let mut scored: Vec<(u32, f64)> = self
            .agents
            .iter()
            .enumerate()
            .map(|(slot, agent)| {
                let fit = idea.target.matches_agent(
                    agent.profile.age_group,
                    &agent.profile.interests,
                    agent.profile.region,
                );
                let score = fit * (0.5 + agent.profile.influence);
                (u32::try_from(slot).unwrap_or(u32::MAX), score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let pool_size = usize::try_from(initial_adopters)
            .unwrap_or(0)
            .saturating_mul(10)
            .max(100);
        let pool: Vec<u32> = scored.iter().take(pool_size).map(|&(slot, _)| slot).collect();

        let take = usize::try_from(initial_adopters).unwrap_or(0).min(pool.len());
        let seeds: Vec<u32> = pool.choose_multiple(&mut self.rng, take).copied().collect();

        let mut adopted = Vec::with_capacity(seeds.len());
        for slot in seeds {
            if let Some(agent) = self.agents.get_mut(idx(slot)) {
                if agent.adopt(idea.id) {
                    idea.record_adoption();
                    adopted.push(agent.id);
                }
            }
        }

        info!(
            world_id = %self.id,
            idea_id = %idea.id,
            seeded = adopted.len(),
            "Idea injected"
        );

        self.ideas.insert(idea.id, idea);
        adopted
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Execute one tick: propagation, then decay, then commit the step.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotRunning`] when the world is not in the
    /// `Running` state; the world is untouched in that case.
    #[allow(clippy::too_many_lines)]
    pub fn run_step(&mut self) -> Result<StepReport, WorldError> {
        if self.status != WorldStatus::Running {
            return Err(WorldError::NotRunning {
                world_id: self.id,
                status: self.status,
            });
        }

        let started = Instant::now();
        let mut spread_attempts = 0_u64;
        let mut adoptions = 0_u64;
        let mut mutations = 0_u64;
        let mut decays = 0_u64;
        let mut events: Vec<SpreadEvent> = Vec::new();

        // --- Phase 1: Propagation ---
        let mut spreaders: Vec<u32> = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.beliefs.is_empty())
            .map(|(slot, _)| u32::try_from(slot).unwrap_or(u32::MAX))
            .collect();
        spreaders.shuffle(&mut self.rng);

        let graph = &self.graph;
        for s_slot in spreaders {
            // Pre-compute the sender reads, then snapshot its beliefs:
            // ideas adopted later this tick must not re-enter the loop.
            let Some(spreader) = self.agents.get(idx(s_slot)) else {
                continue;
            };
            let sender_id = spreader.id;
            let sender_influence = spreader.profile.influence;
            let belief_snapshot: Vec<IdeaId> = spreader.beliefs.iter().copied().collect();

            for idea_id in belief_snapshot {
                let Some(idea) = self.ideas.get_mut(&idea_id) else {
                    continue;
                };
                let idea_tags = idea.tags.clone();
                let mut new_mutants: Vec<Idea> = Vec::new();

                for &r_slot in graph.neighbors(s_slot) {
                    let Some(receiver) = self.agents.get_mut(idx(r_slot)) else {
                        continue;
                    };
                    if receiver.has_idea(idea_id) {
                        continue;
                    }

                    let relevance = receiver.idea_relevance(&idea_tags);
                    let probability = idea.spread_probability(
                        sender_influence,
                        receiver.profile.openness,
                        relevance,
                        1.0,
                    );

                    spread_attempts = spread_attempts.saturating_add(1);
                    idea.record_exposure();
                    receiver.expose(idea_id);
                    let receiver_id = receiver.id;
                    let receiver_region = receiver.profile.region;

                    if self.rng.random::<f64>() < probability {
                        receiver.adopt(idea_id);
                        idea.record_adoption();
                        adoptions = adoptions.saturating_add(1);
                        self.total_adoptions = self.total_adoptions.saturating_add(1);
                        events.push(SpreadEvent {
                            idea_id,
                            from_agent: sender_id,
                            to_agent: receiver_id,
                            probability,
                            accepted: true,
                            step: self.current_step,
                            timestamp: Utc::now(),
                        });

                        if idea.can_mutate()
                            && self.rng.random::<f64>() < self.config.mutation_rate
                        {
                            let kind = MutationType::ALL
                                .choose(&mut self.rng)
                                .copied()
                                .unwrap_or(MutationType::Random);
                            let outcome = self.mutator.mutate(
                                &idea.text,
                                kind,
                                Some(receiver_region),
                                &mut self.rng,
                            );
                            if let Ok(mutant) = idea.create_mutation(
                                outcome.kind,
                                outcome.text,
                                outcome.virality_change,
                                outcome.emotional_change,
                            ) {
                                new_mutants.push(mutant);
                                mutations = mutations.saturating_add(1);
                                self.total_mutations = self.total_mutations.saturating_add(1);
                            }
                        }
                    } else {
                        idea.record_rejection();
                        events.push(SpreadEvent {
                            idea_id,
                            from_agent: sender_id,
                            to_agent: receiver_id,
                            probability,
                            accepted: false,
                            step: self.current_step,
                            timestamp: Utc::now(),
                        });
                    }
                }

                // Mutants enter the catalog unseeded: they spread only
                // once an agent adopts them through normal propagation
                // or a later injection.
                for mutant in new_mutants {
                    self.ideas.insert(mutant.id, mutant);
                }
            }
        }

        for event in events {
            self.record_event(event);
        }

        // --- Phase 2: Decay ---
        let decay_rate = self.config.decay_rate;
        if decay_rate > 0.0 {
            for agent in &mut self.agents {
                let held: Vec<IdeaId> = agent.beliefs.iter().copied().collect();
                for idea_id in held {
                    if self.rng.random::<f64>() < decay_rate && agent.forget(idea_id) {
                        decays = decays.saturating_add(1);
                    }
                }
            }
        }

        // --- Commit ---
        self.current_step = self.current_step.saturating_add(1);
        if let Some(max_steps) = self.config.max_steps {
            if self.current_step >= max_steps {
                self.status = WorldStatus::Completed;
                self.completed_at = Some(Utc::now());
                info!(world_id = %self.id, step = self.current_step, "World completed");
            }
        }

        let report = StepReport {
            step: self.current_step,
            spread_attempts,
            adoptions,
            mutations,
            decays,
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
            active_agents: self.active_agent_count(),
        };

        debug!(
            world_id = %self.id,
            step = report.step,
            spread_attempts = report.spread_attempts,
            adoptions = report.adoptions,
            mutations = report.mutations,
            decays = report.decays,
            "Step executed"
        );

        Ok(report)
    }

    /// Append a spread event to the bounded tail.
    fn record_event(&mut self, event: SpreadEvent) {
        self.recent_events.push_back(event);
        self.total_spread_events = self.total_spread_events.saturating_add(1);
        while self.recent_events.len() > MAX_RECENT_EVENTS {
            self.recent_events.pop_front();
        }
    }

    // -----------------------------------------------------------------------
    // Snapshots and reporting
    // -----------------------------------------------------------------------

    /// Produce a point-in-time snapshot of the world.
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut idea_stats: Vec<IdeaStats> = self
            .ideas
            .values()
            .map(|idea| IdeaStats {
                idea_id: idea.id,
                text: truncate_chars(&idea.text, 100).to_owned(),
                adopters: idea.adopter_count,
                reach: idea.reach,
                adoption_rate: idea.adoption_rate(),
                mutations: idea.mutation_count,
                generation: idea.generation,
            })
            .collect();
        idea_stats.sort_by(|a, b| b.adopters.cmp(&a.adopters));

        let mut regional_stats = std::collections::BTreeMap::new();
        for &region in &self.config.regions {
            let in_region = self
                .agents
                .iter()
                .filter(|a| a.profile.region == region);
            let mut total_agents = 0_u64;
            let mut active_agents = 0_u64;
            let mut total_adoptions = 0_u64;
            for agent in in_region {
                total_agents = total_agents.saturating_add(1);
                if !agent.beliefs.is_empty() {
                    active_agents = active_agents.saturating_add(1);
                }
                total_adoptions = total_adoptions
                    .saturating_add(u64::try_from(agent.beliefs.len()).unwrap_or(u64::MAX));
            }
            let saturation = ratio(active_agents, total_agents);
            regional_stats.insert(
                region,
                RegionalStats {
                    total_agents,
                    active_agents,
                    total_adoptions,
                    saturation,
                },
            );
        }

        WorldSnapshot {
            world_id: self.id,
            step: self.current_step,
            timestamp: Utc::now(),
            total_agents: self.agent_count(),
            active_agents: self.active_agent_count(),
            total_ideas: self.idea_count(),
            total_adoptions: self.total_adoptions,
            idea_stats,
            regional_stats,
        }
    }

    /// The idea leaderboard: top `limit` ideas by adopter count.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut ideas: Vec<&Idea> = self.ideas.values().collect();
        ideas.sort_by(|a, b| b.adopter_count.cmp(&a.adopter_count));

        ideas
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(position, idea)| LeaderboardEntry {
                rank: u32::try_from(position.saturating_add(1)).unwrap_or(u32::MAX),
                idea_id: idea.id,
                text: truncate_chars(&idea.text, 100).to_owned(),
                creator_id: idea.creator_id,
                adopters: idea.adopter_count,
                reach: idea.reach,
                adoption_rate: idea.adoption_rate(),
                generation: idea.generation,
            })
            .collect()
    }

    /// Aggregate statistics for the control surface.
    pub fn stats(&self) -> WorldStats {
        let total_agents = self.agent_count();
        let active_agents = self.active_agent_count();
        let total_ideas = self.idea_count();
        WorldStats {
            step: self.current_step,
            status: self.status,
            total_agents,
            active_agents,
            saturation: ratio(active_agents, total_agents),
            total_ideas,
            total_adoptions: self.total_adoptions,
            total_mutations: self.total_mutations,
            total_spread_events: self.total_spread_events,
            average_r0: ratio(self.total_adoptions, total_ideas),
        }
    }

    /// A listing summary of the world.
    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            agent_count: self.agent_count(),
            idea_count: self.idea_count(),
            current_step: self.current_step,
            is_public: self.is_public,
            creator_id: self.creator_id,
            created_at: self.created_at,
        }
    }

    /// Insert an idea directly into the catalog (mutant delivery from an
    /// off-tick provider, tests).
    pub fn insert_idea(&mut self, idea: Idea) {
        self.ideas.insert(idea.id, idea);
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    // Event counters stay far below 2^52; exact in f64.
    #[allow(clippy::cast_precision_loss)]
    let value = numerator as f64 / denominator as f64;
    value
}

/// Take at most `max` characters of `text`, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((boundary, _)) => text.get(..boundary).unwrap_or(text),
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
