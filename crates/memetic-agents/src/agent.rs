//! Agent model: demographics, personality, state, beliefs, and the
//! adoption-probability contract.
//!
//! An agent is one simulated individual. Its [`AgentProfile`] is fixed at
//! creation (who the agent is), its [`AgentState`] evolves as ideas wash
//! over it (what the agent has been through), and its belief set records
//! which ideas it currently holds. Adjacency is kept as a set of peer IDs,
//! mirrored from the world's edge set after topology construction and
//! immutable afterwards.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};

use memetic_types::{AgeGroup, AgentId, INTEREST_CATALOG, IdeaId, Region, WorldId};

/// Reserved per-exposure reinforcement hook in the adoption probability.
///
/// Held at the non-amplifying baseline of 1.0; kept so repeated-exposure
/// reinforcement can be introduced without changing the formula shape.
const EXPOSURE_BONUS: f64 = 1.0;

/// Susceptibility never drops below this floor.
const SUSCEPTIBILITY_FLOOR: f64 = 0.1;

/// Susceptibility never rises above this ceiling.
const SUSCEPTIBILITY_CEILING: f64 = 0.9;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Demographic and personality profile, fixed at agent creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// The agent's demographic age bucket.
    pub age_group: AgeGroup,
    /// Interest tags (2 to 5, drawn from the catalog).
    pub interests: Vec<String>,
    /// The agent's geographic region.
    pub region: Region,
    /// How easily the agent trusts (0 to 1).
    pub trust_threshold: f64,
    /// Openness to new ideas (0 to 1).
    pub openness: f64,
    /// How influential the agent is (0 to 1, right-skewed in the
    /// population: influencers are rare).
    pub influence: f64,
}

impl AgentProfile {
    /// Generate a random profile for an agent in the given region.
    ///
    /// Trust and openness draw from a symmetric Beta(2,2) (bell around
    /// 0.5); influence from Beta(1,5) (right-skewed). Interests are a
    /// random 2-5 element subset of the catalog.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, region: Region) -> Self {
        let age_group = AgeGroup::ALL.choose(rng).copied().unwrap_or(AgeGroup::Adults);
        let interest_count = rng.random_range(2..=5_usize);
        let mut interests: Vec<String> = INTEREST_CATALOG
            .choose_multiple(rng, interest_count)
            .map(|tag| (*tag).to_owned())
            .collect();
        interests.shuffle(rng);

        Self {
            age_group,
            interests,
            region,
            trust_threshold: beta_sample(rng, 2.0, 2.0),
            openness: beta_sample(rng, 2.0, 2.0),
            influence: beta_sample(rng, 1.0, 5.0),
        }
    }
}

/// Sample from a Beta distribution with the given shape parameters.
///
/// The parameters used here are static and valid; on the unreachable
/// constructor error the midpoint 0.5 is returned.
fn beta_sample<R: Rng + ?Sized>(rng: &mut R, alpha: f64, beta: f64) -> f64 {
    Beta::new(alpha, beta).map_or(0.5, |dist| dist.sample(rng))
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Mutable per-agent state, updated as ideas reach the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Mood in [-1, 1]; negative to positive. Reserved for world events.
    pub mood: f64,
    /// Current susceptibility to ideas (0 to 1).
    pub susceptibility: f64,
    /// The last step during which this agent spread or adopted.
    pub last_active_step: u64,
    /// Total exposures to any idea.
    pub exposure_count: u64,
    /// Total ideas ever adopted.
    pub adoption_count: u64,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            mood: 0.0,
            susceptibility: 0.5,
            last_active_step: 0,
            exposure_count: 0,
            adoption_count: 0,
        }
    }
}

impl AgentState {
    /// Update susceptibility after an adoption decision.
    ///
    /// Adoption dampens susceptibility by factor 0.95 (floor 0.1);
    /// rejection lets it recover by factor 1.02 (ceiling 0.9).
    pub fn update_susceptibility(&mut self, adopted: bool) {
        if adopted {
            self.susceptibility = (self.susceptibility * 0.95).max(SUSCEPTIBILITY_FLOOR);
        } else {
            self.susceptibility = (self.susceptibility * 1.02).min(SUSCEPTIBILITY_CEILING);
        }
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// One simulated individual: profile, state, adjacency, and beliefs.
///
/// Agents refer to peers and ideas by ID only; the owning [`WorldId`] is a
/// back-reference for convenience, never ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// The agent's identifier.
    pub id: AgentId,
    /// The world that owns this agent.
    pub world_id: WorldId,
    /// Fixed demographic and personality profile.
    pub profile: AgentProfile,
    /// Evolving state.
    pub state: AgentState,
    /// Peer agents this agent is connected to. Symmetric with each
    /// peer's set after graph build; never contains the agent itself.
    pub connections: BTreeSet<AgentId>,
    /// Ideas this agent currently holds.
    pub beliefs: BTreeSet<IdeaId>,
    /// Per-idea exposure counts, for reinforcement bookkeeping.
    pub idea_exposures: BTreeMap<IdeaId, u32>,
}

impl Agent {
    /// Create an agent with the given profile and default state.
    pub fn new(world_id: WorldId, profile: AgentProfile) -> Self {
        Self {
            id: AgentId::new(),
            world_id,
            profile,
            state: AgentState::default(),
            connections: BTreeSet::new(),
            beliefs: BTreeSet::new(),
            idea_exposures: BTreeMap::new(),
        }
    }

    /// Add a connection to another agent. No-op when the peer is self.
    pub fn add_connection(&mut self, peer: AgentId) {
        if peer != self.id {
            self.connections.insert(peer);
        }
    }

    /// Remove a connection, if present.
    pub fn remove_connection(&mut self, peer: AgentId) {
        self.connections.remove(&peer);
    }

    /// Whether the agent currently holds the idea.
    pub fn has_idea(&self, idea_id: IdeaId) -> bool {
        self.beliefs.contains(&idea_id)
    }

    /// Record an exposure to an idea and return the new per-idea
    /// exposure count.
    pub fn expose(&mut self, idea_id: IdeaId) -> u32 {
        self.state.exposure_count = self.state.exposure_count.saturating_add(1);
        let count = self.idea_exposures.entry(idea_id).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Adopt an idea.
    ///
    /// Returns `true` iff the idea was newly adopted. A repeated adopt is
    /// a no-op returning `false`: counters and susceptibility are
    /// untouched.
    pub fn adopt(&mut self, idea_id: IdeaId) -> bool {
        if !self.beliefs.insert(idea_id) {
            return false;
        }
        self.state.adoption_count = self.state.adoption_count.saturating_add(1);
        self.state.update_susceptibility(true);
        true
    }

    /// Forget an idea (decay). Returns `true` iff the agent held it.
    pub fn forget(&mut self, idea_id: IdeaId) -> bool {
        self.beliefs.remove(&idea_id)
    }

    /// How relevant an idea's tags are to this agent's interests.
    ///
    /// Returns 0.3 when either side is untagged, 0.2 for disjoint sets,
    /// otherwise `0.2 + 0.8 * |overlap| / max(|tags|, |interests|)`.
    pub fn idea_relevance(&self, idea_tags: &[String]) -> f64 {
        if idea_tags.is_empty() || self.profile.interests.is_empty() {
            return 0.3;
        }

        let tags: BTreeSet<&str> = idea_tags.iter().map(String::as_str).collect();
        let interests: BTreeSet<&str> = self.profile.interests.iter().map(String::as_str).collect();
        let overlap = tags.intersection(&interests).count();
        if overlap == 0 {
            return 0.2;
        }

        let denominator = idea_tags.len().max(self.profile.interests.len());
        // Tag and interest lists are small; exact in f64.
        #[allow(clippy::cast_precision_loss)]
        let ratio = overlap as f64 / denominator as f64;
        0.2 + ratio * 0.8
    }

    /// Probability that this agent adopts an idea offered by a sender.
    ///
    /// The formula is intentionally multiplicative so that any near-zero
    /// term kills transmission:
    ///
    /// ```text
    /// p = virality * sender_influence * openness * relevance
    ///     * trust_factor * context_modifier * susceptibility
    /// ```
    ///
    /// clamped to [0, 1]. `context_modifier` defaults to 1.0 and is
    /// reserved for world-wide events. The per-exposure bonus term is
    /// held at its non-amplifying baseline.
    pub fn adoption_probability(
        &self,
        idea_virality: f64,
        idea_relevance: f64,
        sender_influence: f64,
        trust_factor: f64,
        context_modifier: f64,
    ) -> f64 {
        let p = idea_virality
            * sender_influence
            * self.profile.openness
            * idea_relevance
            * trust_factor
            * context_modifier
            * self.state.susceptibility
            * EXPOSURE_BONUS;
        p.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
