//! Idea model: content, virality attributes, targeting, lineage, and the
//! spread-probability contract.
//!
//! An idea is the unit of diffusion. It carries the text and tags agents
//! react to, attributes in [0, 1] that drive the spread math, a mutation
//! lineage (parent, kind, generation) bounded by a per-idea budget, and
//! event counters for adoption analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use memetic_types::{AgeGroup, IdeaId, MutationType, Region, UserId, WorldId};

use crate::error::IdeaError;

/// Default base transmissibility for a freshly injected idea.
pub const DEFAULT_VIRALITY: f64 = 0.2;

/// Default emotional intensity.
pub const DEFAULT_VALENCE: f64 = 0.5;

/// Default complexity; lower spreads more easily.
pub const DEFAULT_COMPLEXITY: f64 = 0.3;

/// Default cap on direct mutations per idea.
pub const DEFAULT_MUTATION_BUDGET: u32 = 3;

// ---------------------------------------------------------------------------
// Targeting
// ---------------------------------------------------------------------------

/// Target demographics for an idea.
///
/// An empty list on any axis means "no constraint on this axis"; a target
/// with all axes empty matches every agent with score 1.0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaTarget {
    /// Age buckets the idea aims at.
    #[serde(default)]
    pub age_groups: Vec<AgeGroup>,
    /// Interest tags the idea aims at.
    #[serde(default)]
    pub interests: Vec<String>,
    /// Regions the idea aims at.
    #[serde(default)]
    pub regions: Vec<Region>,
}

impl IdeaTarget {
    /// Score how well this target fits an agent, in [0, 1].
    ///
    /// Each non-empty axis contributes: 1.0 for an age or region match,
    /// the covered fraction of target interests for the interest axis.
    /// The result is the mean over active axes, or 1.0 when no axis is
    /// constrained (universal appeal).
    pub fn matches_agent(
        &self,
        age_group: AgeGroup,
        interests: &[String],
        region: Region,
    ) -> f64 {
        let mut score = 0.0;
        let mut checks = 0_u32;

        if !self.age_groups.is_empty() {
            checks = checks.saturating_add(1);
            if self.age_groups.contains(&age_group) {
                score += 1.0;
            }
        }

        if !self.interests.is_empty() {
            checks = checks.saturating_add(1);
            let overlap = self
                .interests
                .iter()
                .filter(|tag| interests.contains(tag))
                .count();
            // Axis lists are small; exact in f64.
            #[allow(clippy::cast_precision_loss)]
            if overlap > 0 {
                score += overlap as f64 / self.interests.len() as f64;
            }
        }

        if !self.regions.is_empty() {
            checks = checks.saturating_add(1);
            if self.regions.contains(&region) {
                score += 1.0;
            }
        }

        if checks == 0 {
            return 1.0;
        }
        score / f64::from(checks)
    }

    /// Whether no axis constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        self.age_groups.is_empty() && self.interests.is_empty() && self.regions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Idea
// ---------------------------------------------------------------------------

/// An idea (meme) spreading through a world's population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    /// The idea's identifier.
    pub id: IdeaId,
    /// The user who injected the original idea; mutants inherit it.
    pub creator_id: UserId,
    /// The world that owns this idea.
    pub world_id: WorldId,

    /// The idea's text content.
    pub text: String,
    /// Tags matched against agent interests for relevance.
    pub tags: Vec<String>,
    /// External media references carried along with the idea.
    pub media_refs: Vec<String>,
    /// Target demographics used when seeding initial adopters.
    pub target: IdeaTarget,

    /// Base transmissibility in [0, 1].
    pub virality_score: f64,
    /// Emotional intensity in [0, 1]; boosts spread.
    pub emotional_valence: f64,
    /// Complexity in [0, 1]; higher dampens effective virality.
    pub complexity: f64,

    /// The idea this one mutated from, if any. `None` iff generation 0.
    pub parent_id: Option<IdeaId>,
    /// The mutation kind that produced this idea, if any.
    pub mutation_type: Option<MutationType>,
    /// Depth in the mutation tree; originals are 0.
    pub generation: u32,
    /// Direct mutations already spawned from this idea.
    pub mutation_count: u32,
    /// Cap on direct mutations; inherited by children.
    pub mutation_budget: u32,

    /// Adoption events recorded for this idea.
    pub adopter_count: u64,
    /// Exposure events recorded for this idea. This is an event counter,
    /// not a unique-agent count: re-exposing the same agent increments
    /// it again.
    pub reach: u64,
    /// Rejection events recorded for this idea.
    pub rejection_count: u64,

    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Idea {
    /// Create a generation-0 idea with default attributes.
    pub fn new(creator_id: UserId, world_id: WorldId, text: impl Into<String>) -> Self {
        Self {
            id: IdeaId::new(),
            creator_id,
            world_id,
            text: text.into(),
            tags: Vec::new(),
            media_refs: Vec::new(),
            target: IdeaTarget::default(),
            virality_score: DEFAULT_VIRALITY,
            emotional_valence: DEFAULT_VALENCE,
            complexity: DEFAULT_COMPLEXITY,
            parent_id: None,
            mutation_type: None,
            generation: 0,
            mutation_count: 0,
            mutation_budget: DEFAULT_MUTATION_BUDGET,
            adopter_count: 0,
            reach: 0,
            rejection_count: 0,
            created_at: Utc::now(),
        }
    }

    /// `adopter_count / reach`, or 0 when the idea has no reach.
    ///
    /// Not clamped to [0, 1]: `reach` counts repeat exposures.
    pub fn adoption_rate(&self) -> f64 {
        if self.reach == 0 {
            return 0.0;
        }
        // Event counters stay far below 2^52; exact in f64.
        #[allow(clippy::cast_precision_loss)]
        let rate = self.adopter_count as f64 / self.reach as f64;
        rate
    }

    /// Virality discounted by complexity: `virality * (1 - 0.5 * complexity)`.
    ///
    /// Simpler ideas spread more easily.
    pub fn effective_virality(&self) -> f64 {
        self.virality_score * (1.0 - self.complexity * 0.5)
    }

    /// Whether the idea may still spawn direct mutations.
    pub const fn can_mutate(&self) -> bool {
        self.mutation_count < self.mutation_budget
    }

    /// Record an exposure event (an agent saw the idea).
    pub fn record_exposure(&mut self) {
        self.reach = self.reach.saturating_add(1);
    }

    /// Record an adoption event.
    pub fn record_adoption(&mut self) {
        self.adopter_count = self.adopter_count.saturating_add(1);
    }

    /// Record a rejection event.
    pub fn record_rejection(&mut self) {
        self.rejection_count = self.rejection_count.saturating_add(1);
    }

    /// Spawn a mutated child of this idea.
    ///
    /// Increments this idea's mutation counter and returns a fresh idea
    /// at `generation + 1` that inherits tags, media references, target,
    /// complexity, and budget. Attribute deltas are applied and clamped
    /// to [0, 1]. The child starts with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`IdeaError::BudgetExhausted`] when the mutation budget
    /// has been spent; the counter is untouched in that case.
    pub fn create_mutation(
        &mut self,
        kind: MutationType,
        new_text: impl Into<String>,
        virality_change: f64,
        emotional_change: f64,
    ) -> Result<Self, IdeaError> {
        if !self.can_mutate() {
            return Err(IdeaError::BudgetExhausted {
                idea_id: self.id,
                spent: self.mutation_count,
                budget: self.mutation_budget,
            });
        }

        self.mutation_count = self.mutation_count.saturating_add(1);

        Ok(Self {
            id: IdeaId::new(),
            creator_id: self.creator_id,
            world_id: self.world_id,
            text: new_text.into(),
            tags: self.tags.clone(),
            media_refs: self.media_refs.clone(),
            target: self.target.clone(),
            virality_score: (self.virality_score + virality_change).clamp(0.0, 1.0),
            emotional_valence: (self.emotional_valence + emotional_change).clamp(0.0, 1.0),
            complexity: self.complexity,
            parent_id: Some(self.id),
            mutation_type: Some(kind),
            generation: self.generation.saturating_add(1),
            mutation_count: 0,
            mutation_budget: self.mutation_budget,
            adopter_count: 0,
            reach: 0,
            rejection_count: 0,
            created_at: Utc::now(),
        })
    }

    /// Probability that this idea spreads from a sender to a receiver.
    ///
    /// ```text
    /// p = effective_virality * sender_influence * receiver_openness
    ///     * relevance * trust_factor * (0.5 + 0.5 * emotional_valence)
    /// ```
    ///
    /// clamped to [0, 1]. This is the formula the tick uses for spread
    /// decisions; [`Agent::adoption_probability`] is the variant that
    /// additionally includes receiver susceptibility.
    ///
    /// [`Agent::adoption_probability`]: crate::agent::Agent::adoption_probability
    pub fn spread_probability(
        &self,
        sender_influence: f64,
        receiver_openness: f64,
        relevance: f64,
        trust_factor: f64,
    ) -> f64 {
        let p = self.effective_virality()
            * sender_influence
            * receiver_openness
            * relevance
            * trust_factor
            * (0.5 + self.emotional_valence * 0.5);
        p.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
