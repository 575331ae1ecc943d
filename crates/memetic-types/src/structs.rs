//! Wire-facing record types: events, step reports, snapshots, summaries.
//!
//! These are the shapes the control surface returns to any front-end.
//! All counters are event counters (they count occurrences, not unique
//! agents) unless noted otherwise.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Region, WorldStatus};
use crate::ids::{AgentId, IdeaId, UserId, WorldId};

// ---------------------------------------------------------------------------
// Spread events
// ---------------------------------------------------------------------------

/// One spread attempt across an edge, accepted or rejected.
///
/// Worlds retain only a bounded tail of these (the most recent 1000).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SpreadEvent {
    /// The idea that attempted to spread.
    pub idea_id: IdeaId,
    /// The believing agent on the sending side of the edge.
    pub from_agent: AgentId,
    /// The exposed agent on the receiving side.
    pub to_agent: AgentId,
    /// The computed spread probability for this attempt.
    pub probability: f64,
    /// Whether the receiver adopted the idea.
    pub accepted: bool,
    /// The step during which the attempt happened.
    pub step: u64,
    /// Wall-clock time of the attempt.
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Step reports
// ---------------------------------------------------------------------------

/// Statistics returned by one execution of the tick algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StepReport {
    /// The step counter after this tick committed.
    pub step: u64,
    /// Exposures attempted during propagation.
    pub spread_attempts: u64,
    /// Accepted spreads.
    pub adoptions: u64,
    /// Mutant ideas created.
    pub mutations: u64,
    /// Beliefs forgotten during the decay pass.
    pub decays: u64,
    /// Wall-clock duration of the tick in milliseconds.
    pub duration_ms: f64,
    /// Agents holding at least one belief after the tick.
    pub active_agents: u64,
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Per-idea statistics inside a snapshot, sorted by adopters descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct IdeaStats {
    /// The idea these statistics describe.
    pub idea_id: IdeaId,
    /// The idea text, truncated to 100 characters.
    pub text: String,
    /// Number of adoption events recorded for the idea.
    pub adopters: u64,
    /// Number of exposure events recorded for the idea.
    pub reach: u64,
    /// `adopters / reach`, or 0 when reach is 0. Not clamped: reach
    /// counts repeat exposures of the same agent.
    pub adoption_rate: f64,
    /// Direct mutations spawned from this idea.
    pub mutations: u32,
    /// Depth in the mutation tree; originals are 0.
    pub generation: u32,
}

/// Aggregate statistics for one region inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegionalStats {
    /// Agents assigned to the region.
    pub total_agents: u64,
    /// Agents in the region holding at least one belief.
    pub active_agents: u64,
    /// Sum of belief-set sizes across the region's agents.
    pub total_adoptions: u64,
    /// `active_agents / total_agents`, or 0 for an empty region.
    pub saturation: f64,
}

/// Point-in-time snapshot of a world, observed at a tick boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// The world this snapshot describes.
    pub world_id: WorldId,
    /// The step the snapshot was taken after.
    pub step: u64,
    /// Wall-clock time of the snapshot.
    pub timestamp: DateTime<Utc>,
    /// Total population size.
    pub total_agents: u64,
    /// Agents holding at least one belief.
    pub active_agents: u64,
    /// Ideas in the catalog, mutants included.
    pub total_ideas: u64,
    /// Cumulative adoption events since world creation.
    pub total_adoptions: u64,
    /// Per-idea statistics, sorted by adopters descending.
    pub idea_stats: Vec<IdeaStats>,
    /// Per-region aggregates keyed by configured region.
    pub regional_stats: BTreeMap<Region, RegionalStats>,
}

// ---------------------------------------------------------------------------
// World summaries and stats
// ---------------------------------------------------------------------------

/// Lightweight listing entry for a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSummary {
    /// The world's identifier.
    pub id: WorldId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Current lifecycle status.
    pub status: WorldStatus,
    /// Population size.
    pub agent_count: u64,
    /// Ideas in the catalog.
    pub idea_count: u64,
    /// Steps executed so far.
    pub current_step: u64,
    /// Whether the world is visible to all users.
    pub is_public: bool,
    /// The user who created the world.
    pub creator_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// One row of the per-world idea leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LeaderboardEntry {
    /// 1-based rank by adopter count.
    pub rank: u32,
    /// The ranked idea.
    pub idea_id: IdeaId,
    /// Idea text, truncated to 100 characters.
    pub text: String,
    /// The user who injected the idea (mutants inherit it).
    pub creator_id: UserId,
    /// Adoption events recorded for the idea.
    pub adopters: u64,
    /// Exposure events recorded for the idea.
    pub reach: u64,
    /// `adopters / reach`, or 0 when reach is 0.
    pub adoption_rate: f64,
    /// Depth in the mutation tree.
    pub generation: u32,
}

/// Aggregate statistics for a world, served by the control surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldStats {
    /// Steps executed so far.
    pub step: u64,
    /// Current lifecycle status.
    pub status: WorldStatus,
    /// Population size.
    pub total_agents: u64,
    /// Agents holding at least one belief.
    pub active_agents: u64,
    /// `active_agents / total_agents`.
    pub saturation: f64,
    /// Ideas in the catalog, mutants included.
    pub total_ideas: u64,
    /// Cumulative adoption events.
    pub total_adoptions: u64,
    /// Cumulative mutant ideas created.
    pub total_mutations: u64,
    /// Cumulative spread events recorded (accepted and rejected).
    pub total_spread_events: u64,
    /// `total_adoptions / total_ideas`, or 0 with no ideas.
    pub average_r0: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_event_roundtrip() {
        let event = SpreadEvent {
            idea_id: IdeaId::new(),
            from_agent: AgentId::new(),
            to_agent: AgentId::new(),
            probability: 0.42,
            accepted: true,
            step: 7,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        let back: Result<SpreadEvent, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(event));
    }

    #[test]
    fn snapshot_regional_map_keys_serialize_as_labels() {
        let mut regional_stats = BTreeMap::new();
        regional_stats.insert(
            Region::Asia,
            RegionalStats {
                total_agents: 10,
                active_agents: 4,
                total_adoptions: 6,
                saturation: 0.4,
            },
        );
        let snapshot = WorldSnapshot {
            world_id: WorldId::new(),
            step: 1,
            timestamp: Utc::now(),
            total_agents: 10,
            active_agents: 4,
            total_ideas: 1,
            total_adoptions: 6,
            idea_stats: Vec::new(),
            regional_stats,
        };
        let json = serde_json::to_string(&snapshot).unwrap_or_default();
        assert!(json.contains("\"ASIA\""));
    }
}
