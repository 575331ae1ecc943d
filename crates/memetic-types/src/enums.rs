//! Enumeration types and demographic catalogs for the Memetic simulation.
//!
//! All enumerations are closed tagged variants with wire-exact serde
//! representations: network and mutation types serialize as lowercase
//! `snake_case` strings, regions and age groups as their catalog labels.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// A geographic region an agent belongs to.
///
/// Regions shape topology construction (`geo_local` favors same-region
/// edges) and idea targeting. Population seeding draws regions from the
/// categorical weights in [`Region::default_weight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Region {
    /// North America.
    #[serde(rename = "NA")]
    Na,
    /// Europe.
    #[serde(rename = "EU")]
    Eu,
    /// Asia.
    #[serde(rename = "ASIA")]
    Asia,
    /// Latin America.
    #[serde(rename = "LATAM")]
    Latam,
    /// Africa.
    #[serde(rename = "AFRICA")]
    Africa,
    /// Oceania.
    #[serde(rename = "OCEANIA")]
    Oceania,
}

impl Region {
    /// All regions in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Na,
        Self::Eu,
        Self::Asia,
        Self::Latam,
        Self::Africa,
        Self::Oceania,
    ];

    /// The default categorical weight for population seeding.
    ///
    /// Weights need not sum to 1; they are relative frequencies.
    pub const fn default_weight(self) -> f64 {
        match self {
            Self::Na => 0.20,
            Self::Eu => 0.25,
            Self::Asia => 0.35,
            Self::Latam => 0.10,
            Self::Africa | Self::Oceania => 0.05,
        }
    }

    /// The wire label for this region (`"NA"`, `"EU"`, ...).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Na => "NA",
            Self::Eu => "EU",
            Self::Asia => "ASIA",
            Self::Latam => "LATAM",
            Self::Africa => "AFRICA",
            Self::Oceania => "OCEANIA",
        }
    }
}

impl core::fmt::Display for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Age groups
// ---------------------------------------------------------------------------

/// The seven demographic age buckets agents are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AgeGroup {
    /// Ages 13 through 17.
    #[serde(rename = "13-17")]
    Teens,
    /// Ages 18 through 24.
    #[serde(rename = "18-24")]
    YoungAdults,
    /// Ages 25 through 34.
    #[serde(rename = "25-34")]
    Adults,
    /// Ages 35 through 44.
    #[serde(rename = "35-44")]
    MiddleAged,
    /// Ages 45 through 54.
    #[serde(rename = "45-54")]
    Mature,
    /// Ages 55 through 64.
    #[serde(rename = "55-64")]
    Senior,
    /// Ages 65 and above.
    #[serde(rename = "65+")]
    Elder,
}

impl AgeGroup {
    /// All age groups in catalog order.
    pub const ALL: [Self; 7] = [
        Self::Teens,
        Self::YoungAdults,
        Self::Adults,
        Self::MiddleAged,
        Self::Mature,
        Self::Senior,
        Self::Elder,
    ];

    /// The wire label for this bucket (`"13-17"`, ..., `"65+"`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Teens => "13-17",
            Self::YoungAdults => "18-24",
            Self::Adults => "25-34",
            Self::MiddleAged => "35-44",
            Self::Mature => "45-54",
            Self::Senior => "55-64",
            Self::Elder => "65+",
        }
    }
}

impl core::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Interest catalog
// ---------------------------------------------------------------------------

/// The catalog of interest tags agents sample from (2 to 5 each).
///
/// Idea tags drawn from the same vocabulary give the relevance overlap
/// its bite; tags outside the catalog are allowed but rarely overlap.
pub const INTEREST_CATALOG: &[&str] = &[
    "tech",
    "music",
    "sports",
    "politics",
    "science",
    "art",
    "gaming",
    "fashion",
    "food",
    "travel",
    "health",
    "finance",
    "entertainment",
    "education",
    "environment",
    "social",
];

// ---------------------------------------------------------------------------
// Network topologies
// ---------------------------------------------------------------------------

/// The random-graph model used to wire a world's population.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    /// Barabási–Albert preferential attachment. Produces hub agents.
    #[default]
    ScaleFree,
    /// Watts–Strogatz ring lattice with rewiring. High clustering,
    /// short paths.
    SmallWorld,
    /// Erdős–Rényi `G(n, p)` with independent edge probability.
    Random,
    /// Region-biased random wiring: same-region candidate pairs connect
    /// with probability 0.7, cross-region with 0.3.
    GeoLocal,
}

// ---------------------------------------------------------------------------
// Mutation types
// ---------------------------------------------------------------------------

/// The kind of transform applied when an idea mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    /// Strip nuance; easier to pass along.
    Simplify,
    /// Amplify emotional charge.
    Emotionalize,
    /// Adapt the idea for a specific region.
    Localize,
    /// Push the idea to an extreme framing.
    Polarize,
    /// Compress into a meme format.
    Memeify,
    /// Unstructured drift with random attribute deltas.
    Random,
}

impl MutationType {
    /// All mutation kinds, for uniform selection.
    pub const ALL: [Self; 6] = [
        Self::Simplify,
        Self::Emotionalize,
        Self::Localize,
        Self::Polarize,
        Self::Memeify,
        Self::Random,
    ];
}

// ---------------------------------------------------------------------------
// World lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle state of a world.
///
/// `Created -> Running` on start, `Running <-> Paused` on pause/resume,
/// `-> Completed` when `max_steps` is reached, `-> Archived` is
/// administrative. Population and edges are built exactly once, at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum WorldStatus {
    /// Built but never started.
    Created,
    /// The tick loop is advancing this world.
    Running,
    /// Halted; may be resumed.
    Paused,
    /// Reached its configured `max_steps`.
    Completed,
    /// Retired administratively; read-only.
    Archived,
}

impl WorldStatus {
    /// Whether the world can never run again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Archived)
    }
}

// ---------------------------------------------------------------------------
// Idea listing sort keys
// ---------------------------------------------------------------------------

/// Sort order for idea listings on the control surface.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum IdeaSortKey {
    /// Most adopters first.
    #[default]
    Adopters,
    /// Highest reach first.
    Reach,
    /// Newest first.
    CreatedAt,
}
