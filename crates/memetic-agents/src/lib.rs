//! Agent and idea models for the Memetic simulation.
//!
//! This crate holds the two entity models at the heart of diffusion --
//! agents (who spread) and ideas (what spreads) -- together with the
//! probability contracts that couple them and the mutation seam.
//!
//! # Modules
//!
//! - [`agent`] -- [`Agent`] with profile, state, beliefs, adjacency, and
//!   the multiplicative adoption-probability formula.
//! - [`idea`] -- [`Idea`] with content, virality attributes, targeting,
//!   mutation lineage under a budget, and the spread-probability formula.
//! - [`mutation`] -- [`MutationProvider`] capability trait and the
//!   built-in [`DeterministicMutator`].
//! - [`error`] -- Typed errors for fallible idea operations.

pub mod agent;
pub mod error;
pub mod idea;
pub mod mutation;

// Re-export primary types at crate root.
pub use agent::{Agent, AgentProfile, AgentState};
pub use error::IdeaError;
pub use idea::{
    DEFAULT_COMPLEXITY, DEFAULT_MUTATION_BUDGET, DEFAULT_VALENCE, DEFAULT_VIRALITY, Idea,
    IdeaTarget,
};
pub use mutation::{
    DETERMINISTIC_SOURCE, DeterministicMutator, MutationOutcome, MutationProvider,
};
