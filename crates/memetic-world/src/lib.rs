//! World aggregate, topology construction, and the tick algorithm for the
//! Memetic simulation.
//!
//! A [`World`] exclusively owns one agent population, the frozen social
//! graph wired over it, its idea catalog, and a bounded tail of spread
//! events. The tick algorithm propagates ideas across edges, triggers
//! budgeted mutations, and decays beliefs, committing exactly one step
//! per call.
//!
//! # Modules
//!
//! - [`population`] -- Region-weighted population seeding.
//! - [`topology`] -- The four random-graph builders (scale-free,
//!   small-world, random, geo-local) and the [`CsrGraph`] adjacency
//!   index ticks iterate over.
//! - [`world`] -- The [`World`] aggregate and its tick, injection,
//!   snapshot, leaderboard, and stats operations.
//! - [`error`] -- Typed errors for world operations.

pub mod error;
pub mod population;
pub mod topology;
pub mod world;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use population::build_population;
pub use topology::{CsrGraph, build_edges};
pub use world::World;
