//! Error types for the memetic-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.

use memetic_types::IdeaId;

/// Errors that can occur during idea operations.
#[derive(Debug, thiserror::Error)]
pub enum IdeaError {
    /// Attempted to mutate an idea that has spent its mutation budget.
    #[error("mutation budget exhausted for idea {idea_id}: {spent} of {budget} mutations spent")]
    BudgetExhausted {
        /// The idea whose budget is exhausted.
        idea_id: IdeaId,
        /// Mutations already spawned from the idea.
        spent: u32,
        /// The idea's configured mutation budget.
        budget: u32,
    },
}
