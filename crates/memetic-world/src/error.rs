//! Error types for world-level operations.

use memetic_types::{WorldId, WorldStatus};

/// Errors that can occur during world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// `run_step` was called while the world was not in the running state.
    #[error("world {world_id} is not running (status: {status:?})")]
    NotRunning {
        /// The world on which the step was attempted.
        world_id: WorldId,
        /// The world's actual status at the time of the call.
        status: WorldStatus,
    },
}
