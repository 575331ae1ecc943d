//! Error types for the manager and control surface.
//!
//! [`ManagerError`] unifies all control-plane failure modes into the five
//! kinds the command API exposes. [`ErrorBody`] is the wire shape any
//! front-end receives: `{kind, message, detail?}`.

use serde::{Deserialize, Serialize};

use memetic_agents::IdeaError;
use memetic_types::{IdeaId, WorldId};

/// Errors that can occur in the manager and control surface.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The requested world does not exist.
    #[error("world not found: {0}")]
    NotFound(WorldId),

    /// The requested idea does not exist in the given world.
    #[error("idea {idea_id} not found in world {world_id}")]
    IdeaNotFound {
        /// The world that was searched.
        world_id: WorldId,
        /// The idea that was not found.
        idea_id: IdeaId,
    },

    /// A request failed range or enumeration validation.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// The operation is not allowed in the world's current status.
    #[error("invalid state transition: {message}")]
    InvalidStateTransition {
        /// Why the transition was rejected.
        message: String,
    },

    /// The manager already holds its maximum number of worlds.
    #[error("capacity exhausted: {held} of {cap} worlds in use")]
    CapacityExhausted {
        /// Worlds currently held.
        held: usize,
        /// The configured cap.
        cap: usize,
    },

    /// A mutation was requested past an idea's budget.
    #[error("budget exhausted: {source}")]
    BudgetExhausted {
        /// The underlying idea error.
        #[from]
        source: IdeaError,
    },
}

impl ManagerError {
    /// The stable wire kind for this error.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::IdeaNotFound { .. } => "not_found",
            Self::InvalidInput { .. } => "invalid_input",
            Self::InvalidStateTransition { .. } => "invalid_state_transition",
            Self::CapacityExhausted { .. } => "capacity_exhausted",
            Self::BudgetExhausted { .. } => "budget_exhausted",
        }
    }

    /// Map the error to its wire body.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: String::from(self.kind()),
            message: self.to_string(),
            detail: None,
        }
    }
}

/// The wire shape of a control-surface error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable kind (`not_found`, `invalid_input`, ...).
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Optional extra context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        let err = ManagerError::NotFound(WorldId::new());
        assert_eq!(err.kind(), "not_found");

        let err = ManagerError::CapacityExhausted { held: 10, cap: 10 };
        assert_eq!(err.kind(), "capacity_exhausted");
        assert!(err.to_string().contains("10 of 10"));
    }

    #[test]
    fn body_serializes_without_empty_detail() {
        let body = ManagerError::InvalidInput {
            message: String::from("population_size out of range"),
        }
        .to_body();
        let json = serde_json::to_string(&body).unwrap_or_default();
        assert!(json.contains("invalid_input"));
        assert!(!json.contains("detail"));
    }
}
