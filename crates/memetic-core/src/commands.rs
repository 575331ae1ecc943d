//! The control surface: a thin, typed command layer over the manager.
//!
//! Each command validates its inputs against the wire-exact ranges,
//! delegates to [`SimulationManager`], and returns the record any
//! front-end consumes. Errors map one-to-one onto the five kinds in
//! [`ManagerError`]; [`ManagerError::to_body`] produces the
//! `{kind, message, detail?}` wire shape.
//!
//! | Command | Result |
//! |---------|--------|
//! | [`create_world`] | [`WorldSummary`] |
//! | [`list_worlds`] | `Vec<WorldSummary>` |
//! | [`get_world`] / [`delete_world`] | [`WorldSummary`] / ack |
//! | [`start_world`] / [`stop_world`] / [`step_world`] | summary / reports |
//! | [`get_snapshot`] | [`WorldSnapshot`] |
//! | [`inject_idea`] / [`get_idea`] / [`list_ideas`] | [`Idea`] |
//! | [`get_leaderboard`] | `Vec<LeaderboardEntry>` |
//! | [`get_stats`] | [`WorldStats`] |

use serde::Deserialize;
use validator::Validate;

use memetic_agents::{DEFAULT_VALENCE, DEFAULT_VIRALITY, Idea, IdeaTarget};
use memetic_types::{
    IdeaId, IdeaSortKey, LeaderboardEntry, StepReport, UserId, WorldConfig, WorldId,
    WorldSnapshot, WorldStats, WorldSummary,
};

use crate::error::ManagerError;
use crate::manager::{IdeaSeed, SimulationManager, WorldFilter};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Request to create a world.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorldRequest {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// World configuration; omitted entirely, engine defaults apply.
    #[serde(default)]
    pub config: Option<WorldConfig>,
    /// Whether the world is visible to all users.
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// The user creating the world.
    pub creator_id: UserId,
}

/// Request to list worlds.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListWorldsRequest {
    /// Only worlds created by this user.
    #[serde(default)]
    pub creator_id: Option<UserId>,
    /// Only publicly visible worlds.
    #[serde(default)]
    pub public_only: bool,
}

/// Request to advance a world manually.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct StepWorldRequest {
    /// The world to step.
    pub world_id: WorldId,
    /// Number of steps to run.
    #[serde(default = "default_steps")]
    #[validate(range(min = 1, max = 1000))]
    pub steps: u32,
}

/// Request to inject an idea into a world.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InjectIdeaRequest {
    /// The target world.
    pub world_id: WorldId,
    /// The user creating the idea.
    pub creator_id: UserId,
    /// Idea text content.
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    /// Tags matched against agent interests.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Target demographics for seeding.
    #[serde(default)]
    pub target: IdeaTarget,
    /// Base virality in [0, 1].
    #[serde(default = "default_virality")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub virality_score: f64,
    /// Emotional intensity in [0, 1].
    #[serde(default = "default_valence")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub emotional_valence: f64,
    /// Number of seed adopters.
    #[serde(default = "default_adopters")]
    #[validate(range(min = 1, max = 100))]
    pub initial_adopters: u32,
}

/// Request to list a world's ideas.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct ListIdeasRequest {
    /// The world whose ideas to list.
    pub world_id: WorldId,
    /// Maximum ideas to return.
    #[serde(default = "default_idea_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
    /// Sort order.
    #[serde(default)]
    pub sort_by: IdeaSortKey,
}

/// Request for a world's idea leaderboard.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct LeaderboardRequest {
    /// The world to rank ideas for.
    pub world_id: WorldId,
    /// Maximum rows to return.
    #[serde(default = "default_leaderboard_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: u32,
}

const fn default_true() -> bool {
    true
}

const fn default_steps() -> u32 {
    1
}

const fn default_virality() -> f64 {
    DEFAULT_VIRALITY
}

const fn default_valence() -> f64 {
    DEFAULT_VALENCE
}

const fn default_adopters() -> u32 {
    1
}

const fn default_idea_limit() -> u32 {
    20
}

const fn default_leaderboard_limit() -> u32 {
    10
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Create a world, filling config defaults from the engine settings when
/// the request omits the config entirely.
pub async fn create_world(
    manager: &SimulationManager,
    request: CreateWorldRequest,
) -> Result<WorldSummary, ManagerError> {
    request.validate().map_err(invalid_input)?;

    let config = request.config.map_or_else(
        || WorldConfig {
            population_size: manager.settings().default_population_size,
            time_step_ms: manager.settings().simulation_tick_ms,
            ..WorldConfig::default()
        },
        |config| config,
    );
    config.validate().map_err(invalid_input)?;
    config
        .check_region_axes()
        .map_err(|message| ManagerError::InvalidInput { message })?;

    manager
        .create_world(
            request.creator_id,
            &request.name,
            &request.description,
            config,
            request.is_public,
        )
        .await
}

/// List worlds, optionally filtered by creator and visibility.
pub async fn list_worlds(
    manager: &SimulationManager,
    request: ListWorldsRequest,
) -> Vec<WorldSummary> {
    manager
        .list_worlds(WorldFilter {
            creator_id: request.creator_id,
            public_only: request.public_only,
        })
        .await
}

/// Fetch one world's summary.
pub async fn get_world(
    manager: &SimulationManager,
    world_id: WorldId,
) -> Result<WorldSummary, ManagerError> {
    manager.get_world(world_id).await
}

/// Delete a world (stopping it first).
pub async fn delete_world(
    manager: &SimulationManager,
    world_id: WorldId,
) -> Result<(), ManagerError> {
    manager.delete_world(world_id).await
}

/// Start or resume a world's loop.
pub async fn start_world(
    manager: &SimulationManager,
    world_id: WorldId,
) -> Result<WorldSummary, ManagerError> {
    manager.start_world(world_id).await
}

/// Pause a world's loop.
pub async fn stop_world(
    manager: &SimulationManager,
    world_id: WorldId,
) -> Result<WorldSummary, ManagerError> {
    manager.stop_world(world_id).await
}

/// Advance a world by a bounded number of steps.
pub async fn step_world(
    manager: &SimulationManager,
    request: StepWorldRequest,
) -> Result<Vec<StepReport>, ManagerError> {
    request.validate().map_err(invalid_input)?;
    manager.step_world(request.world_id, request.steps).await
}

/// Take a point-in-time snapshot of a world.
pub async fn get_snapshot(
    manager: &SimulationManager,
    world_id: WorldId,
) -> Result<WorldSnapshot, ManagerError> {
    manager.get_snapshot(world_id).await
}

/// Inject an idea and seed its initial adopters.
pub async fn inject_idea(
    manager: &SimulationManager,
    request: InjectIdeaRequest,
) -> Result<Idea, ManagerError> {
    request.validate().map_err(invalid_input)?;
    manager
        .inject_idea(
            request.world_id,
            IdeaSeed {
                creator_id: request.creator_id,
                text: request.text,
                tags: request.tags,
                target: request.target,
                virality_score: request.virality_score,
                emotional_valence: request.emotional_valence,
                initial_adopters: request.initial_adopters,
            },
        )
        .await
}

/// Fetch one idea from a world.
pub async fn get_idea(
    manager: &SimulationManager,
    world_id: WorldId,
    idea_id: IdeaId,
) -> Result<Idea, ManagerError> {
    manager.get_idea(world_id, idea_id).await
}

/// List a world's ideas sorted by the requested key.
pub async fn list_ideas(
    manager: &SimulationManager,
    request: ListIdeasRequest,
) -> Result<Vec<Idea>, ManagerError> {
    request.validate().map_err(invalid_input)?;
    manager
        .list_ideas(
            request.world_id,
            usize::try_from(request.limit).unwrap_or(0),
            request.sort_by,
        )
        .await
}

/// The idea leaderboard of a world.
pub async fn get_leaderboard(
    manager: &SimulationManager,
    request: LeaderboardRequest,
) -> Result<Vec<LeaderboardEntry>, ManagerError> {
    request.validate().map_err(invalid_input)?;
    manager
        .get_leaderboard(request.world_id, usize::try_from(request.limit).unwrap_or(0))
        .await
}

/// Aggregate statistics of a world.
pub async fn get_stats(
    manager: &SimulationManager,
    world_id: WorldId,
) -> Result<WorldStats, ManagerError> {
    manager.get_stats(world_id).await
}

/// Map validation failures to the invalid-input kind.
fn invalid_input(errors: validator::ValidationErrors) -> ManagerError {
    ManagerError::InvalidInput {
        message: errors.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
