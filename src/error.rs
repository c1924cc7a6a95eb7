//! Error types for grid map and environment operations.

use crate::CellIndex;
use thiserror::Error;

/// Result type alias using [`GridWorldError`].
pub type Result<T> = std::result::Result<T, GridWorldError>;

/// Top-level error type for all grid map and environment operations.
#[derive(Debug, Error)]
pub enum GridWorldError {
    /// Cell access past the grid's row/column extents.
    #[error("index out of range: {0:?}")]
    IndexOutOfRange(CellIndex),

    /// The evaluator was called on a point strictly outside the map.
    #[error("point ({x}, {y}) is out of the map")]
    OutOfMap { x: f32, y: f32 },

    /// An accessor that requires a Start cell was invoked before one was set.
    #[error("map has no starting cell set")]
    MissingStart,

    /// An accessor that requires an End cell was invoked before one was set.
    #[error("map has no ending cell set")]
    MissingEnd,

    /// An attempt was made to turn the Start or End cell into an Obstacle.
    #[error("cannot turn {0:?} into an obstacle, it is reserved")]
    ForbiddenObstacle(CellIndex),

    /// An Environment operation was attempted with no GridMap bound.
    #[error("environment has no map set")]
    MissingMap,

    /// `step` was called after the episode already terminated.
    #[error("episode already terminated, call reset() first")]
    EpisodeTerminated,

    /// A caller-supplied argument violates a precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `initialize` was called a second time on the same map.
    #[error("map already initialized")]
    AlreadyInitialized,

    /// The persistence collaborator found a missing or ill-typed field.
    #[error("malformed persisted state: {0}")]
    MalformedPersistedState(String),
}
