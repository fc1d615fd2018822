//! Error types for the match layer.

use scrimforge_pool::{PoolError, SelectionError};
use scrimforge_protocol::MatchId;
use scrimforge_roster::RosterError;

/// A match configuration was rejected before the match was created.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Best-of must be odd and between 1 and 13.
    #[error("best-of must be an odd number between 1 and 13, got {0}")]
    InvalidBestOf(usize),

    /// Team size or rosters are invalid.
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// The room rejected or never answered a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomCommandError {
    #[error("room rejected command: {0}")]
    Rejected(String),

    /// The room connection is gone.
    #[error("room is unavailable")]
    Unavailable,

    #[error("room command timed out")]
    Timeout,
}

/// Errors that can occur during match operations.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("pool error: {0}")]
    Pool(#[from] PoolError),

    /// Map selection broke an invariant. Fatal to the match.
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("room command failed: {0}")]
    RoomCommand(#[from] RoomCommandError),

    /// A round was recorded after the match was already decided.
    #[error("match is already decided")]
    AlreadyDecided,

    /// The match is in a phase that doesn't allow this operation.
    /// For example, starting a match that has already started.
    #[error("invalid match state for this operation: {0}")]
    InvalidState(String),

    /// The match actor has stopped.
    #[error("match {0} is unavailable")]
    Unavailable(MatchId),
}
