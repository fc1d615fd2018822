//! Error types for the roster layer.

use scrimforge_protocol::{PlayerId, Team};

/// Errors raised while building a roster.
///
/// These are configuration errors: they are reported to whoever is setting
/// the match up, before any room exists.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Team size outside `1..=8`.
    #[error("invalid team size {0} (must be 1-8)")]
    InvalidTeamSize(usize),

    /// A team has the wrong number of players.
    #[error("{team} team has {actual} players, expected {expected}")]
    WrongRosterSize {
        team: Team,
        expected: usize,
        actual: usize,
    },

    /// The same player appears twice (in one team or across both).
    #[error("player {0} cannot be included multiple times")]
    DuplicatePlayer(PlayerId),

    /// The directory has no player by this name.
    #[error("couldn't find user {0}")]
    UnknownPlayer(String),

    /// The directory itself failed (network, rate limit, …).
    #[error("player lookup failed: {0}")]
    Lookup(String),
}
