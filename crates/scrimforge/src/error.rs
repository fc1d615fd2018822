//! Unified error type for Scrimforge.

use scrimforge_match::{ConfigError, MatchError};
use scrimforge_pool::PoolError;
use scrimforge_protocol::ProtocolError;
use scrimforge_roster::RosterError;

/// Top-level error that wraps every crate-specific error.
///
/// Through the `scrimforge` crate you only deal with this one type; `?`
/// converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ScrimforgeError {
    /// A request body could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The pool could not be loaded or can't host the match.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// A player name didn't resolve, or the teams don't line up.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// Best-of or roster rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A match could not be created or driven.
    #[error(transparent)]
    Match(#[from] MatchError),
}

#[cfg(test)]
mod tests {
    use scrimforge_protocol::{PlayerId, Team};

    use super::*;

    #[test]
    fn test_from_pool_error() {
        let err: ScrimforgeError = PoolError::InvalidPool("pool \"x\" not found".into()).into();
        assert!(matches!(err, ScrimforgeError::Pool(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_from_roster_error() {
        let err: ScrimforgeError = RosterError::UnknownPlayer("cookiezi".into()).into();
        assert!(matches!(err, ScrimforgeError::Roster(_)));
        assert_eq!(err.to_string(), "couldn't find user cookiezi");
    }

    #[test]
    fn test_from_config_error() {
        let err: ScrimforgeError = ConfigError::InvalidBestOf(4).into();
        assert!(matches!(err, ScrimforgeError::Config(_)));
        assert!(err.to_string().contains("got 4"));
    }

    #[test]
    fn test_from_match_error() {
        let err: ScrimforgeError = MatchError::AlreadyDecided.into();
        assert!(matches!(err, ScrimforgeError::Match(_)));
    }

    #[test]
    fn test_roster_error_display_names_team() {
        let err: ScrimforgeError = RosterError::WrongRosterSize {
            team: Team::Blue,
            expected: 2,
            actual: 1,
        }
        .into();
        assert!(err.to_string().starts_with("Blue team"));
        let dup: ScrimforgeError = RosterError::DuplicatePlayer(PlayerId(3)).into();
        assert!(matches!(dup, ScrimforgeError::Roster(_)));
    }
}
