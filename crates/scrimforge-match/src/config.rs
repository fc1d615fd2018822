//! Match configuration, policy settings, and the phase state machine.

use std::time::Duration;

use scrimforge_protocol::{LobbySettings, PlayerId, Ruleset};
use scrimforge_roster::Roster;
use scrimforge_watchdog::WatchdogConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Shortest match.
pub const MIN_BEST_OF: usize = 1;
/// Longest match.
pub const MAX_BEST_OF: usize = 13;

// ---------------------------------------------------------------------------
// MatchConfig
// ---------------------------------------------------------------------------

/// What the setup collaborator decided: match length and who plays.
///
/// Only constructible through validation, so a `MatchConfig` in hand is
/// always playable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    best_of: usize,
    roster: Roster,
}

impl MatchConfig {
    /// # Errors
    /// [`ConfigError::InvalidBestOf`] if `best_of` is even or out of range.
    pub fn new(best_of: usize, roster: Roster) -> Result<Self, ConfigError> {
        if !(MIN_BEST_OF..=MAX_BEST_OF).contains(&best_of) || best_of % 2 == 0 {
            return Err(ConfigError::InvalidBestOf(best_of));
        }
        Ok(Self { best_of, roster })
    }

    /// Validates the roster and the match length together.
    pub fn from_parts(
        best_of: usize,
        team_size: usize,
        red: Vec<PlayerId>,
        blue: Vec<PlayerId>,
    ) -> Result<Self, ConfigError> {
        let roster = Roster::new(team_size, red, blue)?;
        Self::new(best_of, roster)
    }

    pub fn best_of(&self) -> usize {
        self.best_of
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn team_size(&self) -> usize {
        self.roster.team_size()
    }
}

// ---------------------------------------------------------------------------
// MatchSettings
// ---------------------------------------------------------------------------

/// What happens when both teams post the same total in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TiePolicy {
    /// Both teams gain a point.
    #[default]
    BothScore,
    /// Nobody gains a point.
    NeitherScores,
}

/// Policy knobs shared by every match a service runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub tie_policy: TiePolicy,

    /// Idle time after which a room outside of play is closed.
    pub inactivity_timeout: Duration,

    /// Delay between the final score and closing the room.
    pub close_grace: Duration,

    /// Countdown passed to the room's start command.
    pub start_delay_secs: u32,

    /// Wait before retrying a failed map or mod command.
    pub retry_backoff: Duration,

    pub ruleset: Ruleset,

    /// Team mode and win condition. `slots` is overwritten per match from
    /// the team size.
    pub lobby: LobbySettings,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            tie_policy: TiePolicy::default(),
            inactivity_timeout: Duration::from_secs(300),
            close_grace: Duration::from_secs(30),
            start_delay_secs: 10,
            retry_backoff: Duration::from_secs(2),
            ruleset: Ruleset::default(),
            lobby: LobbySettings::team_vs(1),
        }
    }
}

impl MatchSettings {
    pub fn watchdog_config(&self) -> WatchdogConfig {
        WatchdogConfig::with_timeout(self.inactivity_timeout)
    }

    /// Lobby settings sized for two teams of `team_size`.
    pub fn lobby_for(&self, team_size: usize) -> LobbySettings {
        LobbySettings {
            slots: u8::try_from(team_size * 2).unwrap_or(u8::MAX),
            ..self.lobby
        }
    }
}

// ---------------------------------------------------------------------------
// MatchPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a match.
///
/// ```text
/// Created → AwaitingReady → Playing → Scoring ─┬→ AwaitingReady
///                 ↕                            └→ Complete → Closed
///               Paused
/// ```
///
/// - **Created**: the match exists but the room has not been set up.
/// - **AwaitingReady**: a map is set; waiting for every player to ready up.
/// - **Playing**: the room is playing the map. The watchdog is suspended.
/// - **Scoring**: results are being tallied.
/// - **Paused**: a room command failed twice. Waits for `!resume`.
/// - **Complete**: the match is decided; the room closes after a grace delay.
/// - **Closed**: the room is closed. Reachable from every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Created,
    AwaitingReady,
    Playing,
    Scoring,
    Paused,
    Complete,
    Closed,
}

impl MatchPhase {
    /// Returns `true` once the match result can no longer change.
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Complete | Self::Closed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::AwaitingReady => write!(f, "AwaitingReady"),
            Self::Playing => write!(f, "Playing"),
            Self::Scoring => write!(f, "Scoring"),
            Self::Paused => write!(f, "Paused"),
            Self::Complete => write!(f, "Complete"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}
