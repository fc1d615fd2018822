//! # Scrimforge
//!
//! Best-of-N osu! scrim matches between two fixed teams.
//!
//! Scrimforge owns the match itself: it drafts a pick order over a pool
//! of mod-groups, draws a fresh beatmap per round, scores rounds by team
//! totals, keeps players on their own team, and closes rooms that go
//! idle. The game room is driven through the [`RoomControl`] trait; its
//! callbacks are fed back as [`RoomEvent`]s.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrimforge::prelude::*;
//!
//! // Implement RoomControl for your room client and PlayerDirectory for
//! // your account lookup, then:
//! // let service = ScrimServiceBuilder::new()
//! //     .build(DirectoryPoolSource::new("pools"), my_directory);
//! // let request = MatchRequest::from_lists(2, 5, "a, b", "c, d", "weekly-7");
//! // let handle = service.create_match(request, my_room).await?;
//! // handle.start().await?;
//! // room callbacks: handle.notify(RoomEvent::AllPlayersReady).await?;
//! ```

mod error;
mod service;
pub mod telemetry;

pub use error::ScrimforgeError;
pub use service::{MatchRequest, ScrimService, ScrimServiceBuilder};

pub use scrimforge_match::{
    ChatCommand, ConfigError, Decision, MatchConfig, MatchError, MatchHandle, MatchInfo,
    MatchPhase, MatchRegistry, MatchSettings, RoomCommandError, RoomControl, TiePolicy,
};
pub use scrimforge_pool::{
    DirectoryPoolSource, MemoryPoolSource, ModGroup, Pool, PoolError, PoolSource, SelectionError,
};
pub use scrimforge_protocol::{
    BeatmapId, LobbySettings, MatchId, ModCode, ModSet, PlayerId, PlayerResult, ProtocolError,
    RoomEvent, Ruleset, Team,
};
pub use scrimforge_roster::{PlayerDirectory, Roster, RosterError};
pub use scrimforge_watchdog::WatchdogConfig;

/// Everything needed to set up and drive matches.
pub mod prelude {
    pub use crate::{
        BeatmapId, DirectoryPoolSource, LobbySettings, MatchHandle, MatchId, MatchInfo,
        MatchPhase, MatchRequest, MatchSettings, MemoryPoolSource, ModCode, ModGroup, ModSet,
        PlayerDirectory, PlayerId, PlayerResult, Pool, PoolSource, RoomCommandError,
        RoomControl, RoomEvent, RosterError, Ruleset, ScrimService, ScrimServiceBuilder,
        ScrimforgeError, Team, TiePolicy,
    };
}
