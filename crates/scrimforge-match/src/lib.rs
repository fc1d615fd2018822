//! Match lifecycle for Scrimforge.
//!
//! Each match runs as an isolated Tokio task (actor model) that owns its
//! pick plan, scoreboard, team enforcer and inactivity watchdog, and drives
//! an already-open game room through the [`RoomControl`] trait.
//!
//! # Key types
//!
//! - [`MatchRegistry`]: creates matches, closes them all on shutdown
//! - [`MatchHandle`]: start a match and feed it room events
//! - [`RoomControl`]: the room commands a match needs
//! - [`Scoreboard`] / [`Decision`]: round tallies and what happens next
//! - [`MatchConfig`] / [`MatchSettings`]: who plays, and the match policy
//! - [`MatchPhase`]: lifecycle state machine

mod announce;
mod chat;
mod config;
mod control;
mod controller;
mod error;
mod registry;
mod scoreboard;

pub use chat::ChatCommand;
pub use config::{MAX_BEST_OF, MIN_BEST_OF, MatchConfig, MatchPhase, MatchSettings, TiePolicy};
pub use control::RoomControl;
pub use controller::{MatchHandle, MatchInfo};
pub use error::{ConfigError, MatchError, RoomCommandError};
pub use registry::MatchRegistry;
pub use scoreboard::{Decision, RoundOutcome, Scoreboard};
