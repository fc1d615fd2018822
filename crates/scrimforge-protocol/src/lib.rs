//! Shared vocabulary for Scrimforge.
//!
//! This crate defines the values that cross component boundaries:
//!
//! - **Identity** ([`PlayerId`], [`MatchId`], [`BeatmapId`]): newtype
//!   wrappers so a player can never be passed where a beatmap is expected.
//! - **Gameplay** ([`Team`], [`ModCode`], [`Mod`], [`ModSet`], [`Ruleset`],
//!   [`LobbySettings`]): what a room is told to play and how.
//! - **Room events** ([`RoomEvent`], [`PlayerResult`]): what a room reports
//!   back to the match controller.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how pool documents and
//!   match requests are decoded from bytes.
//!
//! # Architecture
//!
//! The protocol layer has no behavior of its own. Pool, roster, and match
//! crates all build on it:
//!
//! ```text
//! Room adapter (external) → RoomEvent → MatchController → RoomControl commands
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    BeatmapId, LobbySettings, MatchId, Mod, ModCode, ModSet, PlayerId,
    PlayerResult, RoomEvent, Ruleset, Team, TeamMode, WinCondition,
};
