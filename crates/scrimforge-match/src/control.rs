//! The command surface of an open game room.
//!
//! Scrimforge doesn't connect to game servers itself. Whoever opened the
//! room implements [`RoomControl`] over their client library and forwards
//! the room's callbacks to the match as [`RoomEvent`](scrimforge_protocol::RoomEvent)s.

use std::future::Future;

use scrimforge_protocol::{BeatmapId, LobbySettings, ModSet, PlayerId, Ruleset, Team};

use crate::RoomCommandError;

/// Commands the match controller issues to its room.
///
/// Every method is a single request; the controller decides which ones
/// are retried. Implementations should return promptly with
/// [`RoomCommandError::Timeout`] rather than hang.
///
/// # Example
///
/// ```rust
/// use scrimforge_match::{RoomCommandError, RoomControl};
/// use scrimforge_protocol::{BeatmapId, LobbySettings, ModSet, PlayerId, Ruleset, Team};
///
/// /// Logs every command and accepts it.
/// struct PrintRoom;
///
/// impl RoomControl for PrintRoom {
///     async fn set_map(&self, map: BeatmapId, _: Ruleset) -> Result<(), RoomCommandError> {
///         println!("map {map}");
///         Ok(())
///     }
///     async fn set_mods(&self, mods: ModSet, freemod: bool) -> Result<(), RoomCommandError> {
///         println!("mods {mods} freemod={freemod}");
///         Ok(())
///     }
///     async fn set_team_mode(&self, _: LobbySettings) -> Result<(), RoomCommandError> { Ok(()) }
///     async fn lock_slots(&self) -> Result<(), RoomCommandError> { Ok(()) }
///     async fn set_password(&self, _: &str) -> Result<(), RoomCommandError> { Ok(()) }
///     async fn invite(&self, _: PlayerId) -> Result<(), RoomCommandError> { Ok(()) }
///     async fn change_team(&self, _: PlayerId, _: Team) -> Result<(), RoomCommandError> { Ok(()) }
///     async fn remove(&self, _: PlayerId) -> Result<(), RoomCommandError> { Ok(()) }
///     async fn start_match(&self, _: u32) -> Result<(), RoomCommandError> { Ok(()) }
///     async fn close(&self) -> Result<(), RoomCommandError> { Ok(()) }
///     async fn send_message(&self, text: &str) -> Result<(), RoomCommandError> {
///         println!("> {text}");
///         Ok(())
///     }
/// }
/// ```
pub trait RoomControl: Send + Sync + 'static {
    /// Sets the beatmap for the next round.
    fn set_map(
        &self,
        beatmap: BeatmapId,
        ruleset: Ruleset,
    ) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    /// Sets the enforced mods. With `freemod` players may add their own.
    fn set_mods(
        &self,
        mods: ModSet,
        freemod: bool,
    ) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    /// Sets team mode, win condition, and slot count.
    fn set_team_mode(
        &self,
        settings: LobbySettings,
    ) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    fn lock_slots(&self) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    fn set_password(
        &self,
        password: &str,
    ) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    fn invite(
        &self,
        player: PlayerId,
    ) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    /// Moves a player to `team`.
    fn change_team(
        &self,
        player: PlayerId,
        team: Team,
    ) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    /// Kicks a player out of the room.
    fn remove(
        &self,
        player: PlayerId,
    ) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    /// Starts the round after a `delay_secs` countdown.
    fn start_match(
        &self,
        delay_secs: u32,
    ) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    /// Closes the room. The controller calls this at most once.
    fn close(&self) -> impl Future<Output = Result<(), RoomCommandError>> + Send;

    /// Posts a chat line in the room.
    fn send_message(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<(), RoomCommandError>> + Send;
}
