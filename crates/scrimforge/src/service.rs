//! `ScrimService` builder and entry points.
//!
//! This is what the match-setup collaborator talks to. It ties the layers
//! together: pool source → roster lookup → match registry.

use scrimforge_match::{MatchConfig, MatchHandle, MatchRegistry, MatchSettings, RoomControl};
use scrimforge_pool::{PoolSource, pool_id_from_reference};
use scrimforge_protocol::{Codec, JsonCodec, MatchId};
use scrimforge_roster::{PlayerDirectory, parse_names, resolve_roster};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ScrimforgeError;

/// Everything the setup wizard collects before a match can be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub team_size: usize,
    pub best_of: usize,
    /// Red team usernames, in slot order.
    pub red: Vec<String>,
    /// Blue team usernames, in slot order.
    pub blue: Vec<String>,
    /// Pool link or bare identifier.
    pub pool: String,
}

impl MatchRequest {
    /// Builds a request from comma-separated name lists, the way they are
    /// typed into chat.
    pub fn from_lists(
        team_size: usize,
        best_of: usize,
        red: &str,
        blue: &str,
        pool: impl Into<String>,
    ) -> Self {
        Self {
            team_size,
            best_of,
            red: parse_names(red),
            blue: parse_names(blue),
            pool: pool.into(),
        }
    }
    /// Decodes a request sent as JSON by the setup front end.
    ///
    /// # Errors
    /// [`ScrimforgeError::Protocol`] if the body is not a valid request.
    pub fn from_json(data: &[u8]) -> Result<Self, ScrimforgeError> {
        Ok(JsonCodec.decode(data)?)
    }
}

/// Builder for a [`ScrimService`].
///
/// The pool source and directory types are fixed by [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use scrimforge::prelude::*;
///
/// # struct Nobody;
/// # impl PlayerDirectory for Nobody {
/// #     async fn lookup(&self, _: &str) -> Result<Option<PlayerId>, RosterError> { Ok(None) }
/// # }
/// let service = ScrimServiceBuilder::new()
///     .settings(MatchSettings {
///         tie_policy: TiePolicy::NeitherScores,
///         ..MatchSettings::default()
///     })
///     .build(DirectoryPoolSource::new("pools"), Nobody);
/// assert_eq!(service.settings().tie_policy, TiePolicy::NeitherScores);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScrimServiceBuilder {
    settings: MatchSettings,
}

impl ScrimServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy applied to every match this service creates.
    pub fn settings(mut self, settings: MatchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build<P: PoolSource, D: PlayerDirectory>(
        self,
        pools: P,
        directory: D,
    ) -> ScrimService<P, D> {
        ScrimService {
            pools,
            directory,
            settings: self.settings,
            registry: MatchRegistry::new(),
        }
    }
}

/// Creates matches and keeps track of them until their rooms close.
pub struct ScrimService<P: PoolSource, D: PlayerDirectory> {
    pools: P,
    directory: D,
    settings: MatchSettings,
    registry: MatchRegistry,
}

impl<P: PoolSource, D: PlayerDirectory> ScrimService<P, D> {
    /// Validates `request`, loads its pool, and spawns a match bound to
    /// `room`.
    ///
    /// The match is registered but not started; call
    /// [`MatchHandle::start`] once the room is open.
    ///
    /// # Errors
    /// - [`ScrimforgeError::Roster`]: a name didn't resolve or the teams
    ///   don't match `team_size`
    /// - [`ScrimforgeError::Config`]: invalid best-of
    /// - [`ScrimforgeError::Pool`]: unknown pool, or one too small for
    ///   the match
    pub async fn create_match<R: RoomControl>(
        &self,
        request: MatchRequest,
        room: R,
    ) -> Result<MatchHandle, ScrimforgeError> {
        let pool_id = pool_id_from_reference(&request.pool)?;
        let roster =
            resolve_roster(&self.directory, request.team_size, &request.red, &request.blue)
                .await?;
        let config = MatchConfig::new(request.best_of, roster)?;
        let pool = self.pools.load_for(&pool_id, config.best_of()).await?;

        let handle = self
            .registry
            .create_match(config, self.settings.clone(), &pool, room)
            .await?;
        info!(
            match_id = %handle.match_id(),
            pool = %pool_id,
            team_size = request.team_size,
            best_of = request.best_of,
            "match requested"
        );
        Ok(handle)
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    /// IDs of matches whose rooms are still open.
    pub async fn active_matches(&self) -> Vec<MatchId> {
        self.registry.match_ids().await
    }

    /// Closes every open room. Returns how many matches were stopped.
    pub async fn shutdown(&self) -> usize {
        let closed = self.registry.close_all().await;
        info!(closed, "scrim service shut down");
        closed
    }

    /// Waits for Ctrl-C, then [`shutdown`](Self::shutdown).
    ///
    /// # Errors
    /// Returns the I/O error if the signal handler can't be installed.
    pub async fn shutdown_on_ctrl_c(&self) -> std::io::Result<usize> {
        tokio::signal::ctrl_c().await?;
        info!("interrupt received, closing rooms");
        Ok(self.shutdown().await)
    }
}
