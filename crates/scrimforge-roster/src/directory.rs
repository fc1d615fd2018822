//! Player lookup hook and roster resolution.
//!
//! Scrimforge doesn't know how accounts are stored; that is the game
//! server's API. It defines the [`PlayerDirectory`] trait: one async method
//! that turns a typed username into a [`PlayerId`].

use std::collections::HashSet;
use std::future::Future;

use scrimforge_protocol::{PlayerId, Team};

use crate::{Roster, RosterError};

/// Resolves usernames to player identities.
///
/// `Send + Sync + 'static` because the directory is owned by a long-lived
/// service and used from many tasks.
///
/// # Example
///
/// ```rust
/// use scrimforge_protocol::PlayerId;
/// use scrimforge_roster::{PlayerDirectory, RosterError};
///
/// /// Treats numeric names as ids. Handy in development.
/// struct NumericDirectory;
///
/// impl PlayerDirectory for NumericDirectory {
///     async fn lookup(
///         &self,
///         username: &str,
///     ) -> Result<Option<PlayerId>, RosterError> {
///         Ok(username.parse().ok().map(PlayerId))
///     }
/// }
/// ```
pub trait PlayerDirectory: Send + Sync + 'static {
    /// Looks up `username`.
    ///
    /// # Returns
    /// - `Ok(Some(id))`: the player exists
    /// - `Ok(None)`: no such player
    /// - `Err(RosterError::Lookup)`: the directory could not answer
    fn lookup(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<PlayerId>, RosterError>> + Send;
}

/// Splits a comma-separated name list, trimming whitespace.
///
/// Empty entries are kept so `"a,,b"` still counts as three names and
/// fails the size check instead of silently shrinking.
pub fn parse_names(input: &str) -> Vec<String> {
    input.split(',').map(|name| name.trim().to_string()).collect()
}

/// Looks up both teams and builds a validated [`Roster`].
///
/// Team sizes are checked before any lookup so a typo in the count doesn't
/// cost a round trip per name. Lookups run in roster order and stop at the
/// first failure.
///
/// # Errors
/// - [`RosterError::InvalidTeamSize`] / [`RosterError::WrongRosterSize`]
/// - [`RosterError::UnknownPlayer`]: a name didn't resolve
/// - [`RosterError::DuplicatePlayer`]: two names resolved to one player
/// - [`RosterError::Lookup`]: the directory failed
pub async fn resolve_roster<D: PlayerDirectory>(
    directory: &D,
    team_size: usize,
    red: &[String],
    blue: &[String],
) -> Result<Roster, RosterError> {
    if !(crate::MIN_TEAM_SIZE..=crate::MAX_TEAM_SIZE).contains(&team_size) {
        return Err(RosterError::InvalidTeamSize(team_size));
    }
    for (team, names) in [(Team::Red, red), (Team::Blue, blue)] {
        if names.len() != team_size {
            return Err(RosterError::WrongRosterSize {
                team,
                expected: team_size,
                actual: names.len(),
            });
        }
    }

    let mut seen = HashSet::new();
    let red_ids = resolve_team(directory, red, &mut seen).await?;
    let blue_ids = resolve_team(directory, blue, &mut seen).await?;
    Roster::new(team_size, red_ids, blue_ids)
}

async fn resolve_team<D: PlayerDirectory>(
    directory: &D,
    names: &[String],
    seen: &mut HashSet<PlayerId>,
) -> Result<Vec<PlayerId>, RosterError> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let id = directory
            .lookup(name)
            .await?
            .ok_or_else(|| RosterError::UnknownPlayer(name.clone()))?;
        if !seen.insert(id) {
            return Err(RosterError::DuplicatePlayer(id));
        }
        tracing::debug!(%name, player = %id, "player resolved");
        ids.push(id);
    }
    Ok(ids)
}
