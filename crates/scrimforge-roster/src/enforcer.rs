//! Team enforcement: keeps the room's membership in line with the roster.
//!
//! The enforcer does not talk to the room. It tells the caller what to do
//! ([`Enforcement`]) and keeps track of who is currently present.

use std::collections::HashMap;

use scrimforge_protocol::{PlayerId, Team};

use crate::Roster;

/// What the room should do about a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Move the player to this team.
    Assign(Team),
    /// Remove the player from the room.
    Remove,
}

/// Applies the roster to room membership events.
///
/// The room is members-only for the duration of the match: a rostered
/// player is always put on their own team, anyone else is removed.
#[derive(Debug, Clone)]
pub struct TeamEnforcer {
    roster: Roster,
    /// Rostered players currently in the room, with the team they were
    /// assigned to.
    present: HashMap<PlayerId, Team>,
}

impl TeamEnforcer {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            present: HashMap::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// A player entered the room.
    pub fn on_player_joined(&mut self, player: PlayerId) -> Enforcement {
        match self.roster.team_of(player) {
            Some(team) => {
                self.present.insert(player, team);
                tracing::debug!(%player, %team, "rostered player joined");
                Enforcement::Assign(team)
            }
            None => {
                tracing::info!(%player, "unrostered player joined, removing");
                Enforcement::Remove
            }
        }
    }

    /// A player moved to `team`.
    ///
    /// Returns `None` when the move is allowed (they're on their own team).
    pub fn on_team_changed(
        &mut self,
        player: PlayerId,
        team: Team,
    ) -> Option<Enforcement> {
        match self.roster.team_of(player) {
            Some(own) if own == team => None,
            Some(own) => {
                tracing::debug!(%player, from = %team, to = %own, "moving player back");
                self.present.insert(player, own);
                Some(Enforcement::Assign(own))
            }
            None => Some(Enforcement::Remove),
        }
    }

    /// A player left the room.
    pub fn on_player_left(&mut self, player: PlayerId) {
        self.present.remove(&player);
    }

    /// Number of rostered players currently in the room.
    pub fn present_count(&self) -> usize {
        self.present.len()
    }

    #[cfg(test)]
    fn is_present(&self, player: PlayerId) -> bool {
        self.present.contains_key(&player)
    }

    /// Returns `true` once every rostered player is in the room.
    pub fn is_full(&self) -> bool {
        self.present.len() == self.roster.team_size() * 2
    }
}
