//! The two team rosters of a match.

use std::collections::HashSet;

use scrimforge_protocol::{PlayerId, Team};

use crate::RosterError;

/// Smallest allowed team.
pub const MIN_TEAM_SIZE: usize = 1;
/// Largest allowed team (16 room slots).
pub const MAX_TEAM_SIZE: usize = 8;

/// Two fixed teams of equal size.
///
/// Invariants, checked by [`Roster::new`]:
/// - `team_size` is within `1..=8`
/// - each team has exactly `team_size` players
/// - no player appears twice, within or across teams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    team_size: usize,
    red: Vec<PlayerId>,
    blue: Vec<PlayerId>,
}

impl Roster {
    /// Validates and builds a roster. Player order is kept (it is the
    /// order invites are sent in).
    pub fn new(
        team_size: usize,
        red: Vec<PlayerId>,
        blue: Vec<PlayerId>,
    ) -> Result<Self, RosterError> {
        if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&team_size) {
            return Err(RosterError::InvalidTeamSize(team_size));
        }
        for (team, players) in [(Team::Red, &red), (Team::Blue, &blue)] {
            if players.len() != team_size {
                return Err(RosterError::WrongRosterSize {
                    team,
                    expected: team_size,
                    actual: players.len(),
                });
            }
        }
        let mut seen = HashSet::with_capacity(team_size * 2);
        for &player in red.iter().chain(blue.iter()) {
            if !seen.insert(player) {
                return Err(RosterError::DuplicatePlayer(player));
            }
        }
        Ok(Self {
            team_size,
            red,
            blue,
        })
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }

    pub fn red(&self) -> &[PlayerId] {
        &self.red
    }

    pub fn blue(&self) -> &[PlayerId] {
        &self.blue
    }

    /// The team `player` is rostered on, if any.
    pub fn team_of(&self, player: PlayerId) -> Option<Team> {
        if self.red.contains(&player) {
            Some(Team::Red)
        } else if self.blue.contains(&player) {
            Some(Team::Blue)
        } else {
            None
        }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.team_of(player).is_some()
    }

    /// Every rostered player, red team first.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.red.iter().chain(self.blue.iter()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<PlayerId> {
        raw.iter().map(|&i| PlayerId(i)).collect()
    }

    #[test]
    fn test_roster_new_valid() {
        let roster = Roster::new(2, ids(&[1, 2]), ids(&[3, 4])).unwrap();
        assert_eq!(roster.team_size(), 2);
        assert_eq!(roster.team_of(PlayerId(2)), Some(Team::Red));
        assert_eq!(roster.team_of(PlayerId(3)), Some(Team::Blue));
        assert_eq!(roster.team_of(PlayerId(9)), None);
        assert_eq!(roster.players().count(), 4);
    }

    #[test]
    fn test_roster_rejects_team_size_out_of_range() {
        assert!(matches!(
            Roster::new(0, vec![], vec![]),
            Err(RosterError::InvalidTeamSize(0))
        ));
        let big: Vec<PlayerId> = (1..=9).map(PlayerId).collect();
        let big_blue: Vec<PlayerId> = (11..=19).map(PlayerId).collect();
        assert!(matches!(
            Roster::new(9, big, big_blue),
            Err(RosterError::InvalidTeamSize(9))
        ));
    }

    #[test]
    fn test_roster_rejects_wrong_size() {
        let err = Roster::new(2, ids(&[1, 2]), ids(&[3])).unwrap_err();
        assert!(matches!(
            err,
            RosterError::WrongRosterSize {
                team: Team::Blue,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_roster_rejects_player_on_both_teams() {
        let err = Roster::new(2, ids(&[1, 2]), ids(&[2, 3])).unwrap_err();
        assert!(matches!(err, RosterError::DuplicatePlayer(PlayerId(2))));
    }

    #[test]
    fn test_roster_rejects_duplicate_within_team() {
        let err = Roster::new(2, ids(&[1, 1]), ids(&[2, 3])).unwrap_err();
        assert!(matches!(err, RosterError::DuplicatePlayer(PlayerId(1))));
    }
}
