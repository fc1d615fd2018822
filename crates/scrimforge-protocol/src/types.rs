//! Core value types shared by every Scrimforge crate.
//!
//! Everything here is plain data: identifiers, the gameplay vocabulary a
//! room understands (teams, mods, rulesets), and the events a room reports.
//! All of it derives `Serialize`/`Deserialize` so room adapters can forward
//! events over whatever transport they use.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player account.
///
/// `#[serde(transparent)]` serializes this as the bare number, so
/// `PlayerId(42)` is just `42` in JSON.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for one running match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

/// A beatmap identifier as understood by the game room.
///
/// Pool files written by hand store ids as strings (`"129891"`) as often
/// as numbers, so deserialization accepts both. Serialization always
/// produces a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BeatmapRef", into = "u64")]
pub struct BeatmapId(pub u64);

impl fmt::Display for BeatmapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BeatmapId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u64 = s.trim().parse().map_err(|_| {
            ProtocolError::InvalidValue(format!("not a beatmap id: {s:?}"))
        })?;
        if id == 0 {
            return Err(ProtocolError::InvalidValue(
                "beatmap id must be non-zero".into(),
            ));
        }
        Ok(BeatmapId(id))
    }
}

impl From<BeatmapId> for u64 {
    fn from(id: BeatmapId) -> Self {
        id.0
    }
}

/// Wire shape accepted for a [`BeatmapId`]: a JSON number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum BeatmapRef {
    Number(u64),
    Text(String),
}

impl TryFrom<BeatmapRef> for BeatmapId {
    type Error = String;

    fn try_from(value: BeatmapRef) -> Result<Self, Self::Error> {
        match value {
            BeatmapRef::Number(0) => {
                Err("beatmap id must be non-zero".to_string())
            }
            BeatmapRef::Number(n) => Ok(BeatmapId(n)),
            BeatmapRef::Text(s) => s.parse().map_err(|e: ProtocolError| e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// One of the two sides of a team match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}


impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "Red"),
            Self::Blue => write!(f, "Blue"),
        }
    }
}

// ---------------------------------------------------------------------------
// Mods
// ---------------------------------------------------------------------------

/// The mod-group a beatmap belongs to in a tournament pool.
///
/// Serialized with the short codes pool files use (`"NM"`, `"HD"`, …);
/// the long names are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModCode {
    #[serde(rename = "NM", alias = "NoMod")]
    NoMod,
    #[serde(rename = "HD", alias = "Hidden")]
    Hidden,
    #[serde(rename = "HR", alias = "HardRock")]
    HardRock,
    #[serde(rename = "DT", alias = "DoubleTime")]
    DoubleTime,
    #[serde(rename = "FM", alias = "FreeMod")]
    FreeMod,
    #[serde(rename = "TB", alias = "TieBreak")]
    TieBreak,
}

impl ModCode {
    /// The short code used in pool files and announcements.
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::NoMod => "NM",
            Self::Hidden => "HD",
            Self::HardRock => "HR",
            Self::DoubleTime => "DT",
            Self::FreeMod => "FM",
            Self::TieBreak => "TB",
        }
    }
}

impl fmt::Display for ModCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_code())
    }
}

/// A single gameplay modifier the room can be told to enforce.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Mod {
    NoFail,
    Hidden,
    HardRock,
    DoubleTime,
}

impl Mod {
    fn acronym(&self) -> &'static str {
        match self {
            Self::NoFail => "NF",
            Self::Hidden => "HD",
            Self::HardRock => "HR",
            Self::DoubleTime => "DT",
        }
    }
}

/// The set of modifiers applied to a round. Empty means "no mods".
///
/// Backed by a `BTreeSet` so equality and display order don't depend on
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModSet(BTreeSet<Mod>);

impl ModSet {
    /// An empty set.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, m: Mod) -> bool {
        self.0.contains(&m)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Mod> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Mod> for ModSet {
    fn from_iter<I: IntoIterator<Item = Mod>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Mod; N]> for ModSet {
    fn from(mods: [Mod; N]) -> Self {
        mods.into_iter().collect()
    }
}

impl fmt::Display for ModSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("NM");
        }
        let mut first = true;
        for m in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(m.acronym())?;
            first = false;
        }
        Ok(())
    }
}

/// The game mode a beatmap is played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ruleset {
    #[default]
    Osu,
    Taiko,
    Catch,
    Mania,
}

// ---------------------------------------------------------------------------
// Lobby settings
// ---------------------------------------------------------------------------

/// How players are grouped in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TeamMode {
    HeadToHead,
    TagCoop,
    #[default]
    TeamVs,
    TagTeamVs,
}

/// How the room itself ranks a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WinCondition {
    Score,
    Accuracy,
    Combo,
    #[default]
    ScoreV2,
}

/// Arguments to the room's team-size-and-mode command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbySettings {
    pub team_mode: TeamMode,
    pub win_condition: WinCondition,
    /// Total player slots (both teams).
    pub slots: u8,
}

impl LobbySettings {
    /// Team-vs lobby with enough slots for two teams of `team_size`.
    pub fn team_vs(team_size: u8) -> Self {
        Self {
            team_mode: TeamMode::TeamVs,
            win_condition: WinCondition::ScoreV2,
            slots: team_size.saturating_mul(2),
        }
    }
}

// ---------------------------------------------------------------------------
// Room events
// ---------------------------------------------------------------------------

/// One player's line in a finished round, as reported by the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub player: PlayerId,
    pub team: Team,
    /// `false` if the player failed the map. Failed scores count as zero.
    pub passed: bool,
    pub score: u64,
}

/// Something that happened in the game room.
///
/// The room adapter translates its native callbacks into these and
/// forwards them to the match controller, which handles them one at a time.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
/// `{ "type": "PlayerJoined", "player": 7 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoomEvent {
    /// Every player in the room pressed ready.
    AllPlayersReady,

    /// The room started playing the current beatmap.
    MatchStarted,

    /// The current beatmap finished. `results` has one entry per player
    /// who was in a slot when the round started.
    MatchFinished { results: Vec<PlayerResult> },

    /// A player entered the room.
    PlayerJoined { player: PlayerId },

    /// A player left the room.
    PlayerLeft { player: PlayerId },

    /// A player moved themselves to `team`.
    PlayerChangedTeam { player: PlayerId, team: Team },

    /// A chat line was sent in the room.
    ChatMessage { sender: PlayerId, text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(42).to_string(), "P-42");
        assert_eq!(MatchId(3).to_string(), "M-3");
    }

    #[test]
    fn test_beatmap_id_accepts_number_and_string() {
        let ids: Vec<BeatmapId> =
            serde_json::from_str(r#"[129891, "2003421", " 55 "]"#).unwrap();
        assert_eq!(
            ids,
            vec![BeatmapId(129891), BeatmapId(2003421), BeatmapId(55)]
        );
    }

    #[test]
    fn test_beatmap_id_serializes_as_number() {
        let json = serde_json::to_string(&BeatmapId(77)).unwrap();
        assert_eq!(json, "77");
    }

    #[test]
    fn test_beatmap_id_rejects_zero_and_garbage() {
        assert!(serde_json::from_str::<BeatmapId>("0").is_err());
        assert!(serde_json::from_str::<BeatmapId>(r#""abc""#).is_err());
        assert!("".parse::<BeatmapId>().is_err());
    }

    #[test]
    fn test_mod_code_short_and_long_names() {
        let codes: Vec<ModCode> =
            serde_json::from_str(r#"["NM", "HD", "HardRock", "TB"]"#).unwrap();
        assert_eq!(
            codes,
            vec![
                ModCode::NoMod,
                ModCode::Hidden,
                ModCode::HardRock,
                ModCode::TieBreak
            ]
        );
        assert_eq!(serde_json::to_string(&ModCode::DoubleTime).unwrap(), r#""DT""#);
    }

    #[test]
    fn test_mod_set_display_is_order_independent() {
        let a = ModSet::from([Mod::NoFail, Mod::Hidden]);
        let b = ModSet::from([Mod::Hidden, Mod::NoFail]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "NF,HD");
        assert_eq!(ModSet::none().to_string(), "NM");
    }

    #[test]
    fn test_lobby_settings_team_vs() {
        let s = LobbySettings::team_vs(4);
        assert_eq!(s.slots, 8);
        assert_eq!(s.team_mode, TeamMode::TeamVs);
        assert_eq!(s.win_condition, WinCondition::ScoreV2);
    }

    #[test]
    fn test_room_event_json_format() {
        let event = RoomEvent::PlayerChangedTeam {
            player: PlayerId(9),
            team: Team::Blue,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PlayerChangedTeam");
        assert_eq!(json["player"], 9);
        assert_eq!(json["team"], "Blue");
    }
}
