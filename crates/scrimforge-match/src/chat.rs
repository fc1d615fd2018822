//! In-room chat commands.

use scrimforge_protocol::BeatmapId;

/// A command a rostered player can type in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    /// `!override <beatmap id>`: replace the current map, keep its mods.
    Override(BeatmapId),
    /// `!resume`: retry whatever paused the match.
    Resume,
}

impl ChatCommand {
    /// Parses a chat line. Anything that isn't a well-formed command is
    /// `None`, including `!override` without a usable id.
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        match words.next()? {
            "!override" => words.next()?.parse().ok().map(Self::Override),
            "!resume" => Some(Self::Resume),
            _ => None,
        }
    }
}
