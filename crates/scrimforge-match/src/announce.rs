//! Chat lines the controller posts in the room.

use std::time::Duration;

use scrimforge_pool::Selection;

use crate::{Decision, RoundOutcome, TiePolicy};

pub(crate) const ALLOWED_MODS: &str = "Allowed Mods: HD, HR, EZ, FL, NF, NM (0.7x multiplier)";
pub(crate) const TIEBREAK: &str = "Scores are tied. A tiebreaker will be played";
pub(crate) const INACTIVITY: &str = "Lobby closed due to inactivity";

/// `Next Map: HD3 (pick 2)`, or `(tiebreaker)` for a decider.
pub(crate) fn next_map(selection: &Selection, pick: Option<usize>) -> String {
    match pick {
        Some(n) => format!("Next Map: {} (pick {n})", selection.label()),
        None => format!("Next Map: {} (tiebreaker)", selection.label()),
    }
}

pub(crate) fn round_result(outcome: &RoundOutcome, policy: TiePolicy) -> String {
    match (outcome.round_winner, policy) {
        (Some(team), _) => format!("{team} wins by {}", outcome.diff),
        (None, TiePolicy::BothScore) => "Tied scores: Both teams earn a point".to_string(),
        (None, TiePolicy::NeitherScores) => "Tied scores: No points awarded".to_string(),
    }
}

pub(crate) fn current_score(red: u32, blue: u32) -> String {
    format!("Current Score: Red {red} : {blue} Blue")
}

pub(crate) fn final_score(red: u32, blue: u32) -> String {
    format!("Final score: Red {red} : {blue} Blue")
}

pub(crate) fn match_result(decision: Decision) -> Option<&'static str> {
    match decision {
        Decision::RedWinsComplete => Some("Red wins the match"),
        Decision::BlueWinsComplete => Some("Blue wins the match"),
        Decision::MatchTiedComplete => Some("The match ends in a tie"),
        Decision::AdvanceRound | Decision::EnterTieBreak => None,
    }
}

pub(crate) fn closing(grace: Duration) -> String {
    format!("Lobby will automatically close in {} seconds", grace.as_secs())
}

pub(crate) fn paused(reason: &impl std::fmt::Display) -> String {
    format!("Room command failed ({reason}). Match paused, type !resume to retry")
}

pub(crate) fn fatal(reason: &impl std::fmt::Display) -> String {
    format!("Map selection failed ({reason}). Closing lobby")
}
