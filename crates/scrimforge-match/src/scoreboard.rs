//! Per-round scoring and match decisions.

use scrimforge_protocol::{PlayerResult, Team};

use crate::{MatchError, TiePolicy};

/// What the match should do after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Play the next map in the pick plan.
    AdvanceRound,
    /// Both teams sit one point short of winning: play a tiebreaker.
    EnterTieBreak,
    RedWinsComplete,
    BlueWinsComplete,
    /// Both teams reached the winning score on the same round.
    MatchTiedComplete,
}

impl Decision {
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            Self::RedWinsComplete | Self::BlueWinsComplete | Self::MatchTiedComplete
        )
    }
}

/// Everything decided by one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub decision: Decision,
    /// Sum of passing scores on each team.
    pub score_red: u64,
    pub score_blue: u64,
    /// `None` when the totals were equal.
    pub round_winner: Option<Team>,
    /// `|score_red - score_blue|`.
    pub diff: u64,
    /// Match points after this round.
    pub points_red: u32,
    pub points_blue: u32,
}

/// Running match score.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    best_of: usize,
    tie_policy: TiePolicy,
    points_red: u32,
    points_blue: u32,
    rounds: usize,
    decided: Option<Decision>,
}

impl Scoreboard {
    pub fn new(best_of: usize, tie_policy: TiePolicy) -> Self {
        Self {
            best_of,
            tie_policy,
            points_red: 0,
            points_blue: 0,
            rounds: 0,
            decided: None,
        }
    }

    /// Tallies one round's results and decides what happens next.
    ///
    /// Only passing plays count. The input order doesn't matter.
    ///
    /// # Errors
    /// [`MatchError::AlreadyDecided`] once a completing decision has been
    /// returned; the score is left untouched.
    pub fn record_round(
        &mut self,
        results: &[PlayerResult],
    ) -> Result<RoundOutcome, MatchError> {
        if self.decided.is_some() {
            return Err(MatchError::AlreadyDecided);
        }

        let (mut score_red, mut score_blue) = (0u64, 0u64);
        for result in results.iter().filter(|r| r.passed) {
            match result.team {
                Team::Red => score_red = score_red.saturating_add(result.score),
                Team::Blue => score_blue = score_blue.saturating_add(result.score),
            }
        }

        let round_winner = match score_red.cmp(&score_blue) {
            std::cmp::Ordering::Greater => Some(Team::Red),
            std::cmp::Ordering::Less => Some(Team::Blue),
            std::cmp::Ordering::Equal => None,
        };
        match (round_winner, self.tie_policy) {
            (Some(Team::Red), _) => self.points_red += 1,
            (Some(Team::Blue), _) => self.points_blue += 1,
            (None, TiePolicy::BothScore) => {
                self.points_red += 1;
                self.points_blue += 1;
            }
            (None, TiePolicy::NeitherScores) => {}
        }
        self.rounds += 1;

        let decision = self.evaluate();
        if decision.is_complete() {
            self.decided = Some(decision);
        }

        Ok(RoundOutcome {
            decision,
            score_red,
            score_blue,
            round_winner,
            diff: score_red.abs_diff(score_blue),
            points_red: self.points_red,
            points_blue: self.points_blue,
        })
    }

    fn evaluate(&self) -> Decision {
        let threshold = self.win_threshold();
        let red_won = self.points_red >= threshold;
        let blue_won = self.points_blue >= threshold;
        let half = (self.best_of / 2) as u32;

        match (red_won, blue_won) {
            (true, true) => Decision::MatchTiedComplete,
            (true, false) => Decision::RedWinsComplete,
            (false, true) => Decision::BlueWinsComplete,
            _ if self.best_of > 1
                && self.points_red == half
                && self.points_blue == half =>
            {
                Decision::EnterTieBreak
            }
            _ => Decision::AdvanceRound,
        }
    }

    pub fn win_threshold(&self) -> u32 {
        self.best_of.div_ceil(2) as u32
    }

    pub fn points_red(&self) -> u32 {
        self.points_red
    }

    pub fn points_blue(&self) -> u32 {
        self.points_blue
    }

    /// Rounds recorded so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}
