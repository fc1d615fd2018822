//! Pick-order planning.
//!
//! The plan decides which mod-group each round is drawn from. It is built
//! once, before the match starts, with a replenishing round-robin draft:
//!
//! ```text
//! capacities  NM:3 HD:2 HR:1
//! round 1     [NM HD HR]  → shuffled → HD HR NM
//! round 2     [NM HD]     → shuffled → NM HD
//! round 3     [NM]        →          → NM
//! ```
//!
//! Every round contains each group that still has maps, exactly once, in a
//! fresh uniformly random order. Groups therefore appear as evenly as the
//! pool allows and never more often than they have maps.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::{PoolError, PoolIndex};

// ---------------------------------------------------------------------------
// PickPlan
// ---------------------------------------------------------------------------

/// The ordered list of mod-group indices for a match.
///
/// The picks never change once built. Consumption goes through a cursor
/// that only moves forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickPlan {
    picks: Vec<usize>,
    cursor: usize,
}

impl PickPlan {
    /// All picks, including those already consumed.
    pub fn picks(&self) -> &[usize] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Number of picks consumed so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Consumes and returns the next mod-group index.
    pub fn next_pick(&mut self) -> Option<usize> {
        let pick = self.picks.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(pick)
    }
}

// ---------------------------------------------------------------------------
// PickOrderPlanner
// ---------------------------------------------------------------------------

/// Builds a [`PickPlan`] for a best-of-N match.
#[derive(Debug, Clone, Copy)]
pub struct PickOrderPlanner {
    best_of: usize,
}

impl PickOrderPlanner {
    pub fn new(best_of: usize) -> Self {
        Self { best_of }
    }

    /// Drafts a plan of at least `best_of` picks over the non-tiebreak
    /// groups of `index`.
    ///
    /// The plan may be longer than `best_of`: the last draft round is
    /// always appended whole.
    ///
    /// # Errors
    /// Returns [`PoolError::InsufficientPoolCapacity`] if the eligible
    /// groups together hold fewer than `best_of` maps. Checked up front:
    /// without it the draft would produce empty rounds forever.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        index: &PoolIndex,
        rng: &mut R,
    ) -> Result<PickPlan, PoolError> {
        let mut counters = index.eligible_capacities();
        let capacity: usize = counters.iter().map(|(_, n)| n).sum();
        if capacity < self.best_of {
            return Err(PoolError::InsufficientPoolCapacity {
                capacity,
                best_of: self.best_of,
            });
        }

        let mut picks = Vec::with_capacity(self.best_of + counters.len());
        while picks.len() < self.best_of {
            let mut round: Vec<usize> = Vec::with_capacity(counters.len());
            for (group, remaining) in counters.iter_mut() {
                if *remaining > 0 {
                    *remaining -= 1;
                    round.push(*group);
                }
            }
            round.shuffle(rng);
            picks.extend(round);
        }

        debug!(
            pool = index.name(),
            best_of = self.best_of,
            picks = picks.len(),
            "pick plan built"
        );

        Ok(PickPlan { picks, cursor: 0 })
    }
}
