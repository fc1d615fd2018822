//! Pool documents and the per-match pool index.

use scrimforge_protocol::{BeatmapId, ModCode};
use serde::{Deserialize, Serialize};

use crate::PoolError;

// ---------------------------------------------------------------------------
// Pool document
// ---------------------------------------------------------------------------

/// A bucket of beatmaps that are all played with the same mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModGroup {
    #[serde(rename = "mod")]
    pub code: ModCode,
    pub maps: Vec<BeatmapId>,
}

/// A named tournament pool.
///
/// Group order matters: announcements label maps by their position, and
/// the tiebreak group (if any) must be the last entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub name: String,
    #[serde(rename = "modgroups")]
    pub groups: Vec<ModGroup>,
}

impl Pool {
    /// Index of the tiebreak group, if the pool has one.
    pub fn tiebreak_index(&self) -> Option<usize> {
        match self.groups.last() {
            Some(g) if g.code == ModCode::TieBreak => Some(self.groups.len() - 1),
            _ => None,
        }
    }

    /// Total number of maps outside the tiebreak group.
    pub fn capacity(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.code != ModCode::TieBreak)
            .map(|g| g.maps.len())
            .sum()
    }

    /// Checks the structural rules every pool must follow.
    ///
    /// - at least one group
    /// - a `TB` group may only appear once, as the last group
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.groups.is_empty() {
            return Err(PoolError::InvalidPool(format!(
                "pool {:?} has no mod-groups",
                self.name
            )));
        }
        let last = self.groups.len() - 1;
        for (i, group) in self.groups.iter().enumerate() {
            if group.code == ModCode::TieBreak && i != last {
                return Err(PoolError::InvalidPool(format!(
                    "pool {:?}: tiebreak group must be last (found at #{i})",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Checks that this pool can host a best-of-`best_of` match.
    ///
    /// On top of [`validate`](Self::validate): a match that can reach a
    /// tiebreak (`best_of > 1`) needs a non-empty tiebreak group, and the
    /// other groups together must hold at least `best_of` maps.
    pub fn validate_for(&self, best_of: usize) -> Result<(), PoolError> {
        self.validate()?;
        if best_of > 1 {
            let has_tiebreak = self
                .tiebreak_index()
                .is_some_and(|i| !self.groups[i].maps.is_empty());
            if !has_tiebreak {
                return Err(PoolError::InvalidPool(format!(
                    "pool {:?} has no tiebreak maps",
                    self.name
                )));
            }
        }
        let capacity = self.capacity();
        if capacity < best_of {
            return Err(PoolError::PoolTooSmall { capacity, best_of });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PoolIndex
// ---------------------------------------------------------------------------

/// A beatmap together with its 1-based position in its mod-group.
///
/// The position is fixed when the index is built, so the third HD map is
/// still called `HD3` after HD1 has been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub number: usize,
    pub beatmap: BeatmapId,
}

#[derive(Debug, Clone)]
pub(crate) struct GroupEntry {
    pub(crate) code: ModCode,
    pub(crate) available: Vec<Slot>,
}

/// Per-match view of a pool.
///
/// The group layout never changes after construction; only the set of
/// available beatmaps in each group shrinks as the selector draws from it.
/// Maps are never put back.
#[derive(Debug, Clone)]
pub struct PoolIndex {
    name: String,
    groups: Vec<GroupEntry>,
    tiebreak: Option<usize>,
}

impl PoolIndex {
    /// Builds a fresh index from a pool document.
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidPool`] if the pool breaks the structural
    /// rules checked by [`Pool::validate`].
    pub fn new(pool: &Pool) -> Result<Self, PoolError> {
        pool.validate()?;
        let groups = pool
            .groups
            .iter()
            .map(|g| GroupEntry {
                code: g.code,
                available: g
                    .maps
                    .iter()
                    .enumerate()
                    .map(|(i, &beatmap)| Slot {
                        number: i + 1,
                        beatmap,
                    })
                    .collect(),
            })
            .collect();
        Ok(Self {
            name: pool.name.clone(),
            groups,
            tiebreak: pool.tiebreak_index(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mod code of group `index`.
    pub fn code(&self, index: usize) -> Option<ModCode> {
        self.groups.get(index).map(|g| g.code)
    }

    /// Beatmaps still available in group `index` (0 if out of range).
    pub fn remaining(&self, index: usize) -> usize {
        self.groups.get(index).map_or(0, |g| g.available.len())
    }

    /// The still-available slots of group `index`, in no particular order.
    pub fn available(&self, index: usize) -> &[Slot] {
        self.groups
            .get(index)
            .map(|g| g.available.as_slice())
            .unwrap_or(&[])
    }

    pub fn tiebreak_index(&self) -> Option<usize> {
        self.tiebreak
    }

    /// `(group index, remaining maps)` for every group that takes part in
    /// the pre-match draw, i.e. every group except the tiebreak.
    pub fn eligible_capacities(&self) -> Vec<(usize, usize)> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.tiebreak)
            .map(|(i, g)| (i, g.available.len()))
            .collect()
    }

    /// Total remaining maps outside the tiebreak group.
    pub fn capacity(&self) -> usize {
        self.eligible_capacities().iter().map(|(_, n)| n).sum()
    }

    pub(crate) fn group_mut(&mut self, index: usize) -> Option<&mut GroupEntry> {
        self.groups.get_mut(index)
    }
}
