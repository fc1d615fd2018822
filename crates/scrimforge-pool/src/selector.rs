//! Beatmap selection: draws one unused map per round.

use rand::Rng;
use scrimforge_protocol::{BeatmapId, Mod, ModCode, ModSet};

use crate::{PoolIndex, SelectionError};

/// The modifiers enforced for a mod-group, and whether players may add
/// their own.
///
/// Every fixed-mod group carries NoFail so a failed play still scores.
pub fn mods_for(code: ModCode) -> (ModSet, bool) {
    match code {
        ModCode::NoMod => (ModSet::from([Mod::NoFail]), false),
        ModCode::Hidden => (ModSet::from([Mod::Hidden, Mod::NoFail]), false),
        ModCode::HardRock => (ModSet::from([Mod::HardRock, Mod::NoFail]), false),
        ModCode::DoubleTime => {
            (ModSet::from([Mod::DoubleTime, Mod::NoFail]), false)
        }
        ModCode::FreeMod | ModCode::TieBreak => (ModSet::none(), true),
    }
}

/// A drawn beatmap and how it should be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub beatmap: BeatmapId,
    pub group: ModCode,
    pub group_index: usize,
    /// 1-based position of the map within its group in the original pool.
    /// `None` once the map was replaced by hand.
    pub slot: Option<usize>,
    pub mods: ModSet,
    pub freemod: bool,
}

impl Selection {
    /// Tournament-style label, e.g. `HD3`, or `HD*` for a replaced map.
    pub fn label(&self) -> String {
        match self.slot {
            Some(slot) => format!("{}{slot}", self.group),
            None => format!("{}*", self.group),
        }
    }

    /// Swaps in a map from outside the pool, keeping the mods.
    pub fn replace_beatmap(&mut self, beatmap: BeatmapId) {
        self.beatmap = beatmap;
        self.slot = None;
    }
}

/// Draws beatmaps from a [`PoolIndex`] without replacement.
pub struct BeatmapSelector<R> {
    index: PoolIndex,
    rng: R,
}

impl<R: Rng> BeatmapSelector<R> {
    pub fn new(index: PoolIndex, rng: R) -> Self {
        Self { index, rng }
    }

    /// Read access to the remaining pool.
    pub fn index(&self) -> &PoolIndex {
        &self.index
    }

    /// Draws a uniformly random unused beatmap from group `group_index`.
    ///
    /// The map is removed from the index; it will not be drawn again in
    /// this match.
    ///
    /// # Errors
    /// - [`SelectionError::UnknownGroup`]: no such group
    /// - [`SelectionError::PoolExhausted`]: the group is empty
    pub fn draw(&mut self, group_index: usize) -> Result<Selection, SelectionError> {
        let group = self
            .index
            .group_mut(group_index)
            .ok_or(SelectionError::UnknownGroup(group_index))?;
        if group.available.is_empty() {
            return Err(SelectionError::PoolExhausted {
                code: group.code,
                index: group_index,
            });
        }

        let pick = self.rng.random_range(0..group.available.len());
        let slot = group.available.swap_remove(pick);
        let (mods, freemod) = mods_for(group.code);

        Ok(Selection {
            beatmap: slot.beatmap,
            group: group.code,
            group_index,
            slot: Some(slot.number),
            mods,
            freemod,
        })
    }

    /// Draws from the tiebreak group. Free mods are always on.
    ///
    /// # Errors
    /// [`SelectionError::NoTieBreakGroup`] if the pool has none, otherwise
    /// the same errors as [`draw`](Self::draw).
    pub fn draw_tiebreak(&mut self) -> Result<Selection, SelectionError> {
        let index = self
            .index
            .tiebreak_index()
            .ok_or(SelectionError::NoTieBreakGroup)?;
        let mut selection = self.draw(index)?;
        selection.mods = ModSet::none();
        selection.freemod = true;
        Ok(selection)
    }
}
