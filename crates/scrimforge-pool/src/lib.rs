//! Beatmap pools for Scrimforge.
//!
//! A pool is a named, ordered list of mod-groups (NM, HD, HR, DT, FM and
//! an optional trailing TB). Before a match starts the pool is turned into
//! a [`PickPlan`] (the order in which mod-groups are played) and during
//! the match a [`BeatmapSelector`] draws one unused beatmap per round.
//!
//! # Key types
//!
//! - [`Pool`] / [`ModGroup`]: the read-only pool document
//! - [`PoolIndex`]: per-match working copy whose groups shrink as maps are drawn
//! - [`PickOrderPlanner`] / [`PickPlan`]: replenishing round-robin draft
//! - [`BeatmapSelector`] / [`Selection`]: random draw plus mod mapping
//! - [`PoolSource`] / [`DirectoryPoolSource`]: where pools come from

mod error;
mod plan;
mod pool;
mod selector;
mod source;

pub use error::{PoolError, SelectionError};
pub use plan::{PickOrderPlanner, PickPlan};
pub use pool::{ModGroup, Pool, PoolIndex, Slot};
pub use selector::{BeatmapSelector, Selection, mods_for};
pub use source::{
    DirectoryPoolSource, MemoryPoolSource, PoolSource, pool_id_from_reference,
};
