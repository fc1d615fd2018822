//! Error types for the pool layer.

use scrimforge_protocol::ModCode;

/// Errors raised while loading, validating, or planning over a pool.
///
/// All of these are reported before a match is created.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The pool identifier could not be resolved, or the document is not
    /// a usable pool (malformed, misplaced tiebreak group, etc.).
    #[error("invalid pool: {0}")]
    InvalidPool(String),

    /// The loader found fewer non-tiebreak maps than rounds requested.
    #[error("pool is too small for best of {best_of} ({capacity} maps available)")]
    PoolTooSmall { capacity: usize, best_of: usize },

    /// The planner was asked for more picks than the pool can ever supply.
    #[error("insufficient pool capacity: need {best_of} picks, pool has {capacity}")]
    InsufficientPoolCapacity { capacity: usize, best_of: usize },
}

/// Errors raised while drawing a beatmap mid-match.
///
/// Any of these means an invariant was broken; the match is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The mod-group has no beatmaps left.
    #[error("mod-group {code} (#{index}) has no beatmaps left")]
    PoolExhausted { code: ModCode, index: usize },

    /// The requested mod-group index is out of range.
    #[error("mod-group #{0} does not exist")]
    UnknownGroup(usize),

    /// A tiebreak was requested but the pool has no tiebreak group.
    #[error("pool has no tiebreak group")]
    NoTieBreakGroup,

    /// Every pick in the plan has been played and no decider map exists.
    #[error("pick plan exhausted")]
    PlanExhausted,
}
