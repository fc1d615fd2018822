//! Pool loading.
//!
//! Scrimforge doesn't own pool storage. It defines the [`PoolSource`]
//! trait and ships two implementations: a directory of JSON files (the
//! format tournament pools are distributed in) and an in-memory map for
//! tests and embedding.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use scrimforge_protocol::{Codec, JsonCodec};

use crate::{Pool, PoolError};

/// Resolves a pool identifier to a pool document.
///
/// # Example
///
/// ```rust
/// use scrimforge_pool::{Pool, PoolError, PoolSource};
///
/// /// Every identifier resolves to the same pool.
/// struct FixedSource(Pool);
///
/// impl PoolSource for FixedSource {
///     async fn load(&self, _id: &str) -> Result<Pool, PoolError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait PoolSource: Send + Sync + 'static {
    /// Loads the pool named `id`.
    ///
    /// # Errors
    /// [`PoolError::InvalidPool`] if `id` cannot be resolved or the
    /// document is not a valid pool.
    fn load(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Pool, PoolError>> + Send;

    /// Loads the pool named `id` and checks it can host a best-of-`best_of`
    /// match.
    ///
    /// # Errors
    /// Everything [`load`](Self::load) returns, plus
    /// [`PoolError::PoolTooSmall`] when the non-tiebreak groups hold fewer
    /// than `best_of` maps.
    fn load_for(
        &self,
        id: &str,
        best_of: usize,
    ) -> impl Future<Output = Result<Pool, PoolError>> + Send {
        async move {
            let pool = self.load(id).await?;
            pool.validate_for(best_of)?;
            Ok(pool)
        }
    }
}

/// Extracts a pool identifier from a link or bare name.
///
/// `https://example.org/pools/open-2800` and `open-2800` both yield
/// `open-2800`. A reference ending in `/` has no identifier.
pub fn pool_id_from_reference(reference: &str) -> Result<String, PoolError> {
    let reference = reference.trim();
    let id = reference.rsplit('/').next().unwrap_or_default();
    if id.is_empty() {
        return Err(PoolError::InvalidPool(format!(
            "cannot find a pool identifier in {reference:?}"
        )));
    }
    Ok(id.to_string())
}

// ---------------------------------------------------------------------------
// DirectoryPoolSource
// ---------------------------------------------------------------------------

/// Loads `<root>/<id>.json` files.
#[derive(Debug, Clone)]
pub struct DirectoryPoolSource {
    root: PathBuf,
    codec: JsonCodec,
}

impl DirectoryPoolSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            codec: JsonCodec,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifiers become file names, so only a conservative character set
    /// is allowed.
    fn path_for(&self, id: &str) -> Result<PathBuf, PoolError> {
        let valid = !id.is_empty()
            && !id.starts_with('.')
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(PoolError::InvalidPool(format!(
                "invalid pool identifier {id:?}"
            )));
        }
        Ok(self.root.join(format!("{id}.json")))
    }
}

impl PoolSource for DirectoryPoolSource {
    async fn load(&self, id: &str) -> Result<Pool, PoolError> {
        let path = self.path_for(id)?;
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "pool file unreadable");
            PoolError::InvalidPool(format!("pool {id:?} not found"))
        })?;
        let pool: Pool = self.codec.decode(&bytes).map_err(|e| {
            PoolError::InvalidPool(format!("pool {id:?} is malformed: {e}"))
        })?;
        pool.validate()?;
        tracing::info!(
            pool = %pool.name,
            groups = pool.groups.len(),
            capacity = pool.capacity(),
            "pool loaded"
        );
        Ok(pool)
    }
}

// ---------------------------------------------------------------------------
// MemoryPoolSource
// ---------------------------------------------------------------------------

/// Pools held in memory, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryPoolSource {
    pools: HashMap<String, Pool>,
}

impl MemoryPoolSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a pool under `id`.
    pub fn with_pool(mut self, id: impl Into<String>, pool: Pool) -> Self {
        self.pools.insert(id.into(), pool);
        self
    }
}

impl PoolSource for MemoryPoolSource {
    async fn load(&self, id: &str) -> Result<Pool, PoolError> {
        let pool = self
            .pools
            .get(id)
            .cloned()
            .ok_or_else(|| PoolError::InvalidPool(format!("pool {id:?} not found")))?;
        pool.validate()?;
        Ok(pool)
    }
}
