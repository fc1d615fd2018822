//! Match registry: creates matches and tracks the ones still running.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use scrimforge_pool::{BeatmapSelector, PickOrderPlanner, Pool, PoolIndex};
use scrimforge_protocol::MatchId;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::controller::{Draft, spawn_match};
use crate::{MatchConfig, MatchError, MatchHandle, MatchSettings, RoomControl};

/// Counter for generating unique match IDs.
static NEXT_MATCH_ID: AtomicU64 = AtomicU64::new(1);

/// Default command channel size for match actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Every match that still has an open room.
///
/// Cloning is cheap and every clone sees the same set. Matches are added
/// by [`create_match`](Self::create_match) and remove themselves when
/// their room closes, so the registry is only needed for lookups and for
/// closing everything on process shutdown.
#[derive(Debug, Clone, Default)]
pub struct MatchRegistry {
    matches: Arc<Mutex<HashMap<MatchId, MatchHandle>>>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans a match over `pool` and spawns its actor.
    ///
    /// The match starts in [`Created`](crate::MatchPhase::Created); call
    /// [`MatchHandle::start`] to set up the room.
    ///
    /// # Errors
    /// [`MatchError::Pool`] if the pool can't host a match of this length
    /// (`InvalidPool`, `PoolTooSmall`, `InsufficientPoolCapacity`).
    pub async fn create_match<R: RoomControl>(
        &self,
        config: MatchConfig,
        settings: MatchSettings,
        pool: &Pool,
        room: R,
    ) -> Result<MatchHandle, MatchError> {
        self.create_match_with_rng(config, settings, pool, room, StdRng::from_os_rng())
            .await
    }

    /// Like [`create_match`](Self::create_match) with a caller-supplied RNG
    /// for the pick order and map draws.
    pub async fn create_match_with_rng<R: RoomControl>(
        &self,
        config: MatchConfig,
        settings: MatchSettings,
        pool: &Pool,
        room: R,
        mut rng: StdRng,
    ) -> Result<MatchHandle, MatchError> {
        let best_of = config.best_of();
        pool.validate_for(best_of)?;
        let index = PoolIndex::new(pool)?;
        let plan = PickOrderPlanner::new(best_of).plan(&index, &mut rng)?;
        let draft = Draft {
            plan,
            selector: BeatmapSelector::new(index, rng),
        };

        let match_id = MatchId(NEXT_MATCH_ID.fetch_add(1, Ordering::Relaxed));

        // Insert under the lock so the actor can't unregister before it
        // is registered.
        let mut matches = self.matches.lock().await;
        let handle = spawn_match(
            match_id,
            config,
            settings,
            draft,
            room,
            self.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        matches.insert(match_id, handle.clone());

        info!(%match_id, pool = %pool.name, best_of, "match created");
        Ok(handle)
    }

    pub async fn get(&self, match_id: MatchId) -> Option<MatchHandle> {
        self.matches.lock().await.get(&match_id).cloned()
    }

    /// Returns the number of registered matches.
    pub async fn len(&self) -> usize {
        self.matches.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.matches.lock().await.is_empty()
    }

    /// Lists all registered match IDs.
    pub async fn match_ids(&self) -> Vec<MatchId> {
        self.matches.lock().await.keys().copied().collect()
    }

    /// Removes a match. Returns `false` if it was already gone.
    pub async fn unregister(&self, match_id: MatchId) -> bool {
        let removed = self.matches.lock().await.remove(&match_id).is_some();
        if removed {
            debug!(%match_id, "match unregistered");
        }
        removed
    }

    /// Shuts down every registered match and waits for their rooms to
    /// close. Returns how many matches were asked to stop.
    ///
    /// Matches finishing on their own at the same time are fine: shutting
    /// down a stopped match is a no-op.
    pub async fn close_all(&self) -> usize {
        // Clone the handles first; each actor takes the lock to unregister.
        let handles: Vec<MatchHandle> = self.matches.lock().await.values().cloned().collect();
        for handle in &handles {
            handle.shutdown().await;
        }
        info!(count = handles.len(), "all matches closed");
        handles.len()
    }
}
