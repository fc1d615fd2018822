//! Integration tests: loading pools from disk, planning, and drawing a
//! whole match worth of beatmaps.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use scrimforge_pool::{
    BeatmapSelector, DirectoryPoolSource, MemoryPoolSource, ModGroup, PickOrderPlanner,
    Pool, PoolError, PoolIndex, PoolSource,
};
use scrimforge_protocol::{BeatmapId, ModCode};

// =========================================================================
// Helpers
// =========================================================================

static NEXT_DIR: AtomicU32 = AtomicU32::new(0);

/// A fresh scratch directory under the system temp dir.
fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "scrimforge-pool-{}-{}",
        std::process::id(),
        NEXT_DIR.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const WEEKLY_POOL: &str = r#"{
    "name": "Weekly 2800+",
    "modgroups": [
        { "mod": "NM", "maps": ["101", "102", "103", "104"] },
        { "mod": "HD", "maps": ["201", "202"] },
        { "mod": "HR", "maps": ["301", "302"] },
        { "mod": "DT", "maps": ["401", "402"] },
        { "mod": "FM", "maps": ["501", "502"] },
        { "mod": "TB", "maps": ["901"] }
    ]
}"#;

fn weekly_pool() -> Pool {
    serde_json::from_str(WEEKLY_POOL).unwrap()
}

// =========================================================================
// DirectoryPoolSource
// =========================================================================

#[tokio::test]
async fn test_directory_source_loads_pool_file() {
    let dir = scratch_dir();
    std::fs::write(dir.join("weekly.json"), WEEKLY_POOL).unwrap();
    let source = DirectoryPoolSource::new(&dir);

    let pool = source.load("weekly").await.unwrap();

    assert_eq!(pool.name, "Weekly 2800+");
    assert_eq!(pool.groups.len(), 6);
    assert_eq!(pool.capacity(), 12);
    assert_eq!(pool.tiebreak_index(), Some(5));
}

#[tokio::test]
async fn test_directory_source_missing_file_is_invalid_pool() {
    let source = DirectoryPoolSource::new(scratch_dir());
    let err = source.load("nope").await.unwrap_err();
    assert!(matches!(err, PoolError::InvalidPool(_)));
}

#[tokio::test]
async fn test_directory_source_malformed_file_is_invalid_pool() {
    let dir = scratch_dir();
    std::fs::write(dir.join("broken.json"), r#"{"name": "x", "modgroups": [{"mod": "ZZ"}]}"#)
        .unwrap();
    let source = DirectoryPoolSource::new(&dir);

    let err = source.load("broken").await.unwrap_err();
    assert!(matches!(err, PoolError::InvalidPool(_)));
}

#[tokio::test]
async fn test_load_for_rejects_small_pool() {
    let dir = scratch_dir();
    std::fs::write(dir.join("weekly.json"), WEEKLY_POOL).unwrap();
    let source = DirectoryPoolSource::new(&dir);

    assert!(source.load_for("weekly", 11).await.is_ok());
    let err = source.load_for("weekly", 13).await.unwrap_err();
    assert!(matches!(
        err,
        PoolError::PoolTooSmall {
            capacity: 12,
            best_of: 13
        }
    ));
}

#[tokio::test]
async fn test_memory_source() {
    let source = MemoryPoolSource::new().with_pool("weekly", weekly_pool());
    assert!(source.load("weekly").await.is_ok());
    assert!(matches!(
        source.load("monthly").await,
        Err(PoolError::InvalidPool(_))
    ));
}

// =========================================================================
// Plan + select over a whole match
// =========================================================================

#[test]
fn test_every_planned_pick_can_be_drawn() {
    let pool = weekly_pool();
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let index = PoolIndex::new(&pool).unwrap();
        let mut plan = PickOrderPlanner::new(11).plan(&index, &mut rng).unwrap();
        let mut selector = BeatmapSelector::new(index, rng);

        let mut drawn = HashSet::new();
        while let Some(group) = plan.next_pick() {
            let selection = selector.draw(group).unwrap();
            assert_ne!(selection.group, ModCode::TieBreak);
            assert!(drawn.insert(selection.beatmap));
        }
        let tb = selector.draw_tiebreak().unwrap();
        assert_eq!(tb.beatmap, BeatmapId(901));
        assert!(!drawn.contains(&tb.beatmap));
    }
}

#[test]
fn test_planner_rejects_pool_with_only_tiebreak_maps() {
    let pool = Pool {
        name: "tb only".into(),
        groups: vec![ModGroup {
            code: ModCode::TieBreak,
            maps: vec![BeatmapId(1), BeatmapId(2), BeatmapId(3)],
        }],
    };
    let index = PoolIndex::new(&pool).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        PickOrderPlanner::new(1).plan(&index, &mut rng),
        Err(PoolError::InsufficientPoolCapacity { capacity: 0, .. })
    ));
}
