//! Integration tests for match creation through the service.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use scrimforge::prelude::*;
use scrimforge::{ConfigError, PoolError, ProtocolError};

// =========================================================================
// Doubles
// =========================================================================

/// Fixed username → id table.
struct Directory(HashMap<&'static str, u64>);

impl Directory {
    fn standard() -> Self {
        Self(HashMap::from([
            ("mrekk", 1),
            ("lifeline", 2),
            ("whitecat", 3),
            ("aetrna", 4),
        ]))
    }
}

impl PlayerDirectory for Directory {
    async fn lookup(&self, username: &str) -> Result<Option<PlayerId>, RosterError> {
        Ok(self.0.get(username).copied().map(PlayerId))
    }
}

/// Accepts every command and counts closes.
#[derive(Clone, Default)]
struct CountingRoom {
    closes: Arc<AtomicUsize>,
}

impl CountingRoom {
    fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl RoomControl for CountingRoom {
    async fn set_map(&self, _: BeatmapId, _: Ruleset) -> Result<(), RoomCommandError> {
        Ok(())
    }
    async fn set_mods(&self, _: ModSet, _: bool) -> Result<(), RoomCommandError> {
        Ok(())
    }
    async fn set_team_mode(&self, _: LobbySettings) -> Result<(), RoomCommandError> {
        Ok(())
    }
    async fn lock_slots(&self) -> Result<(), RoomCommandError> {
        Ok(())
    }
    async fn set_password(&self, _: &str) -> Result<(), RoomCommandError> {
        Ok(())
    }
    async fn invite(&self, _: PlayerId) -> Result<(), RoomCommandError> {
        Ok(())
    }
    async fn change_team(&self, _: PlayerId, _: Team) -> Result<(), RoomCommandError> {
        Ok(())
    }
    async fn remove(&self, _: PlayerId) -> Result<(), RoomCommandError> {
        Ok(())
    }
    async fn start_match(&self, _: u32) -> Result<(), RoomCommandError> {
        Ok(())
    }
    async fn close(&self) -> Result<(), RoomCommandError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    async fn send_message(&self, _: &str) -> Result<(), RoomCommandError> {
        Ok(())
    }
}

fn weekly() -> Pool {
    let group = |code, first: u64, n: u64| ModGroup {
        code,
        maps: (first..first + n).map(BeatmapId).collect(),
    };
    Pool {
        name: "weekly 7".into(),
        groups: vec![
            group(ModCode::NoMod, 100, 3),
            group(ModCode::Hidden, 200, 2),
            group(ModCode::HardRock, 300, 2),
            group(ModCode::TieBreak, 900, 1),
        ],
    }
}

fn service() -> ScrimService<MemoryPoolSource, Directory> {
    ScrimServiceBuilder::new().build(
        MemoryPoolSource::new().with_pool("weekly-7", weekly()),
        Directory::standard(),
    )
}

fn request(best_of: usize) -> MatchRequest {
    MatchRequest::from_lists(
        2,
        best_of,
        "mrekk, lifeline",
        "whitecat,aetrna",
        "https://pools.example/p/weekly-7",
    )
}

// =========================================================================
// Creation
// =========================================================================

#[tokio::test]
async fn test_create_match_registers_it() {
    let service = service();
    let handle = service
        .create_match(request(5), CountingRoom::default())
        .await
        .unwrap();

    assert_eq!(service.active_matches().await, vec![handle.match_id()]);
    let info = handle.info().await.unwrap();
    assert_eq!(info.phase, MatchPhase::Created);
    assert_eq!((info.points_red, info.points_blue), (0, 0));

    handle.start().await.unwrap();
    assert_eq!(handle.info().await.unwrap().phase, MatchPhase::AwaitingReady);
}

#[test]
fn test_request_from_lists_trims_names() {
    let request = request(3);
    assert_eq!(request.red, vec!["mrekk", "lifeline"]);
    assert_eq!(request.blue, vec!["whitecat", "aetrna"]);
}

#[test]
fn test_request_deserializes_from_json() {
    let json = r#"{"team_size":1,"best_of":3,"red":["mrekk"],"blue":["aetrna"],"pool":"weekly-7"}"#;
    let request = MatchRequest::from_json(json.as_bytes()).unwrap();
    assert_eq!(request.best_of, 3);
    assert_eq!(request.pool, "weekly-7");
}

#[test]
fn test_malformed_request_is_protocol_error() {
    let err = MatchRequest::from_json(br#"{"team_size":1}"#).unwrap_err();
    assert!(matches!(err, ScrimforgeError::Protocol(ProtocolError::Decode(_))));
}

#[test]
fn test_builder_defaults_to_standard_settings() {
    let service = ScrimServiceBuilder::new().build(MemoryPoolSource::new(), Directory::standard());
    assert_eq!(service.settings(), &MatchSettings::default());
}

#[tokio::test]
async fn test_unknown_player_rejected() {
    let mut request = request(3);
    request.blue[1] = "nobody".into();
    let err = service()
        .create_match(request, CountingRoom::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScrimforgeError::Roster(RosterError::UnknownPlayer(name)) if name == "nobody"));
}

#[tokio::test]
async fn test_duplicate_player_rejected() {
    let mut request = request(3);
    request.blue[0] = "mrekk".into();
    let err = service()
        .create_match(request, CountingRoom::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScrimforgeError::Roster(RosterError::DuplicatePlayer(PlayerId(1)))
    ));
}

#[tokio::test]
async fn test_even_best_of_rejected() {
    let err = service()
        .create_match(request(4), CountingRoom::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScrimforgeError::Config(ConfigError::InvalidBestOf(4))));
}

#[tokio::test]
async fn test_unknown_pool_rejected() {
    let mut request = request(3);
    request.pool = "missing".into();
    let err = service()
        .create_match(request, CountingRoom::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScrimforgeError::Pool(PoolError::InvalidPool(_))));
}

#[tokio::test]
async fn test_pool_too_small_for_best_of() {
    // 7 regular maps cannot host a best-of-9.
    let err = service()
        .create_match(request(9), CountingRoom::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScrimforgeError::Pool(PoolError::PoolTooSmall { capacity: 7, best_of: 9 })
    ));
    assert!(service().active_matches().await.is_empty());
}

// =========================================================================
// Settings and shutdown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_service_settings_reach_matches() {
    let service = ScrimServiceBuilder::new()
        .settings(MatchSettings {
            inactivity_timeout: Duration::from_secs(60),
            ..MatchSettings::default()
        })
        .build(
            MemoryPoolSource::new().with_pool("weekly-7", weekly()),
            Directory::standard(),
        );
    let room = CountingRoom::default();
    let handle = service.create_match(request(3), room.clone()).await.unwrap();
    handle.start().await.unwrap();

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(room.closes(), 1);
    assert!(service.active_matches().await.is_empty());
}

#[tokio::test]
async fn test_shutdown_closes_every_room() {
    let service = service();
    let rooms = [CountingRoom::default(), CountingRoom::default()];
    for room in &rooms {
        let handle = service.create_match(request(3), room.clone()).await.unwrap();
        handle.start().await.unwrap();
    }
    assert_eq!(service.active_matches().await.len(), 2);

    assert_eq!(service.shutdown().await, 2);
    assert!(service.active_matches().await.is_empty());
    assert!(rooms.iter().all(|room| room.closes() == 1));

    assert_eq!(service.shutdown().await, 0);
}

#[tokio::test]
async fn test_match_can_be_found_in_registry() {
    let service = service();
    let handle = service
        .create_match(request(1), CountingRoom::default())
        .await
        .unwrap();
    let found = service.registry().get(handle.match_id()).await.unwrap();
    assert_eq!(found.match_id(), handle.match_id());
}
