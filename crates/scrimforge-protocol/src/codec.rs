//! Codec trait and implementations for decoding values.
//!
//! Pool documents and match requests arrive as bytes (a file, an HTTP
//! body). Both go through a [`Codec`] so the format can change without
//! touching the callers.

use serde::de::DeserializeOwned;

use crate::ProtocolError;

/// A codec that decodes bytes into Rust types.
///
/// `Send + Sync + 'static` because codecs are stored inside long-lived
/// services that are shared across Tokio tasks.
pub trait Codec: Send + Sync + 'static {
    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Pool files are hand-edited JSON, so this is the default codec.
/// It is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use scrimforge_protocol::{Codec, JsonCodec, PlayerId, RoomEvent};
///
/// let codec = JsonCodec;
/// let event: RoomEvent = codec
///     .decode(br#"{ "type": "PlayerJoined", "player": 7 }"#)
///     .unwrap();
/// assert_eq!(event, RoomEvent::PlayerJoined { player: PlayerId(7) });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{PlayerId, PlayerResult, RoomEvent, Team};

    #[test]
    fn test_json_codec_decodes_match_finished() {
        let codec = JsonCodec;
        let json = br#"{
            "type": "MatchFinished",
            "results": [
                { "player": 1, "team": "Red", "passed": true, "score": 512000 },
                { "player": 2, "team": "Blue", "passed": false, "score": 0 }
            ]
        }"#;
        let expected = RoomEvent::MatchFinished {
            results: vec![
                PlayerResult {
                    player: PlayerId(1),
                    team: Team::Red,
                    passed: true,
                    score: 512_000,
                },
                PlayerResult {
                    player: PlayerId(2),
                    team: Team::Blue,
                    passed: false,
                    score: 0,
                },
            ],
        };

        let decoded: RoomEvent = codec.decode(json).unwrap();

        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_json_codec_decode_garbage_fails() {
        let codec = JsonCodec;
        let result: Result<RoomEvent, _> = codec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_unknown_event_type_fails() {
        let codec = JsonCodec;
        let result: Result<RoomEvent, _> =
            codec.decode(br#"{"type":"Exploded"}"#);
        assert!(result.is_err());
    }
}
