//! Error types for the protocol layer.
//!
//! Each crate in Scrimforge defines its own error enum. A `ProtocolError`
//! always means bytes could not be turned into a value, never a
//! problem with match state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, an unknown mod code, or a beatmap
    /// identifier that is neither a number nor a numeric string.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The value decoded but is not acceptable, e.g. a beatmap id of 0.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}
