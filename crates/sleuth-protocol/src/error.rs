//! Error types for the protocol layer.
//!
//! Each crate in Sleuth defines its own error enum, so a
//! `ProtocolError` always means "the bytes and our types disagree",
//! never a networking or rules problem.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed. Practically unreachable for our own types,
    /// but the codec API is honest about it.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown `"type"` tag,
    /// or fields that don't fit.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room code outside 1..=999 (or not a number at all). The text
    /// is shown to players verbatim, which is why it reads like UI copy.
    #[error("\"{0}\" is not a room code. Codes run from 1 to 999.")]
    InvalidRoomCode(String),
}
