//! Codec trait and implementations for message serialization.
//!
//! The room and connection layers don't care how messages become bytes;
//! they go through the [`Codec`] trait and stay agnostic. [`JsonCodec`]
//! is the default (and what browsers speak); a binary codec could slot
//! in behind the same trait without touching the rest of the server.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because codecs are shared across connection
/// tasks. The methods are generic so one codec serves both directions:
/// `ClientCommand` in, `ServerEvent` out.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or
    /// don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] using JSON via `serde_json`.
///
/// Human-readable, debuggable in browser devtools, and exactly what the
/// web client produces. Behind the default `json` feature.
///
/// ## Example
///
/// ```rust
/// use sleuth_protocol::{ClientCommand, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&ClientCommand::RollDice).unwrap();
/// assert_eq!(bytes, br#"{"type":"rollDice"}"#);
///
/// let decoded: ClientCommand = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, ClientCommand::RollDice);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientCommand, ServerEvent};

    #[test]
    fn test_json_codec_round_trips_commands() {
        let codec = JsonCodec;
        let cmd = ClientCommand::MakeSuggestion {
            suspect: sleuth_board::Suspect::Plum,
            weapon: sleuth_board::Weapon::Rope,
        };
        let bytes = codec.encode(&cmd).unwrap();
        let decoded: ClientCommand = codec.decode(&bytes).unwrap();
        assert_eq!(cmd, decoded);
    }

    #[test]
    fn test_json_codec_round_trips_events() {
        let codec = JsonCodec;
        let event = ServerEvent::Error { message: "nope".into() };
        let bytes = codec.encode(&event).unwrap();
        let decoded: ServerEvent = codec.decode(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_json_codec_decode_garbage_fails() {
        let codec = JsonCodec;
        let result: Result<ClientCommand, _> = codec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
