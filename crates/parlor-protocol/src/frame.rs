//! Wire frames exchanged with the bus, and the codec that moves them
//! to and from bytes.
//!
//! The bus itself is an external service; these frames are the small
//! vocabulary the client needs: register a subscriber channel on a
//! topic, publish a body to a topic, and receive delivered bodies.
//! The codec is a trait so the wire format stays swappable — JSON is
//! the default because it is trivial to inspect while debugging.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::ProtocolError;

/// A message on the wire between the client and the bus.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
/// `{ "type": "Subscribe", "topic": "lobby", "channel": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Frame {
    /// Client → bus: register `channel` as a subscriber group on
    /// `topic`. Every message published to the topic afterwards is
    /// delivered once to each registered channel.
    Subscribe { topic: String, channel: String },

    /// Client → bus: publish `body` to every channel of `topic`.
    Publish { topic: String, body: String },

    /// Bus → client: a message body delivered to this subscription.
    Deliver { topic: String, body: String },
}

/// Converts frames (or any serde type) to bytes and back.
///
/// `Send + Sync + 'static` because codecs are held by long-lived async
/// tasks on any runtime thread.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`. Human-readable; behind the
/// default `json` feature so binary codecs can replace it without
/// dragging the dependency along.
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
