//! Error types for the protocol layer.

/// Errors from encoding or decoding wire frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, or an
    /// unknown frame type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but is invalid at the protocol level.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

/// Errors from parsing a terminal command line.
///
/// Kept separate from [`ProtocolError`] because a bad command line is
/// user input to be re-prompted, not a wire fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The command code requires a non-empty trailing argument.
    #[error("expected an argument for '{0}'")]
    MissingArgument(char),
}
