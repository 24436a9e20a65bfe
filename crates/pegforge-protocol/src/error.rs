//! Error types for the protocol layer.
//!
//! Each crate in Pegforge defines its own error enum. When you see a
//! `ProtocolError`, the problem is the shape of a message, not the
//! network and not the game rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The inbound payload is not one of the recognized message shapes.
    ///
    /// This is the only protocol failure a client can provoke. The
    /// server logs it and waits for the next message; the session's
    /// state is left exactly as it was.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Serializing an outbound message failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),
}
