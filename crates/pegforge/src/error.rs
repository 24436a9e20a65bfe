//! Unified error type for Pegforge.

use pegforge_board::LayoutError;
use pegforge_protocol::ProtocolError;
use pegforge_session::SessionError;
use pegforge_table::TableError;
use pegforge_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `pegforge` crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PegforgeError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (malformed frame, encode failure).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session bookkeeping error (unknown or duplicate connection).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A table-level error (actor gone, bad attach).
    #[error(transparent)]
    Table(#[from] TableError),

    /// A board config that does not describe a playable board.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegforge_transport::ConnectionId;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let pegforge_err: PegforgeError = err.into();
        assert!(matches!(pegforge_err, PegforgeError::Transport(_)));
        assert!(pegforge_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::MalformedMessage("bad".into());
        let pegforge_err: PegforgeError = err.into();
        assert!(matches!(pegforge_err, PegforgeError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::NotFound(ConnectionId::new(3));
        let pegforge_err: PegforgeError = err.into();
        assert!(matches!(pegforge_err, PegforgeError::Session(_)));
        assert!(pegforge_err.to_string().contains("conn-3"));
    }

    #[test]
    fn test_from_table_error() {
        let err = TableError::Unavailable("solitaire".into());
        let pegforge_err: PegforgeError = err.into();
        assert!(matches!(pegforge_err, PegforgeError::Table(_)));
    }

    #[test]
    fn test_from_layout_error() {
        let pegforge_err: PegforgeError = LayoutError::Empty.into();
        assert!(matches!(pegforge_err, PegforgeError::Layout(_)));
    }
}
