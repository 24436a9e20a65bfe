//! Error types for the session layer.

use pegforge_transport::ConnectionId;

/// Errors that can occur while tracking sessions.
///
/// None of these come from gameplay: an illegal jump is a normal reply,
/// not an error. These are bookkeeping mistakes between the table and
/// its connections.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given connection.
    #[error("no session for connection {0}")]
    NotFound(ConnectionId),

    /// The connection already has a session on this table.
    #[error("connection {0} already has a session")]
    AlreadyAttached(ConnectionId),
}
