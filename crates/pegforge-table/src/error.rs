//! Error types for the table layer.

use pegforge_board::LayoutError;
use pegforge_session::SessionError;

/// Errors that can occur during table operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table's command channel is closed; its actor has stopped.
    #[error("table {0} is unavailable")]
    Unavailable(String),

    /// The connection is not attached, or is attached twice.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The table's board config does not describe a playable board.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
