//! # Pegforge
//!
//! A peg-solitaire engine served over WebSocket.
//!
//! Pegforge keeps the board on the server. A browser connects, receives
//! the board, and plays by clicking: one click picks a peg, the next
//! picks where it lands. The server validates every jump and answers
//! each click with a single text frame.
//!
//! ## Layers
//!
//! | Crate | Role |
//! |-------|------|
//! | [`board`] | Grid, jump rules, legal-move enumeration |
//! | [`protocol`] | Message types and the text codec |
//! | [`session`] | The two-click turn state machine |
//! | [`table`] | One actor per shared board |
//! | [`transport`] | WebSocket connections |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pegforge::prelude::*;
//!
//! # async fn start() -> Result<(), PegforgeError> {
//! let server = PegforgeServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::PegforgeError;
pub use server::{DEFAULT_BIND, PegforgeServer, PegforgeServerBuilder, ServerConfig};

pub use pegforge_board as board;
pub use pegforge_protocol as protocol;
pub use pegforge_session as session;
pub use pegforge_table as table;
pub use pegforge_transport as transport;

/// The types most programs need.
pub mod prelude {
    pub use crate::{PegforgeError, PegforgeServer, PegforgeServerBuilder, ServerConfig};
    pub use pegforge_board::{
        Board, BoardConfig, CellId, CellState, Direction, GameStatus, Layout, Move, Shape,
    };
    pub use pegforge_protocol::{
        ClientMessage, Codec, ServerMessage, SuggestionIds, TableSnapshot, TextCodec,
    };
    pub use pegforge_session::{Role, SessionConfig};
    pub use pegforge_table::{TableConfig, TableInfo, TableManager};
}
