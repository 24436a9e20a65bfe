//! Wire protocol for Pegforge.
//!
//! This crate defines the "language" the browser client and the server
//! speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`TableSnapshot`]):
//!   the in-memory form of every message.
//! - **Codec** ([`Codec`] trait, [`TextCodec`]): how those messages are
//!   turned into text frames and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong doing that.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and session
//! (turn logic). It doesn't know about connections or game rules; it
//! only knows message shapes.
//!
//! ```text
//! Transport (frames) → Protocol (ClientMessage) → Session (turn state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, MAX_SELECTION_LEN};
#[cfg(feature = "json")]
pub use codec::TextCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, REJECTED, SUGGESTION_REQUEST, ServerMessage, SnapshotCell,
    SuggestionIds, TableSnapshot,
};
