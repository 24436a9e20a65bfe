//! Transport abstraction layer for Pegforge.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the network protocol carrying the game's text frames.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{PendingWebSocket, WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
///
/// Accepting is split in two. [`accept`](Self::accept) only takes the
/// raw socket off the listener; the protocol handshake happens later in
/// [`Handshake::upgrade`], so a peer that never finishes its handshake
/// can't hold up the accept loop.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// An accepted socket that hasn't completed its handshake yet.
    type Pending: Handshake<Connection = Self::Connection>;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next incoming socket.
    async fn accept(&mut self) -> Result<Self::Pending, Self::Error>;
}

/// The second half of accepting: turns a raw socket into a [`Connection`].
pub trait Handshake: Send + 'static {
    /// The connection produced once the handshake succeeds.
    type Connection: Connection;
    /// The error type for a failed handshake.
    type Error: std::error::Error + Send + Sync;

    /// Runs the handshake with the peer.
    async fn upgrade(self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that carries text frames both ways.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one text frame to the remote peer.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the payload of the next data frame from the remote peer.
    ///
    /// The bytes are returned as-is; validating them is the codec's job.
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;

    /// The request path the client connected to, e.g. `/solitaire/`.
    fn path(&self) -> &str;

    /// The table this connection asked for, derived from [`path`](Self::path).
    fn table_name(&self) -> &str {
        table_name(self.path())
    }
}

/// Name of the table used when the request path doesn't name one.
pub const DEFAULT_TABLE: &str = "default";

/// Maps a request path to a table name.
///
/// The first non-empty path segment wins: `/solitaire/` and
/// `/solitaire/extra` both map to `solitaire`. A bare `/` maps to
/// [`DEFAULT_TABLE`].
pub fn table_name(path: &str) -> &str {
    path.split('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_TABLE)
}
