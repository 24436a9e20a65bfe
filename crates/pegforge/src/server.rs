//! `PegforgeServer` builder and server loop.
//!
//! This is the entry point for running a Pegforge table server. It ties
//! together all the layers: transport → protocol → table → session → board.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use pegforge_board::Board;
use pegforge_protocol::{Codec, SuggestionIds, TextCodec};
use pegforge_table::{TableConfig, TableManager};
use pegforge_transport::{Handshake, Transport, WebSocketTransport};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::PegforgeError;
use crate::handler::handle_connection;

/// Default address the server binds to.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// How long a freshly accepted socket gets to finish its WebSocket upgrade.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Everything the server needs to start.
///
/// Deserializable, so it can come from a config file; every field has a
/// default. Most callers go through [`PegforgeServerBuilder`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: String,

    /// Config for any table not listed in `tables`.
    pub table: TableConfig,

    /// Per-table overrides, keyed by table name.
    pub tables: BTreeMap<String, TableConfig>,

    /// How suggestions name their cells on the wire.
    pub suggestion_ids: SuggestionIds,

    /// Close a connection after this many milliseconds without a frame.
    /// `None` keeps connections open for as long as the client likes.
    pub idle_timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            table: TableConfig::default(),
            tables: BTreeMap::new(),
            suggestion_ids: SuggestionIds::default(),
            idle_timeout_ms: None,
        }
    }
}

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) tables: Mutex<TableManager>,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Option<Duration>,
}

/// Builder for configuring and starting a Pegforge server.
///
/// # Example
///
/// ```rust,no_run
/// use pegforge::prelude::*;
///
/// # async fn start() -> Result<(), PegforgeError> {
/// let server = PegforgeServer::builder()
///     .bind("0.0.0.0:8080")
///     .table("european", TableConfig {
///         board: BoardConfig::full(Shape::European),
///         ..TableConfig::default()
///     })
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct PegforgeServerBuilder {
    config: ServerConfig,
}

impl PegforgeServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(ServerConfig::default())
    }

    /// Creates a builder starting from a loaded config.
    pub fn from_config(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind = addr.to_string();
        self
    }

    /// Sets the config used by every table without an override.
    pub fn table_config(mut self, config: TableConfig) -> Self {
        self.config.table = config;
        self
    }

    /// Gives the table called `name` its own config.
    pub fn table(mut self, name: &str, config: TableConfig) -> Self {
        self.config.tables.insert(name.to_string(), config);
        self
    }

    /// Sets how suggestions name their cells.
    pub fn suggestion_ids(mut self, ids: SuggestionIds) -> Self {
        self.config.suggestion_ids = ids;
        self
    }

    /// Closes connections that stay silent for longer than `timeout`.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    /// Validates the table configs, binds, and returns a server ready
    /// to [`run`](PegforgeServer::run).
    ///
    /// Uses [`TextCodec`] and [`WebSocketTransport`].
    pub async fn build(self) -> Result<PegforgeServer<TextCodec>, PegforgeError> {
        let codec = TextCodec::new(self.config.suggestion_ids);
        self.build_with_codec(codec).await
    }

    /// Like [`build`](Self::build), with a custom codec.
    pub async fn build_with_codec<C: Codec>(
        self,
        codec: C,
    ) -> Result<PegforgeServer<C>, PegforgeError> {
        let config = self.config;

        // Fail at startup, not on the first connection to a bad table.
        Board::new(&config.table.board)?;
        for table in config.tables.values() {
            Board::new(&table.board)?;
        }

        let mut tables = TableManager::new(config.table);
        for (name, table) in config.tables {
            tables.configure(name, table);
        }

        let transport = WebSocketTransport::bind(&config.bind).await?;

        let state = Arc::new(ServerState {
            tables: Mutex::new(tables),
            codec,
            idle_timeout: config.idle_timeout_ms.map(Duration::from_millis),
        });

        Ok(PegforgeServer { transport, state })
    }
}

impl Default for PegforgeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Pegforge server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct PegforgeServer<C: Codec = TextCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl PegforgeServer {
    /// Creates a new builder.
    pub fn builder() -> PegforgeServerBuilder {
        PegforgeServerBuilder::new()
    }
}

impl<C: Codec> PegforgeServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, PegforgeError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming sockets and spawns a task for each that finishes
    /// the WebSocket upgrade and then runs the connection handler. A slow
    /// or silent peer only ever stalls its own task.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), PegforgeError> {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "Pegforge server running");

        loop {
            match self.transport.accept().await {
                Ok(pending) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let addr = pending.peer_addr();
                        let conn = match tokio::time::timeout(HANDSHAKE_TIMEOUT, pending.upgrade())
                            .await
                        {
                            Ok(Ok(conn)) => conn,
                            Ok(Err(e)) => {
                                tracing::debug!(%addr, error = %e, "handshake failed");
                                return;
                            }
                            Err(_) => {
                                tracing::debug!(%addr, "handshake timed out");
                                return;
                            }
                        };
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.suggestion_ids, SuggestionIds::Full);
        assert!(config.tables.is_empty());
        assert_eq!(config.idle_timeout_ms, None);
    }

    #[test]
    fn test_builder_collects_settings() {
        let builder = PegforgeServerBuilder::new()
            .bind("0.0.0.0:9000")
            .suggestion_ids(SuggestionIds::Numeric)
            .table("quiet", TableConfig::default())
            .idle_timeout(Duration::from_secs(30));

        assert_eq!(builder.config.bind, "0.0.0.0:9000");
        assert_eq!(builder.config.suggestion_ids, SuggestionIds::Numeric);
        assert!(builder.config.tables.contains_key("quiet"));
        assert_eq!(builder.config.idle_timeout_ms, Some(30_000));
    }

    #[tokio::test]
    async fn test_build_rejects_bad_table_config() {
        use pegforge_board::{BoardConfig, Shape};

        let result = PegforgeServerBuilder::new()
            .bind("127.0.0.1:0")
            .table(
                "broken",
                TableConfig {
                    board: BoardConfig {
                        shape: Shape::Custom(String::new()),
                        empty: Vec::new(),
                    },
                    ..TableConfig::default()
                },
            )
            .build()
            .await;
        assert!(matches!(result, Err(PegforgeError::Layout(_))));
    }
}
