//! Table actor: an isolated Tokio task that owns one shared board.
//!
//! Each table runs in its own task, communicating with connection
//! handlers through an mpsc channel. The actor processes one command at
//! a time, so board mutations from different connections are serialized
//! without a lock and a jump is never observed half-applied.

use pegforge_board::{Board, GameStatus};
use pegforge_protocol::{ClientMessage, ServerMessage, TableSnapshot};
use pegforge_session::SessionManager;
use pegforge_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{TableConfig, TableError};

/// Commands sent to a table actor through its channel.
///
/// The `oneshot::Sender` in each variant is a "reply channel": the
/// caller sends a command and waits for the response on that channel.
pub(crate) enum TableCommand {
    /// Attach a connection and hand back the current board.
    Attach {
        conn_id: ConnectionId,
        reply: oneshot::Sender<Result<TableSnapshot, TableError>>,
    },

    /// Detach a connection, discarding its session.
    Detach {
        conn_id: ConnectionId,
        reply: oneshot::Sender<Result<(), TableError>>,
    },

    /// Run one client message through the connection's session.
    Message {
        conn_id: ConnectionId,
        msg: ClientMessage,
        reply: oneshot::Sender<Result<ServerMessage, TableError>>,
    },

    /// Request table metadata.
    Info { reply: oneshot::Sender<TableInfo> },

    /// Stop the actor if no connection is attached. Replies whether it
    /// stopped.
    CloseIfEmpty { reply: oneshot::Sender<bool> },

    /// Shut down the table.
    Shutdown,
}

/// A snapshot of table metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// The table's name.
    pub name: String,
    /// Where the game stands.
    pub status: GameStatus,
    /// Pegs still on the board.
    pub remaining_pegs: usize,
    /// Connections currently attached.
    pub connections: usize,
    /// The connection allowed to move pegs, if any.
    pub mover: Option<ConnectionId>,
}

/// Handle to a running table actor. Used to send commands to it.
///
/// This is cheap to clone: it's just an `mpsc::Sender` wrapper.
/// The `TableManager` holds one of these per table, and every
/// connection handler holds one for the table it is attached to.
#[derive(Clone)]
pub struct TableHandle {
    name: String,
    sender: mpsc::Sender<TableCommand>,
}

impl TableHandle {
    /// Returns the table's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn unavailable(&self) -> TableError {
        TableError::Unavailable(self.name.clone())
    }

    /// Attaches a connection, returning the board it will play on.
    ///
    /// The first connection attached becomes the mover.
    pub async fn attach(&self, conn_id: ConnectionId) -> Result<TableSnapshot, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Attach {
                conn_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Detaches a connection.
    pub async fn detach(&self, conn_id: ConnectionId) -> Result<(), TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Detach {
                conn_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Sends a client message and waits for the reply meant for that
    /// connection.
    pub async fn send(
        &self,
        conn_id: ConnectionId,
        msg: ClientMessage,
    ) -> Result<ServerMessage, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Message {
                conn_id,
                msg,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Requests the current table info.
    pub async fn info(&self) -> Result<TableInfo, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Stops the table if nobody is attached, returning whether it did.
    ///
    /// The check runs inside the actor, so an attach queued ahead of it
    /// keeps the table alive and one queued behind it fails with
    /// [`TableError::Unavailable`].
    pub(crate) async fn close_if_empty(&self) -> Result<bool, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::CloseIfEmpty { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Tells the table to shut down.
    pub async fn shutdown(&self) -> Result<(), TableError> {
        self.sender
            .send(TableCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }
}

/// The internal table actor state. Runs inside a Tokio task.
struct TableActor {
    name: String,
    board: Board,
    /// The board as built from config, kept for resets.
    initial: Board,
    sessions: SessionManager,
    reset_when_empty: bool,
    receiver: mpsc::Receiver<TableCommand>,
}

impl TableActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(table = %self.name, "table actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                TableCommand::Attach { conn_id, reply } => {
                    let result = self.handle_attach(conn_id);
                    let _ = reply.send(result);
                }
                TableCommand::Detach { conn_id, reply } => {
                    let result = self.handle_detach(conn_id);
                    let _ = reply.send(result);
                }
                TableCommand::Message {
                    conn_id,
                    msg,
                    reply,
                } => {
                    let result = self.handle_message(conn_id, msg);
                    let _ = reply.send(result);
                }
                TableCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                TableCommand::CloseIfEmpty { reply } => {
                    let empty = self.sessions.is_empty();
                    let _ = reply.send(empty);
                    if empty {
                        tracing::info!(table = %self.name, "table empty, closing");
                        break;
                    }
                }
                TableCommand::Shutdown => {
                    tracing::info!(table = %self.name, "table shutting down");
                    break;
                }
            }
        }

        tracing::info!(table = %self.name, "table actor stopped");
    }

    fn handle_attach(&mut self, conn_id: ConnectionId) -> Result<TableSnapshot, TableError> {
        let role = self.sessions.create(conn_id)?.role();
        tracing::info!(
            table = %self.name,
            %conn_id,
            ?role,
            connections = self.sessions.len(),
            "connection attached"
        );
        Ok(TableSnapshot::from(&self.board))
    }

    fn handle_detach(&mut self, conn_id: ConnectionId) -> Result<(), TableError> {
        self.sessions.remove(conn_id)?;
        tracing::info!(
            table = %self.name,
            %conn_id,
            connections = self.sessions.len(),
            "connection detached"
        );

        if self.sessions.is_empty() && self.reset_when_empty && self.board != self.initial {
            self.board = self.initial.clone();
            tracing::info!(table = %self.name, "table empty, board reset");
        }
        Ok(())
    }

    fn handle_message(
        &mut self,
        conn_id: ConnectionId,
        msg: ClientMessage,
    ) -> Result<ServerMessage, TableError> {
        let reply = self.sessions.handle(conn_id, &mut self.board, msg)?;

        // Only a jump can end the game.
        if let ServerMessage::Jumped(_) = &reply {
            match self.board.status() {
                GameStatus::Solved => {
                    tracing::info!(table = %self.name, "game solved");
                }
                GameStatus::Stuck => {
                    tracing::info!(
                        table = %self.name,
                        remaining = self.board.remaining_pegs(),
                        "game stuck"
                    );
                }
                GameStatus::InProgress => {}
            }
        }

        Ok(reply)
    }

    fn info(&self) -> TableInfo {
        TableInfo {
            name: self.name.clone(),
            status: self.board.status(),
            remaining_pegs: self.board.remaining_pegs(),
            connections: self.sessions.len(),
            mover: self.sessions.mover(),
        }
    }
}

/// Spawns a new table actor task and returns a handle to communicate with it.
///
/// # Errors
/// Returns [`TableError::Layout`] if `config.board` does not build.
pub(crate) fn spawn_table(name: &str, config: &TableConfig) -> Result<TableHandle, TableError> {
    let board = Board::new(&config.board)?;
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = TableActor {
        name: name.to_owned(),
        initial: board.clone(),
        board,
        sessions: SessionManager::new(config.session.clone()),
        reset_when_empty: config.reset_when_empty,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    Ok(TableHandle {
        name: name.to_owned(),
        sender: tx,
    })
}
