//! Per-connection handler: table attach and message routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Pick the table named by the request path → attach
//!   2. Send the board snapshot
//!   3. Loop: receive a frame → decode → table → encode → send the reply
//!
//! Every inbound message gets exactly one reply, except malformed ones,
//! which are logged and dropped. When the last connection leaves a table
//! that was created on demand, the table is reaped.

use std::sync::Arc;

use pegforge_protocol::{Codec, ServerMessage, TableSnapshot};
use pegforge_table::{TableError, TableHandle};
use pegforge_transport::{Connection, ConnectionId, WebSocketConnection};

use crate::PegforgeError;
use crate::server::ServerState;

/// Drop guard that detaches a connection from its table when the
/// handler exits, then reaps the table if that left it empty.
///
/// This ensures cleanup happens even if the handler returns early or
/// panics. Since `Drop` is synchronous, we spawn a fire-and-forget task
/// for the async detach.
struct AttachGuard<C: Codec> {
    conn_id: ConnectionId,
    table: TableHandle,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for AttachGuard<C> {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let table = self.table.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            if let Err(e) = table.detach(conn_id).await {
                tracing::debug!(%conn_id, table = %table.name(), error = %e, "detach failed");
            }
            state.tables.lock().await.reap_if_idle(table.name()).await;
        });
    }
}

/// Looks up the table and attaches to it.
///
/// A table reaped between the lookup and the attach reports
/// `Unavailable`; the second lookup then starts a fresh one.
async fn attach<C: Codec>(
    state: &ServerState<C>,
    name: &str,
    conn_id: ConnectionId,
) -> Result<(TableHandle, TableSnapshot), TableError> {
    let mut retried = false;
    loop {
        // Lock only to look the table up, drop before talking to the actor.
        let table = state.tables.lock().await.get_or_create(name)?;
        match table.attach(conn_id).await {
            Ok(snapshot) => return Ok((table, snapshot)),
            Err(TableError::Unavailable(_)) if !retried => retried = true,
            Err(e) => return Err(e),
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), PegforgeError> {
    let conn_id = conn.id();
    let table_name = conn.table_name().to_owned();
    tracing::debug!(%conn_id, table = %table_name, "handling new connection");

    // --- Step 1: Attach ---
    let (table, snapshot) = attach(&state, &table_name, conn_id).await?;
    let _guard = AttachGuard {
        conn_id,
        table: table.clone(),
        state: Arc::clone(&state),
    };

    // --- Step 2: Snapshot ---
    send(&conn, &state.codec, &ServerMessage::Snapshot(snapshot)).await?;

    // --- Step 3: Message loop ---
    loop {
        let received = match state.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, conn.recv()).await {
                Ok(received) => received,
                Err(_) => {
                    tracing::info!(%conn_id, "connection idle, closing");
                    if let Err(e) = conn.close().await {
                        tracing::debug!(%conn_id, error = %e, "close failed");
                    }
                    break;
                }
            },
            None => conn.recv().await,
        };

        let data = match received {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let msg = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "ignoring malformed message");
                continue;
            }
        };

        let reply = table.send(conn_id, msg).await?;
        send(&conn, &state.codec, &reply).await?;
    }

    // _guard drops here → detach fires.
    Ok(())
}

/// Encodes one message and writes it as a text frame.
async fn send(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    msg: &ServerMessage,
) -> Result<(), PegforgeError> {
    let text = codec.encode(msg)?;
    conn.send(&text).await?;
    Ok(())
}
