//! The session manager: tracks every session attached to one table.
//!
//! It's responsible for:
//! - Creating a session when a connection attaches
//! - Deciding who the table's single mover is
//! - Routing each message to the right session
//! - Handing the mover role on when the mover leaves
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself; it uses a plain
//! `HashMap`. It is owned by the table actor, which processes one
//! command at a time, and that is what serializes board mutations.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use pegforge_board::Board;
use pegforge_protocol::{ClientMessage, ServerMessage};
use pegforge_transport::ConnectionId;

use crate::{Role, Session, SessionConfig, SessionError};

/// Manages the sessions of one table.
///
/// ## Lifecycle
///
/// ```text
/// create() ──→ handle()* ──→ remove()
///    │                          │
///    ▼                          ▼
/// first in → Mover        Mover left → oldest Spectator promoted
/// others   → Spectator
/// ```
pub struct SessionManager {
    /// All attached sessions, keyed by connection.
    sessions: HashMap<ConnectionId, Session>,

    /// Attach order, oldest first. Used to pick the next mover.
    order: Vec<ConnectionId>,

    /// Applied to every session this manager creates.
    config: SessionConfig,
}

impl SessionManager {
    /// Creates a new, empty session manager with the given config.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            order: Vec::new(),
            config,
        }
    }

    /// Creates a session for a newly attached connection.
    ///
    /// The first session on a table (or the first after everyone left)
    /// becomes the mover; the rest are spectators.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyAttached`] if this connection
    /// already has a session here.
    pub fn create(&mut self, conn_id: ConnectionId) -> Result<&Session, SessionError> {
        let role = if self.mover().is_some() {
            Role::Spectator
        } else {
            Role::Mover
        };

        let slot = match self.sessions.entry(conn_id) {
            Entry::Occupied(_) => return Err(SessionError::AlreadyAttached(conn_id)),
            Entry::Vacant(slot) => slot,
        };
        self.order.push(conn_id);

        tracing::info!(%conn_id, ?role, sessions = self.order.len(), "session created");

        Ok(slot.insert(Session::new(conn_id, role, self.config.clone())))
    }

    /// Discards a connection's session.
    ///
    /// If it was the mover, the longest-attached remaining session is
    /// promoted. Returns the removed session.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if there is no such session.
    pub fn remove(&mut self, conn_id: ConnectionId) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(&conn_id)
            .ok_or(SessionError::NotFound(conn_id))?;
        self.order.retain(|id| *id != conn_id);

        tracing::info!(%conn_id, sessions = self.sessions.len(), "session discarded");

        if session.role() == Role::Mover {
            let next = self.order.first().copied();
            if let Some(next) = next.and_then(|id| self.sessions.get_mut(&id)) {
                next.promote();
            }
        }

        Ok(session)
    }

    /// Runs one message through a connection's session.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the connection has no
    /// session here.
    pub fn handle(
        &mut self,
        conn_id: ConnectionId,
        board: &mut Board,
        msg: ClientMessage,
    ) -> Result<ServerMessage, SessionError> {
        let session = self
            .sessions
            .get_mut(&conn_id)
            .ok_or(SessionError::NotFound(conn_id))?;
        Ok(session.handle(board, msg))
    }

    /// Looks up a connection's session.
    pub fn get(&self, conn_id: ConnectionId) -> Option<&Session> {
        self.sessions.get(&conn_id)
    }

    /// The connection currently allowed to move pegs, if anyone is attached.
    pub fn mover(&self) -> Option<ConnectionId> {
        self.sessions
            .values()
            .find(|s| s.role() == Role::Mover)
            .map(Session::conn_id)
    }

    /// Number of attached sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no session is attached.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;
    use pegforge_board::CellId;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn manager() -> SessionManager {
        SessionManager::new(SessionConfig::default())
    }

    fn select(index: usize) -> ClientMessage {
        ClientMessage::Select(CellId::from_index(index))
    }

    #[test]
    fn test_first_session_is_mover() {
        let mut mgr = manager();
        assert_eq!(mgr.create(conn(1)).unwrap().role(), Role::Mover);
        assert_eq!(mgr.create(conn(2)).unwrap().role(), Role::Spectator);
        assert_eq!(mgr.mover(), Some(conn(1)));
        assert_eq!(mgr.len(), 2);
    }

    #[test]
    fn test_create_twice_returns_error() {
        let mut mgr = manager();
        mgr.create(conn(1)).unwrap();
        assert!(matches!(
            mgr.create(conn(1)),
            Err(SessionError::AlreadyAttached(c)) if c == conn(1)
        ));
    }

    #[test]
    fn test_remove_unknown_returns_not_found() {
        let mut mgr = manager();
        assert!(matches!(mgr.remove(conn(9)), Err(SessionError::NotFound(_))));
    }

    #[test]
    fn test_mover_leaving_promotes_oldest_spectator() {
        let mut mgr = manager();
        mgr.create(conn(1)).unwrap();
        mgr.create(conn(2)).unwrap();
        mgr.create(conn(3)).unwrap();

        mgr.remove(conn(1)).unwrap();
        assert_eq!(mgr.mover(), Some(conn(2)));
        assert_eq!(mgr.get(conn(3)).unwrap().role(), Role::Spectator);
    }

    #[test]
    fn test_spectator_leaving_keeps_mover() {
        let mut mgr = manager();
        mgr.create(conn(1)).unwrap();
        mgr.create(conn(2)).unwrap();
        mgr.remove(conn(2)).unwrap();
        assert_eq!(mgr.mover(), Some(conn(1)));
    }

    #[test]
    fn test_empty_table_next_session_is_mover() {
        let mut mgr = manager();
        mgr.create(conn(1)).unwrap();
        mgr.remove(conn(1)).unwrap();
        assert!(mgr.is_empty());
        assert_eq!(mgr.create(conn(2)).unwrap().role(), Role::Mover);
    }

    #[test]
    fn test_handle_routes_to_own_session() {
        let mut mgr = manager();
        let mut board = Board::english();
        mgr.create(conn(1)).unwrap();
        mgr.create(conn(2)).unwrap();

        let reply = mgr.handle(conn(1), &mut board, select(10)).unwrap();
        assert_eq!(reply, ServerMessage::Selected(CellId::from_index(10)));
        assert_eq!(
            mgr.get(conn(2)).unwrap().phase(),
            &Phase::AwaitingSelection,
            "other sessions are untouched"
        );

        let reply = mgr.handle(conn(2), &mut board, select(22)).unwrap();
        assert_eq!(reply, ServerMessage::Rejected);
    }

    #[test]
    fn test_handle_unknown_connection() {
        let mut mgr = manager();
        let mut board = Board::english();
        assert!(matches!(
            mgr.handle(conn(5), &mut board, ClientMessage::Suggestion),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_promoted_spectator_can_move() {
        let mut mgr = manager();
        let mut board = Board::english();
        mgr.create(conn(1)).unwrap();
        mgr.create(conn(2)).unwrap();

        mgr.handle(conn(1), &mut board, select(10)).unwrap();
        mgr.remove(conn(1)).unwrap();

        assert_eq!(
            mgr.handle(conn(2), &mut board, select(22)).unwrap(),
            ServerMessage::Selected(CellId::from_index(22))
        );
    }
}
