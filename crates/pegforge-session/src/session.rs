//! Session types: one connection's turn state against a shared board.
//!
//! A "session" is the server's record of one connected client. It tracks:
//! - WHO it is (`ConnectionId`)
//! - WHETHER it may move pegs or only watch (`Role`)
//! - WHERE it is in the two-click turn cycle (`Phase`)
//!
//! The board itself is not owned here. The table owns it and lends it
//! to [`Session::handle`] one message at a time, so two sessions never
//! touch the same board concurrently.

use pegforge_board::{Board, CellId, CellState};
use pegforge_protocol::{ClientMessage, ServerMessage};
use pegforge_transport::ConnectionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// On a board where every hole holds a peg no jump is possible, so
    /// the first click takes a peg out instead of picking it up. This
    /// is how a player chooses the opening hole.
    ///
    /// Default: `true`. Has no effect on boards configured with a
    /// starting hole.
    pub opening_removal: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            opening_removal: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a session is in its turn.
///
/// ```text
///                    select(occupied)
///   AwaitingSelection ───────────────→ AwaitingDestination { source }
///          ↑                                     │
///          └──────── select(any): jump or fail ──┘
/// ```
///
/// A suggestion request is answered in either phase and never moves
/// the session between them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the player to pick a peg. Initial phase, and the
    /// phase every turn ends in, successful or not.
    #[default]
    AwaitingSelection,

    /// A peg has been picked; waiting for the landing hole.
    AwaitingDestination { source: CellId },
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Whether a session may change the board.
///
/// Exactly one session per table is the `Mover`. Everyone else watches:
/// their selections are refused, but they may still ask for suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Mover,
    Spectator,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single connection's turn state.
///
/// Created when a connection attaches to a table, dropped when it
/// detaches. Carries nothing beyond its phase and role.
#[derive(Debug, Clone)]
pub struct Session {
    conn_id: ConnectionId,
    role: Role,
    phase: Phase,
    config: SessionConfig,
}

impl Session {
    /// Creates a fresh session: no pending selection.
    pub fn new(conn_id: ConnectionId, role: Role, config: SessionConfig) -> Self {
        Self {
            conn_id,
            role,
            phase: Phase::AwaitingSelection,
            config,
        }
    }

    /// The connection this session belongs to.
    pub fn conn_id(&self) -> ConnectionId {
        self.conn_id
    }

    /// Mover or spectator.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The current turn phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The peg picked by the first click, if a turn is half done.
    pub fn pending_source(&self) -> Option<&CellId> {
        match &self.phase {
            Phase::AwaitingSelection => None,
            Phase::AwaitingDestination { source } => Some(source),
        }
    }

    /// Makes this session the table's mover, starting from a clean turn.
    pub fn promote(&mut self) {
        self.role = Role::Mover;
        self.phase = Phase::AwaitingSelection;
        tracing::info!(conn_id = %self.conn_id, "session promoted to mover");
    }

    /// Processes one message against the board and returns the reply.
    ///
    /// This is the whole turn state machine:
    ///
    /// | phase | message | effect | reply |
    /// |---|---|---|---|
    /// | AwaitingSelection | select(occupied) | remember the peg | echo id |
    /// | AwaitingSelection | select(other) | none | `error` |
    /// | AwaitingDestination | select, legal jump | apply the jump | the move |
    /// | AwaitingDestination | select, illegal | none | `{error: id}` |
    /// | either | suggestion | none | every legal move |
    ///
    /// Every select in `AwaitingDestination` ends the turn, so the
    /// session is back in `AwaitingSelection` afterwards either way.
    pub fn handle(&mut self, board: &mut Board, msg: ClientMessage) -> ServerMessage {
        match msg {
            ClientMessage::Suggestion => {
                let moves = board.legal_moves();
                tracing::debug!(
                    conn_id = %self.conn_id,
                    count = moves.len(),
                    "suggestions requested"
                );
                ServerMessage::Suggestions(moves)
            }
            ClientMessage::Select(cell) => {
                match std::mem::take(&mut self.phase) {
                    Phase::AwaitingSelection => self.select_source(board, cell),
                    Phase::AwaitingDestination { source } => {
                        self.select_destination(board, source, cell)
                    }
                }
            }
        }
    }

    fn select_source(&mut self, board: &mut Board, cell: CellId) -> ServerMessage {
        if self.role == Role::Spectator {
            tracing::debug!(conn_id = %self.conn_id, %cell, "spectator selection refused");
            return ServerMessage::Rejected;
        }

        match board.cell_state(&cell) {
            Ok(CellState::Occupied) if self.config.opening_removal && board.is_full() => {
                match board.clear(&cell) {
                    Ok(true) => {
                        tracing::info!(conn_id = %self.conn_id, %cell, "opening hole chosen");
                        ServerMessage::Selected(cell)
                    }
                    _ => ServerMessage::Rejected,
                }
            }
            Ok(CellState::Occupied) => {
                tracing::debug!(conn_id = %self.conn_id, %cell, "peg selected");
                self.phase = Phase::AwaitingDestination {
                    source: cell.clone(),
                };
                ServerMessage::Selected(cell)
            }
            Ok(state) => {
                tracing::debug!(conn_id = %self.conn_id, %cell, ?state, "nothing to select");
                ServerMessage::Rejected
            }
            Err(e) => {
                tracing::debug!(conn_id = %self.conn_id, error = %e, "selection refused");
                ServerMessage::Rejected
            }
        }
    }

    fn select_destination(
        &mut self,
        board: &mut Board,
        source: CellId,
        cell: CellId,
    ) -> ServerMessage {
        match board.validate(&source, &cell) {
            Ok(mv) => {
                board.apply(&mv);
                tracing::debug!(
                    conn_id = %self.conn_id,
                    source = %mv.source,
                    jumped = %mv.jumped,
                    destination = %mv.destination,
                    pegs = board.remaining_pegs(),
                    "jump applied"
                );
                ServerMessage::Jumped(mv)
            }
            Err(reason) => {
                tracing::debug!(
                    conn_id = %self.conn_id,
                    %source,
                    destination = %cell,
                    %reason,
                    "jump refused"
                );
                ServerMessage::JumpFailed(cell)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegforge_board::{Layout, Move};

    fn id(index: usize) -> CellId {
        CellId::from_index(index)
    }

    fn mover() -> Session {
        Session::new(ConnectionId::new(1), Role::Mover, SessionConfig::default())
    }

    fn select(index: usize) -> ClientMessage {
        ClientMessage::Select(id(index))
    }

    /// `a b c` in a row: a and b pegged, c empty.
    fn abc() -> Board {
        Board::from_layout(Layout::parse("oo.").unwrap())
    }

    #[test]
    fn test_fresh_session_has_no_pending_selection() {
        let session = mover();
        assert_eq!(session.phase(), &Phase::AwaitingSelection);
        assert_eq!(session.pending_source(), None);
    }

    #[test]
    fn test_scenario_a_full_turn() {
        let mut board = abc();
        let mut session = mover();

        assert_eq!(session.handle(&mut board, select(0)), ServerMessage::Selected(id(0)));
        assert_eq!(session.pending_source(), Some(&id(0)));

        assert_eq!(
            session.handle(&mut board, select(2)),
            ServerMessage::Jumped(Move {
                source: id(0),
                jumped: id(1),
                destination: id(2),
            })
        );
        assert_eq!(board.cell_state(&id(0)), Ok(CellState::Empty));
        assert_eq!(board.cell_state(&id(1)), Ok(CellState::Empty));
        assert_eq!(board.cell_state(&id(2)), Ok(CellState::Occupied));
        assert_eq!(session.phase(), &Phase::AwaitingSelection);
    }

    #[test]
    fn test_scenario_b_select_empty_cell() {
        let mut board = abc();
        let before = board.clone();
        let mut session = mover();

        assert_eq!(session.handle(&mut board, select(2)), ServerMessage::Rejected);
        assert_eq!(board, before);
        assert_eq!(session.phase(), &Phase::AwaitingSelection);
    }

    #[test]
    fn test_select_absent_or_unknown_cell_is_rejected() {
        let mut board = Board::english();
        let before = board.clone();
        let mut session = mover();

        assert_eq!(session.handle(&mut board, select(0)), ServerMessage::Rejected);
        assert_eq!(
            session.handle(&mut board, ClientMessage::Select(CellId::new("peg500"))),
            ServerMessage::Rejected
        );
        assert_eq!(board, before);
        assert_eq!(session.phase(), &Phase::AwaitingSelection);
    }

    #[test]
    fn test_scenario_c_destination_not_two_away() {
        let mut board = Board::english();
        let before = board.clone();
        let mut session = mover();

        session.handle(&mut board, select(10));
        assert_eq!(
            session.handle(&mut board, select(11)),
            ServerMessage::JumpFailed(id(11))
        );
        assert_eq!(board, before);
        assert_eq!(session.phase(), &Phase::AwaitingSelection);
    }

    #[test]
    fn test_failed_destination_on_unknown_cell() {
        let mut board = abc();
        let mut session = mover();

        session.handle(&mut board, select(0));
        let reply = session.handle(&mut board, ClientMessage::Select(CellId::new("bogus")));
        assert_eq!(reply, ServerMessage::JumpFailed(CellId::new("bogus")));
        assert_eq!(session.phase(), &Phase::AwaitingSelection);
    }

    #[test]
    fn test_scenario_d_no_moves() {
        let mut board = Board::from_layout(Layout::parse("o.o").unwrap());
        let mut session = mover();
        assert_eq!(
            session.handle(&mut board, ClientMessage::Suggestion),
            ServerMessage::Suggestions(Vec::new())
        );
    }

    #[test]
    fn test_scenario_e_suggestion_mid_turn_keeps_selection() {
        let mut board = Board::english();
        let mut session = mover();

        session.handle(&mut board, select(10));
        let reply = session.handle(&mut board, ClientMessage::Suggestion);
        assert!(matches!(reply, ServerMessage::Suggestions(ref moves) if moves.len() == 4));
        assert_eq!(session.pending_source(), Some(&id(10)));

        // The turn carries on as if nothing happened.
        let reply = session.handle(&mut board, select(24));
        assert!(matches!(reply, ServerMessage::Jumped(_)));
    }

    #[test]
    fn test_turns_are_independent() {
        let mut board = Board::english();
        let mut session = mover();

        session.handle(&mut board, select(10));
        session.handle(&mut board, select(24));
        // Second turn: peg 3 tries to jump the hole peg 10 left behind.
        session.handle(&mut board, select(3));
        assert_eq!(
            session.handle(&mut board, select(17)),
            ServerMessage::JumpFailed(id(17))
        );
        // Third turn starts clean.
        assert_eq!(session.handle(&mut board, select(22)), ServerMessage::Selected(id(22)));
    }

    #[test]
    fn test_opening_removal_on_full_board() {
        let mut board = Board::from_layout(Layout::english());
        let mut session = mover();

        assert_eq!(session.handle(&mut board, select(24)), ServerMessage::Selected(id(24)));
        assert_eq!(board.cell_state(&id(24)), Ok(CellState::Empty));
        assert_eq!(session.phase(), &Phase::AwaitingSelection);

        // Board is no longer full: the next click is a normal selection.
        assert_eq!(session.handle(&mut board, select(10)), ServerMessage::Selected(id(10)));
        assert_eq!(session.pending_source(), Some(&id(10)));
    }

    #[test]
    fn test_opening_removal_disabled() {
        let mut board = Board::from_layout(Layout::english());
        let mut session = Session::new(
            ConnectionId::new(1),
            Role::Mover,
            SessionConfig {
                opening_removal: false,
            },
        );

        assert_eq!(session.handle(&mut board, select(24)), ServerMessage::Selected(id(24)));
        assert!(board.is_full());
        assert_eq!(session.pending_source(), Some(&id(24)));
    }

    #[test]
    fn test_spectator_cannot_move() {
        let mut board = abc();
        let before = board.clone();
        let mut session = Session::new(ConnectionId::new(2), Role::Spectator, SessionConfig::default());

        assert_eq!(session.handle(&mut board, select(0)), ServerMessage::Rejected);
        assert_eq!(board, before);
        assert!(matches!(
            session.handle(&mut board, ClientMessage::Suggestion),
            ServerMessage::Suggestions(ref moves) if moves.len() == 1
        ));
    }

    #[test]
    fn test_promote_resets_phase() {
        let mut board = abc();
        let mut session = Session::new(ConnectionId::new(2), Role::Spectator, SessionConfig::default());
        session.promote();
        assert_eq!(session.role(), Role::Mover);
        assert_eq!(session.handle(&mut board, select(0)), ServerMessage::Selected(id(0)));
    }
}
