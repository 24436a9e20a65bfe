//! Message types for Pegforge's wire format.
//!
//! The browser client speaks a deliberately tiny protocol: it sends bare
//! text (a cell id, or the word `suggestion`) and receives either bare
//! text or a small JSON object. These types are the in-memory form of
//! every message; [`crate::Codec`] maps them to and from the wire.
//!
//! ```text
//! Client → Server               Server → Client
//! ───────────────               ───────────────
//! "peg17"        Select         {"table": …}                      Snapshot
//! "suggestion"   Suggestion     "peg17" / "error"                 Selected / Rejected
//!                               {"source","jumped","destination"} Jumped
//!                               {"error": "peg3"}                 JumpFailed
//!                               {"suggestions": [{"start","end"}]} Suggestions
//! ```

use pegforge_board::{Board, CellId, CellState, Move};
use serde::{Deserialize, Serialize};

/// The literal text a client sends to ask for suggestions.
pub const SUGGESTION_REQUEST: &str = "suggestion";

/// The literal text sent back when a first selection is refused.
pub const REJECTED: &str = "error";

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Everything a client can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// A click on a cell. Whether it picks a peg or a landing hole is
    /// decided by the session's phase, not by the message.
    Select(CellId),

    /// "Show me the legal moves."
    Suggestion,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Everything the server can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Sent once on connect: the board for the client to render.
    Snapshot(TableSnapshot),

    /// The first selection was accepted; echoes the cell id.
    Selected(CellId),

    /// The first selection was refused (no peg there).
    Rejected,

    /// The jump went through.
    Jumped(Move),

    /// The jump was refused. Carries the destination cell the client
    /// clicked, so it can un-highlight it.
    JumpFailed(CellId),

    /// Every legal move on the board, in the engine's canonical order.
    Suggestions(Vec<Move>),
}

// ---------------------------------------------------------------------------
// TableSnapshot
// ---------------------------------------------------------------------------

/// One cell of a [`TableSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCell {
    pub id: CellId,
    pub state: CellState,
}

/// A renderer-agnostic picture of a board.
///
/// The protocol treats this as opaque: it's whatever the rendering
/// collaborator needs to draw the grid. Serialized, it looks like:
///
/// ```json
/// {"rows": 7, "columns": 7, "cells": [[{"id": "peg0", "state": "absent"}, …], …]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Vec<SnapshotCell>>,
}

impl From<&Board> for TableSnapshot {
    fn from(board: &Board) -> Self {
        let columns = board.columns();
        let mut cells: Vec<Vec<SnapshotCell>> = Vec::with_capacity(board.rows());
        for (index, (id, state)) in board.cells().enumerate() {
            if index % columns == 0 {
                cells.push(Vec::with_capacity(columns));
            }
            if let Some(row) = cells.last_mut() {
                row.push(SnapshotCell { id, state });
            }
        }
        Self {
            rows: board.rows(),
            columns,
            cells,
        }
    }
}

// ---------------------------------------------------------------------------
// SuggestionIds
// ---------------------------------------------------------------------------

/// How cells are named inside a suggestions payload.
///
/// The legacy browser script builds the element id itself
/// (`"peg" + start`), so it wants bare indices. Newer clients take the
/// cell id as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionIds {
    /// `{"start": "peg10", "end": "peg24"}`
    #[default]
    Full,
    /// `{"start": 10, "end": 24}`
    Numeric,
}
