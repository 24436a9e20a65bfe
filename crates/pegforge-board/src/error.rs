//! Error types for the board layer.
//!
//! Three enums, one per concern: looking a cell up ([`BoardError`]),
//! checking a jump ([`MoveError`]), and building a board from
//! configuration ([`LayoutError`]).

use crate::CellId;

/// A cell lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The identifier does not name any position of this board's grid.
    #[error("unknown cell {0}")]
    UnknownCell(CellId),
}

/// Why a candidate jump is not legal.
///
/// The protocol folds every variant into one generic "error" reply, but
/// the session logs the specific reason and tests assert on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// One of the identifiers is not part of the layout.
    #[error("unknown cell {0}")]
    UnknownCell(CellId),

    /// The source cell holds no peg.
    #[error("no peg at source {0}")]
    SourceEmpty(CellId),

    /// The cell between source and destination holds no peg.
    #[error("no peg to jump over at {0}")]
    PathEmpty(CellId),

    /// The destination already holds a peg.
    #[error("destination {0} is occupied")]
    DestinationOccupied(CellId),

    /// The destination is not exactly two holes away along an axis.
    #[error("{to} is not two holes away from {from}")]
    NotCollinear { from: CellId, to: CellId },
}

impl From<BoardError> for MoveError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::UnknownCell(id) => Self::UnknownCell(id),
        }
    }
}

/// A [`BoardConfig`](crate::BoardConfig) could not be turned into a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The layout has no rows or no columns.
    #[error("layout is empty")]
    Empty,

    /// A character in a layout grid is not one of ` `, `-`, `o`, `.`.
    #[error("unexpected {glyph:?} at row {row}, column {col}")]
    Glyph { row: usize, col: usize, glyph: char },

    /// A starting hole was requested on a cell outside the playable shape.
    #[error("cell {0} is not part of the playable shape")]
    NotPlayable(CellId),

    /// A starting hole names a cell the layout doesn't have.
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_converts_to_unknown_cell() {
        let err: MoveError = BoardError::UnknownCell(CellId::new("peg99")).into();
        assert_eq!(err, MoveError::UnknownCell(CellId::new("peg99")));
    }

    #[test]
    fn test_not_collinear_message_names_both_cells() {
        let err = MoveError::NotCollinear {
            from: CellId::new("peg17"),
            to: CellId::new("peg30"),
        };
        let text = err.to_string();
        assert!(text.contains("peg17"));
        assert!(text.contains("peg30"));
    }
}
