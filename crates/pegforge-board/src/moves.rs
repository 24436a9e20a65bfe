//! Jump validation and execution.

use serde::{Deserialize, Serialize};

use crate::{Board, CellId, CellState, MoveError};

/// A single jump: the peg at `source` hops over `jumped` into `destination`.
///
/// A `Move` returned by [`Board::validate`] or [`Board::legal_moves`] is
/// legal for the board it was checked against, at the moment it was
/// checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub source: CellId,
    pub jumped: CellId,
    pub destination: CellId,
}

impl Board {
    /// Checks whether the peg at `source` may jump to `destination`.
    ///
    /// Order of checks:
    /// 1. both identifiers exist → else `UnknownCell`
    /// 2. `destination` is two holes from `source` along an axis →
    ///    else `NotCollinear` (this also finds the jumped cell)
    /// 3. `source` holds a peg → else `SourceEmpty`
    /// 4. the jumped cell holds a peg → else `PathEmpty`
    /// 5. `destination` is an empty hole → else `DestinationOccupied`
    pub fn validate(
        &self,
        source: &CellId,
        destination: &CellId,
    ) -> Result<Move, MoveError> {
        let from = self.index_of(source)?;
        let to = self.index_of(destination)?;

        let line = self
            .lines_from(from)
            .find(|line| line.landing == to)
            .ok_or_else(|| MoveError::NotCollinear {
                from: source.clone(),
                to: destination.clone(),
            })?;
        let jumped = CellId::from_index(line.jumped);

        if self.state_at(from) != CellState::Occupied {
            return Err(MoveError::SourceEmpty(source.clone()));
        }
        if self.state_at(line.jumped) != CellState::Occupied {
            return Err(MoveError::PathEmpty(jumped));
        }
        if self.state_at(to) != CellState::Empty {
            return Err(MoveError::DestinationOccupied(destination.clone()));
        }

        Ok(Move {
            source: source.clone(),
            jumped,
            destination: destination.clone(),
        })
    }

    /// Executes a validated move: source and jumped become empty, the
    /// destination gains the peg.
    ///
    /// All three indices are resolved before anything is written, so the
    /// board is never left half-updated. Passing a move that did not come
    /// from [`Board::validate`] on this exact board state is a bug in the
    /// caller; debug builds assert on it.
    pub fn apply(&mut self, mv: &Move) {
        debug_assert_eq!(
            self.validate(&mv.source, &mv.destination).as_ref(),
            Ok(mv),
            "applying an unvalidated move",
        );

        let (Ok(source), Ok(jumped), Ok(destination)) = (
            self.index_of(&mv.source),
            self.index_of(&mv.jumped),
            self.index_of(&mv.destination),
        ) else {
            return;
        };

        self.set(source, CellState::Empty);
        self.set(jumped, CellState::Empty);
        self.set(destination, CellState::Occupied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Layout;

    fn id(index: usize) -> CellId {
        CellId::from_index(index)
    }

    /// `a b c` in a row: a and b pegged, c empty.
    fn row_of_three() -> Board {
        Board::from_layout(Layout::parse("oo.").unwrap())
    }

    #[test]
    fn test_validate_returns_full_move() {
        let board = row_of_three();
        let mv = board.validate(&id(0), &id(2)).unwrap();
        assert_eq!(
            mv,
            Move {
                source: id(0),
                jumped: id(1),
                destination: id(2),
            }
        );
    }

    #[test]
    fn test_apply_changes_exactly_three_cells() {
        let mut board = Board::english();
        let before: Vec<_> = board.cells().collect();

        let mv = board.validate(&id(10), &id(24)).unwrap();
        board.apply(&mv);

        let after: Vec<_> = board.cells().collect();
        let changed: Vec<_> = before
            .iter()
            .zip(&after)
            .filter(|(b, a)| b != a)
            .map(|(_, a)| a.clone())
            .collect();
        assert_eq!(
            changed,
            vec![
                (id(10), CellState::Empty),
                (id(17), CellState::Empty),
                (id(24), CellState::Occupied),
            ]
        );
        assert_eq!(board.remaining_pegs(), 31);
    }

    #[test]
    fn test_validate_source_empty() {
        let board = Board::from_layout(Layout::parse(".o.").unwrap());
        assert_eq!(
            board.validate(&id(0), &id(2)),
            Err(MoveError::SourceEmpty(id(0)))
        );
    }

    #[test]
    fn test_validate_path_empty() {
        let board = Board::from_layout(Layout::parse("o..").unwrap());
        assert_eq!(
            board.validate(&id(0), &id(2)),
            Err(MoveError::PathEmpty(id(1)))
        );
    }

    #[test]
    fn test_validate_destination_occupied() {
        let board = Board::from_layout(Layout::parse("ooo").unwrap());
        assert_eq!(
            board.validate(&id(0), &id(2)),
            Err(MoveError::DestinationOccupied(id(2)))
        );
    }

    #[test]
    fn test_validate_not_collinear() {
        let board = Board::english();
        // One step away, diagonal, three steps away, and itself.
        for dest in [17, 16, 3, 10] {
            let dest = id(dest);
            assert_eq!(
                board.validate(&id(10), &dest),
                Err(MoveError::NotCollinear { from: id(10), to: dest.clone() }),
                "{dest}",
            );
        }
    }

    #[test]
    fn test_validate_through_absent_cell_is_not_collinear() {
        let board = Board::from_layout(Layout::parse("o-.").unwrap());
        assert!(matches!(
            board.validate(&id(0), &id(2)),
            Err(MoveError::NotCollinear { .. })
        ));
    }

    #[test]
    fn test_validate_unknown_cells() {
        let board = Board::english();
        assert_eq!(
            board.validate(&CellId::new("nope"), &id(24)),
            Err(MoveError::UnknownCell(CellId::new("nope")))
        );
        assert_eq!(
            board.validate(&id(10), &id(99)),
            Err(MoveError::UnknownCell(id(99)))
        );
    }

    #[test]
    fn test_collinearity_checked_before_occupancy() {
        // Source empty *and* destination not two away: geometry wins.
        let board = Board::english();
        assert!(matches!(
            board.validate(&id(24), &id(23)),
            Err(MoveError::NotCollinear { .. })
        ));
    }

    #[test]
    fn test_reverse_jump_after_apply() {
        let mut board = row_of_three();
        let mv = board.validate(&id(0), &id(2)).unwrap();
        board.apply(&mv);
        // The peg now at c cannot jump back: b was removed.
        assert_eq!(
            board.validate(&id(2), &id(0)),
            Err(MoveError::PathEmpty(id(1)))
        );
    }
}
