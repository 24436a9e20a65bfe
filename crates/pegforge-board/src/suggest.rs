//! Exhaustive enumeration of legal jumps.

use crate::{Board, CellId, CellState, Move};

impl Board {
    /// Lists every legal move on the board.
    ///
    /// Pegs are visited in canonical (row-major) order and, for each peg,
    /// directions in [`Direction::ALL`](crate::Direction::ALL) order, so
    /// the same board always yields the same sequence. Every candidate
    /// goes through [`Board::validate`]; nothing is ranked or pruned.
    ///
    /// An empty result means the game is over, not that something failed.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for index in 0..self.rows() * self.columns() {
            if self.state_at(index) != CellState::Occupied {
                continue;
            }
            let source = CellId::from_index(index);
            for line in self.lines_from(index) {
                if let Ok(mv) = self.validate(&source, &CellId::from_index(line.landing)) {
                    moves.push(mv);
                }
            }
        }
        moves
    }
}
