//! The board: a fixed grid of holes, their pegs, and jump adjacency.

use crate::{BoardConfig, BoardError, CellId, CellState, Direction, Layout, LayoutError};

/// One jump line out of a cell: the hole being jumped and the landing hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line {
    pub(crate) jumped: usize,
    pub(crate) landing: usize,
}

/// Where a game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// At least one legal jump remains.
    InProgress,
    /// Exactly one peg is left.
    Solved,
    /// No legal jump remains and more than one peg is left.
    Stuck,
}

/// A peg-solitaire board.
///
/// Cells live in a row-major `Vec` indexed by grid position, which is
/// also the board's canonical enumeration order. Adjacency is computed
/// once at construction: for every playable cell and every
/// [`Direction`], the jump line through the next two holes, if both are
/// playable. Because only playable cells take part, the table is
/// symmetric: if `a` can jump over `b` to `c`, then `c` can jump over
/// `b` to `a`.
///
/// After construction only occupancy changes; `lines` never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<CellState>,
    lines: Vec<[Option<Line>; 4]>,
}

impl Board {
    /// Builds a board from a layout as-is.
    pub fn from_layout(layout: Layout) -> Self {
        let (rows, columns, cells) = layout.into_parts();
        let mut board = Self {
            rows,
            columns,
            cells,
            lines: Vec::new(),
        };
        board.lines = (0..board.cells.len())
            .map(|index| Direction::ALL.map(|dir| board.compute_line(index, dir)))
            .collect();
        board
    }

    /// Builds a board from configuration: the shape's layout, then the
    /// configured starting holes emptied.
    pub fn new(config: &BoardConfig) -> Result<Self, LayoutError> {
        let mut board = Self::from_layout(config.shape.layout()?);
        for id in &config.empty {
            let index = board.index_of(id)?;
            if !board.cells[index].is_playable() {
                return Err(LayoutError::NotPlayable(id.clone()));
            }
            board.cells[index] = CellState::Empty;
        }
        Ok(board)
    }

    /// The standard opening: English board, centre hole empty.
    pub fn english() -> Self {
        let mut board = Self::from_layout(Layout::english());
        board.cells[24] = CellState::Empty;
        board
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns the state of a cell.
    ///
    /// # Errors
    /// [`BoardError::UnknownCell`] if `id` does not name a grid position.
    pub fn cell_state(&self, id: &CellId) -> Result<CellState, BoardError> {
        self.index_of(id).map(|index| self.cells[index])
    }

    /// Returns the `(jumped, destination)` pairs reachable from `id`, in
    /// [`Direction::ALL`] order.
    ///
    /// At most four pairs. Absent cells have none. The iterator is
    /// `Clone`, so it can be replayed without asking the board again.
    ///
    /// # Errors
    /// [`BoardError::UnknownCell`] if `id` does not name a grid position.
    pub fn neighbors_two_away(
        &self,
        id: &CellId,
    ) -> Result<impl Iterator<Item = (CellId, CellId)> + Clone + '_, BoardError> {
        let index = self.index_of(id)?;
        Ok(self.lines[index].iter().flatten().map(|line| {
            (CellId::from_index(line.jumped), CellId::from_index(line.landing))
        }))
    }

    /// Every cell with its state, in canonical (row-major) order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, state)| (CellId::from_index(index), *state))
    }

    /// Number of pegs on the board.
    pub fn remaining_pegs(&self) -> usize {
        self.count(CellState::Occupied)
    }

    /// Number of playable holes, with or without a peg.
    pub fn hole_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_playable()).count()
    }

    /// Returns `true` if every hole holds a peg.
    ///
    /// A full board has no legal jump; the only way forward is to take
    /// a peg out (see [`Board::clear`]).
    pub fn is_full(&self) -> bool {
        self.count(CellState::Empty) == 0
    }

    /// Solved, stuck, or still going.
    pub fn status(&self) -> GameStatus {
        if self.remaining_pegs() == 1 {
            GameStatus::Solved
        } else if self.legal_moves().is_empty() {
            GameStatus::Stuck
        } else {
            GameStatus::InProgress
        }
    }

    /// Takes the peg out of `id`, leaving an empty hole.
    ///
    /// Used once per game to pick the opening hole on a full board.
    /// Returns `false` (and changes nothing) if the cell held no peg.
    ///
    /// # Errors
    /// [`BoardError::UnknownCell`] if `id` does not name a grid position.
    pub fn clear(&mut self, id: &CellId) -> Result<bool, BoardError> {
        let index = self.index_of(id)?;
        if self.cells[index] != CellState::Occupied {
            return Ok(false);
        }
        self.cells[index] = CellState::Empty;
        Ok(true)
    }

    pub(crate) fn index_of(&self, id: &CellId) -> Result<usize, BoardError> {
        id.index()
            .filter(|index| *index < self.cells.len())
            .ok_or_else(|| BoardError::UnknownCell(id.clone()))
    }

    pub(crate) fn state_at(&self, index: usize) -> CellState {
        self.cells[index]
    }

    pub(crate) fn set(&mut self, index: usize, state: CellState) {
        self.cells[index] = state;
    }

    pub(crate) fn lines_from(&self, index: usize) -> impl Iterator<Item = Line> + '_ {
        self.lines[index].iter().flatten().copied()
    }

    fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| **c == state).count()
    }

    /// Walks two steps from `index` in `dir`. Both the jumped and the
    /// landing cell must be on the grid and playable.
    fn compute_line(&self, index: usize, dir: Direction) -> Option<Line> {
        if !self.cells[index].is_playable() {
            return None;
        }
        let jumped = self.step(index, dir)?;
        let landing = self.step(jumped, dir)?;
        if self.cells[jumped].is_playable() && self.cells[landing].is_playable() {
            Some(Line { jumped, landing })
        } else {
            None
        }
    }

    fn step(&self, index: usize, dir: Direction) -> Option<usize> {
        let (dr, dc) = dir.step();
        let row = (index / self.columns).checked_add_signed(dr)?;
        let col = (index % self.columns).checked_add_signed(dc)?;
        (row < self.rows && col < self.columns).then_some(row * self.columns + col)
    }
}
