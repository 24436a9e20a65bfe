//! Board shapes and the configuration a board is built from.

use serde::{Deserialize, Serialize};

use crate::{CellId, CellState, LayoutError};

/// The classic 33-hole cross.
const ENGLISH: &str = "\
--ooo--
--ooo--
ooooooo
ooooooo
ooooooo
--ooo--
--ooo--";

/// The 37-hole French board: the English cross plus the four inner corners.
const EUROPEAN: &str = "\
--ooo--
-ooooo-
ooooooo
ooooooo
ooooooo
-ooooo-
--ooo--";

/// A rectangular grid of cell states, before any pegs have moved.
///
/// Text form, one line per row:
///
/// | glyph | meaning |
/// |---|---|
/// | `' '` or `'-'` | absent (outside the shape) |
/// | `'o'` | hole with a peg |
/// | `'.'` | empty hole |
///
/// Shorter rows are padded with absent cells on the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    rows: usize,
    columns: usize,
    cells: Vec<CellState>,
}

impl Layout {
    /// The English (33-hole) board, every hole filled.
    pub fn english() -> Self {
        Self::parse(ENGLISH).expect("built-in layout is well formed")
    }

    /// The European (37-hole) board, every hole filled.
    pub fn european() -> Self {
        Self::parse(EUROPEAN).expect("built-in layout is well formed")
    }

    /// Parses a layout from its text form.
    ///
    /// Leading and trailing blank lines are ignored; blank lines in the
    /// middle are rows of absent cells.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text
            .trim_matches(|c| c == '\n' || c == '\r')
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();

        let rows = lines.len();
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if rows == 0 || columns == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = vec![CellState::Absent; rows * columns];
        for (row, line) in lines.iter().enumerate() {
            for (col, glyph) in line.chars().enumerate() {
                cells[row * columns + col] = match glyph {
                    ' ' | '-' => CellState::Absent,
                    'o' => CellState::Occupied,
                    '.' => CellState::Empty,
                    other => {
                        return Err(LayoutError::Glyph { row, col, glyph: other });
                    }
                };
            }
        }

        Ok(Self { rows, columns, cells })
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Cell states in row-major order.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Number of playable holes (empty or occupied).
    pub fn holes(&self) -> usize {
        self.cells.iter().filter(|c| c.is_playable()).count()
    }

    pub(crate) fn into_parts(self) -> (usize, usize, Vec<CellState>) {
        (self.rows, self.columns, self.cells)
    }
}

/// Which layout a table plays on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// The 33-hole cross.
    #[default]
    English,
    /// The 37-hole cross.
    European,
    /// A layout in the text form described on [`Layout`].
    Custom(String),
}

impl Shape {
    /// Builds the layout for this shape.
    pub fn layout(&self) -> Result<Layout, LayoutError> {
        match self {
            Self::English => Ok(Layout::english()),
            Self::European => Ok(Layout::european()),
            Self::Custom(text) => Layout::parse(text),
        }
    }
}

/// Everything needed to build a fresh board.
///
/// The default is the English board with the centre hole (`peg24`)
/// empty, which is the standard opening position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// The board shape.
    pub shape: Shape,

    /// Holes emptied after the layout is built. Leave this empty (with a
    /// fully-pegged layout) to let the first player click choose the
    /// opening hole.
    #[serde(default)]
    pub empty: Vec<CellId>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            shape: Shape::English,
            empty: vec![CellId::from_index(24)],
        }
    }
}

impl BoardConfig {
    /// A config with every hole of `shape` filled.
    pub fn full(shape: Shape) -> Self {
        Self { shape, empty: Vec::new() }
    }
}
