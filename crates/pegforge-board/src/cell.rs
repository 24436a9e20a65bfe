//! Cell identity, occupancy, and the four jump directions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every cell identifier (`peg0`, `peg1`, …).
const PREFIX: &str = "peg";

/// A renderer-visible cell identifier.
///
/// Identifiers are `peg<index>` where `index = row * columns + col`.
/// The browser client uses them verbatim as DOM element ids, so the
/// spelling is part of the wire contract.
///
/// `#[serde(transparent)]` keeps it a bare string on the wire:
/// `CellId("peg24")` serializes as `"peg24"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    /// Wraps an arbitrary identifier. It may or may not name a real cell;
    /// the board decides that when it is looked up.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The canonical identifier for grid position `index`.
    pub fn from_index(index: usize) -> Self {
        Self(format!("{PREFIX}{index}"))
    }

    /// Parses the grid index back out of a canonical identifier.
    ///
    /// Only the canonical spelling is accepted: `peg7` is index 7, but
    /// `peg07`, `peg+7`, and `Peg7` are not identifiers at all.
    pub fn index(&self) -> Option<usize> {
        let digits = self.0.strip_prefix(PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        digits.parse().ok()
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The occupancy of one grid position.
///
/// `Absent` is fixed when the board is built: an absent cell never gains
/// a peg and a playable cell never becomes absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    /// Not part of the board shape.
    Absent,
    /// A hole with no peg in it.
    Empty,
    /// A hole holding a peg.
    Occupied,
}

impl CellState {
    /// Returns `true` for holes, whether or not they hold a peg.
    pub fn is_playable(self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// An axis direction for a jump.
///
/// [`Direction::ALL`] fixes the order in which neighbors and suggestions
/// are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Every direction, in reporting order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` step for one hole in this direction.
    pub fn step(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}
