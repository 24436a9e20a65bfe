//! Peg-solitaire engine for Pegforge.
//!
//! This crate is pure data and pure functions: no I/O, no async, no
//! logging. Everything above it (sessions, tables, the server) calls into
//! it to answer one question: "what does this click do to the board?"
//!
//! - **Board model** ([`Board`], [`CellId`], [`CellState`]): a fixed
//!   grid of holes, their occupancy, and the two-away adjacency used
//!   for jumps.
//! - **Layouts** ([`Layout`], [`Shape`], [`BoardConfig`]): the board
//!   shape is configuration, not an assumption baked into the engine.
//! - **Jumps** ([`Move`], [`Board::validate`], [`Board::apply`]): the
//!   legality check and the only gameplay mutation.
//! - **Suggestions** ([`Board::legal_moves`]): exhaustive, deterministic
//!   enumeration of every legal jump.
//!
//! ```text
//! Session (above)  ← drives the turn state machine
//!     ↕
//! Board (this crate)  ← owns occupancy, answers legality
//! ```

mod board;
mod cell;
mod error;
mod layout;
mod moves;
mod suggest;

pub use board::{Board, GameStatus};
pub use cell::{CellId, CellState, Direction};
pub use error::{BoardError, LayoutError, MoveError};
pub use layout::{BoardConfig, Layout, Shape};
pub use moves::Move;
