//! Per-connection turn state for Pegforge.
//!
//! This crate handles what a single click means:
//!
//! 1. **Turn state**: a two-click cycle per connection ([`Session`],
//!    [`Phase`])
//! 2. **Roles**: one mover per table, everyone else spectates ([`Role`])
//! 3. **Tracking**: who is attached to a table ([`SessionManager`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Table Layer (above)  ← owns the board, runs sessions one message at a time
//!     ↕
//! Session Layer (this crate)  ← turn state machine
//!     ↕
//! Board + Protocol (below)  ← game rules, message types
//! ```

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Phase, Role, Session, SessionConfig};
