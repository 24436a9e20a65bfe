//! Table lifecycle management for Pegforge.
//!
//! A table is one shared board plus the connections looking at it.
//! Each table runs as an isolated Tokio task (actor model) that owns
//! its [`Board`](pegforge_board::Board) and the sessions of every
//! attached connection.
//!
//! # Key types
//!
//! - [`TableManager`]: creates tables on demand, looks them up by name
//! - [`TableHandle`]: send commands to a running table actor
//! - [`TableInfo`]: status, peg count, and who is attached
//! - [`TableConfig`]: board, session, and channel settings

mod config;
mod error;
mod manager;
mod table;

pub use config::{DEFAULT_CHANNEL_SIZE, TableConfig};
pub use error::TableError;
pub use manager::TableManager;
pub use table::{TableHandle, TableInfo};
