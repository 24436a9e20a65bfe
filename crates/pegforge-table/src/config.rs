//! Table configuration.

use pegforge_board::BoardConfig;
use pegforge_session::SessionConfig;
use serde::{Deserialize, Serialize};

/// Default command channel size for table actors.
pub const DEFAULT_CHANNEL_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// TableConfig
// ---------------------------------------------------------------------------

/// Configuration for a table instance.
///
/// Every field has a default, so a config file only needs to name what
/// it changes:
///
/// ```
/// # use pegforge_table::TableConfig;
/// let config: TableConfig = serde_json::from_str(r#"{
///     "board": { "shape": "european", "empty": ["peg3"] },
///     "reset_when_empty": true
/// }"#).unwrap();
/// assert!(config.reset_when_empty);
/// assert!(config.session.opening_removal);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Board shape and starting holes.
    pub board: BoardConfig,

    /// Applied to every session attached to the table.
    pub session: SessionConfig,

    /// Put the starting board back when the last connection leaves.
    ///
    /// Off by default: a table keeps its position while empty, so a
    /// reconnecting player picks up where they were.
    pub reset_when_empty: bool,

    /// Capacity of the actor's command channel. Senders wait when full.
    pub channel_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            session: SessionConfig::default(),
            reset_when_empty: false,
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegforge_board::{CellId, Shape};

    #[test]
    fn test_table_config_default() {
        let config = TableConfig::default();
        assert_eq!(config.board.shape, Shape::English);
        assert_eq!(config.board.empty, vec![CellId::from_index(24)]);
        assert!(config.session.opening_removal);
        assert!(!config.reset_when_empty);
        assert_eq!(config.channel_size, DEFAULT_CHANNEL_SIZE);
    }

    #[test]
    fn test_table_config_partial_json_keeps_defaults() {
        let config: TableConfig =
            serde_json::from_str(r#"{"session": {"opening_removal": false}}"#).unwrap();
        assert!(!config.session.opening_removal);
        assert_eq!(config.board, BoardConfig::default());
        assert_eq!(config.channel_size, DEFAULT_CHANNEL_SIZE);
    }
}
