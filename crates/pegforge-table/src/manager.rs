//! Table manager: creates, tracks, and hands out tables by name.

use std::collections::HashMap;

use crate::table::spawn_table;
use crate::{TableConfig, TableError, TableHandle, TableInfo};

/// Manages all active tables.
///
/// This is the entry point for table operations from the server's
/// connection handlers. Tables are created lazily the first time a
/// connection asks for them by name, and the ones without their own
/// config are reaped again once their last connection leaves.
pub struct TableManager {
    /// Active tables, keyed by name.
    tables: HashMap<String, TableHandle>,

    /// Config for tables with no override.
    default_config: TableConfig,

    /// Per-table overrides, applied when the table is created.
    overrides: HashMap<String, TableConfig>,
}

impl TableManager {
    /// Creates a new, empty table manager.
    pub fn new(default_config: TableConfig) -> Self {
        Self {
            tables: HashMap::new(),
            default_config,
            overrides: HashMap::new(),
        }
    }

    /// Sets the config a named table will be created with.
    ///
    /// Has no effect on a table that is already running.
    pub fn configure(&mut self, name: impl Into<String>, config: TableConfig) {
        self.overrides.insert(name.into(), config);
    }

    /// The config a table called `name` gets when created.
    pub fn config_for(&self, name: &str) -> &TableConfig {
        self.overrides.get(name).unwrap_or(&self.default_config)
    }

    /// Returns the running table called `name`, starting it if needed.
    ///
    /// A table whose actor has stopped is replaced by a fresh one.
    ///
    /// # Errors
    /// Returns [`TableError::Layout`] if the table's board config is
    /// invalid.
    pub fn get_or_create(&mut self, name: &str) -> Result<TableHandle, TableError> {
        if let Some(handle) = self.tables.get(name) {
            if !handle.is_closed() {
                return Ok(handle.clone());
            }
            tracing::debug!(table = %name, "table actor gone, restarting");
        }

        let handle = spawn_table(name, self.config_for(name))?;
        self.tables.insert(name.to_owned(), handle.clone());
        tracing::info!(table = %name, "table created");
        Ok(handle)
    }

    /// Returns the table called `name` if it is running.
    pub fn get(&self, name: &str) -> Option<TableHandle> {
        self.tables
            .get(name)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    /// Shuts down a table and forgets it.
    pub async fn destroy(&mut self, name: &str) -> Result<(), TableError> {
        let handle = self
            .tables
            .remove(name)
            .ok_or_else(|| TableError::Unavailable(name.to_owned()))?;

        let _ = handle.shutdown().await;

        tracing::info!(table = %name, "table destroyed");
        Ok(())
    }

    /// Shuts down and forgets `name` once nobody is attached to it.
    ///
    /// Only tables created on demand are reaped; a table with its own
    /// config (see [`configure`](Self::configure)) keeps its board for
    /// the next visitor. Returns `true` if the table was removed.
    pub async fn reap_if_idle(&mut self, name: &str) -> bool {
        if self.overrides.contains_key(name) {
            return false;
        }
        let Some(handle) = self.tables.get(name) else {
            return false;
        };

        // An error means the actor is already gone.
        if let Ok(false) = handle.close_if_empty().await {
            return false;
        }
        self.tables.remove(name);
        tracing::info!(table = %name, tables = self.tables.len(), "idle table reaped");
        true
    }

    /// Queries every table for its info.
    ///
    /// Tables that fail to respond (e.g., shutting down) are silently
    /// skipped.
    pub async fn list_tables(&self) -> Vec<TableInfo> {
        let mut infos = Vec::with_capacity(self.tables.len());
        for handle in self.tables.values() {
            if let Ok(info) = handle.info().await {
                infos.push(info);
            }
        }
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Returns the number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}
