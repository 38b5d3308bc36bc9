//! Connection adapter over the native SQLite handle.
//!
//! Owns the single physical connection for the driver's lifetime and exposes
//! the primitives the rest of the crate needs: prepare (cached or one-shot),
//! batch execution, pragma access for the schema version, and a consuming
//! close so the handle is released exactly once.

use log::debug;
use rusqlite::{CachedStatement, Statement};

use crate::{
    config::{DatabaseConfig, DatabaseLocation},
    error::{ConnectionResultExt, DriverError, Result},
};

/// Number of prepared statements the connection keeps alive for reuse.
const STATEMENT_CACHE_CAPACITY: usize = 64;

/// Wrapper around the physical database handle.
pub(crate) struct Connection {
    inner: rusqlite::Connection,
}

impl Connection {
    /// Opens the database described by `config` and applies its pragmas.
    ///
    /// Pragma order follows the cipher contract: `cipher` must be set before
    /// `key`, and both before any other statement touches the database.
    pub(crate) fn open(config: &DatabaseConfig) -> Result<Self> {
        let inner = match config.location() {
            DatabaseLocation::Memory => rusqlite::Connection::open_in_memory(),
            DatabaseLocation::File { path, name } => rusqlite::Connection::open(path.join(name)),
        }
        .db_context("Failed to open database connection")?;
        inner.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);

        let connection = Self { inner };
        connection.apply_pragmas(config)?;
        Ok(connection)
    }

    fn apply_pragmas(&self, config: &DatabaseConfig) -> Result<()> {
        if let Some(cipher) = config.cipher_pragma() {
            self.pragma("cipher", cipher)
                .db_context("Failed to set cipher pragma")?;
        }

        if let Some(key) = config.key_pragma() {
            self.pragma("key", key)
                .db_context("Failed to set key pragma")?;
        }

        if config.journal_mode_enabled() {
            self.pragma("journal_mode", "WAL")
                .db_context("Failed to enable WAL journaling")?;
        }

        Ok(())
    }

    /// Prepares a one-shot statement, parsed fresh and discarded by the
    /// caller after use.
    pub(crate) fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
        self.inner
            .prepare(sql)
            .db_context("Failed to prepare statement")
    }

    /// Prepares a statement through the connection-owned statement cache;
    /// repeated calls with identical SQL reuse the parsed program.
    pub(crate) fn prepare_cached(&self, sql: &str) -> Result<CachedStatement<'_>> {
        self.inner
            .prepare_cached(sql)
            .db_context("Failed to prepare cached statement")
    }

    /// Executes raw SQL that returns no rows (transaction control, DDL).
    pub(crate) fn exec(&self, sql: &str) -> Result<()> {
        debug!("exec: {sql}");
        self.inner
            .execute_batch(sql)
            .db_context("Failed to execute SQL")
    }

    fn pragma(
        &self,
        name: &str,
        value: impl rusqlite::ToSql,
    ) -> rusqlite::Result<()> {
        self.inner.pragma_update(None, name, value)
    }

    /// Reads the persisted schema version, 0 if never set.
    pub(crate) fn user_version(&self) -> Result<i64> {
        self.inner
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .db_context("Failed to read schema version")
    }

    /// Persists the schema version in the database's own metadata store.
    pub(crate) fn set_user_version(&self, version: i64) -> Result<()> {
        self.pragma("user_version", version)
            .db_context("Failed to persist schema version")
    }

    /// Rowid of the most recent successful insert on this connection.
    pub(crate) fn last_insert_rowid(&self) -> i64 {
        self.inner.last_insert_rowid()
    }

    /// Closes the connection, releasing cached statements with it. Consumes
    /// the adapter so a second close is unrepresentable.
    pub(crate) fn close(self) -> Result<()> {
        self.inner
            .close()
            .map_err(|(_, e)| DriverError::connection("Failed to close database connection", e))
    }
}
