//! Driver configuration and the caller-supplied schema contract.

use std::path::PathBuf;

use crate::{driver::Driver, error::Result};

/// Where the database lives: a named file under a directory, or process
/// memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A file-backed database persisted at `path + name`.
    File { path: PathBuf, name: String },
    /// An in-memory database that persists nothing beyond process lifetime.
    Memory,
}

impl DatabaseLocation {
    /// Resolves the on-disk path for file-backed databases.
    pub fn db_path(&self) -> Option<PathBuf> {
        match self {
            Self::File { path, name } => Some(path.join(name)),
            Self::Memory => None,
        }
    }
}

/// Configuration consumed once at driver construction.
///
/// The key and cipher are passed verbatim to the connection as pragmas and
/// are never examined; blank values are skipped entirely. Journal mode
/// selects WAL when enabled.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    location: DatabaseLocation,
    journal_mode: bool,
    key: Option<String>,
    cipher: Option<String>,
}

impl DatabaseConfig {
    /// Configuration for a database file named `name` under `path`.
    pub fn file(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            location: DatabaseLocation::File {
                path: path.into(),
                name: name.into(),
            },
            journal_mode: true,
            key: None,
            cipher: None,
        }
    }

    /// Configuration for an in-memory database.
    pub fn memory() -> Self {
        Self {
            location: DatabaseLocation::Memory,
            journal_mode: true,
            key: None,
            cipher: None,
        }
    }

    /// Enables or disables WAL journaling (enabled by default).
    pub fn journal_mode(mut self, enabled: bool) -> Self {
        self.journal_mode = enabled;
        self
    }

    /// Sets the encryption key pragma, applied verbatim when non-blank.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the cipher pragma, applied verbatim when non-blank.
    pub fn cipher(mut self, cipher: impl Into<String>) -> Self {
        self.cipher = Some(cipher.into());
        self
    }

    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    pub(crate) fn journal_mode_enabled(&self) -> bool {
        self.journal_mode
    }

    pub(crate) fn key_pragma(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub(crate) fn cipher_pragma(&self) -> Option<&str> {
        self.cipher.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Caller-supplied schema definition: a target version plus the hooks that
/// bring a database to it.
///
/// Both hooks run inside a transaction scoped by the driver; an error from
/// either rolls the transaction back, leaves the stored version untouched,
/// and fails driver construction.
pub trait Schema {
    /// The version this schema describes. Must be positive.
    fn version(&self) -> i64;

    /// Builds the schema from scratch on a version-0 database.
    fn create(&self, driver: &Driver) -> Result<()>;

    /// Evolves an existing database from `from` to `to`.
    fn upgrade(&self, driver: &Driver, from: i64, to: i64) -> Result<()>;
}
