//! Driver layer for schema-driven query toolkits over an embedded,
//! optionally encrypted SQLite database.
//!
//! The crate wraps a single [`rusqlite`] connection and exposes the surface a
//! generated query layer needs: statement execution with positional binding,
//! cursors over result rows, nested logical transactions mapped onto one
//! physical transaction, and version-gated schema migration driven by the
//! database's `user_version` pragma.
//!
//! # Quick Start
//!
//! ```rust
//! use sqlvault::{DatabaseConfig, Driver, Result, Schema};
//!
//! struct AppSchema;
//!
//! impl Schema for AppSchema {
//!     fn version(&self) -> i64 {
//!         1
//!     }
//!
//!     fn create(&self, driver: &Driver) -> Result<()> {
//!         driver.execute(
//!             None,
//!             "CREATE TABLE test (id INTEGER PRIMARY KEY, value TEXT)",
//!             0,
//!             None,
//!         )?;
//!         Ok(())
//!     }
//!
//!     fn upgrade(&self, _driver: &Driver, _from: i64, _to: i64) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # fn example() -> Result<()> {
//! let driver = Driver::open(DatabaseConfig::memory(), &AppSchema)?;
//!
//! driver.execute(
//!     Some(1),
//!     "INSERT INTO test (id, value) VALUES (?, ?)",
//!     2,
//!     Some(&|binder| {
//!         binder.bind_long(Some(1));
//!         binder.bind_string(Some("Alec"));
//!     }),
//! )?;
//!
//! let mut cursor = driver.execute_query(Some(2), "SELECT value FROM test", 0, None)?;
//! while cursor.next() {
//!     println!("value: {:?}", cursor.get_string(0)?);
//! }
//!
//! driver.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Transactions
//!
//! The driver models nested logical transactions over the single connection:
//! only the outermost scope issues a physical `BEGIN`/`COMMIT`/`ROLLBACK`,
//! while inner scopes are bookkeeping that defer their outcome to the outer
//! scope, mirroring SQL's lack of true nested transactions. An external
//! transacting layer owns the begin/end sequencing; [`Driver::with_transaction`]
//! offers a scoped variant that guarantees release on every exit path.

pub mod config;
mod connection;
pub mod cursor;
pub mod driver;
pub mod error;
mod migrate;
pub mod statement;
pub mod transaction;

// Re-export commonly used types
pub use config::{DatabaseConfig, DatabaseLocation, Schema};
pub use cursor::Cursor;
pub use driver::{Binder, Driver};
pub use error::{DriverError, Result};
pub use statement::{ParamBinder, Value};
pub use transaction::TransactionHandle;
