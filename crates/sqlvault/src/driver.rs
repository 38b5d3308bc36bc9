//! The driver: statement execution, queries, and transaction control over
//! one connection.

use std::cell::RefCell;

use log::debug;
use rusqlite::params_from_iter;

use crate::{
    config::{DatabaseConfig, Schema},
    connection::Connection,
    cursor::Cursor,
    error::{ConnectionResultExt, DriverError, Result},
    statement::{ParamBinder, StatementRegistry, Value},
    transaction::{TransactionHandle, TransactionStack},
};

/// Optional closure applying positional parameters to a statement.
pub type Binder<'a> = &'a dyn Fn(&mut ParamBinder);

/// Driver over a single embedded database connection.
///
/// Exclusively owns the physical connection; access must be single-threaded
/// or externally serialized. Statements execute in call order.
pub struct Driver {
    connection: Connection,
    statements: StatementRegistry,
    transactions: RefCell<TransactionStack>,
}

impl Driver {
    /// Opens (or creates) the configured database, applies its pragmas, and
    /// migrates it to `schema`'s version.
    ///
    /// Migration runs the schema's `create` hook on a fresh database and its
    /// `upgrade` hook on an outdated one, each inside a transaction; a hook
    /// failure rolls back, leaves the stored version untouched, and fails
    /// construction.
    pub fn open(config: DatabaseConfig, schema: &dyn Schema) -> Result<Self> {
        let connection = Connection::open(&config)?;
        let driver = Self {
            connection,
            statements: StatementRegistry::new(),
            transactions: RefCell::new(TransactionStack::new()),
        };
        driver.migrate_if_needed(schema)?;
        Ok(driver)
    }

    /// Executes a statement that returns no rows, yielding the number of
    /// rows affected.
    ///
    /// `fingerprint` identifies the call site: fingerprinted statements are
    /// parsed once and reused for the driver's lifetime, unfingerprinted
    /// ones are parsed fresh and discarded. `parameters` is the placeholder
    /// count the binder will fill, in bind-call order.
    pub fn execute(
        &self,
        fingerprint: Option<i32>,
        sql: &str,
        parameters: usize,
        binder: Option<Binder<'_>>,
    ) -> Result<usize> {
        let values = Self::collect_params(parameters, binder);
        if self.statements.register(fingerprint, sql) {
            let mut statement = self.connection.prepare_cached(sql)?;
            Self::run_statement(&mut statement, &values)
        } else {
            let mut statement = self.connection.prepare(sql)?;
            Self::run_statement(&mut statement, &values)
        }
    }

    /// Executes a query and returns a cursor over its result rows.
    ///
    /// Fingerprint semantics match [`execute`](Self::execute). The statement
    /// is fully stepped before the cursor is handed out, so a cached
    /// statement is never aliased by an open cursor.
    pub fn execute_query(
        &self,
        fingerprint: Option<i32>,
        sql: &str,
        parameters: usize,
        binder: Option<Binder<'_>>,
    ) -> Result<Cursor> {
        let values = Self::collect_params(parameters, binder);
        if self.statements.register(fingerprint, sql) {
            let mut statement = self.connection.prepare_cached(sql)?;
            Self::query_statement(&mut statement, &values)
        } else {
            let mut statement = self.connection.prepare(sql)?;
            Self::query_statement(&mut statement, &values)
        }
    }

    /// Opens a new logical transaction enclosing the current one.
    ///
    /// Only the outermost scope issues a physical `BEGIN`; nested scopes are
    /// bookkeeping. The returned handle must be passed to
    /// [`end_transaction`](Self::end_transaction) exactly once, innermost
    /// first.
    pub fn new_transaction(&self) -> Result<TransactionHandle> {
        let handle = self.transactions.borrow_mut().begin();
        if handle.is_outermost() {
            debug!("physical transaction begin");
            if let Err(e) = self.connection.exec("BEGIN TRANSACTION") {
                // Physical begin failed; retract the scope so the driver
                // stays usable.
                let _ = self.transactions.borrow_mut().end(handle);
                return Err(e);
            }
        }
        Ok(handle)
    }

    /// The innermost open logical transaction, if any.
    pub fn current_transaction(&self) -> Option<TransactionHandle> {
        self.transactions.borrow().current()
    }

    /// Ends a logical transaction.
    ///
    /// The outermost scope commits on `successful` and rolls back otherwise;
    /// nested scopes resolve without touching the connection, deferring
    /// their outcome to the outer scope. The current-transaction pointer is
    /// restored even when the physical commit or rollback fails. Ending a
    /// scope that is not the innermost open one fails with
    /// [`DriverError::TransactionDiscipline`] and leaves the chain intact.
    pub fn end_transaction(&self, handle: TransactionHandle, successful: bool) -> Result<()> {
        let ended = self.transactions.borrow_mut().end(handle)?;
        if ended.is_outermost() {
            debug!("physical transaction end (successful: {successful})");
            if successful {
                self.connection.exec("END TRANSACTION")?;
            } else {
                self.connection.exec("ROLLBACK TRANSACTION")?;
            }
        }
        Ok(())
    }

    /// Runs `body` inside a transaction scope, committing on `Ok` and
    /// rolling back on `Err`, including when `body` returns early with `?`.
    ///
    /// If the rollback issued for a failed body itself fails, both causes
    /// are surfaced together as [`DriverError::RollbackFailure`].
    pub fn with_transaction<T>(&self, body: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let txn = self.new_transaction()?;
        match body(self) {
            Ok(value) => {
                self.end_transaction(txn, true)?;
                Ok(value)
            }
            Err(cause) => match self.end_transaction(txn, false) {
                Ok(()) => Err(cause),
                Err(rollback) => Err(DriverError::RollbackFailure {
                    source: Box::new(cause),
                    rollback: Box::new(rollback),
                }),
            },
        }
    }

    /// The schema version persisted in the database, 0 if never set.
    pub fn version(&self) -> Result<i64> {
        self.connection.user_version()
    }

    pub(crate) fn set_version(&self, version: i64) -> Result<()> {
        self.connection.set_user_version(version)
    }

    /// Rowid of the most recent successful insert.
    pub fn last_insert_rowid(&self) -> i64 {
        self.connection.last_insert_rowid()
    }

    /// Closes the driver and its connection. Consuming `self` makes a
    /// double close unrepresentable; outstanding cursors own their rows and
    /// remain readable but detached.
    pub fn close(self) -> Result<()> {
        self.connection.close()
    }

    fn collect_params(parameters: usize, binder: Option<Binder<'_>>) -> Vec<Value> {
        let mut collected = ParamBinder::with_capacity(parameters);
        if let Some(binder) = binder {
            binder(&mut collected);
        }
        collected.into_values()
    }

    fn run_statement(statement: &mut rusqlite::Statement<'_>, values: &[Value]) -> Result<usize> {
        statement
            .execute(params_from_iter(values.iter()))
            .db_context("Failed to execute statement")
    }

    fn query_statement(statement: &mut rusqlite::Statement<'_>, values: &[Value]) -> Result<Cursor> {
        let columns: Vec<String> = statement
            .column_names()
            .iter()
            .map(|name| (*name).to_string())
            .collect();
        let column_count = statement.column_count();

        let mut rows = statement
            .query(params_from_iter(values.iter()))
            .db_context("Failed to run query")?;

        let mut buffered = Vec::new();
        while let Some(row) = rows.next().db_context("Failed to step query")? {
            let mut record = Vec::with_capacity(column_count);
            for index in 0..column_count {
                let value: rusqlite::types::Value =
                    row.get(index).db_context("Failed to read column")?;
                record.push(Value::from(value));
            }
            buffered.push(record);
        }

        Ok(Cursor::new(columns, buffered))
    }
}
