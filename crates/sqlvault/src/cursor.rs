//! Forward-only cursor over a query's result rows.

use crate::{
    error::{DriverError, Result},
    statement::Value,
};

/// Stateful, forward-only iterator over result rows with typed positional
/// accessors.
///
/// A cursor starts before the first row; every accessor requires a current
/// row, so calling one before the first [`next`](Self::next) or after
/// exhaustion fails with [`DriverError::NoRow`]. The cursor owns its rows
/// outright and never touches the connection again, so it cannot observe a
/// driver that has since been closed.
#[derive(Debug)]
pub struct Cursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
    closed: bool,
}

impl Cursor {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
            current: None,
            closed: false,
        }
    }

    /// Advances to the next row. Returns `false` once the result set is
    /// exhausted (or the cursor was closed); the cursor then has no current
    /// row.
    pub fn next(&mut self) -> bool {
        if self.closed {
            self.current = None;
            return false;
        }
        self.current = self.rows.next();
        self.current.is_some()
    }

    /// Column names of the result set, in positional order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn value(&self, index: usize) -> Result<&Value> {
        self.current
            .as_ref()
            .and_then(|row| row.get(index))
            .ok_or(DriverError::NoRow)
    }

    /// Text content of the column, `None` for NULL or non-text storage.
    pub fn get_string(&self, index: usize) -> Result<Option<&str>> {
        Ok(self.value(index)?.as_str())
    }

    /// Integer content of the column; REAL storage truncates toward zero.
    /// `None` for NULL or non-numeric storage.
    pub fn get_long(&self, index: usize) -> Result<Option<i64>> {
        Ok(self.value(index)?.as_long())
    }

    /// Float content of the column, widening INTEGER storage. `None` for
    /// NULL or non-numeric storage.
    pub fn get_double(&self, index: usize) -> Result<Option<f64>> {
        Ok(self.value(index)?.as_double())
    }

    /// Blob content of the column, `None` for NULL or non-blob storage.
    pub fn get_bytes(&self, index: usize) -> Result<Option<&[u8]>> {
        Ok(self.value(index)?.as_bytes())
    }

    /// Releases the remaining rows. Safe to call multiple times; iteration
    /// and accessors after close behave as exhausted.
    pub fn close(&mut self) {
        self.closed = true;
        self.current = None;
        self.rows = Vec::new().into_iter();
    }
}
