//! Parameter binding and prepared-statement identity.
//!
//! Statements executed repeatedly from the same call site carry an integer
//! fingerprint; the registry below decides whether such a statement is served
//! from the connection-owned statement cache or prepared fresh and discarded.

use std::{cell::RefCell, collections::HashMap};

use log::warn;
use rusqlite::{
    types::{self, ToSqlOutput, ValueRef},
    ToSql,
};

/// A strongly typed SQL value crossing the driver boundary in either
/// direction: bound as a positional parameter, or read back from a result
/// column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// The value as a 64-bit integer. A REAL-backed value is truncated
    /// toward zero; non-numeric values yield `None`.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// The value as a double, widening INTEGER storage where needed.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) => Some(b),
            _ => None,
        }
    }
}

impl From<types::Value> for Value {
    fn from(value: types::Value) -> Self {
        match value {
            types::Value::Null => Self::Null,
            types::Value::Integer(i) => Self::Integer(i),
            types::Value::Real(f) => Self::Real(f),
            types::Value::Text(s) => Self::Text(s),
            types::Value::Blob(b) => Self::Blob(b),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(types::Value::Null),
            Self::Integer(i) => ToSqlOutput::Owned(types::Value::Integer(*i)),
            Self::Real(f) => ToSqlOutput::Owned(types::Value::Real(*f)),
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Self::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

/// Collects positional statement parameters in bind-call order.
///
/// The order of bind calls defines positional index 1..N, matching SQL
/// placeholder convention; `None` binds SQL NULL.
#[derive(Debug, Default)]
pub struct ParamBinder {
    values: Vec<Value>,
}

impl ParamBinder {
    pub(crate) fn with_capacity(parameters: usize) -> Self {
        Self {
            values: Vec::with_capacity(parameters),
        }
    }

    /// Binds a 64-bit integer. SQLite stores integers natively, so the full
    /// `i64` range round-trips exactly; there is no floating-point precision
    /// boundary on this path.
    pub fn bind_long(&mut self, value: Option<i64>) {
        self.values.push(match value {
            Some(v) => Value::Integer(v),
            None => Value::Null,
        });
    }

    /// Binds a double-precision float.
    pub fn bind_double(&mut self, value: Option<f64>) {
        self.values.push(match value {
            Some(v) => Value::Real(v),
            None => Value::Null,
        });
    }

    /// Binds text.
    pub fn bind_string(&mut self, value: Option<&str>) {
        self.values.push(match value {
            Some(v) => Value::Text(v.to_owned()),
            None => Value::Null,
        });
    }

    /// Binds a binary blob.
    pub fn bind_bytes(&mut self, value: Option<&[u8]>) {
        self.values.push(match value {
            Some(v) => Value::Blob(v.to_vec()),
            None => Value::Null,
        });
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Tracks which call-site fingerprints have been seen, and with what SQL.
///
/// Entries live for the driver's lifetime. The actual parsed statements are
/// owned by the connection's statement cache, which is the only place a live
/// statement handle can reside; the registry's job is the policy decision
/// and the caller-contract check that a fingerprint is never reused for
/// different SQL text.
#[derive(Debug, Default)]
pub(crate) struct StatementRegistry {
    seen: RefCell<HashMap<i32, String>>,
}

impl StatementRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records the fingerprint/SQL pairing and reports whether the statement
    /// should be served from the connection's statement cache. Statements
    /// without a fingerprint are never cached.
    pub(crate) fn register(&self, fingerprint: Option<i32>, sql: &str) -> bool {
        let Some(fingerprint) = fingerprint else {
            return false;
        };

        let mut seen = self.seen.borrow_mut();
        match seen.get(&fingerprint) {
            Some(known) if known == sql => {}
            Some(known) => {
                // Caller contract: two call sites must never share a
                // fingerprint. Re-key rather than serve the stale program.
                warn!(
                    "fingerprint {fingerprint} reused with different SQL \
                     (was: {known}; now: {sql})"
                );
                seen.insert(fingerprint, sql.to_owned());
            }
            None => {
                seen.insert(fingerprint, sql.to_owned());
            }
        }
        true
    }
}
