//! Logical transaction chain over the single physical connection.
//!
//! Only the outermost logical transaction maps to a physical
//! `BEGIN`/`COMMIT`/`ROLLBACK`; inner scopes are bookkeeping that defer
//! their outcome to the outer scope. The external transacting layer owns
//! begin/end sequencing and must end scopes in LIFO order; the stack below
//! surfaces a discipline error instead of corrupting the chain when it
//! does not.

use crate::error::{DriverError, Result};

/// Handle to one logical transaction scope.
///
/// Forms a chain through `enclosing`: the outermost scope has no enclosing
/// transaction and is the only one whose end touches the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionHandle {
    id: u64,
    enclosing: Option<u64>,
}

impl TransactionHandle {
    /// Whether this is the outermost scope of its chain.
    pub fn is_outermost(&self) -> bool {
        self.enclosing.is_none()
    }
}

/// The driver-owned chain of currently open logical transactions.
#[derive(Debug, Default)]
pub(crate) struct TransactionStack {
    next_id: u64,
    open: Vec<TransactionHandle>,
}

impl TransactionStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Opens a new scope enclosing the current one and makes it current.
    pub(crate) fn begin(&mut self) -> TransactionHandle {
        let handle = TransactionHandle {
            id: self.next_id,
            enclosing: self.open.last().map(|t| t.id),
        };
        self.next_id += 1;
        self.open.push(handle);
        handle
    }

    /// The innermost open scope, if any.
    pub(crate) fn current(&self) -> Option<TransactionHandle> {
        self.open.last().copied()
    }

    /// Closes `handle` and restores its enclosing scope as current. Fails
    /// without mutating the chain when `handle` is not the innermost open
    /// scope.
    pub(crate) fn end(&mut self, handle: TransactionHandle) -> Result<TransactionHandle> {
        match self.open.last() {
            Some(top) if *top == handle => {
                self.open.pop();
                Ok(handle)
            }
            _ => Err(DriverError::TransactionDiscipline),
        }
    }
}
