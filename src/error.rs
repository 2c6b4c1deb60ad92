//! Error handling module
//!
//! Centralized error types for balance resolution.

use crate::store::StoreError;

/// Library-wide Result type
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger error types
///
/// A missing key is not an error (resolvers return `Ok(None)`), and malformed
/// output values or payment caps are absorbed where they are read.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The store read failed; propagated untouched, never retried here
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Output values for one account cannot be summed exactly in a decimal
    #[error("Balance overflow for account {account_id} in ecosystem {ecosystem}")]
    Overflow { ecosystem: i64, account_id: i64 },
}

impl LedgerError {
    /// Check if this error came from the storage layer
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
