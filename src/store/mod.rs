//! Ledger store
//!
//! Read access to key rows and unspent outputs. Every read of one resolution
//! goes through a single store value, which the caller binds to one database
//! transaction so the key's flags and its outputs come from the same
//! snapshot.

mod memory;
mod postgres;

pub use memory::{MemoryLedgerStore, QueryCounts};
pub use postgres::PgLedgerStore;

use async_trait::async_trait;

use crate::key::Key;
use crate::outputs::UnspentOutput;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait LedgerStore: Send {
    /// Key row `id` in `ecosystem`, with its ecosystem set.
    async fn fetch_key(&mut self, ecosystem: i64, id: i64) -> Result<Option<Key>, StoreError>;

    /// Unspent outputs of every account in `account_ids` within `ecosystem`.
    async fn fetch_unspent_outputs(
        &mut self,
        ecosystem: i64,
        account_ids: &[i64],
    ) -> Result<Vec<UnspentOutput>, StoreError>;

    /// Number of keys in `ecosystem`.
    async fn count_keys(&mut self, ecosystem: i64) -> Result<i64, StoreError>;
}
