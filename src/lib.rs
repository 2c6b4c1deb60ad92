//! keyledger Library
//!
//! Account balance resolution over a UTXO-style ledger: key rows, unspent
//! output aggregation and the batch-scoped outputs cache.

pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod key;
pub mod outputs;
pub mod resolver;
pub mod store;

pub use config::Config;
pub use domain::{AddressDecoder, AmountError, Balance, ChecksumAddress};
pub use error::{LedgerError, LedgerResult};
pub use key::{key_table_name, Key, CANONICAL_ECOSYSTEM};
pub use outputs::{OutputsCache, UnspentOutput};
pub use resolver::KeyResolver;
pub use store::{LedgerStore, MemoryLedgerStore, PgLedgerStore, StoreError};
