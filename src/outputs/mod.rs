//! Unspent outputs
//!
//! Aggregation of unspent transaction outputs into balances, and the
//! batch-scoped cache of fetched outputs.

mod aggregate;
mod cache;

pub use aggregate::{fetch_outputs, sum_outputs};
pub use cache::OutputsCache;

/// An unspent transaction output credited to a key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnspentOutput {
    pub ecosystem: i64,

    /// Key ID the output is credited to
    pub account_id: i64,

    /// Decimal string; malformed values count as zero
    pub output_value: String,

    pub output_tx_hash: Vec<u8>,
    pub output_index: i32,
    pub block_id: i64,
}

impl UnspentOutput {
    pub fn new(ecosystem: i64, account_id: i64, output_value: impl Into<String>) -> Self {
        Self {
            ecosystem,
            account_id,
            output_value: output_value.into(),
            ..Self::default()
        }
    }
}
