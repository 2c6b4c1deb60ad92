//! Outputs cache
//!
//! Raw unspent outputs already fetched during one processing pass (one
//! block), keyed by `(ecosystem, account_id)`. The ledger is treated as a
//! fixed snapshot for the lifetime of the pass, so entries are never
//! invalidated; the cache is dropped with the pass.
//!
//! There is no interior mutability: sharing one cache between tasks needs an
//! external lock held across each `get`/`put` pair.

use std::collections::HashMap;

use super::UnspentOutput;

#[derive(Debug, Default)]
pub struct OutputsCache {
    entries: HashMap<(i64, i64), Vec<UnspentOutput>>,
}

impl OutputsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outputs for the account, if it was fetched in this pass.
    /// An empty slice means "fetched, has no outputs".
    pub fn get(&self, ecosystem: i64, account_id: i64) -> Option<&[UnspentOutput]> {
        self.entries
            .get(&(ecosystem, account_id))
            .map(Vec::as_slice)
    }

    pub fn put(&mut self, ecosystem: i64, account_id: i64, outputs: Vec<UnspentOutput>) {
        self.entries.insert((ecosystem, account_id), outputs);
    }

    pub fn contains(&self, ecosystem: i64, account_id: i64) -> bool {
        self.entries.contains_key(&(ecosystem, account_id))
    }

    /// Number of cached accounts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
