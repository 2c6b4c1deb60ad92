//! In-memory store
//!
//! Holds key rows and unspent outputs in plain collections and counts the
//! queries it serves. Used by tests and offline tooling.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::key::Key;
use crate::outputs::UnspentOutput;

use super::{LedgerStore, StoreError};

/// Queries served by a [`MemoryLedgerStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryCounts {
    pub keys: usize,
    pub outputs: usize,
    pub counts: usize,
}

#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    keys: HashMap<(i64, i64), Key>,
    outputs: Vec<UnspentOutput>,
    queries: QueryCounts,
    failure: Option<String>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key row in `ecosystem`.
    pub fn insert_key(&mut self, ecosystem: i64, mut key: Key) -> &mut Self {
        key.set_ecosystem(ecosystem);
        self.keys.insert((ecosystem, key.id), key);
        self
    }

    pub fn insert_output(&mut self, output: UnspentOutput) -> &mut Self {
        self.outputs.push(output);
        self
    }

    /// Make every following query fail with `StoreError::Unavailable`.
    pub fn fail_with(&mut self, message: impl Into<String>) -> &mut Self {
        self.failure = Some(message.into());
        self
    }

    pub fn queries(&self) -> QueryCounts {
        self.queries
    }

    fn check_available(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn fetch_key(&mut self, ecosystem: i64, id: i64) -> Result<Option<Key>, StoreError> {
        self.queries.keys += 1;
        self.check_available()?;
        Ok(self.keys.get(&(ecosystem, id)).cloned())
    }

    async fn fetch_unspent_outputs(
        &mut self,
        ecosystem: i64,
        account_ids: &[i64],
    ) -> Result<Vec<UnspentOutput>, StoreError> {
        self.queries.outputs += 1;
        self.check_available()?;
        Ok(self
            .outputs
            .iter()
            .filter(|o| o.ecosystem == ecosystem && account_ids.contains(&o.account_id))
            .cloned()
            .collect())
    }

    async fn count_keys(&mut self, ecosystem: i64) -> Result<i64, StoreError> {
        self.queries.counts += 1;
        self.check_available()?;
        Ok(self.keys.keys().filter(|(eco, _)| *eco == ecosystem).count() as i64)
    }
}
