//! Key resolver
//!
//! Loads key rows and resolves their balances from unspent outputs, reading
//! through an optional batch-scoped [`OutputsCache`].

use crate::error::LedgerResult;
use crate::key::{normalize_ecosystem, Key, CANONICAL_ECOSYSTEM};
use crate::outputs::{fetch_outputs, sum_outputs, OutputsCache, UnspentOutput};
use crate::store::LedgerStore;

/// Resolves keys against one store (one transaction)
pub struct KeyResolver<'s, S: LedgerStore + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: LedgerStore + ?Sized> KeyResolver<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Load key `id` in `ecosystem` without resolving its balance.
    pub async fn get(&mut self, ecosystem: i64, id: i64) -> LedgerResult<Option<Key>> {
        let ecosystem = normalize_ecosystem(ecosystem);
        Ok(self.store.fetch_key(ecosystem, id).await?)
    }

    // =========================================================================
    // resolve
    // =========================================================================

    /// Load key `id` in `ecosystem` and resolve its balance.
    ///
    /// Returns `Ok(None)` if the key does not exist. A key with no unspent
    /// outputs resolves to a zero balance.
    ///
    /// With a cache, outputs already fetched in this pass are summed without
    /// querying the store; a miss stores what was fetched, even when empty.
    pub async fn resolve(
        &mut self,
        ecosystem: i64,
        id: i64,
        cache: Option<&mut OutputsCache>,
    ) -> LedgerResult<Option<Key>> {
        let ecosystem = normalize_ecosystem(ecosystem);

        let Some(mut key) = self.store.fetch_key(ecosystem, id).await? else {
            tracing::debug!(ecosystem, id, "Key not found");
            return Ok(None);
        };

        let balance = match cache {
            Some(cache) => match cache.get(ecosystem, id) {
                Some(outputs) => {
                    tracing::debug!(ecosystem, id, outputs = outputs.len(), "Outputs cache hit");
                    sum_outputs(outputs, ecosystem, id)?
                }
                None => {
                    let outputs = fetch_outputs(&mut *self.store, ecosystem, &[id]).await?;
                    let balance = sum_outputs(&outputs, ecosystem, id)?;
                    cache.put(ecosystem, id, outputs);
                    balance
                }
            },
            None => {
                let outputs = fetch_outputs(&mut *self.store, ecosystem, &[id]).await?;
                sum_outputs(&outputs, ecosystem, id)?
            }
        };

        tracing::debug!(ecosystem, id, %balance, "Resolved key balance");

        key.set_balance(balance);
        Ok(Some(key))
    }

    /// Warm `cache` for several accounts with a single store query.
    ///
    /// Accounts already cached are skipped. Every other requested account
    /// gets an entry, empty if it has no outputs. Returns the number of
    /// accounts added.
    pub async fn prefetch(
        &mut self,
        ecosystem: i64,
        ids: &[i64],
        cache: &mut OutputsCache,
    ) -> LedgerResult<usize> {
        let ecosystem = normalize_ecosystem(ecosystem);

        let mut missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !cache.contains(ecosystem, *id))
            .collect();
        missing.sort_unstable();
        missing.dedup();

        if missing.is_empty() {
            return Ok(0);
        }

        let outputs = fetch_outputs(&mut *self.store, ecosystem, &missing).await?;

        let mut grouped: std::collections::HashMap<i64, Vec<UnspentOutput>> =
            missing.iter().map(|id| (*id, Vec::new())).collect();
        for output in outputs {
            if let Some(list) = grouped.get_mut(&output.account_id) {
                list.push(output);
            }
        }

        let added = grouped.len();
        for (id, list) in grouped {
            cache.put(ecosystem, id, list);
        }

        tracing::debug!(ecosystem, accounts = added, "Prefetched outputs");

        Ok(added)
    }

    /// Number of keys in the canonical ecosystem.
    pub async fn count_keys(&mut self) -> LedgerResult<i64> {
        Ok(self.store.count_keys(CANONICAL_ECOSYSTEM).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedgerStore;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_ecosystem_is_canonical() {
        let mut store = MemoryLedgerStore::new();
        store.insert_key(CANONICAL_ECOSYSTEM, Key::new(3, "", vec![]));
        store.insert_output(UnspentOutput::new(CANONICAL_ECOSYSTEM, 3, "2.5"));

        let key = tokio_test::block_on(KeyResolver::new(&mut store).resolve(0, 3, None))
            .unwrap()
            .unwrap();

        assert_eq!(key.ecosystem(), CANONICAL_ECOSYSTEM);
        assert_eq!(key.balance().map(|b| b.value()), Some(dec!(2.5)));
    }

    #[test]
    fn test_get_leaves_balance_unresolved() {
        let mut store = MemoryLedgerStore::new();
        store.insert_key(5, Key::new(1, "", vec![]));

        let key = tokio_test::block_on(KeyResolver::new(&mut store).get(5, 1))
            .unwrap()
            .unwrap();

        assert!(!key.is_resolved());
        assert_eq!(store.queries().outputs, 0);
    }

    #[test]
    fn test_prefetch_skips_cached_and_duplicates() {
        let mut store = MemoryLedgerStore::new();
        store.insert_output(UnspentOutput::new(5, 1, "1"));
        store.insert_output(UnspentOutput::new(5, 2, "2"));

        let mut cache = OutputsCache::new();
        cache.put(5, 1, Vec::new());

        let added = tokio_test::block_on(
            KeyResolver::new(&mut store).prefetch(5, &[1, 2, 2, 3], &mut cache),
        )
        .unwrap();

        assert_eq!(added, 2);
        assert_eq!(cache.get(5, 1).map(|o| o.len()), Some(0));
        assert_eq!(cache.get(5, 2).map(|o| o.len()), Some(1));
        assert_eq!(cache.get(5, 3).map(|o| o.len()), Some(0));
        assert_eq!(store.queries().outputs, 1);
    }
}
