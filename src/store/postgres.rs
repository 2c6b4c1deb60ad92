//! PostgreSQL store
//!
//! Reads through a borrowed connection, normally `&mut *tx` of a transaction
//! owned by the caller. Commit and rollback stay with the caller.

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::key::Key;
use crate::outputs::UnspentOutput;

use super::{LedgerStore, StoreError};

/// Table of transaction outputs; unspent rows have no input hash.
const SPENT_INFO_TABLE: &str = "spent_info";

/// Store backed by one PostgreSQL connection or transaction
pub struct PgLedgerStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgLedgerStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore<'_> {
    async fn fetch_key(&mut self, ecosystem: i64, id: i64) -> Result<Option<Key>, StoreError> {
        let sql = format!(
            r#"
            SELECT id, account, pub, COALESCE(maxpay::text, ''), deleted, blocked
            FROM "{}"
            WHERE id = $1 AND ecosystem = $2
            LIMIT 1
            "#,
            Key::table_name()
        );

        let row: Option<(i64, String, Vec<u8>, String, i64, i64)> = sqlx::query_as(&sql)
            .bind(id)
            .bind(ecosystem)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(row.map(|(id, account, public_key, max_pay, deleted, blocked)| {
            let mut key = Key::new(id, account, public_key)
                .with_max_pay(max_pay)
                .with_flags(deleted, blocked);
            key.set_ecosystem(ecosystem);
            key
        }))
    }

    async fn fetch_unspent_outputs(
        &mut self,
        ecosystem: i64,
        account_ids: &[i64],
    ) -> Result<Vec<UnspentOutput>, StoreError> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT output_key_id, COALESCE(output_value::text, ''), output_tx_hash, output_index, block_id
            FROM "{}"
            WHERE ecosystem = $1 AND output_key_id = ANY($2) AND input_tx_hash IS NULL
            "#,
            SPENT_INFO_TABLE
        );

        let rows: Vec<(i64, String, Vec<u8>, i32, i64)> = sqlx::query_as(&sql)
            .bind(ecosystem)
            .bind(account_ids)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(account_id, output_value, output_tx_hash, output_index, block_id)| UnspentOutput {
                    ecosystem,
                    account_id,
                    output_value,
                    output_tx_hash,
                    output_index,
                    block_id,
                },
            )
            .collect())
    }

    async fn count_keys(&mut self, ecosystem: i64) -> Result<i64, StoreError> {
        let sql = format!(
            r#"SELECT count(*) FROM "{}" WHERE ecosystem = $1"#,
            Key::table_name()
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(ecosystem)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }
}
