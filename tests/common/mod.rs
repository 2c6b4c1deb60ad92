//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Setup test database - create ledger tables and seed test data
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let mut tx = pool.begin().await.expect("Failed to begin transaction");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS "1_keys" (
            id bigint NOT NULL,
            ecosystem bigint NOT NULL DEFAULT 1,
            account text NOT NULL,
            pub bytea NOT NULL,
            maxpay text NOT NULL DEFAULT '',
            deleted bigint NOT NULL DEFAULT 0,
            blocked bigint NOT NULL DEFAULT 0,
            PRIMARY KEY (id, ecosystem)
        )
        "#,
    )
    .execute(&mut *tx)
    .await
    .expect("Failed to create key table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS spent_info (
            input_tx_hash bytea,
            input_index int,
            output_tx_hash bytea NOT NULL,
            output_index int NOT NULL,
            output_key_id bigint NOT NULL,
            output_value decimal(30) NOT NULL,
            ecosystem bigint NOT NULL,
            block_id bigint NOT NULL
        )
        "#,
    )
    .execute(&mut *tx)
    .await
    .expect("Failed to create spent_info table");

    // Clean up DB for fresh state
    sqlx::query(r#"TRUNCATE TABLE "1_keys", spent_info"#)
        .execute(&mut *tx)
        .await
        .expect("Failed to clean up DB");

    // Seed keys: (id, ecosystem, maxpay, deleted)
    for (id, ecosystem, maxpay, deleted) in [(1i64, 1i64, "", 0i64), (2, 1, "", 1), (10, 5, "12", 0)] {
        sqlx::query(
            r#"
            INSERT INTO "1_keys" (id, ecosystem, account, pub, maxpay, deleted)
            VALUES ($1, $2, '0000-0000-0000-0000-0019', '\x0102', $3, $4)
            "#,
        )
        .bind(id)
        .bind(ecosystem)
        .bind(maxpay)
        .bind(deleted)
        .execute(&mut *tx)
        .await
        .expect("Failed to seed key");
    }

    // Seed outputs for key 10: two unspent, one spent
    for (index, value, spent) in [(0i32, "10", false), (1, "5", false), (2, "1000", true)] {
        sqlx::query(
            r#"
            INSERT INTO spent_info (input_tx_hash, output_tx_hash, output_index, output_key_id, output_value, ecosystem, block_id)
            VALUES (CASE WHEN $3 THEN '\xff'::bytea END, '\xaa', $1, 10, $2::decimal, 5, 1)
            "#,
        )
        .bind(index)
        .bind(value)
        .bind(spent)
        .execute(&mut *tx)
        .await
        .expect("Failed to seed output");
    }

    tx.commit().await.expect("Failed to commit transaction");

    pool
}
