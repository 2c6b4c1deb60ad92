//! keyledger - key balance report
//!
//! Prints the number of keys in the canonical ecosystem and, optionally,
//! the resolved balance of one key.
//!
//! Run with: cargo run -- --ecosystem 1 --account 42

use keyledger::config::LogFormat;
use keyledger::domain::key_id_to_address;
use keyledger::{
    db, Balance, ChecksumAddress, Config, Key, KeyResolver, OutputsCache, PgLedgerStore,
};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
fn init_tracing(config: &Config) {
    let default_filter = if config.is_production() {
        "keyledger=info"
    } else {
        "keyledger=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// JSON view of a resolved key
#[derive(Debug, Serialize)]
struct KeySummary<'a> {
    ecosystem: i64,
    id: i64,
    account: &'a str,
    address: String,
    public_key: String,
    balance: Option<Balance>,
    capable_amount: Option<Decimal>,
    max_pay: Option<Decimal>,
    disabled: bool,
}

impl<'a> KeySummary<'a> {
    fn new(key: &'a Key) -> Self {
        Self {
            ecosystem: key.ecosystem(),
            id: key.id,
            account: &key.account,
            address: key_id_to_address(key.account_key_id(&ChecksumAddress)),
            public_key: hex::encode(&key.public_key),
            balance: key.balance(),
            capable_amount: key.try_capable_amount(),
            max_pay: key.max_pay_limit(),
            disabled: key.disabled(),
        }
    }
}

/// Value following `flag` on the command line
fn arg_value(args: &[String], flag: &str) -> Option<i64> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config);

    let args: Vec<String> = std::env::args().collect();
    let ecosystem = arg_value(&args, "--ecosystem").unwrap_or(keyledger::CANONICAL_ECOSYSTEM);
    let account = arg_value(&args, "--account");

    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    db::verify_connection(&pool).await?;
    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    // One transaction so the key row and its outputs share a snapshot
    let mut tx = pool.begin().await?;
    let mut store = PgLedgerStore::new(&mut tx);
    let mut resolver = KeyResolver::new(&mut store);

    let key_count = resolver.count_keys().await?;
    println!("Keys in ecosystem {}: {}", keyledger::CANONICAL_ECOSYSTEM, key_count);

    if let Some(id) = account {
        let mut cache = OutputsCache::new();
        match resolver.resolve(ecosystem, id, Some(&mut cache)).await? {
            Some(key) => {
                let summary = KeySummary::new(&key);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            None => println!("Key {} not found in ecosystem {}", id, ecosystem),
        }
    }

    tx.rollback().await?;
    pool.close().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyledger::{MemoryLedgerStore, UnspentOutput};

    #[test]
    fn test_key_summary_json() {
        let mut store = MemoryLedgerStore::new();
        store.insert_key(5, Key::new(1, "0000-0000-0000-0000-0019", vec![0xab]).with_max_pay("12"));
        store.insert_output(UnspentOutput::new(5, 1, "10.5"));
        store.insert_output(UnspentOutput::new(5, 1, "4.5"));

        let key = tokio_test::block_on(KeyResolver::new(&mut store).resolve(5, 1, None))
            .unwrap()
            .unwrap();
        let json = serde_json::to_value(KeySummary::new(&key)).unwrap();

        assert_eq!(json["balance"], "15.0");
        assert_eq!(json["capable_amount"], "12");
        assert_eq!(json["address"], "0000-0000-0000-0000-0019");
        assert_eq!(json["public_key"], "ab");
        assert_eq!(json["disabled"], false);
    }
}
