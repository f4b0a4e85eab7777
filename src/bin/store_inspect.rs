use std::path::PathBuf;

use anyhow::{Context, Result};
use askform::config;
use askform::probe::check_connection;
use askform::store::{RemoteStore, SelectQuery, StoreClient};
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Path to YAML config
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Maximum number of rows to print
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    let client = StoreClient::from_config(&cfg)?;

    match check_connection(&client, &cfg.store.collection, &cfg.store.probe_column).await {
        Ok(()) => println!("Store: reachable"),
        Err(err) => {
            println!("Store: unreachable ({})", err);
            return Ok(());
        }
    }

    let query = SelectQuery::new(&cfg.store.collection)
        .order_by(&cfg.store.order_field, true)
        .limit(args.limit);
    let rows = client
        .select(&query)
        .await
        .with_context(|| format!("failed to read {}", cfg.store.collection))?;
    println!("Collection: {} ({} rows shown)", cfg.store.collection, rows.len());
    for row in rows {
        println!("{}", serde_json::to_string_pretty(&row)?);
    }
    Ok(())
}
