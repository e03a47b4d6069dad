// src/bin/value_snapshot.rs
use anyhow::{Context, Result};
use dotenv::dotenv;
use log::{error, info};
use std::env;

use equity_valuation_api::config::AppConfig;
use equity_valuation_api::models::MarketSegment;
use equity_valuation_api::services::fundamentals::normalize_ticker;
use equity_valuation_api::services::snapshot::SnapshotStore;
use equity_valuation_api::services::valuation::{RateOverrides, ValuationService};

// Usage: value_snapshot <TICKER> [MARKET] [GROWTH]
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let mut args = env::args().skip(1);
    let ticker = args.next().context("usage: value_snapshot <TICKER> [MARKET] [GROWTH]")?;
    let market = MarketSegment::parse(&args.next().unwrap_or_default());
    let growth_rate = args
        .next()
        .map(|raw| raw.parse::<f64>().with_context(|| format!("GROWTH must be a number, got '{}'", raw)))
        .transpose()?;

    let config = AppConfig::from_env()?;
    let service = ValuationService::from_config(&config);
    let store = SnapshotStore::new(config.snapshot_dir.clone());

    let normalized = normalize_ticker(&ticker, &market);
    info!("Valuing snapshot for {} from {}", normalized, store.root().display());

    let snapshot = match store.load(&normalized).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("ERROR: {:#}", e);
            return Err(e);
        }
    };

    let record = service.fundamentals(&snapshot.info, &ticker, &market);
    let valuation = service.value(
        record,
        RateOverrides {
            growth_rate,
            ..Default::default()
        },
    );
    let financials = service.financials(normalized, market, snapshot.statements)?;

    println!("{}", serde_json::to_string_pretty(&valuation)?);
    println!("{}", serde_json::to_string_pretty(&financials)?);
    Ok(())
}
