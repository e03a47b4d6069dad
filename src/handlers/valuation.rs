// src/handlers/valuation.rs
use warp::reply::Json;
use warp::Rejection;
use serde::Deserialize;
use std::sync::Arc;
use log::{error, info};

use crate::models::{MarketSegment, ValuationSummary};
use crate::services::fundamentals::normalize_ticker;
use crate::services::snapshot::SnapshotStore;
use crate::services::valuation::{RateOverrides, ValuationService};
use super::decode_ticker;
use super::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ValuationQuery {
    pub market: Option<String>,
    pub growth: Option<f64>,
    pub risk_free: Option<f64>,
    pub market_return: Option<f64>,
}

impl ValuationQuery {
    fn overrides(&self) -> RateOverrides {
        RateOverrides {
            growth_rate: self.growth,
            risk_free_rate: self.risk_free,
            market_return: self.market_return,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DcfQuery {
    pub ticker: String,
    pub market: Option<String>,
    pub growth: Option<f64>,
}

async fn build_summary(
    ticker: &str,
    market: &MarketSegment,
    overrides: RateOverrides,
    service: &ValuationService,
    store: &SnapshotStore,
) -> Result<ValuationSummary, Rejection> {
    let normalized = normalize_ticker(ticker, market);
    let snapshot = store.load(&normalized).await.map_err(|e| {
        error!("Failed to load fundamentals for {}: {:#}", normalized, e);
        warp::reject::custom(ApiError::upstream_error(&e))
    })?;

    let record = service.fundamentals(&snapshot.info, ticker, market);
    Ok(service.value(record, overrides))
}

pub async fn get_valuation(
    ticker: String,
    query: ValuationQuery,
    service: Arc<ValuationService>,
    store: Arc<SnapshotStore>,
) -> Result<Json, Rejection> {
    info!("Handling valuation request for {} ({:?})", ticker, query);

    let ticker = decode_ticker(&ticker)?;
    let market = MarketSegment::parse(query.market.as_deref().unwrap_or_default());
    let summary = build_summary(&ticker, &market, query.overrides(), &service, &store).await?;

    Ok(warp::reply::json(&summary))
}

pub async fn get_dcf(
    query: DcfQuery,
    service: Arc<ValuationService>,
    store: Arc<SnapshotStore>,
) -> Result<Json, Rejection> {
    info!("Handling DCF request for {}", query.ticker);

    let market = MarketSegment::parse(query.market.as_deref().unwrap_or_default());
    let overrides = RateOverrides {
        growth_rate: query.growth,
        ..Default::default()
    };
    let summary = build_summary(&query.ticker, &market, overrides, &service, &store).await?;

    Ok(warp::reply::json(&service.dcf(&summary)))
}
