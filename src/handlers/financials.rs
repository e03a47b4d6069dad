// src/handlers/financials.rs
use warp::reply::Json;
use warp::Rejection;
use serde::Deserialize;
use std::sync::Arc;
use log::{error, info};

use crate::models::MarketSegment;
use crate::services::fundamentals::normalize_ticker;
use crate::services::snapshot::SnapshotStore;
use crate::services::valuation::ValuationService;
use super::decode_ticker;
use super::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct FinancialsQuery {
    pub market: Option<String>,
}

pub async fn get_financials(
    ticker: String,
    query: FinancialsQuery,
    service: Arc<ValuationService>,
    store: Arc<SnapshotStore>,
) -> Result<Json, Rejection> {
    info!("Handling financial statements request for {}", ticker);

    let ticker = decode_ticker(&ticker)?;
    let market = MarketSegment::parse(query.market.as_deref().unwrap_or_default());
    let normalized = normalize_ticker(&ticker, &market);

    let snapshot = store.load(&normalized).await.map_err(|e| {
        error!("Failed to load statements for {}: {:#}", normalized, e);
        warp::reject::custom(ApiError::upstream_error(&e))
    })?;

    let summary = service
        .financials(normalized, market, snapshot.statements)
        .map_err(|e| {
            error!("Failed to compute financial ratios: {:#}", e);
            warp::reject::custom(ApiError::new(format!("{:#}", e)))
        })?;
    Ok(warp::reply::json(&summary))
}
