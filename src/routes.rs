// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;
use crate::handlers::{
    financials::{get_financials, FinancialsQuery},
    valuation::{get_dcf, get_valuation, DcfQuery, ValuationQuery},
};
use crate::services::snapshot::SnapshotStore;
use crate::services::valuation::ValuationService;
use log::{info, warn};

use std::convert::Infallible;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

pub const ROOT_MESSAGE: &str = "Equity valuation backend is running";

// Every failure leaves the service as a plain {"error": message} body.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = api_error.message.clone();
    } else if let Some(invalid) = err.find::<warp::reject::InvalidQuery>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = invalid.to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        warn!("Unhandled rejection: {:?}", err);
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    service: Arc<ValuationService>,
    store: Arc<SnapshotStore>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let service_filter = warp::any().map(move || service.clone());
    let store_filter = warp::any().map(move || store.clone());

    let root_route = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "message": ROOT_MESSAGE })));

    let valuation_route = warp::path!("valuation" / String)
        .and(warp::get())
        .and(warp::query::<ValuationQuery>())
        .and(service_filter.clone())
        .and(store_filter.clone())
        .and_then(get_valuation);

    let financials_route = warp::path!("financials" / String)
        .and(warp::get())
        .and(warp::query::<FinancialsQuery>())
        .and(service_filter.clone())
        .and(store_filter.clone())
        .and_then(get_financials);

    let dcf_route = warp::path!("dcf")
        .and(warp::get())
        .and(warp::query::<DcfQuery>())
        .and(service_filter.clone())
        .and(store_filter.clone())
        .and_then(get_dcf);

    info!("All routes configured successfully.");

    root_route
        .or(valuation_route)
        .or(financials_route)
        .or(dcf_route)
        .recover(handle_rejection)
}
