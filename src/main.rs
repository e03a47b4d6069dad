use anyhow::Result;
use dotenv::dotenv;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use equity_valuation_api::config::AppConfig;
use equity_valuation_api::routes;
use equity_valuation_api::services::snapshot::SnapshotStore;
use equity_valuation_api::services::valuation::ValuationService;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;

    // Bind to 0.0.0.0 so the service is reachable from outside a container
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let service = Arc::new(ValuationService::from_config(&config));
    let store = Arc::new(SnapshotStore::new(config.snapshot_dir.clone()));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(service, store).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;

    Ok(())
}
