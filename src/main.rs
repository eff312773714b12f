use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use scout_similarity::api;
use scout_similarity::config::AppConfig;
use scout_similarity::service::ScoutService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::bootstrap();

    info!("Starting similar-players server");
    let data_dir = config.data_dir.clone();
    let service = tokio::task::spawn_blocking(move || ScoutService::load(&data_dir))
        .await
        .context("dataset load task panicked")?
        .context("load player dataset")?;
    let service = Arc::new(service);

    let routes = api::create_routes(service, config.static_dir.clone(), config.default_top_n);

    let addr = config.socket_addr();
    info!("Listening on http://{addr}");
    warp::serve(routes).run(addr).await;
    Ok(())
}
