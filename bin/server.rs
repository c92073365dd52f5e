// FamilyBook - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use familybook::api::{create_router, AppState};
use familybook::{init_logging, AppConfig, FamilyService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let config_path = if args.len() > 2 && args[1] == "--config" {
        Some(PathBuf::from(&args[2]))
    } else {
        None
    };

    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.log_level);

    let store = config.open_store().context("Failed to open store")?;
    info!(storage = ?config.storage, "store ready");

    let state = AppState::new(Arc::new(FamilyService::new(store)));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("FamilyBook server v{} running on http://{}", familybook::VERSION, addr);
    info!("API: http://{}/api/family", addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
