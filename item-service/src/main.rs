//! Item service binary

use anyhow::Result;
use item_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing
    init_tracing(&config)?;

    tracing::info!(
        service = %config.service.name,
        backend = ?config.storage.backend,
        "Starting item service"
    );

    let store = ItemStore::from_config(&config.storage).await?;
    let auth = JwtAuth::new(&config.jwt)?;
    tracing::info!(
        public_routes = auth.public_routes().len(),
        "JWT authentication configured"
    );

    let state = AppState::new(config.clone(), store)?;

    Server::new(config)
        .serve(routes::router(state, auth))
        .await?;

    Ok(())
}
