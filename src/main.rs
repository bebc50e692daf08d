use std::sync::Arc;

use matchfit::api::routes::create_routes;
use matchfit::config::{AppConfig, DatabaseConfig, StoreBackend};
use matchfit::store::{MarketplaceStore, MemoryStore, PgStore};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn MarketplaceStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = db_config.create_pool().await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("running against the in-memory store; state is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let app = create_routes(store, &config.jwt_secret);

    let listener = TcpListener::bind(config.server_address()).await?;
    info!("MatchFit server starting on http://{}", config.server_address());
    info!(
        "Health check available at http://{}/health",
        config.server_address()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
