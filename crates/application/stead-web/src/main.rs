//! stead-web binary: router assembly and startup.

mod routes;
mod table;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use stead_config::StoreConfig;
use stead_store::{DocumentStore, MemoryStore, MongoStore};

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub secure_cookies: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A configured mongo uri selects the real store; otherwise fall back
    // to the in-memory store so the app can run without infrastructure.
    let store: Arc<dyn DocumentStore> = match StoreConfig::from_env() {
        Ok(config) => {
            let store = MongoStore::connect(&config).await?;
            tracing::info!(database = %config.database, "connected to document store");
            Arc::new(store)
        }
        Err(err) => {
            tracing::warn!(%err, "document store not configured; using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let state = Arc::new(AppState {
        store,
        secure_cookies: stead_config::is_production(),
    });

    let app = Router::new()
        .merge(routes::pages::router())
        .merge(routes::health::router())
        .merge(routes::properties::router())
        .merge(routes::auth::router())
        .merge(routes::uploads::router())
        .merge(routes::mail::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind = stead_config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(%bind, "stead-web listening");
    axum::serve(listener, app).await?;
    Ok(())
}
