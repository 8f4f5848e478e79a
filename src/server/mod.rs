pub mod handlers;

use crate::{
    Result,
    config::Config,
    inference::HttpInferenceClient,
    relay::{RelayHandler, RelaySettings},
};
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(relay: RelayHandler, path: &str) -> Router {
    let app_state = handlers::AppState { relay };

    Router::new()
        .route(path, post(handlers::relay).options(handlers::preflight))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    // One client per process, shared by every invocation
    let client = HttpInferenceClient::new(config.endpoint.clone())?;
    info!("Relaying reviews to {}", client.url());

    let relay = RelayHandler::new(Arc::new(client), RelaySettings::from_config(&config));
    let app = router(relay, &config.server.path);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
