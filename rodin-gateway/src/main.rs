//! Entry point for the `rodin-gateway` HTTP server.

use std::sync::Arc;

use rodin_gateway::{config::GatewayConfig, routes::create_router, state::AppState};
use rodin_upstream::HttpUpstream;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match GatewayConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let upstream = match HttpUpstream::new(&config.upstream) {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, "failed to build upstream client");
            std::process::exit(1);
        }
    };

    let addr = config.listen_addr.clone();
    let upstream_url = config.upstream.base_url.clone();
    let app = create_router(AppState::new(config, Arc::new(upstream)));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, upstream = %upstream_url, "rodin-gateway listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
