//! Shared request-handling state.

use std::sync::Arc;

use rodin_upstream::UpstreamClient;

use crate::{config::GatewayConfig, guard};

/// Read-only state handed to every handler.
///
/// Both fields are behind `Arc`: cloning per request is a refcount bump and
/// nothing here is mutated after boot.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub upstream: Arc<dyn UpstreamClient>,
}

impl AppState {
    /// Build the state once at boot, warning if no key is configured.
    #[must_use]
    pub fn new(config: GatewayConfig, upstream: Arc<dyn UpstreamClient>) -> Self {
        guard::check_at_boot(&config);
        Self { config: Arc::new(config), upstream }
    }
}
