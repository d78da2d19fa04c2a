//! Credential guard: fail closed when no API key is configured.

use rodin_upstream::ApiKey;

use crate::{config::GatewayConfig, error::GatewayError};

/// Emit the boot-time warning for a missing key. Call once at startup.
///
/// Returns `true` when a key is configured.
pub fn check_at_boot(config: &GatewayConfig) -> bool {
    if config.api_key.is_none() {
        tracing::warn!("RODIN_API_KEY not found in environment; generation requests will be refused");
        return false;
    }
    true
}

/// Borrow the configured key, or refuse the request.
///
/// # Errors
/// Returns [`GatewayError::NotConfigured`] when the process started without
/// a key.
pub fn require_credential(config: &GatewayConfig) -> Result<&ApiKey, GatewayError> {
    config.api_key.as_ref().ok_or_else(|| {
        tracing::error!("refusing generation request: Rodin API key not configured");
        GatewayError::NotConfigured
    })
}
