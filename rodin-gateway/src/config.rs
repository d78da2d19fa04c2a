//! Gateway configuration, read once at process start.

use std::time::Duration;

use rodin_upstream::{ApiKey, UpstreamConfig, DEFAULT_BASE_URL};

/// Bind address used when `RODIN_LISTEN_ADDR` is not set.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3456";

/// Inbound body limit used when `RODIN_MAX_UPLOAD_BYTES` is not set (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    /// A boolean variable could not be parsed.
    #[error("{var} must be a boolean flag, got '{value}'")]
    InvalidFlag { var: &'static str, value: String },
}

/// Immutable process-wide settings shared by every request.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GatewayConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,

    /// Upstream base URL and timeout.
    pub upstream: UpstreamConfig,

    /// Bearer secret. `None` leaves the gateway degraded: every generation
    /// request is refused until the process restarts with a key.
    pub api_key: Option<ApiKey>,

    /// Maximum accepted inbound body size in bytes.
    pub max_upload_bytes: usize,

    /// Include the upstream error body as `details` in error envelopes.
    pub expose_upstream_details: bool,

    /// Reject requests with neither images nor a prompt before forwarding.
    pub validate_requests: bool,
}

impl GatewayConfig {
    /// Config for the given upstream and key, everything else defaulted.
    #[must_use]
    pub fn new(upstream: UpstreamConfig, api_key: Option<ApiKey>) -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_owned(),
            upstream,
            api_key,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            expose_upstream_details: false,
            validate_requests: false,
        }
    }

    /// Toggle `details` in upstream error envelopes.
    #[must_use]
    pub fn with_upstream_details(mut self, expose: bool) -> Self {
        self.expose_upstream_details = expose;
        self
    }

    /// Toggle the images-or-prompt check.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_requests = validate;
        self
    }

    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a numeric or boolean variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a numeric or boolean variable is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let base_url = get("RODIN_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let mut upstream = UpstreamConfig::new(base_url);
        if let Some(raw) = get("RODIN_TIMEOUT_SECS") {
            let secs = parse_number("RODIN_TIMEOUT_SECS", &raw)?;
            upstream = upstream.with_timeout(Duration::from_secs(secs));
        }

        let mut config = Self::new(upstream, get("RODIN_API_KEY").and_then(ApiKey::new));

        if let Some(addr) = get("RODIN_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Some(raw) = get("RODIN_MAX_UPLOAD_BYTES") {
            let bytes = parse_number("RODIN_MAX_UPLOAD_BYTES", &raw)?;
            config.max_upload_bytes = usize::try_from(bytes).map_err(|_| {
                ConfigError::InvalidNumber { var: "RODIN_MAX_UPLOAD_BYTES", value: raw.clone() }
            })?;
        }
        if let Some(raw) = get("RODIN_EXPOSE_UPSTREAM_DETAILS") {
            config.expose_upstream_details = parse_bool("RODIN_EXPOSE_UPSTREAM_DETAILS", &raw)?;
        }
        if let Some(raw) = get("RODIN_VALIDATE_REQUESTS") {
            config.validate_requests = parse_bool("RODIN_VALIDATE_REQUESTS", &raw)?;
        }

        Ok(config)
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber { var, value: raw.to_owned() }),
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    rodin_core::parse_flag(raw).ok_or_else(|| ConfigError::InvalidFlag { var, value: raw.to_owned() })
}
