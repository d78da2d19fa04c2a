//! Upstream endpoint configuration and the bearer credential.

use std::{fmt, time::Duration};

/// Base URL used when `RODIN_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://api.hyperhuman.deemos.com";

/// Upstream request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where and how long to talk to the generation API.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct UpstreamConfig {
    /// Scheme and host of the API, without a trailing slash.
    pub base_url: String,

    /// Whole-request timeout applied to every outbound call.
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Create a config for `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Upstream route paired with the body encoding it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Endpoint {
    /// `POST /rodin/generate`, JSON body.
    Generate,
    /// `POST /api/v2/rodin`, multipart body.
    V2Rodin,
}

impl Endpoint {
    /// Path component appended to the base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Generate => "/rodin/generate",
            Self::V2Rodin => "/api/v2/rodin",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Bearer secret for the generation API.
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a secret, rejecting empty or whitespace-only values.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret: String = secret.into();
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// The raw secret, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
