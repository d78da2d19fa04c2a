//! Upstream client abstraction trait.
//!
//! Lets the gateway swap the real HTTP adapter for a recording double
//! without touching the handler.

use async_trait::async_trait;
use bytes::Bytes;

use crate::{ApiKey, UpstreamBody, UpstreamError};

/// Raw upstream reply: status plus unparsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Bytes,
}

impl UpstreamResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, body: body.into() }
    }

    /// `true` for statuses in `200..=299`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Issues one generation request to the upstream API.
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Cancel Safety
/// Dropping the future abandons the in-flight request; no state is kept
/// between calls.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Forward `body` to the endpoint matching its encoding, authenticated
    /// with `key`.
    ///
    /// # Errors
    /// Returns [`UpstreamError::Transport`] on connection, timeout or body
    /// read failure, and [`UpstreamError::InvalidPart`] if a multipart part
    /// cannot be encoded. Upstream error statuses are returned as `Ok`.
    async fn forward(
        &self,
        key: &ApiKey,
        body: UpstreamBody,
    ) -> Result<UpstreamResponse, UpstreamError>;
}
