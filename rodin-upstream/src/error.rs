//! Error types for the upstream crate.

/// Errors that can occur while talking to the generation API.
///
/// A non-2xx upstream status is not an error at this layer: it is returned
/// as an [`UpstreamResponse`](crate::UpstreamResponse) for the caller to relay.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UpstreamError {
    /// The configured base URL could not be parsed.
    #[error("invalid upstream base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// A multipart part could not be encoded.
    #[error("invalid multipart part '{field}': {reason}")]
    InvalidPart { field: String, reason: String },

    /// Connection, TLS, timeout or body read failure.
    #[error("upstream request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}
