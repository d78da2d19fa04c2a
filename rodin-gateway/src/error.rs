//! Error types for the gateway crate.
//!
//! Client-facing messages are fixed strings; the detailed cause is logged
//! where the error is raised and never serialized.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rodin_bridge::BridgeError;
use rodin_core::CoreError;
use rodin_upstream::UpstreamError;
use serde::{Deserialize, Serialize};

/// Message returned while no API key is configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "Rodin API key not configured";
/// Message returned when the inbound body cannot be decoded.
pub const INVALID_BODY_MESSAGE: &str = "Failed to process request";
/// Message returned for transport and upstream-decoding faults.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// JSON error envelope returned for every failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Errors that can occur during gateway request handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// No API key was supplied at boot.
    #[error("Rodin API key not configured")]
    NotConfigured,

    /// The inbound body could not be decoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The request is well-formed but its content is rejected.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream answered with a non-2xx status.
    #[error("Rodin API error: {status}")]
    Upstream { status: u16, details: Option<String> },

    /// The outbound call itself failed.
    #[error("upstream call failed: {0}")]
    Transport(#[from] UpstreamError),

    /// The upstream answered 2xx with a body that is not JSON.
    #[error("invalid upstream response: {0}")]
    InvalidUpstreamBody(String),
}

impl From<CoreError> for GatewayError {
    fn from(err: CoreError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<BridgeError> for GatewayError {
    fn from(err: BridgeError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl GatewayError {
    /// HTTP status sent to the client.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::NotConfigured
            | Self::InvalidBody(_)
            | Self::Transport(_)
            | Self::InvalidUpstreamBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope sent to the client.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        let (error, details) = match self {
            Self::NotConfigured => (NOT_CONFIGURED_MESSAGE.to_owned(), None),
            Self::InvalidBody(_) => (INVALID_BODY_MESSAGE.to_owned(), None),
            Self::InvalidRequest(msg) => (msg.clone(), None),
            Self::Upstream { details, .. } => (self.to_string(), details.clone()),
            Self::Transport(_) | Self::InvalidUpstreamBody(_) => (INTERNAL_MESSAGE.to_owned(), None),
        };
        ErrorEnvelope { error, details }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_status_codes_map_correctly() {
        assert_eq!(GatewayError::NotConfigured.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            GatewayError::InvalidBody("eof".to_owned()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::InvalidRequest("no prompt".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        let upstream = GatewayError::Upstream { status: 429, details: None };
        assert_eq!(upstream.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn upstream_status_is_preserved_in_response() {
        let resp = GatewayError::Upstream { status: 503, details: None }.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn upstream_envelope_encodes_status() {
        let err = GatewayError::Upstream { status: 429, details: Some("rate limited".to_owned()) };
        let envelope = err.envelope();
        assert_eq!(envelope.error, "Rodin API error: 429");
        assert_eq!(envelope.details.as_deref(), Some("rate limited"));
    }

    #[test]
    fn transport_detail_is_not_exposed() {
        let err = GatewayError::Transport(UpstreamError::Transport {
            url: "https://api.example.com/rodin/generate".to_owned(),
            reason: "connection refused".to_owned(),
        });
        let envelope = err.envelope();
        assert_eq!(envelope.error, INTERNAL_MESSAGE);
        assert!(envelope.details.is_none());
        assert!(err.to_string().contains("connection refused"), "Display keeps detail for logs");
    }

    #[test]
    fn envelope_omits_absent_details() {
        let json = match serde_json::to_string(&GatewayError::NotConfigured.envelope()) {
            Ok(s) => s,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json, r#"{"error":"Rodin API key not configured"}"#);
    }

    #[test]
    fn core_validation_error_becomes_bad_request() {
        let err = GatewayError::from(CoreError::MissingInput);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.envelope().error, "You must provide either images or a prompt");
    }
}
