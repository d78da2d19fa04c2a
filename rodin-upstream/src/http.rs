//! `reqwest`-backed [`UpstreamClient`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::{
    body::{FieldValue, FormPayload},
    ApiKey, Endpoint, UpstreamBody, UpstreamClient, UpstreamConfig, UpstreamError,
    UpstreamResponse,
};

/// Forwards generation requests to the Rodin API over HTTPS.
///
/// The inner `reqwest::Client` pools connections and is cheap to share.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUpstream {
    /// Build an adapter for the given config.
    ///
    /// # Errors
    /// Returns [`UpstreamError::InvalidBaseUrl`] if the base URL is not an
    /// absolute `http`/`https` URL, or [`UpstreamError::ClientBuild`] if the
    /// TLS backend cannot be initialised.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let parsed = reqwest::Url::parse(&config.base_url).map_err(|e| {
            UpstreamError::InvalidBaseUrl { url: config.base_url.clone(), reason: e.to_string() }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(UpstreamError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::ClientBuild(e.to_string()))?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    /// Absolute URL of `endpoint`.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn forward(
        &self,
        key: &ApiKey,
        body: UpstreamBody,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.endpoint_url(body.endpoint());
        let request = self.client.post(&url).bearer_auth(key.expose());

        // `json` sets `Content-Type: application/json`; `multipart` sets the
        // boundary header itself.
        let request = match body {
            UpstreamBody::Json(value) => request.json(&value),
            UpstreamBody::Multipart(form) => request.multipart(encode_form(form.into_outbound())?),
        };

        tracing::debug!(%url, "forwarding generation request");

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Transport { url: url.clone(), reason: e.to_string() })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport { url: url.clone(), reason: e.to_string() })?;

        tracing::debug!(%url, status, bytes = body.len(), "upstream responded");

        Ok(UpstreamResponse { status, body })
    }
}

fn encode_form(payload: FormPayload) -> Result<Form, UpstreamError> {
    let mut form = Form::new();
    for field in payload.into_fields() {
        form = match field.value {
            FieldValue::Text(text) => form.text(field.name, text),
            FieldValue::File { file_name, content_type, data } => {
                let mut part = Part::bytes(data.to_vec());
                if let Some(file_name) = file_name {
                    part = part.file_name(file_name);
                }
                if let Some(content_type) = content_type {
                    part = part.mime_str(&content_type).map_err(|e| UpstreamError::InvalidPart {
                        field: field.name.clone(),
                        reason: e.to_string(),
                    })?;
                }
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn endpoint_url_joins_base_and_path() {
        let upstream = match HttpUpstream::new(&UpstreamConfig::new("http://127.0.0.1:9000/")) {
            Ok(u) => u,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(upstream.endpoint_url(Endpoint::Generate), "http://127.0.0.1:9000/rodin/generate");
        assert_eq!(upstream.endpoint_url(Endpoint::V2Rodin), "http://127.0.0.1:9000/api/v2/rodin");
    }

    #[test]
    fn relative_or_non_http_base_url_rejected() {
        for url in ["not a url", "ftp://example.com"] {
            let result = HttpUpstream::new(&UpstreamConfig::new(url));
            assert!(
                matches!(result, Err(UpstreamError::InvalidBaseUrl { .. })),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn bad_mime_type_is_reported() {
        let mut payload = FormPayload::new();
        payload.push(crate::FormField::file(
            "images",
            Some("a.png".to_owned()),
            Some("not a mime".to_owned()),
            bytes::Bytes::from_static(b"x"),
        ));
        assert!(matches!(encode_form(payload), Err(UpstreamError::InvalidPart { .. })));
    }

    #[tokio::test]
    async fn connection_refused_maps_to_transport_error() {
        // Reserve a free port, then release it so nothing is listening.
        let port = match std::net::TcpListener::bind("127.0.0.1:0") {
            Ok(l) => match l.local_addr() {
                Ok(addr) => addr.port(),
                Err(e) => panic!("no local addr: {e}"),
            },
            Err(e) => panic!("failed to bind: {e}"),
        };
        let config = UpstreamConfig::new(format!("http://127.0.0.1:{port}"))
            .with_timeout(Duration::from_secs(5));
        let upstream = match HttpUpstream::new(&config) {
            Ok(u) => u,
            Err(e) => panic!("unexpected error: {e}"),
        };
        let key = match ApiKey::new("test-key") {
            Some(k) => k,
            None => panic!("key should be accepted"),
        };
        let result = upstream.forward(&key, UpstreamBody::Json(serde_json::json!({}))).await;
        assert!(matches!(result, Err(UpstreamError::Transport { .. })), "got {result:?}");
    }
}
