//! Inbound body codecs.
//!
//! One generate handler serves both wire formats; the codec is picked from
//! the request's `Content-Type` and determines the upstream endpoint.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{header, HeaderMap},
    Json,
};
use rodin_core::GenerationForm;
use rodin_upstream::{FormField, FormPayload, UpstreamBody};
use serde::Deserialize;

use crate::error::GatewayError;

/// Wire format of an inbound generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyCodec {
    /// `application/json` (or any `+json` subtype).
    Json,
    /// `multipart/form-data`.
    Multipart,
}

impl BodyCodec {
    /// Pick the codec from the `Content-Type` header.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
        let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
        if essence == "multipart/form-data" {
            Some(Self::Multipart)
        } else if essence == "application/json" || essence.ends_with("+json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Decode the request body into the form forwarded upstream.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidBody`] if the body is malformed,
    /// truncated, or exceeds the configured size limit.
    pub async fn decode(self, request: Request) -> Result<UpstreamBody, GatewayError> {
        match self {
            Self::Json => {
                let Json(value) = Json::<serde_json::Value>::from_request(request, &())
                    .await
                    .map_err(|rejection| GatewayError::InvalidBody(rejection.body_text()))?;
                Ok(UpstreamBody::Json(value))
            }
            Self::Multipart => {
                let multipart = Multipart::from_request(request, &())
                    .await
                    .map_err(|rejection| GatewayError::InvalidBody(rejection.body_text()))?;
                Ok(UpstreamBody::Multipart(read_form(multipart).await?))
            }
        }
    }
}

async fn read_form(mut multipart: Multipart) -> Result<FormPayload, GatewayError> {
    let mut form = FormPayload::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::InvalidBody(e.body_text()))?
    {
        let name = field
            .name()
            .map(str::to_owned)
            .ok_or_else(|| GatewayError::InvalidBody("multipart field without a name".to_owned()))?;

        // A filename marks a file part, even when the file is empty.
        let file_name = field.file_name().map(str::to_owned);
        match file_name {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await.map_err(|e| GatewayError::InvalidBody(e.body_text()))?;
                form.push(FormField::file(name, Some(file_name), content_type, data));
            }
            None => {
                let text = field.text().await.map_err(|e| GatewayError::InvalidBody(e.body_text()))?;
                form.push(FormField::text(name, text));
            }
        }
    }
    Ok(form)
}

/// Apply the images-or-prompt rule to a decoded body.
///
/// # Errors
/// Returns [`GatewayError::InvalidRequest`] if a known field has an invalid
/// value or the request has neither images nor a prompt.
pub fn validate(body: &UpstreamBody) -> Result<(), GatewayError> {
    let form = match body {
        UpstreamBody::Json(value) => GenerationForm::deserialize(value)
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?,
        UpstreamBody::Multipart(payload) => {
            GenerationForm::from_fields(payload.text_fields(), payload.file_count())?
        }
    };
    form.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(content_type: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        match HeaderValue::from_str(content_type) {
            Ok(v) => {
                map.insert(header::CONTENT_TYPE, v);
            }
            Err(e) => panic!("bad header value: {e}"),
        }
        map
    }

    #[test]
    fn content_type_selects_codec() {
        assert_eq!(BodyCodec::from_headers(&headers("application/json")), Some(BodyCodec::Json));
        assert_eq!(
            BodyCodec::from_headers(&headers("Application/JSON; charset=utf-8")),
            Some(BodyCodec::Json)
        );
        assert_eq!(
            BodyCodec::from_headers(&headers("application/vnd.api+json")),
            Some(BodyCodec::Json)
        );
        assert_eq!(
            BodyCodec::from_headers(&headers("multipart/form-data; boundary=xyz")),
            Some(BodyCodec::Multipart)
        );
        assert_eq!(BodyCodec::from_headers(&headers("text/plain")), None);
        assert_eq!(BodyCodec::from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn validate_accepts_prompt_only_json() {
        let body = UpstreamBody::Json(serde_json::json!({"prompt": "a red chair"}));
        assert!(validate(&body).is_ok());
    }

    #[test]
    fn validate_rejects_empty_json() {
        let body = UpstreamBody::Json(serde_json::json!({"quality": "high"}));
        assert!(matches!(validate(&body), Err(GatewayError::InvalidRequest(_))));
    }

    #[test]
    fn validate_rejects_unknown_enum_value() {
        let body = UpstreamBody::Json(serde_json::json!({"prompt": "x", "tier": "Ultra"}));
        assert!(matches!(validate(&body), Err(GatewayError::InvalidRequest(_))));
    }

    #[test]
    fn validate_counts_multipart_files_as_images() {
        let form: FormPayload = [FormField::file(
            "images",
            Some("chair.png".to_owned()),
            Some("image/png".to_owned()),
            bytes::Bytes::from_static(b"\x89PNG"),
        )]
        .into_iter()
        .collect();
        assert!(validate(&UpstreamBody::Multipart(form)).is_ok());
        assert!(validate(&UpstreamBody::Multipart(FormPayload::new())).is_err());
    }
}
