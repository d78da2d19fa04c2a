//! Outbound adapter for the Rodin 3D generation API.
//!
//! Re-encodes an inbound generation request (JSON or multipart), attaches the
//! bearer credential and relays the upstream reply unparsed. No retries and
//! no body rewriting beyond the colour-field rule in
//! [`FormPayload::into_outbound`].

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod http;

pub use body::{FieldValue, FormField, FormPayload, UpstreamBody};
pub use client::{UpstreamClient, UpstreamResponse};
pub use config::{ApiKey, Endpoint, UpstreamConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::UpstreamError;
pub use http::HttpUpstream;
