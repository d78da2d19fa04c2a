//! HTTP gateway in front of the Rodin 3D generation API.
//!
//! Accepts generation requests from the browser front-end, attaches the
//! server-held API key, forwards them upstream and relays the reply. Also
//! serves the Blender bridge scripts for generated models.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod codec;
pub mod config;
pub mod error;
pub mod guard;
pub mod routes;
pub mod state;
