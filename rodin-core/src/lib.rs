//! Core types for the Rodin generation gateway.
//!
//! Defines the generation request schema shared by the gateway and the
//! upstream adapter: recognised fields, their defaults, and the rule that a
//! request must carry images or a prompt.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod schema;

pub use error::CoreError;
pub use schema::{
    parse_flag, ConditionMode, GenerationForm, GeometryFormat, Material, Quality, Tier,
};
