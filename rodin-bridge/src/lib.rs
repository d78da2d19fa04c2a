//! Blender bridge for generated models.
//!
//! Renders a paste-and-run import script and an installable addon for a
//! model URL returned by the generation flow. Rendering is pure: the caller
//! decides whether the text ends up on the clipboard or in a download.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod addon;
pub mod error;
pub mod script;
pub mod settings;

pub use addon::{render_addon, ADDON_FILE_NAME};
pub use error::BridgeError;
pub use script::{render_import_script, ScriptOptions, IMPORT_SCRIPT_FILE_NAME};
pub use settings::{BlenderVersion, ExportFormat, ExportSettings, ImportSettings};
