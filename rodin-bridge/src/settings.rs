//! Options selected by the user before rendering a script.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Smallest scale factor the import operator accepts.
pub const MIN_SCALE: f64 = 0.1;
/// Largest scale factor the import operator accepts.
pub const MAX_SCALE: f64 = 10.0;

/// Blender releases the addon declares compatibility with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BlenderVersion {
    #[serde(rename = "4.2")]
    V4_2,
    #[serde(rename = "4.3")]
    V4_3,
    #[default]
    #[serde(rename = "4.4")]
    V4_4,
}

impl BlenderVersion {
    /// `(major, minor, patch)` triple as written into `bl_info`.
    #[must_use]
    pub const fn triple(self) -> (u8, u8, u8) {
        match self {
            Self::V4_2 => (4, 2, 0),
            Self::V4_3 => (4, 3, 0),
            Self::V4_4 => (4, 4, 0),
        }
    }
}

impl fmt::Display for BlenderVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor, _) = self.triple();
        write!(f, "{major}.{minor}")
    }
}

/// How the generated model is brought into the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ImportSettings {
    pub scale: f64,
    pub apply_transforms: bool,
    pub import_materials: bool,
    pub import_textures: bool,
    pub smooth_shading: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            apply_transforms: true,
            import_materials: true,
            import_textures: true,
            smooth_shading: true,
        }
    }
}

impl ImportSettings {
    /// Check that the scale is finite and inside `[MIN_SCALE, MAX_SCALE]`.
    ///
    /// # Errors
    /// Returns [`BridgeError::InvalidScale`] otherwise.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if !self.scale.is_finite() || !(MIN_SCALE..=MAX_SCALE).contains(&self.scale) {
            return Err(BridgeError::InvalidScale {
                value: self.scale,
                min: MIN_SCALE,
                max: MAX_SCALE,
            });
        }
        Ok(())
    }
}

/// Container used when exporting back out of Blender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ExportFormat {
    #[default]
    Glb,
    Obj,
    Fbx,
}

impl ExportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Glb => "glb",
            Self::Obj => "obj",
            Self::Fbx => "fbx",
        }
    }
}

/// Export options baked into the generated `export_model` helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub include_animations: bool,
    pub optimize_geometry: bool,
    pub bake_lighting: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Glb,
            include_animations: false,
            optimize_geometry: true,
            bake_lighting: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_bounds_are_inclusive() {
        for scale in [MIN_SCALE, 1.0, MAX_SCALE] {
            let settings = ImportSettings { scale, ..ImportSettings::default() };
            assert!(settings.validate().is_ok(), "scale {scale} should be accepted");
        }
    }

    #[test]
    fn scale_out_of_range_rejects() {
        for scale in [0.0, 0.09, 10.5, f64::NAN, f64::INFINITY] {
            let settings = ImportSettings { scale, ..ImportSettings::default() };
            assert!(settings.validate().is_err(), "scale {scale} should be rejected");
        }
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: ImportSettings = match serde_json::from_str(r#"{"scale":2.0}"#) {
            Ok(s) => s,
            Err(e) => panic!("invalid JSON: {e}"),
        };
        assert!((settings.scale - 2.0).abs() < f64::EPSILON);
        assert!(settings.apply_transforms && settings.smooth_shading);
    }

    #[test]
    fn blender_version_uses_dotted_wire_form() {
        let v: BlenderVersion = match serde_json::from_str(r#""4.2""#) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        };
        assert_eq!(v, BlenderVersion::V4_2);
        assert_eq!(BlenderVersion::default().to_string(), "4.4");
    }
}
