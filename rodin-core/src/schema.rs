//! Typed view of a Rodin generation request.
//!
//! Field names and defaults follow the upstream form contract. Unknown fields
//! are ignored so that new upstream parameters pass through untouched.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// Free-text prompt field.
pub const FIELD_PROMPT: &str = "prompt";
/// Flag that enables forwarding of the colour fields.
pub const FIELD_USE_COLORS: &str = "use_colors";
/// Colour handling mode, forwarded only when `use_colors` is set.
pub const FIELD_COLOR_MODE: &str = "color_mode";
/// Colour preservation flag, forwarded only when `use_colors` is set.
pub const FIELD_PRESERVE_COLORS: &str = "preserve_colors";

/// Parse a form flag the way browsers and form libraries encode booleans.
///
/// Accepts `true`/`false`, `1`/`0`, `on`/`off` and `yes`/`no`, ignoring case
/// and surrounding whitespace.
#[must_use]
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

macro_rules! form_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
        default = $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[non_exhaustive]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Wire representation of the value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(CoreError::InvalidField {
                        field: $field.to_owned(),
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

form_enum! {
    /// How multiple input images are combined.
    ConditionMode, "condition_mode" {
        Concat => "concat",
        Fuse => "fuse",
    }
    default = Concat
}

form_enum! {
    /// Mesh density tier.
    Quality, "quality" {
        High => "high",
        Medium => "medium",
        Low => "low",
        ExtraLow => "extra-low",
    }
    default = High
}

form_enum! {
    /// Output geometry container.
    GeometryFormat, "geometry_file_format" {
        Glb => "glb",
        Usdz => "usdz",
        Fbx => "fbx",
        Obj => "obj",
        Stl => "stl",
        Svg => "svg",
    }
    default = Glb
}

form_enum! {
    /// Generation model tier.
    Tier, "tier" {
        Regular => "Regular",
        Sketch => "Sketch",
        Detail => "Detail",
        Smooth => "Smooth",
    }
    default = Detail
}

form_enum! {
    /// Surface material style.
    Material, "material" {
        Pbr => "PBR",
        Shaded => "Shaded",
    }
    default = Pbr
}

const fn yes() -> bool {
    true
}

/// A generation request as understood by the upstream API.
///
/// Images are only counted: the gateway never inspects their bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerationForm {
    /// Number of images attached to the request.
    #[serde(
        default,
        rename = "images",
        deserialize_with = "count_images",
        skip_serializing
    )]
    pub image_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub condition_mode: ConditionMode,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub geometry_file_format: GeometryFormat,
    #[serde(default = "yes")]
    pub use_hyper: bool,
    #[serde(default)]
    pub tier: Tier,
    /// Generate the model in T/A pose.
    #[serde(default, rename = "TAPose")]
    pub ta_pose: bool,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub use_colors: bool,
    #[serde(default = "yes")]
    pub auto_detect_colors: bool,
    #[serde(default = "yes")]
    pub highpack: bool,
}

impl Default for GenerationForm {
    fn default() -> Self {
        Self {
            image_count: 0,
            prompt: None,
            condition_mode: ConditionMode::default(),
            quality: Quality::default(),
            geometry_file_format: GeometryFormat::default(),
            use_hyper: true,
            tier: Tier::default(),
            ta_pose: false,
            material: Material::default(),
            use_colors: false,
            auto_detect_colors: true,
            highpack: true,
        }
    }
}

impl GenerationForm {
    /// Build a form from multipart text fields plus the number of file parts.
    ///
    /// Unknown field names are ignored. Repeated fields keep the last value.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidField`] if an enumerated or boolean field
    /// carries an unrecognised value.
    pub fn from_fields<'a, I>(fields: I, image_count: usize) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = Self { image_count, ..Self::default() };
        for (name, value) in fields {
            match name {
                FIELD_PROMPT => form.prompt = Some(value.to_owned()),
                "condition_mode" => form.condition_mode = value.parse()?,
                "quality" => form.quality = value.parse()?,
                "geometry_file_format" => form.geometry_file_format = value.parse()?,
                "use_hyper" => form.use_hyper = flag(name, value)?,
                "tier" => form.tier = value.parse()?,
                "TAPose" => form.ta_pose = flag(name, value)?,
                "material" => form.material = value.parse()?,
                FIELD_USE_COLORS => form.use_colors = flag(name, value)?,
                "auto_detect_colors" => form.auto_detect_colors = flag(name, value)?,
                "highpack" => form.highpack = flag(name, value)?,
                _ => {}
            }
        }
        Ok(form)
    }

    /// Check that the request carries something to generate from.
    ///
    /// # Errors
    /// Returns [`CoreError::MissingInput`] when there are no images and the
    /// prompt is absent or empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        let has_prompt = self.prompt.as_deref().is_some_and(|p| !p.is_empty());
        if self.image_count == 0 && !has_prompt {
            return Err(CoreError::MissingInput);
        }
        Ok(())
    }
}

fn flag(field: &str, value: &str) -> Result<bool, CoreError> {
    parse_flag(value).ok_or_else(|| CoreError::InvalidField {
        field: field.to_owned(),
        value: value.to_owned(),
    })
}

fn count_images<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> de::Visitor<'de> for CountVisitor {
        type Value = usize;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a list of images")
        }

        fn visit_unit<E: de::Error>(self) -> Result<usize, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<usize, E> {
            Ok(0)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<usize, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut count = 0;
            while seq.next_element::<de::IgnoredAny>()?.is_some() {
                count += 1;
            }
            Ok(count)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}
