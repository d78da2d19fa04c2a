//! Request bodies forwarded to the generation API.

use bytes::Bytes;
use rodin_core::schema::{
    parse_flag, FIELD_COLOR_MODE, FIELD_PRESERVE_COLORS, FIELD_USE_COLORS,
};

use crate::config::Endpoint;

/// An inbound generation request, decoded just enough to re-encode it.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    /// Arbitrary JSON, re-serialized verbatim.
    Json(serde_json::Value),
    /// Multipart form fields and files.
    Multipart(FormPayload),
}

impl UpstreamBody {
    /// The upstream route that accepts this encoding.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::Json(_) => Endpoint::Generate,
            Self::Multipart(_) => Endpoint::V2Rodin,
        }
    }
}

/// Value carried by a single multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File {
        file_name: Option<String>,
        content_type: Option<String>,
        data: Bytes,
    },
}

/// One named multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

impl FormField {
    /// A plain text field.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: FieldValue::Text(value.into()) }
    }

    /// A file part.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        file_name: Option<String>,
        content_type: Option<String>,
        data: Bytes,
    ) -> Self {
        Self { name: name.into(), value: FieldValue::File { file_name, content_type, data } }
    }

    /// The text value, if this is not a file part.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(s) => Some(s),
            FieldValue::File { .. } => None,
        }
    }
}

/// Ordered multipart form, preserving inbound field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: Vec<FormField>,
}

impl FormPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: FormField) {
        self.fields.push(field);
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> Vec<FormField> {
        self.fields
    }

    /// First text value stored under `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().filter(|f| f.name == name).find_map(FormField::as_text)
    }

    /// `(name, value)` pairs of every text field.
    pub fn text_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().filter_map(|f| f.as_text().map(|v| (f.name.as_str(), v)))
    }

    /// Number of file parts.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.fields.iter().filter(|f| matches!(f.value, FieldValue::File { .. })).count()
    }

    /// Apply the colour-field rule to produce the form sent upstream.
    ///
    /// `color_mode` and `preserve_colors` are withheld from the pass-through.
    /// When `use_colors` is set they are re-appended after every other field;
    /// otherwise they are dropped.
    #[must_use]
    pub fn into_outbound(self) -> Self {
        let use_colors = self.text(FIELD_USE_COLORS).and_then(parse_flag).unwrap_or(false);

        let (colour, mut fields): (Vec<_>, Vec<_>) = self
            .fields
            .into_iter()
            .partition(|f| f.name == FIELD_COLOR_MODE || f.name == FIELD_PRESERVE_COLORS);

        if use_colors {
            for name in [FIELD_COLOR_MODE, FIELD_PRESERVE_COLORS] {
                if let Some(field) = colour.iter().find(|f| f.name == name) {
                    fields.push(field.clone());
                }
            }
        } else if !colour.is_empty() {
            tracing::debug!(dropped = colour.len(), "use_colors unset; colour fields not forwarded");
        }

        Self { fields }
    }
}

impl FromIterator<FormField> for FormPayload {
    fn from_iter<T: IntoIterator<Item = FormField>>(iter: T) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}
