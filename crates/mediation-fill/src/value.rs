//! Values stored under a content tag.

use crate::image::ImageExport;
use serde_json::{Number, Value as JsonValue};
use std::fmt;

/// One content entry.
///
/// Getters are permissive: asking for the wrong type yields "no value"
/// rather than an error, see [`FromContent`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Image(ImageExport),
}

impl ContentValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Image(_) => "image",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageExport> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Exported JSON form. Non-finite floats, which JSON cannot represent,
    /// fall back to their string form.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Str(s) => JsonValue::String(s.clone()),
            Self::Int(i) => JsonValue::Number((*i).into()),
            Self::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(f.to_string())),
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Image(image) => image.to_json(),
        }
    }
}

impl fmt::Display for ContentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Image(image) => f.write_str(&image.path),
        }
    }
}

// ─── Conversions ─────────────────────────────────────────────────────────

impl From<&str> for ContentValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i32> for ContentValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for ContentValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for ContentValue {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<f64> for ContentValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ContentValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<ImageExport> for ContentValue {
    fn from(value: ImageExport) -> Self {
        Self::Image(value)
    }
}

impl<T: Into<ContentValue>> From<Option<T>> for ContentValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Typed read of a [`ContentValue`]. `None` on type mismatch.
pub trait FromContent: Sized {
    fn from_content(value: &ContentValue) -> Option<Self>;
}

impl FromContent for String {
    fn from_content(value: &ContentValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromContent for i32 {
    fn from_content(value: &ContentValue) -> Option<Self> {
        match value {
            ContentValue::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FromContent for i64 {
    fn from_content(value: &ContentValue) -> Option<Self> {
        match value {
            ContentValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromContent for f32 {
    fn from_content(value: &ContentValue) -> Option<Self> {
        match value {
            ContentValue::Float(f) => Some(*f as f32),
            _ => None,
        }
    }
}

impl FromContent for f64 {
    fn from_content(value: &ContentValue) -> Option<Self> {
        match value {
            ContentValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromContent for bool {
    fn from_content(value: &ContentValue) -> Option<Self> {
        match value {
            ContentValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromContent for ImageExport {
    fn from_content(value: &ContentValue) -> Option<Self> {
        value.as_image().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_reads_are_silent() {
        let text = ContentValue::from("12");
        assert_eq!(i64::from_content(&text), None);
        assert_eq!(String::from_content(&text).as_deref(), Some("12"));

        let big = ContentValue::Int(i64::from(i32::MAX) + 1);
        assert_eq!(i32::from_content(&big), None);
        assert_eq!(i64::from_content(&big), Some(i64::from(i32::MAX) + 1));

        assert_eq!(f64::from_content(&ContentValue::Int(1)), None);
        assert_eq!(bool::from_content(&ContentValue::Null), None);
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(ContentValue::from(None::<String>), ContentValue::Null);
        assert_eq!(ContentValue::from(Some(3)), ContentValue::Int(3));
    }

    #[test]
    fn non_finite_float_exports_as_string() {
        assert_eq!(
            ContentValue::Float(f64::NAN).to_json(),
            JsonValue::String("NaN".into())
        );
        assert_eq!(ContentValue::Float(2.5).to_json(), serde_json::json!(2.5));
    }
}
