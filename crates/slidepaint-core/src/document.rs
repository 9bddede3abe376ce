//! Slide documents.

use crate::color::parse_color;
use crate::object::{SceneObject, parse_objects};
use crate::wire::RawDocument;
use peniko::Color;
use serde_json::Value;
use thiserror::Error;

/// Errors reading a slide document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid slide JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One slide: a background color and an ordered list of scene objects.
#[derive(Debug, Clone)]
pub struct SlideDocument {
    /// Background fill, opaque white unless the document says otherwise.
    pub background: Color,
    /// Objects in descriptor order. `None` when the document has no
    /// `objects` array, in which case only the background is drawn.
    pub objects: Option<Vec<SceneObject>>,
    /// Informational `version` field, never validated.
    pub version: Option<String>,
}

impl Default for SlideDocument {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            objects: None,
            version: None,
        }
    }
}

impl SlideDocument {
    /// Parse a document from raw JSON text.
    ///
    /// Only text that is not JSON at all is an error. Anything else degrades:
    /// unknown fields are ignored, malformed fields take their defaults and
    /// unsupported objects are dropped.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Build a document from an already parsed JSON value.
    pub fn from_value(value: &Value) -> Self {
        let raw = RawDocument::from_value(value);
        let background = raw
            .background
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(Color::WHITE);
        let version = raw.version.and_then(|v| match v {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        });
        Self {
            background,
            objects: parse_objects(raw.objects.as_ref()),
            version,
        }
    }

    /// The document's objects, empty when it has none.
    pub fn objects(&self) -> &[SceneObject] {
        self.objects.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(color: Color) -> [u8; 4] {
        let c = color.to_rgba8();
        [c.r, c.g, c.b, c.a]
    }

    #[test]
    fn test_empty_document_defaults() {
        let doc = SlideDocument::from_json("{}").unwrap();
        assert_eq!(rgba(doc.background), [255, 255, 255, 255]);
        assert!(doc.objects.is_none());
        assert!(doc.objects().is_empty());
    }

    #[test]
    fn test_non_array_objects_means_background_only() {
        let doc = SlideDocument::from_json(r##"{"background": "#102030", "objects": {"a": 1}}"##)
            .unwrap();
        assert_eq!(rgba(doc.background), [0x10, 0x20, 0x30, 255]);
        assert!(doc.objects.is_none());
    }

    #[test]
    fn test_unknown_fields_and_version() {
        let doc = SlideDocument::from_json(
            r#"{"version": "5.3.0", "theme": "dark", "objects": [{"type": "rect"}, {"type": "video"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.version.as_deref(), Some("5.3.0"));
        assert_eq!(doc.objects().len(), 1);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            SlideDocument::from_json("{ not json"),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn test_non_object_json_is_empty_document() {
        let doc = SlideDocument::from_json("[1, 2, 3]").unwrap();
        assert!(doc.objects.is_none());
        assert_eq!(rgba(doc.background), [255, 255, 255, 255]);

        let positional = SlideDocument::from_json(r##"["#000000", [{"type": "rect"}]]"##).unwrap();
        assert!(positional.objects.is_none());
        assert_eq!(rgba(positional.background), [255, 255, 255, 255]);
    }

    #[test]
    fn test_array_descriptors_are_dropped() {
        let doc = SlideDocument::from_json(
            r#"{"objects": [["rect"], ["circle", 10, 20], {"type": "triangle"}]}"#,
        )
        .unwrap();
        let kinds: Vec<_> = doc.objects().iter().map(|o| (o.kind.name(), o.index)).collect();
        assert_eq!(kinds, vec![("triangle", 2)]);
    }

    #[test]
    fn test_malformed_background_is_white() {
        let doc = SlideDocument::from_json(r#"{"background": 12}"#).unwrap();
        assert_eq!(rgba(doc.background), [255, 255, 255, 255]);
    }
}
