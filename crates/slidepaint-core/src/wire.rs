//! Lenient serde mirror of the slide JSON wire format.
//!
//! Every field is optional and a value of the wrong JSON shape reads as
//! absent, so a single malformed field never rejects its object.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Top-level slide document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawDocument {
    #[serde(deserialize_with = "lenient")]
    pub background: Option<String>,
    pub objects: Option<Value>,
    pub version: Option<Value>,
}

/// One scene object descriptor, all kinds flattened together.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawObject {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,

    // Placement shared by every kind except lines.
    #[serde(deserialize_with = "lenient")]
    pub left: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub top: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub angle: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub scale_x: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub scale_y: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub opacity: Option<f64>,
    pub origin_x: Option<Value>,
    pub origin_y: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub z_index: Option<f64>,

    // Paint.
    #[serde(deserialize_with = "lenient")]
    pub fill: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub stroke: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub stroke_width: Option<f64>,

    // Box geometry.
    #[serde(deserialize_with = "lenient")]
    pub width: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub height: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub rx: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub ry: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub radius: Option<f64>,

    // Line endpoints.
    #[serde(deserialize_with = "lenient")]
    pub x1: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub y1: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub x2: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub y2: Option<f64>,

    // Text.
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub font_size: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub font_family: Option<String>,
    pub font_weight: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub font_style: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub text_align: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub line_height: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub char_spacing: Option<f64>,

    // Images.
    #[serde(deserialize_with = "lenient")]
    pub src: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub crop_x: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub crop_y: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub border_radius: Option<f64>,
    pub clip_path: Option<Value>,

    // Groups.
    pub objects: Option<Value>,
}

impl RawDocument {
    /// Read a document. Anything but a JSON object reads as empty, since
    /// serde would otherwise fill the fields of an array by position.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_default()
    }
}

impl RawObject {
    /// Read one descriptor. Fails when it is not a JSON object.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        if !value.is_object() {
            return Err("not a JSON object".to_string());
        }
        Self::deserialize(value).map_err(|e| e.to_string())
    }
}
