//! Persisted form of a canvas document.
//!
//! Documents are stored as a single JSON string (a project's `canvas_content`
//! field). Encoding is deterministic and always carries `version`, `width` and
//! `height`. Decoding fails softly: callers that only need "a document or
//! nothing" use [`decode_or_none`].

use crate::canvas::{CanvasDocument, FORMAT_VERSION};
use crate::shapes::{CanvasObject, ObjectId, ObjectKind, SerializableColor};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a persisted string is not a usable document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty canvas content")]
    Empty,
    #[error("malformed canvas content: {0}")]
    Malformed(String),
    #[error("canvas content has no version")]
    Unversioned,
    #[error("unsupported canvas version {0}")]
    UnsupportedVersion(u64),
    #[error("invalid canvas {0}")]
    InvalidDimensions(&'static str),
}

/// Failure to serialize a document.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode canvas: {0}")]
    Json(#[from] serde_json::Error),
    #[error("canvas {0} is not a finite positive number")]
    InvalidDimensions(&'static str),
    #[error("canvas object {0} holds a number that cannot be stored")]
    NonFinite(ObjectId),
}

/// Serialize a document to its persisted string.
///
/// JSON would write infinities and NaN as `null`, which then fails to decode,
/// so such documents are refused instead.
pub fn encode(document: &CanvasDocument) -> Result<String, EncodeError> {
    for (key, value) in [("width", document.width), ("height", document.height)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(EncodeError::InvalidDimensions(key));
        }
    }
    if let Some(object) = document.objects.iter().find(|o| !o.is_finite()) {
        return Err(EncodeError::NonFinite(object.id));
    }
    Ok(serde_json::to_string(document)?)
}

/// Parse a persisted string.
///
/// Objects with a missing or unknown `type`, or with unreadable attributes,
/// are skipped; the rest of the document still decodes.
pub fn decode(content: &str) -> Result<CanvasDocument, DecodeError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DecodeError::Empty);
    }
    let value: Value =
        serde_json::from_str(content).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let Value::Object(root) = value else {
        return Err(DecodeError::Malformed("document is not an object".to_string()));
    };

    let version = match root.get("version") {
        Some(v) => v.as_u64().ok_or(DecodeError::Unversioned)?,
        None => return Err(DecodeError::Unversioned),
    };
    if version == 0 || version > u64::from(FORMAT_VERSION) {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let width = dimension(&root, "width")?;
    let height = dimension(&root, "height")?;
    let background = background(&root);

    let objects = match root.get("objects") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| decode_object(index, item))
            .collect(),
        Some(_) => return Err(DecodeError::Malformed("objects is not a list".to_string())),
    };

    Ok(CanvasDocument {
        version: FORMAT_VERSION,
        width,
        height,
        background,
        objects,
    })
}

/// Decode, logging and discarding any failure.
///
/// Editor and renderer both use this so a bad payload means "no document" in
/// both places.
pub fn decode_or_none(content: &str) -> Option<CanvasDocument> {
    match decode(content) {
        Ok(document) => Some(document),
        Err(DecodeError::Empty) => None,
        Err(e) => {
            log::warn!("Ignoring canvas content: {}", e);
            None
        }
    }
}

fn dimension(root: &Map<String, Value>, key: &'static str) -> Result<f64, DecodeError> {
    root.get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or(DecodeError::InvalidDimensions(key))
}

fn background(root: &Map<String, Value>) -> SerializableColor {
    match root.get("background") {
        None | Some(Value::Null) => SerializableColor::white(),
        Some(v) => SerializableColor::deserialize(v).unwrap_or_else(|e| {
            log::warn!("Unreadable canvas background, using white: {}", e);
            SerializableColor::white()
        }),
    }
}

/// Attributes where an explicit `null` removes the paint.
const PAINT_KEYS: &[&str] = &["fill", "stroke"];

fn decode_object(index: usize, item: &Value) -> Option<CanvasObject> {
    let tag = item.get("type").and_then(Value::as_str);
    match tag {
        Some(tag) if ObjectKind::TAGS.contains(&tag) => {}
        Some(tag) => {
            log::warn!("Skipping canvas object {} with unknown type '{}'", index, tag);
            return None;
        }
        None => {
            log::warn!("Skipping canvas object {} without a type", index);
            return None;
        }
    }
    let Value::Object(fields) = item else {
        return None;
    };
    // `null` reads as absent, except for paint where it means "none".
    let keeps_null = |key: &str| tag != Some("text") && PAINT_KEYS.contains(&key);
    let fields: Map<String, Value> = fields
        .iter()
        .filter(|(key, value)| !value.is_null() || keeps_null(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    match CanvasObject::deserialize(Value::Object(fields)) {
        Ok(object) => Some(object),
        Err(e) => {
            log::warn!("Skipping unreadable canvas object {}: {}", index, e);
            None
        }
    }
}
