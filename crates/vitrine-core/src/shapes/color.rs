//! RGBA8 colors as stored in canvas documents.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Failure to read a color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{input}': {reason}")]
pub struct ColorParseError {
    pub input: String,
    pub reason: String,
}

/// Serializable color representation (RGBA8).
///
/// Persisted as `#rrggbb` when opaque and `#rrggbbaa` otherwise. Any CSS color
/// string is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Hex form used in the persisted document.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Alpha as a 0..=1 fraction.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Parse a CSS color string (`#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, named colors).
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            if let Some(color) = parse_hex(hex) {
                return Ok(color);
            }
        }
        let parsed = parse_color(trimmed).map_err(|e| ColorParseError {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        Ok(parsed.to_alpha_color::<Srgb>().into())
    }

    /// Parse an optional paint: empty, `none` and `transparent` mean no paint.
    pub fn parse_optional(input: &str) -> Result<Option<Self>, ColorParseError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "transparent" => Ok(None),
            _ => Self::parse(input).map(Some),
        }
    }
}

fn parse_hex(hex: &str) -> Option<SerializableColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let r = byte(&hex[0..1])? * 17;
            let g = byte(&hex[1..2])? * 17;
            let b = byte(&hex[2..3])? * 17;
            Some(SerializableColor::new(r, g, b, 255))
        }
        6 => Some(SerializableColor::new(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            255,
        )),
        8 => Some(SerializableColor::new(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        _ => None,
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl Serialize for SerializableColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SerializableColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for optional paints (`fill`, `stroke`).
pub(crate) mod optional_paint {
    use super::SerializableColor;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<SerializableColor>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SerializableColor>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => SerializableColor::parse_optional(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(
            SerializableColor::parse("#fff").unwrap(),
            SerializableColor::white()
        );
        assert_eq!(
            SerializableColor::parse("#FF000080").unwrap(),
            SerializableColor::new(255, 0, 0, 128)
        );
        assert_eq!(SerializableColor::new(16, 32, 48, 255).to_hex(), "#102030");
        assert_eq!(SerializableColor::new(16, 32, 48, 0).to_hex(), "#10203000");
    }

    #[test]
    fn test_css_names() {
        assert_eq!(
            SerializableColor::parse("red").unwrap(),
            SerializableColor::new(255, 0, 0, 255)
        );
        assert!(SerializableColor::parse("definitely-not-a-color").is_err());
    }

    #[test]
    fn test_optional_paint() {
        assert_eq!(SerializableColor::parse_optional("transparent").unwrap(), None);
        assert_eq!(SerializableColor::parse_optional("").unwrap(), None);
        assert_eq!(
            SerializableColor::parse_optional("#000").unwrap(),
            Some(SerializableColor::black())
        );
    }

    #[test]
    fn test_peniko_conversion() {
        let color = SerializableColor::new(12, 34, 56, 200);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }
}
