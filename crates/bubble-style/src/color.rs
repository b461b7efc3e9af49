#![forbid(unsafe_code)]

//! Color values as configured by the host.
//!
//! Hex and a handful of named colors are parsed to RGB. Anything else
//! (`rgb(...)`, `hsl(...)`, CSS variables) is kept verbatim so it can be
//! passed through to the render surface untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A fill or text color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Color {
    /// Parsed hex or named color.
    Rgb(Rgb),
    /// Unparsed color expression, passed through as written.
    Css(String),
}

impl Color {
    /// Create an RGB color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb::new(r, g, b))
    }

    /// Parse a color string. Never fails: unknown syntax is kept verbatim.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => parse_named(trimmed),
        };
        parsed.map_or_else(|| Self::Css(trimmed.to_string()), Self::Rgb)
    }

    /// RGB value, if the color was parseable.
    #[must_use]
    pub fn to_rgb(&self) -> Option<Rgb> {
        match self {
            Self::Rgb(rgb) => Some(*rgb),
            Self::Css(_) => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(rgb) => fmt::Display::fmt(rgb, f),
            Self::Css(text) => f.write_str(text),
        }
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Rgb::new(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

fn parse_named(name: &str) -> Option<Rgb> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => Rgb::new(0, 0, 0),
        "white" => Rgb::new(255, 255, 255),
        "red" => Rgb::new(255, 0, 0),
        "green" => Rgb::new(0, 128, 0),
        "blue" => Rgb::new(0, 0, 255),
        "yellow" => Rgb::new(255, 255, 0),
        "orange" => Rgb::new(255, 165, 0),
        "purple" => Rgb::new(128, 0, 128),
        "gray" | "grey" => Rgb::new(128, 128, 128),
        "lightgray" | "lightgrey" => Rgb::new(211, 211, 211),
        "darkgray" | "darkgrey" => Rgb::new(169, 169, 169),
        "navy" => Rgb::new(0, 0, 128),
        "teal" => Rgb::new(0, 128, 128),
        "steelblue" => Rgb::new(70, 130, 180),
        "tomato" => Rgb::new(255, 99, 71),
        _ => return None,
    };
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_long_and_short_hex() {
        assert_eq!(Color::parse("#1f77b4"), Color::rgb(0x1f, 0x77, 0xb4));
        assert_eq!(Color::parse("#fff"), Color::rgb(255, 255, 255));
        assert_eq!(Color::parse("  #222222 "), Color::rgb(0x22, 0x22, 0x22));
    }

    #[test]
    fn parse_named_case_insensitive() {
        assert_eq!(Color::parse("SteelBlue"), Color::rgb(70, 130, 180));
    }

    #[test]
    fn unknown_syntax_kept_verbatim() {
        let c = Color::parse("rgb(1, 2, 3)");
        assert_eq!(c, Color::Css("rgb(1, 2, 3)".into()));
        assert_eq!(c.to_string(), "rgb(1, 2, 3)");
        assert_eq!(c.to_rgb(), None);
        assert_eq!(Color::parse("#12345"), Color::Css("#12345".into()));
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Color::rgb(0xAB, 0x01, 0xFF).to_string(), "#ab01ff");
    }

    #[test]
    fn non_ascii_hex_does_not_panic() {
        assert!(matches!(Color::parse("#ééé"), Color::Css(_)));
    }

    #[test]
    fn serde_round_trips_through_strings() {
        let c: Color = serde_json::from_str("\"#ff0000\"").expect("valid json");
        assert_eq!(c, Color::rgb(255, 0, 0));
        assert_eq!(serde_json::to_string(&c).expect("serializable"), "\"#ff0000\"");
    }
}
