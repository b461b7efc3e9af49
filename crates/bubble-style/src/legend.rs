#![forbid(unsafe_code)]

//! Legend palette entries and the items produced for legend rendering.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Text color used when a palette entry does not name one.
pub const DEFAULT_TEXT_COLOR: Color = Color::rgb(0x22, 0x22, 0x22);

/// Five-step sequential palette used when no legend is configured.
pub const DEFAULT_PALETTE: [Color; 5] = [
    Color::rgb(0xef, 0xf3, 0xff),
    Color::rgb(0xbd, 0xd7, 0xe7),
    Color::rgb(0x6b, 0xae, 0xd6),
    Color::rgb(0x31, 0x82, 0xbd),
    Color::rgb(0x08, 0x51, 0x9c),
];

/// One configured palette bucket: a bare color or a described swatch.
///
/// ```json
/// ["#eff3ff", {"color": "#08519c", "text": "High", "textColor": "#ffffff"}]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegendEntry {
    /// Fill color only.
    Color(Color),
    /// Fill color with optional legend text and label color.
    Swatch {
        /// Fill color.
        color: Color,
        /// Legend text for this bucket.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Label color drawn on top of the fill.
        #[serde(
            default,
            rename = "textColor",
            skip_serializing_if = "Option::is_none"
        )]
        text_color: Option<Color>,
    },
}

impl LegendEntry {
    /// Fill color of the bucket.
    #[must_use]
    pub fn color(&self) -> &Color {
        match self {
            Self::Color(color) | Self::Swatch { color, .. } => color,
        }
    }

    /// Label color, falling back to [`DEFAULT_TEXT_COLOR`].
    #[must_use]
    pub fn text_color(&self) -> Color {
        match self {
            Self::Swatch {
                text_color: Some(c),
                ..
            } => c.clone(),
            _ => DEFAULT_TEXT_COLOR,
        }
    }

    /// Legend text, if configured.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Swatch { text, .. } => text.as_deref(),
            Self::Color(_) => None,
        }
    }

    /// The built-in palette as entries.
    #[must_use]
    pub fn default_palette() -> Vec<Self> {
        DEFAULT_PALETTE.iter().cloned().map(Self::Color).collect()
    }
}

impl From<Color> for LegendEntry {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

/// One row of the legend, ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    /// Swatch color.
    pub color: Color,
    /// Label color.
    pub text_color: Color,
    /// Configured text, or the bucket's value range as `"lo - hi"`.
    pub label: String,
    /// Domain interval covered by the bucket.
    pub extent: (f64, f64),
}

/// Format a bucket range for display, trimming trailing zeros.
pub(crate) fn format_extent((lo, hi): (f64, f64)) -> String {
    format!("{} - {}", format_number(lo), format_number(hi))
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        let text = format!("{v:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
