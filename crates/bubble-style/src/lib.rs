#![forbid(unsafe_code)]

//! Style: colors, quantize scales, and the fill/text color quantizer.

pub mod color;
pub mod legend;
pub mod quantizer;
pub mod scale;

pub use color::{Color, Rgb};
pub use legend::{DEFAULT_PALETTE, DEFAULT_TEXT_COLOR, LegendEntry, LegendItem};
pub use quantizer::{ColorQuantizer, NodeColors};
pub use scale::{Domain, QuantizeScale};
