#![forbid(unsafe_code)]

//! Fill and text color resolution for chart nodes.
//!
//! Two quantize scales share one domain: fill colors from the palette and
//! companion text colors. Selected nodes bypass the scales for whichever
//! override colors are configured.

use crate::color::Color;
use crate::legend::{DEFAULT_TEXT_COLOR, LegendEntry, LegendItem, format_extent};
use crate::scale::{Domain, QuantizeScale};

/// Colors resolved for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeColors {
    /// Circle fill.
    pub fill: Color,
    /// Label color.
    pub text: Color,
}

/// Builds the fill and text scales for one update cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorQuantizer {
    fill: QuantizeScale<Color>,
    text: QuantizeScale<Color>,
    labels: Vec<Option<String>>,
    selected_fill: Option<Color>,
    selected_text: Option<Color>,
}

impl ColorQuantizer {
    /// Create a quantizer over `domain`.
    ///
    /// An empty `entries` slice falls back to the built-in palette.
    #[must_use]
    pub fn new(entries: &[LegendEntry], domain: Domain) -> Self {
        let palette;
        let entries = if entries.is_empty() {
            palette = LegendEntry::default_palette();
            palette.as_slice()
        } else {
            entries
        };
        Self {
            fill: QuantizeScale::new(domain, entries.iter().map(|e| e.color().clone()).collect()),
            text: QuantizeScale::new(domain, entries.iter().map(LegendEntry::text_color).collect()),
            labels: entries.iter().map(|e| e.text().map(str::to_string)).collect(),
            selected_fill: None,
            selected_text: None,
        }
    }

    /// Override colors for selected nodes (builder). Each is independent.
    #[must_use]
    pub fn with_selected(mut self, fill: Option<Color>, text: Option<Color>) -> Self {
        self.selected_fill = fill;
        self.selected_text = text;
        self
    }

    /// The shared domain.
    #[must_use]
    pub fn domain(&self) -> Domain {
        self.fill.domain()
    }

    /// Number of buckets.
    #[must_use]
    pub fn buckets(&self) -> usize {
        self.fill.len()
    }

    /// Bucket of a node. Nodes without a color value use bucket 0.
    #[must_use]
    pub fn bucket(&self, color_value: Option<f64>) -> usize {
        color_value.map_or(0, |v| self.fill.bucket(v))
    }

    /// Resolve the fill and text colors of a node.
    #[must_use]
    pub fn resolve(&self, color_value: Option<f64>, selected: bool) -> NodeColors {
        let bucket = self.bucket(color_value);
        let quantized_fill = || self.fill.get(bucket).cloned().unwrap_or(DEFAULT_TEXT_COLOR);
        let quantized_text = || self.text.get(bucket).cloned().unwrap_or(DEFAULT_TEXT_COLOR);
        let (fill, text) = if selected {
            (
                self.selected_fill.clone().unwrap_or_else(quantized_fill),
                self.selected_text.clone().unwrap_or_else(quantized_text),
            )
        } else {
            (quantized_fill(), quantized_text())
        };
        NodeColors { fill, text }
    }

    /// Legend rows, one per bucket, in bucket order.
    #[must_use]
    pub fn legend_items(&self) -> Vec<LegendItem> {
        (0..self.buckets())
            .filter_map(|i| {
                let extent = self.fill.bucket_extent(i)?;
                let label = match self.labels.get(i) {
                    Some(Some(text)) => text.clone(),
                    _ => format_extent(extent),
                };
                Some(LegendItem {
                    color: self.fill.get(i)?.clone(),
                    text_color: self.text.get(i)?.clone(),
                    label,
                    extent,
                })
            })
            .collect()
    }
}
