#![forbid(unsafe_code)]

//! Chart configuration.
//!
//! Options arrive as JSON (camelCase keys, every key optional) or through the
//! builder methods. A few timing and spacing options can also be overridden
//! from the environment:
//!
//! - `BUBBLE_CHART_DURATION_MS` (f64)
//! - `BUBBLE_CHART_DELAY_MS` (f64)
//! - `BUBBLE_CHART_PADDING` (f64)
//! - `BUBBLE_CHART_TOOLTIP_MARGIN` (f64)

use std::env;
use std::fmt;
use std::time::Duration;

use bubble_style::{Color, Domain, LegendEntry};
use serde::{Deserialize, Serialize};

use crate::tooltip::TooltipProp;

const ENV_DURATION_MS: &str = "BUBBLE_CHART_DURATION_MS";
const ENV_DELAY_MS: &str = "BUBBLE_CHART_DELAY_MS";
const ENV_PADDING: &str = "BUBBLE_CHART_PADDING";
const ENV_TOOLTIP_MARGIN: &str = "BUBBLE_CHART_TOOLTIP_MARGIN";

/// Options recognized by [`BubbleChart`](crate::BubbleChart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    /// Whether the host shows a legend.
    pub legend: bool,
    /// Palette buckets; empty selects the built-in palette.
    pub color_legend: Vec<LegendEntry>,
    /// Pinned color domain; `None` derives it from the data.
    pub fixed_domain: Option<Domain>,
    /// Fill override for selected items.
    pub selected_color: Option<Color>,
    /// Label color override for selected items.
    pub selected_text_color: Option<Color>,
    /// Bubbles below this diameter get the small label class.
    pub small_diameter: f64,
    /// Bubbles below this diameter (and not small) get the medium class.
    pub medium_diameter: f64,
    /// Spacing between legend rows, for the host.
    pub legend_spacing: f64,
    /// Label font size as a multiple of the radius.
    pub font_size_factor: Option<f64>,
    /// Transition duration in milliseconds; fractions allowed.
    pub duration: f64,
    /// Per-node stagger step in milliseconds; fractions allowed.
    pub delay: f64,
    /// Whether highlighting shows a tooltip.
    pub tooltip: bool,
    /// Tooltip content rows.
    pub tooltip_props: Vec<TooltipProp>,
    /// Gap between the tooltip and the bubble or container edge.
    pub tooltip_margin: f64,
    /// Gap between packed circles.
    pub padding: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            legend: false,
            color_legend: Vec::new(),
            fixed_domain: None,
            selected_color: None,
            selected_text_color: None,
            small_diameter: 40.0,
            medium_diameter: 115.0,
            legend_spacing: 3.0,
            font_size_factor: None,
            duration: 500.0,
            delay: 7.0,
            tooltip: false,
            tooltip_props: Vec::new(),
            tooltip_margin: 5.0,
            padding: 3.0,
        }
    }
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Offending option.
    pub field: &'static str,
    /// Rejected value, as text.
    pub value: String,
    /// What was expected.
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Configuration after environment overrides, with any parse diagnostics.
#[derive(Debug, Clone)]
pub struct ConfigParse {
    /// Resulting configuration; unparseable overrides are left at their
    /// previous value.
    pub config: ChartConfig,
    /// One entry per rejected override.
    pub errors: Vec<ConfigError>,
}

impl ChartConfig {
    /// Parse a configuration object from JSON. Missing keys take defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Apply environment overrides.
    #[must_use]
    pub fn with_env(self) -> ConfigParse {
        self.with_env_from(|key| env::var(key).ok())
    }

    /// Apply overrides read through `get`.
    #[must_use]
    pub fn with_env_from<F>(mut self, mut get: F) -> ConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_DURATION_MS) {
            match parse_f64(&value) {
                Some(parsed) => self.duration = parsed,
                None => errors.push(ConfigError::new(
                    "duration",
                    value,
                    "expected milliseconds as a number",
                )),
            }
        }

        if let Some(value) = get(ENV_DELAY_MS) {
            match parse_f64(&value) {
                Some(parsed) => self.delay = parsed,
                None => errors.push(ConfigError::new(
                    "delay",
                    value,
                    "expected milliseconds as a number",
                )),
            }
        }

        if let Some(value) = get(ENV_PADDING) {
            match parse_f64(&value) {
                Some(parsed) => self.padding = parsed,
                None => errors.push(ConfigError::new("padding", value, "expected a number")),
            }
        }

        if let Some(value) = get(ENV_TOOLTIP_MARGIN) {
            match parse_f64(&value) {
                Some(parsed) => self.tooltip_margin = parsed,
                None => errors.push(ConfigError::new(
                    "tooltip_margin",
                    value,
                    "expected a number",
                )),
            }
        }

        ConfigParse {
            config: self,
            errors,
        }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        validate_non_negative("small_diameter", self.small_diameter, &mut errors);
        validate_non_negative("medium_diameter", self.medium_diameter, &mut errors);
        validate_non_negative("legend_spacing", self.legend_spacing, &mut errors);
        validate_non_negative("tooltip_margin", self.tooltip_margin, &mut errors);
        validate_non_negative("padding", self.padding, &mut errors);
        validate_non_negative("duration", self.duration, &mut errors);
        validate_non_negative("delay", self.delay, &mut errors);
        if self.medium_diameter < self.small_diameter {
            errors.push(ConfigError::new(
                "medium_diameter",
                self.medium_diameter.to_string(),
                format!("must be >= small_diameter ({})", self.small_diameter),
            ));
        }
        if let Some(factor) = self.font_size_factor
            && !(factor.is_finite() && factor > 0.0)
        {
            errors.push(ConfigError::new(
                "font_size_factor",
                factor.to_string(),
                "expected a positive finite number",
            ));
        }
        if let Some(domain) = self.fixed_domain
            && !(domain.min.is_finite() && domain.max.is_finite() && domain.min <= domain.max)
        {
            errors.push(ConfigError::new(
                "fixed_domain",
                format!("{{min: {}, max: {}}}", domain.min, domain.max),
                "expected finite bounds with min <= max",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Transition duration.
    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        from_millis_f64(self.duration)
    }

    /// Per-node stagger step.
    #[must_use]
    pub fn stagger_delay(&self) -> Duration {
        from_millis_f64(self.delay)
    }

    // --- builders ---

    /// Set the transition duration (builder).
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set the per-node stagger step (builder).
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay.as_secs_f64() * 1000.0;
        self
    }

    /// Set the palette (builder).
    #[must_use]
    pub fn color_legend(mut self, entries: Vec<LegendEntry>) -> Self {
        self.color_legend = entries;
        self
    }

    /// Pin the color domain (builder).
    #[must_use]
    pub fn fixed_domain(mut self, min: f64, max: f64) -> Self {
        self.fixed_domain = Some(Domain::new(min, max));
        self
    }

    /// Set selected-item override colors (builder).
    #[must_use]
    pub fn selected_colors(mut self, fill: Option<Color>, text: Option<Color>) -> Self {
        self.selected_color = fill;
        self.selected_text_color = text;
        self
    }

    /// Enable the legend (builder).
    #[must_use]
    pub fn legend(mut self, enabled: bool) -> Self {
        self.legend = enabled;
        self
    }

    /// Enable tooltips with the given rows (builder).
    #[must_use]
    pub fn tooltip(mut self, props: Vec<TooltipProp>) -> Self {
        self.tooltip = true;
        self.tooltip_props = props;
        self
    }

    /// Set the tooltip margin (builder).
    #[must_use]
    pub fn tooltip_margin(mut self, margin: f64) -> Self {
        self.tooltip_margin = margin;
        self
    }

    /// Set the packing padding (builder).
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the label size thresholds (builder).
    #[must_use]
    pub fn diameters(mut self, small: f64, medium: f64) -> Self {
        self.small_diameter = small;
        self.medium_diameter = medium;
        self
    }

    /// Set the label font size factor (builder).
    #[must_use]
    pub fn font_size_factor(mut self, factor: f64) -> Self {
        self.font_size_factor = Some(factor);
        self
    }
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Negative and NaN map to zero; values too large for a `Duration` saturate.
fn from_millis_f64(ms: f64) -> Duration {
    if ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

fn validate_non_negative(field: &'static str, value: f64, errors: &mut Vec<ConfigError>) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ConfigError::new(
            field,
            value.to_string(),
            "expected a finite number >= 0",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let c = ChartConfig::default();
        assert!(!c.legend);
        assert!(!c.tooltip);
        assert_eq!(c.small_diameter, 40.0);
        assert_eq!(c.medium_diameter, 115.0);
        assert_eq!(c.legend_spacing, 3.0);
        assert_eq!(c.transition_duration(), Duration::from_millis(500));
        assert_eq!(c.stagger_delay(), Duration::from_millis(7));
        assert_eq!(c.tooltip_margin, 5.0);
        assert_eq!(c.padding, 3.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_with_defaults() {
        let c = ChartConfig::from_json(
            r##"{
                "legend": true,
                "colorLegend": ["#ff0000", {"color": "#0000ff", "text": "High"}],
                "fixedDomain": {"min": 0, "max": 10},
                "selectedColor": "#000",
                "duration": 250,
                "tooltip": true,
                "tooltipProps": ["id", {"css": "v", "prop": "value", "display": "Value"}]
            }"##,
        )
        .expect("valid json");
        assert!(c.legend);
        assert_eq!(c.color_legend.len(), 2);
        assert_eq!(c.fixed_domain, Some(Domain::new(0.0, 10.0)));
        assert_eq!(c.selected_color, Some(Color::rgb(0, 0, 0)));
        assert_eq!(c.selected_text_color, None);
        assert_eq!(c.duration, 250.0);
        assert_eq!(c.delay, 7.0);
        assert_eq!(c.tooltip_props.len(), 2);
        assert_eq!(c.tooltip_margin, 5.0);
    }

    #[test]
    fn validate_collects_every_violation() {
        let c = ChartConfig {
            padding: -1.0,
            tooltip_margin: f64::NAN,
            font_size_factor: Some(0.0),
            fixed_domain: Some(Domain::new(5.0, 1.0)),
            ..ChartConfig::default()
        };
        let errors = c.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            ["tooltip_margin", "padding", "font_size_factor", "fixed_domain"]
        );
    }

    #[test]
    fn fractional_timing_from_json() {
        let c = ChartConfig::from_json(r#"{"duration": 250.5, "delay": 0.25}"#).expect("valid json");
        assert_eq!(c.duration, 250.5);
        assert!(c.validate().is_ok());
        assert!((c.transition_duration().as_secs_f64() - 0.2505).abs() < 1e-9);
        assert!((c.stagger_delay().as_secs_f64() - 0.000_25).abs() < 1e-9);
    }

    #[test]
    fn negative_timing_rejected() {
        let c = ChartConfig::from_json(r#"{"duration": -1, "delay": -0.5}"#).expect("valid json");
        let errors = c.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["duration", "delay"]);
        assert_eq!(c.transition_duration(), Duration::ZERO);
    }

    #[test]
    fn fractional_env_timing() {
        let parsed = ChartConfig::default()
            .with_env_from(|k| (k == ENV_DURATION_MS).then(|| "12.5".to_string()));
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.config.duration, 12.5);
    }

    #[test]
    fn medium_below_small_rejected() {
        let errors = ChartConfig::default()
            .diameters(50.0, 20.0)
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "medium_diameter");
    }

    #[test]
    fn degenerate_fixed_domain_is_valid() {
        assert!(ChartConfig::default().fixed_domain(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn env_overrides_and_diagnostics() {
        let vars: HashMap<&str, &str> = [
            (ENV_DURATION_MS, "1000"),
            (ENV_DELAY_MS, "soon"),
            (ENV_PADDING, " 1.5 "),
        ]
        .into_iter()
        .collect();
        let parsed = ChartConfig::default().with_env_from(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(parsed.config.duration, 1000.0);
        assert_eq!(parsed.config.delay, 7.0);
        assert_eq!(parsed.config.padding, 1.5);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].to_string(), "delay=soon (expected milliseconds as a number)");
    }

    #[test]
    fn builders() {
        let c = ChartConfig::default()
            .duration(Duration::from_millis(120))
            .delay(Duration::ZERO)
            .padding(0.0)
            .font_size_factor(0.3);
        assert_eq!(c.duration, 120.0);
        assert_eq!(c.delay, 0.0);
        assert_eq!(c.padding, 0.0);
        assert_eq!(c.font_size_factor, Some(0.3));
    }
}
