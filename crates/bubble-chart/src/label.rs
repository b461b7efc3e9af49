#![forbid(unsafe_code)]

//! Bubble labels: text, size class, and font size.

use crate::config::ChartConfig;
use crate::transition::FrameNode;

/// Size bucket of a bubble, for label styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// Diameter below `smallDiameter`.
    Small,
    /// Diameter below `mediumDiameter`.
    Medium,
    /// Everything else.
    Large,
}

impl SizeClass {
    /// Classify a diameter against the configured thresholds.
    #[must_use]
    pub fn of(diameter: f64, small: f64, medium: f64) -> Self {
        if diameter < small {
            Self::Small
        } else if diameter < medium {
            Self::Medium
        } else {
            Self::Large
        }
    }

    /// Style class name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// A label as drawn in the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Identity key of the bubble.
    pub id: String,
    /// Text to draw.
    pub text: String,
    /// Size class of the bubble.
    pub size_class: SizeClass,
    /// Font size, when a factor is configured.
    pub font_size: Option<f64>,
    /// Anchor x (bubble center).
    pub x: f64,
    /// Anchor y (bubble center).
    pub y: f64,
    /// Label opacity.
    pub opacity: f64,
}

/// Label for one frame node. Containers carry no label.
#[must_use]
pub fn label_for(node: &FrameNode, config: &ChartConfig) -> Option<Label> {
    if node.item.is_container() {
        return None;
    }
    let v = &node.visual;
    Some(Label {
        id: node.id.clone(),
        text: node.item.label().to_string(),
        size_class: SizeClass::of(2.0 * v.r, config.small_diameter, config.medium_diameter),
        font_size: config.font_size_factor.map(|k| v.r * k),
        x: v.x,
        y: v.y,
        opacity: v.label_opacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::Visual;
    use bubble_layout::DataItem;
    use bubble_style::Color;
    use std::sync::Arc;

    fn frame(item: DataItem, r: f64) -> FrameNode {
        FrameNode {
            id: item.id.clone(),
            item: Arc::new(item),
            depth: 1,
            exiting: false,
            visual: Visual {
                x: 10.0,
                y: 20.0,
                r,
                opacity: 1.0,
                label_opacity: 0.5,
                fill: Color::rgb(0, 0, 0),
                text: Color::rgb(255, 255, 255),
            },
        }
    }

    #[test]
    fn size_classes_at_default_thresholds() {
        assert_eq!(SizeClass::of(39.9, 40.0, 115.0), SizeClass::Small);
        assert_eq!(SizeClass::of(40.0, 40.0, 115.0), SizeClass::Medium);
        assert_eq!(SizeClass::of(114.9, 40.0, 115.0), SizeClass::Medium);
        assert_eq!(SizeClass::of(115.0, 40.0, 115.0), SizeClass::Large);
        assert_eq!(SizeClass::Medium.as_str(), "medium");
    }

    #[test]
    fn leaf_label_uses_display_text() {
        let config = ChartConfig::default().font_size_factor(0.25);
        let label = label_for(&frame(DataItem::leaf("a", 1.0).display_text("Alpha"), 30.0), &config)
            .expect("leaf label");
        assert_eq!(label.text, "Alpha");
        assert_eq!(label.size_class, SizeClass::Medium);
        assert_eq!(label.font_size, Some(7.5));
        assert_eq!((label.x, label.y, label.opacity), (10.0, 20.0, 0.5));
    }

    #[test]
    fn label_defaults_to_id_without_font_factor() {
        let label = label_for(&frame(DataItem::leaf("plain", 1.0), 10.0), &ChartConfig::default())
            .expect("leaf label");
        assert_eq!(label.text, "plain");
        assert_eq!(label.size_class, SizeClass::Small);
        assert_eq!(label.font_size, None);
    }

    #[test]
    fn containers_have_no_label() {
        let node = frame(DataItem::group("g", Vec::new()), 50.0);
        assert_eq!(label_for(&node, &ChartConfig::default()), None);
    }
}
