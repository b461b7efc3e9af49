#![forbid(unsafe_code)]

//! The immutable render state of one update cycle.

use bubble_core::geometry::Size;
use bubble_layout::{Generation, LayoutNode};
use bubble_style::{ColorQuantizer, Domain, NodeColors};

use crate::config::ChartConfig;
use crate::transition::Visual;

/// Everything on screen after one cycle: layout, colors, and container size.
///
/// Built once per cycle and replaced wholesale; the chart keeps exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    size: Size,
    generation: Generation,
    colors: Vec<NodeColors>,
    quantizer: ColorQuantizer,
}

impl RenderState {
    /// State with nothing laid out yet.
    #[must_use]
    pub fn empty(size: Size, config: &ChartConfig) -> Self {
        let domain = config.fixed_domain.unwrap_or_default();
        Self {
            size,
            generation: Generation::empty(size.min_side()),
            colors: Vec::new(),
            quantizer: quantizer(config, domain),
        }
    }

    /// Resolve colors for `generation` and wrap it.
    ///
    /// The color domain is the configured fixed domain, or the extent of every
    /// item's color value.
    #[must_use]
    pub fn new(generation: Generation, size: Size, config: &ChartConfig) -> Self {
        let domain = config.fixed_domain.unwrap_or_else(|| {
            Domain::from_values(
                generation
                    .nodes()
                    .iter()
                    .skip(1)
                    .filter_map(|n| n.item.color_value),
            )
        });
        let quantizer = quantizer(config, domain);
        let colors = generation
            .nodes()
            .iter()
            .map(|n| quantizer.resolve(n.item.color_value, n.item.is_selected()))
            .collect();
        Self {
            size,
            generation,
            colors,
            quantizer,
        }
    }

    /// Container size the state was laid out for.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Canvas side `D`.
    #[must_use]
    pub fn side(&self) -> f64 {
        self.generation.side()
    }

    /// The layout.
    #[must_use]
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// The quantizer used for this state's colors.
    #[must_use]
    pub fn quantizer(&self) -> &ColorQuantizer {
        &self.quantizer
    }

    /// Colors of the node at `index`.
    #[must_use]
    pub fn colors(&self, index: usize) -> Option<&NodeColors> {
        self.colors.get(index)
    }

    /// Node with the given id, with its colors.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<(&LayoutNode, &NodeColors)> {
        let index = self.generation.position(id)?;
        Some((self.generation.get(index)?, self.colors.get(index)?))
    }

    /// Resting visual of the node with the given id.
    #[must_use]
    pub fn resting(&self, id: &str) -> Option<Visual> {
        self.node(id).map(|(node, colors)| Visual::resting(node, colors))
    }

    /// Visible nodes with their colors, in generation order.
    pub fn visible(&self) -> impl Iterator<Item = (&LayoutNode, &NodeColors)> {
        self.generation
            .nodes()
            .iter()
            .zip(&self.colors)
            .filter(|(n, _)| n.is_visible())
    }
}

fn quantizer(config: &ChartConfig, domain: Domain) -> ColorQuantizer {
    ColorQuantizer::new(&config.color_legend, domain).with_selected(
        config.selected_color.clone(),
        config.selected_text_color.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_layout::{DataItem, Dataset, PackConfig, layout};
    use bubble_style::{Color, LegendEntry};

    fn state(items: Vec<DataItem>, config: &ChartConfig) -> RenderState {
        let g = layout(&Dataset::Forest(items), 100.0, &PackConfig::default()).expect("valid");
        RenderState::new(g, Size::new(100.0, 120.0), config)
    }

    fn palette() -> ChartConfig {
        ChartConfig::default().color_legend(vec![
            LegendEntry::Color(Color::rgb(1, 1, 1)),
            LegendEntry::Color(Color::rgb(2, 2, 2)),
        ])
    }

    #[test]
    fn domain_from_data() {
        let s = state(
            vec![
                DataItem::leaf("lo", 1.0).color_value(10.0),
                DataItem::leaf("hi", 1.0).color_value(20.0),
                DataItem::leaf("none", 1.0),
            ],
            &palette(),
        );
        assert_eq!(s.quantizer().domain(), Domain::new(10.0, 20.0));
        assert_eq!(s.node("lo").expect("lo").1.fill, Color::rgb(1, 1, 1));
        assert_eq!(s.node("hi").expect("hi").1.fill, Color::rgb(2, 2, 2));
        assert_eq!(s.node("none").expect("none").1.fill, Color::rgb(1, 1, 1));
    }

    #[test]
    fn fixed_domain_wins() {
        let s = state(
            vec![DataItem::leaf("a", 1.0).color_value(0.0)],
            &palette().fixed_domain(0.0, 0.0),
        );
        assert_eq!(s.quantizer().domain(), Domain::new(0.0, 0.0));
        assert_eq!(s.quantizer().bucket(Some(0.0)), 0);
    }

    #[test]
    fn selected_uses_override() {
        let config = palette().selected_colors(Some(Color::rgb(9, 9, 9)), None);
        let s = state(vec![DataItem::leaf("a", 1.0).selected(true)], &config);
        let (_, colors) = s.node("a").expect("a");
        assert_eq!(colors.fill, Color::rgb(9, 9, 9));
    }

    #[test]
    fn resting_visual_matches_layout() {
        let s = state(vec![DataItem::leaf("a", 1.0)], &palette());
        let (node, _) = s.node("a").expect("a");
        let v = s.resting("a").expect("a");
        assert_eq!((v.x, v.y, v.r, v.opacity, v.label_opacity), (node.x, node.y, node.r, 1.0, 1.0));
        assert_eq!(s.side(), 100.0);
        assert_eq!(s.size(), Size::new(100.0, 120.0));
        assert_eq!(s.visible().count(), 1);
    }

    #[test]
    fn empty_state_has_nothing_visible() {
        let s = RenderState::empty(Size::new(10.0, 10.0), &ChartConfig::default());
        assert_eq!(s.visible().count(), 0);
        assert_eq!(s.resting("a"), None);
    }
}
