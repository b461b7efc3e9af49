#![forbid(unsafe_code)]

//! The chart driver: one serial update cycle per trigger.
//!
//! A cycle normalizes the data, packs it into the container's square canvas,
//! resolves colors, reconciles the new generation against the one on screen,
//! hands the resulting keyframes to the [`TransitionScheduler`], and finally
//! replaces the retained [`RenderState`] and refreshes the tooltip.
//!
//! # Invariants
//!
//! 1. Exactly one [`RenderState`] is retained; a cycle replaces it wholesale.
//! 2. A rejected cycle leaves the render state, the transitions, and the
//!    tooltip exactly as they were.
//! 3. The tooltip placement is recomputed after every cycle and every
//!    highlight, from the node's resting geometry.
//! 4. Time only moves through [`BubbleChart::advance`].
//!
//! # Failure Modes
//!
//! - Invalid data or unparseable JSON reject the cycle with a [`ChartError`]
//!   and a `warn!` event.
//! - Resizing or highlighting before any data has arrived does nothing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bubble_core::geometry::{Point, Size};
use bubble_layout::{Dataset, Hierarchy, PackConfig, pack};
use bubble_style::LegendItem;

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::label::{Label, label_for};
use crate::reconcile::{Phase, exit_destination, reconcile};
use crate::state::RenderState;
use crate::tooltip::{TooltipState, position_tooltip, tooltip_rows};
use crate::transition::{FrameNode, Keyframe, TransitionScheduler, Visual};

// ---------------------------------------------------------------------------
// Events and triggers
// ---------------------------------------------------------------------------

/// Notification for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartEvent {
    /// A bubble was clicked.
    Click {
        /// Identity of the clicked bubble.
        id: String,
    },
    /// The highlighted identity changed.
    HighlightChanged {
        /// New highlight, `None` when cleared.
        id: Option<String>,
    },
}

/// One unit of work for [`BubbleChart::dispatch`].
#[derive(Debug, Clone)]
pub enum Trigger {
    /// A new dataset snapshot.
    DataChanged(Dataset),
    /// The container was resized.
    Resized(Size),
    /// The pointer entered a bubble (`Some`) or left all bubbles (`None`).
    Highlighted {
        /// Highlighted identity.
        id: Option<String>,
        /// Measured tooltip box.
        tooltip: Size,
    },
    /// A bubble was clicked.
    Clicked(String),
}

/// Identities classified by one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// New identities, in layout order.
    pub entering: Vec<String>,
    /// Continuing identities, in layout order.
    pub updating: Vec<String>,
    /// Removed identities, in previous layout order.
    pub exiting: Vec<String>,
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

/// A packed bubble chart bound to one container.
#[derive(Debug, Clone)]
pub struct BubbleChart {
    config: ChartConfig,
    pack: PackConfig,
    hierarchy: Option<Hierarchy>,
    state: RenderState,
    scheduler: TransitionScheduler,
    tooltip: TooltipState,
}

impl BubbleChart {
    /// Create an empty chart for a container of the given size.
    pub fn new(config: ChartConfig, size: Size) -> Result<Self, ChartError> {
        config.validate()?;
        let pack = PackConfig::default().padding(config.padding);
        let scheduler =
            TransitionScheduler::new(config.transition_duration(), config.stagger_delay());
        let state = RenderState::empty(size, &config);
        Ok(Self {
            config,
            pack,
            hierarchy: None,
            state,
            scheduler,
            tooltip: TooltipState::default(),
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Current container size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.state.size()
    }

    /// The retained render state.
    #[must_use]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Current tooltip.
    #[must_use]
    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    // --- triggers ---

    /// Run a full update cycle for a new dataset.
    pub fn set_data(&mut self, dataset: Dataset) -> Result<CycleReport, ChartError> {
        let span = tracing::debug_span!(
            "update_cycle",
            trigger = "data",
            items = dataset.top_level().len()
        );
        let _guard = span.enter();

        let hierarchy = Hierarchy::build(&dataset).map_err(|e| {
            tracing::warn!(error = %e, "update cycle rejected");
            ChartError::from(e)
        })?;
        let size = self.state.size();
        Ok(self.run_cycle(hierarchy, size))
    }

    /// Parse a dataset from JSON and run a cycle for it.
    pub fn set_data_json(&mut self, text: &str) -> Result<CycleReport, ChartError> {
        let dataset = Dataset::from_json(text).map_err(|e| {
            tracing::warn!(error = %e, "update cycle rejected");
            ChartError::from(e)
        })?;
        self.set_data(dataset)
    }

    /// Re-lay out the retained dataset for a new container size.
    ///
    /// Before any data has arrived only the size is recorded.
    pub fn resize(&mut self, size: Size) -> Option<CycleReport> {
        let span = tracing::debug_span!(
            "update_cycle",
            trigger = "resize",
            width = size.width,
            height = size.height
        );
        let _guard = span.enter();

        let Some(hierarchy) = self.hierarchy.take() else {
            self.state = RenderState::empty(size, &self.config);
            return None;
        };
        Some(self.run_cycle(hierarchy, size))
    }

    /// Change the highlighted identity and re-place the tooltip.
    ///
    /// Emits [`ChartEvent::HighlightChanged`] only when the identity changes.
    pub fn highlight(&mut self, id: Option<&str>, tooltip: Size) -> Option<ChartEvent> {
        self.hierarchy.as_ref()?;
        let changed = self.tooltip.target.as_deref() != id;
        self.tooltip.target = id.map(str::to_string);
        self.tooltip.size = tooltip;
        self.refresh_tooltip();
        changed.then(|| ChartEvent::HighlightChanged {
            id: id.map(str::to_string),
        })
    }

    /// Report a click on `id` if it is part of the current layout.
    pub fn click(&mut self, id: &str) -> Option<ChartEvent> {
        self.state.generation().find(id)?;
        tracing::debug!(id, "bubble clicked");
        Some(ChartEvent::Click { id: id.to_string() })
    }

    /// Process one trigger and return the events it produced.
    pub fn dispatch(&mut self, trigger: Trigger) -> Result<Vec<ChartEvent>, ChartError> {
        let event = match trigger {
            Trigger::DataChanged(dataset) => {
                self.set_data(dataset)?;
                None
            }
            Trigger::Resized(size) => {
                self.resize(size);
                None
            }
            Trigger::Highlighted { id, tooltip } => self.highlight(id.as_deref(), tooltip),
            Trigger::Clicked(id) => self.click(&id),
        };
        Ok(event.into_iter().collect())
    }

    // --- time ---

    /// Advance the animation clock.
    pub fn advance(&mut self, dt: Duration) {
        self.scheduler.advance(dt);
    }

    /// Whether any transition is still running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.scheduler.is_animating()
    }

    // --- queries ---

    /// Every node as it should be drawn now: live nodes in layout order
    /// (sampled when in flight, resting otherwise), then exiting ghosts.
    #[must_use]
    pub fn frame(&self) -> Vec<FrameNode> {
        let mut frame: Vec<FrameNode> = self
            .state
            .visible()
            .map(|(node, colors)| FrameNode {
                id: node.id().to_string(),
                item: Arc::clone(&node.item),
                depth: node.depth,
                exiting: false,
                visual: self
                    .scheduler
                    .sample(node.id())
                    .unwrap_or_else(|| Visual::resting(node, colors)),
            })
            .collect();
        frame.extend(self.scheduler.ghost_frames());
        frame
    }

    /// Labels for the current frame.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        self.frame()
            .iter()
            .filter_map(|node| label_for(node, &self.config))
            .collect()
    }

    /// Legend rows, or nothing when the legend is disabled.
    #[must_use]
    pub fn legend_items(&self) -> Vec<LegendItem> {
        if !self.config.legend {
            return Vec::new();
        }
        self.state.quantizer().legend_items()
    }

    /// Deepest visible node whose resting circle contains `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&str> {
        // Nodes are breadth-first, so the last hit is the deepest.
        self.state
            .generation()
            .visible()
            .filter(|n| n.circle().contains(point))
            .last()
            .map(|n| n.id())
    }

    // --- cycle ---

    fn run_cycle(&mut self, hierarchy: Hierarchy, size: Size) -> CycleReport {
        let generation = pack(&hierarchy, size.min_side(), &self.pack);
        let next = RenderState::new(generation, size, &self.config);

        let (keyframes, report) = {
            let previous = &self.state;
            let changes = reconcile(Some(previous.generation()), next.generation());
            let order: HashMap<&str, usize> = next
                .generation()
                .visible()
                .enumerate()
                .map(|(i, n)| (n.id(), i))
                .collect();

            let mut keyframes = Vec::with_capacity(changes.len());
            let mut report = CycleReport::default();

            for change in changes.entering.iter().chain(&changes.updating) {
                let Some(node) = change.next else {
                    continue;
                };
                let Some(to) = next.resting(node.id()) else {
                    continue;
                };
                let phase = change.phase();
                let from = match phase {
                    Phase::Updating => previous.resting(node.id()).unwrap_or_else(|| to.clone()),
                    _ => Visual::entering(&to),
                };
                match phase {
                    Phase::Updating => report.updating.push(node.id().to_string()),
                    _ => report.entering.push(node.id().to_string()),
                }
                keyframes.push(Keyframe {
                    id: node.id().to_string(),
                    item: Arc::clone(&node.item),
                    depth: node.depth,
                    phase,
                    from,
                    to,
                    index: order.get(node.id()).copied().unwrap_or_default(),
                });
            }

            for (index, change) in changes.exiting.iter().enumerate() {
                let Some(node) = change.previous else {
                    continue;
                };
                let Some(from) = previous.resting(node.id()) else {
                    continue;
                };
                let dest = exit_destination(node, next.side());
                report.exiting.push(node.id().to_string());
                keyframes.push(Keyframe {
                    id: node.id().to_string(),
                    item: Arc::clone(&node.item),
                    depth: node.depth,
                    phase: Phase::Exiting,
                    to: Visual::exited(&from, dest.x, dest.y),
                    from,
                    index,
                });
            }

            (keyframes, report)
        };

        self.scheduler.begin(keyframes);
        self.state = next;
        self.hierarchy = Some(hierarchy);
        self.refresh_tooltip();

        tracing::debug!(
            entering = report.entering.len(),
            updating = report.updating.len(),
            exiting = report.exiting.len(),
            side = self.state.side(),
            "update cycle complete"
        );
        report
    }

    fn refresh_tooltip(&mut self) {
        let target = self
            .tooltip
            .target
            .as_deref()
            .filter(|_| self.config.tooltip)
            .and_then(|id| self.state.generation().find(id))
            .filter(|n| n.is_visible());
        let (placement, rows) = match target {
            Some(node) => (
                Some(position_tooltip(
                    &node.circle(),
                    self.state.size(),
                    self.tooltip.size,
                    self.config.tooltip_margin,
                )),
                tooltip_rows(&node.item, &self.config.tooltip_props),
            ),
            None => (None, Vec::new()),
        };
        self.tooltip.placement = placement;
        self.tooltip.rows = rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_layout::DataItem;

    const SQUARE: Size = Size::new(200.0, 200.0);

    fn chart() -> BubbleChart {
        BubbleChart::new(ChartConfig::default(), SQUARE).expect("valid config")
    }

    fn ab() -> Dataset {
        Dataset::from(vec![DataItem::leaf("a", 10.0), DataItem::leaf("b", 10.0)])
    }

    #[test]
    fn invalid_config_rejected() {
        let err = BubbleChart::new(ChartConfig::default().padding(-1.0), SQUARE).unwrap_err();
        assert!(matches!(err, ChartError::Config(ref e) if e.len() == 1));
    }

    #[test]
    fn first_cycle_enters_everything() {
        let mut c = chart();
        let report = c.set_data(ab()).expect("valid");
        assert_eq!(report.entering, ["a", "b"]);
        assert!(report.updating.is_empty() && report.exiting.is_empty());
        assert!(c.is_animating());
        let frame = c.frame();
        assert_eq!(frame.len(), 2);
        assert!(frame.iter().all(|f| f.visual.r == 0.0 && !f.exiting));
    }

    #[test]
    fn frame_rests_after_duration() {
        let mut c = chart();
        c.set_data(ab()).expect("valid");
        c.advance(Duration::from_secs(1));
        assert!(!c.is_animating());
        for f in c.frame() {
            let resting = c.state().resting(&f.id).expect("resting");
            assert_eq!(f.visual, resting);
        }
    }

    #[test]
    fn set_data_json_parses_and_rejects() {
        let mut c = chart();
        let report = c
            .set_data_json(r#"[{"id": "a", "value": 1}, {"id": "b", "value": 2}]"#)
            .expect("valid json");
        assert_eq!(report.entering.len(), 2);
        let err = c.set_data_json("[{").unwrap_err();
        assert!(matches!(err, ChartError::Parse(_)));
        assert_eq!(c.state().generation().visible().count(), 2);
    }

    #[test]
    fn click_only_known_ids() {
        let mut c = chart();
        c.set_data(ab()).expect("valid");
        assert_eq!(c.click("a"), Some(ChartEvent::Click { id: "a".into() }));
        assert_eq!(c.click("zzz"), None);
    }

    #[test]
    fn hit_test_prefers_deepest() {
        let mut c = chart();
        c.set_data(Dataset::from(vec![DataItem::group(
            "g",
            vec![DataItem::leaf("x", 1.0)],
        )]))
        .expect("valid");
        let x = c.state().generation().find("x").expect("x").clone();
        assert_eq!(c.hit_test(Point::new(x.x, x.y)), Some("x"));
        assert_eq!(c.hit_test(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn legend_follows_flag() {
        let mut c = chart();
        c.set_data(ab()).expect("valid");
        assert!(c.legend_items().is_empty());

        let mut c = BubbleChart::new(ChartConfig::default().legend(true), SQUARE).expect("valid");
        c.set_data(ab()).expect("valid");
        assert_eq!(c.legend_items().len(), 5);
    }

    #[test]
    fn labels_cover_leaves() {
        let mut c = chart();
        c.set_data(Dataset::from(vec![DataItem::group(
            "g",
            vec![DataItem::leaf("x", 1.0).display_text("Ex")],
        )]))
        .expect("valid");
        let labels = c.labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "Ex");
    }

    #[test]
    fn dispatch_routes_triggers() {
        let mut c = BubbleChart::new(ChartConfig::default().tooltip(vec!["id".into()]), SQUARE)
            .expect("valid");
        assert!(c.dispatch(Trigger::DataChanged(ab())).expect("valid").is_empty());
        let events = c
            .dispatch(Trigger::Highlighted {
                id: Some("a".into()),
                tooltip: Size::new(40.0, 20.0),
            })
            .expect("highlight");
        assert_eq!(events, [ChartEvent::HighlightChanged { id: Some("a".into()) }]);
        assert!(c.tooltip().is_visible());
        assert!(c.dispatch(Trigger::Resized(Size::new(100.0, 100.0))).expect("resize").is_empty());
        assert_eq!(c.state().side(), 100.0);
        let events = c.dispatch(Trigger::Clicked("b".into())).expect("click");
        assert_eq!(events, [ChartEvent::Click { id: "b".into() }]);
    }
}
