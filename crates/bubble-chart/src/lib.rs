#![forbid(unsafe_code)]

//! Packed bubble chart engine.
//!
//! [`BubbleChart`] turns dataset snapshots into animated frames: each update
//! cycle lays the data out, diffs it against what is on screen by `id`, and
//! schedules staggered transitions. The host feeds triggers in and draws
//! [`BubbleChart::frame`] after every [`BubbleChart::advance`].
//!
//! ```
//! use std::time::Duration;
//!
//! use bubble_chart::{BubbleChart, ChartConfig};
//! use bubble_core::geometry::Size;
//! use bubble_layout::{DataItem, Dataset};
//!
//! let mut chart = BubbleChart::new(ChartConfig::default(), Size::new(200.0, 200.0)).unwrap();
//! let report = chart
//!     .set_data(Dataset::from(vec![DataItem::leaf("a", 10.0), DataItem::leaf("b", 10.0)]))
//!     .unwrap();
//! assert_eq!(report.entering, ["a", "b"]);
//!
//! chart.advance(Duration::from_millis(600));
//! assert!(!chart.is_animating());
//! assert_eq!(chart.frame().len(), 2);
//! ```

pub mod chart;
pub mod config;
pub mod error;
pub mod label;
pub mod reconcile;
pub mod state;
pub mod tooltip;
pub mod transition;

pub use chart::{BubbleChart, ChartEvent, CycleReport, Trigger};
pub use config::{ChartConfig, ConfigError, ConfigParse};
pub use error::ChartError;
pub use label::{Label, SizeClass, label_for};
pub use reconcile::{Change, Phase, Reconciliation, exit_destination, reconcile};
pub use state::RenderState;
pub use tooltip::{
    Side, TooltipPlacement, TooltipProp, TooltipRow, TooltipState, position_tooltip, tooltip_rows,
};
pub use transition::{FrameNode, Keyframe, Transition, TransitionScheduler, Visual};
