#![forbid(unsafe_code)]

//! Layout: dataset normalization and deterministic circle packing.
//!
//! ```
//! use bubble_layout::{DataItem, Dataset, PackConfig, layout};
//!
//! let data = Dataset::from(vec![DataItem::leaf("a", 10.0), DataItem::leaf("b", 10.0)]);
//! let generation = layout(&data, 200.0, &PackConfig::default()).unwrap();
//! assert_eq!(generation.visible().count(), 2);
//! ```

pub mod data;
pub mod enclose;
pub mod hierarchy;
pub mod pack;
pub mod siblings;

pub use data::{DataItem, Dataset};
pub use hierarchy::{Hierarchy, HierarchyNode, InvalidDataError};
pub use pack::{Generation, LayoutNode, PackConfig, pack};

/// Normalize `dataset` and pack it into a square canvas of side `side`.
pub fn layout(
    dataset: &Dataset,
    side: f64,
    config: &PackConfig,
) -> Result<Generation, InvalidDataError> {
    let hierarchy = Hierarchy::build(dataset)?;
    Ok(pack(&hierarchy, side, config))
}
