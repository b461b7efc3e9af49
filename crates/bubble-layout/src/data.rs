#![forbid(unsafe_code)]

//! Input data model: JSON-shaped items and datasets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One externally supplied item of the dataset.
///
/// Presence of `children` makes the item a container; otherwise it is a leaf
/// and must carry a `value`. Unknown JSON properties are kept in `extra` so
/// tooltip rows can reference them by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItem {
    /// Identity key, unique across the whole dataset snapshot.
    pub id: String,
    /// Size of a leaf. Ignored on containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Label text; defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    /// Scalar fed to the color scales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_value: Option<f64>,
    /// Selected items use the configured override colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    /// Ordered children; `Some` makes this a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DataItem>>,
    /// Remaining properties, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataItem {
    /// Create a leaf with the given id and value.
    #[must_use]
    pub fn leaf(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value: Some(value),
            ..Self::default()
        }
    }

    /// Create a container with the given children.
    #[must_use]
    pub fn group(id: impl Into<String>, children: Vec<DataItem>) -> Self {
        Self {
            id: id.into(),
            children: Some(children),
            ..Self::default()
        }
    }

    /// Set the color value (builder).
    #[must_use]
    pub fn color_value(mut self, value: f64) -> Self {
        self.color_value = Some(value);
        self
    }

    /// Set the display text (builder).
    #[must_use]
    pub fn display_text(mut self, text: impl Into<String>) -> Self {
        self.display_text = Some(text.into());
        self
    }

    /// Mark the item as selected (builder).
    #[must_use]
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }

    /// Attach an extra property (builder).
    #[must_use]
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether this item is a container.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Label text: `displayText`, falling back to `id`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.id)
    }

    /// Whether the item is flagged as selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected.unwrap_or(false)
    }

    /// Look up a property by its JSON name.
    ///
    /// Known fields (`id`, `value`, `displayText`, `colorValue`, `selected`)
    /// resolve first, then `extra`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id.as_str())),
            "value" => self.value.map(Value::from),
            "displayText" => self.display_text.as_deref().map(Value::from),
            "colorValue" => self.color_value.map(Value::from),
            "selected" => self.selected.map(Value::from),
            _ => self.extra.get(name).cloned(),
        }
    }

    /// Shallow copy with the child list emptied, as stored on layout nodes.
    /// Containers stay containers.
    pub(crate) fn detached(&self) -> Self {
        Self {
            id: self.id.clone(),
            value: self.value,
            display_text: self.display_text.clone(),
            color_value: self.color_value,
            selected: self.selected,
            children: self.children.as_ref().map(|_| Vec::new()),
            extra: self.extra.clone(),
        }
    }
}

/// A full dataset: one root item or a top-level forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dataset {
    /// Ordered top-level items.
    Forest(Vec<DataItem>),
    /// A single root item.
    Tree(DataItem),
}

impl Dataset {
    /// Parse a dataset from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Top-level items as a slice.
    #[must_use]
    pub fn top_level(&self) -> &[DataItem] {
        match self {
            Self::Forest(items) => items,
            Self::Tree(item) => std::slice::from_ref(item),
        }
    }

    /// Whether the dataset has no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top_level().is_empty()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::Forest(Vec::new())
    }
}

impl From<Vec<DataItem>> for Dataset {
    fn from(items: Vec<DataItem>) -> Self {
        Self::Forest(items)
    }
}

impl From<DataItem> for Dataset {
    fn from(item: DataItem) -> Self {
        Self::Tree(item)
    }
}
