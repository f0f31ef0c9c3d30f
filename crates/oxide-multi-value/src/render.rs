//! What a presentation layer needs to draw a multi-value field.

use serde::Serialize;

/// Stable key of a row for keyed list rendering.
///
/// `identity` is the item's identity projection and `occurrence` counts the
/// earlier rows with the same identity, so keys are unique within a snapshot
/// and a row keeps its key when rows before it with other identities go away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowKey {
    pub identity: serde_json::Value,
    pub occurrence: usize,
}

/// One row of the field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowModel<T> {
    /// Position of the row; assign it to the row's editor.
    pub index: usize,
    /// Key to mount the row's editor under.
    pub key: RowKey,
    /// Stored value, possibly an empty placeholder.
    pub value: T,
    /// Whether the row's editor must be filled in (`index < min`).
    pub required: bool,
    /// Whether the row shows a remove control.
    pub removable: bool,
}

/// Snapshot of a field for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel<T> {
    /// Display label.
    pub label: String,
    /// Field name.
    pub name: String,
    /// One entry per stored item, empty placeholders included.
    pub rows: Vec<RowModel<T>>,
    /// Whether the add control is shown.
    pub can_add: bool,
    /// Message for the error area, if any.
    pub error_message: Option<String>,
    /// Whether the field is flagged invalid.
    pub invalid: bool,
}

impl<T> RenderModel<T> {
    /// Returns whether the "no records" placeholder should be shown.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Receives render snapshots. Implemented by the presentation layer.
pub trait Presenter<T> {
    /// Draws the field.
    fn present(&mut self, model: &RenderModel<T>);
}
