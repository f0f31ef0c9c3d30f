//! Field options and reading item values from JSON.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MultiValueError, Result};
use crate::validation::{ValidationMessages, DEFAULT_CUSTOM_MESSAGE, DEFAULT_DUPLICATE_MESSAGE};

/// Serializable options of a multi-value field.
///
/// Keys use the camelCase names of the field's public properties, so options
/// can be loaded straight from a JSON form description:
///
/// ```rust
/// use oxide_multi_value::MultiValueFieldConfig;
///
/// let config = MultiValueFieldConfig::from_json(
///     r#"{"name": "emails", "min": 1, "max": 5, "allowDuplicates": false}"#,
/// )
/// .unwrap();
/// assert_eq!(config.min, 1);
/// assert_eq!(config.max, Some(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiValueFieldConfig {
    /// Display label.
    pub label: String,
    /// Field name.
    pub name: String,
    /// Minimum number of rows; the field is padded up to it.
    pub min: usize,
    /// Maximum number of rows, unbounded when absent.
    pub max: Option<usize>,
    /// Initial items. Anything but an array is ignored with a warning.
    pub value: serde_json::Value,
    /// Whether identical items are accepted.
    pub allow_duplicates: bool,
    /// Message for duplicate items.
    pub duplicate_validation_msg: Option<String>,
    /// Message when fewer than `min` items are filled in.
    pub min_validation_msg: Option<String>,
    /// Message when the custom validator fails.
    pub custom_validation_msg: Option<String>,
}

impl MultiValueFieldConfig {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the minimum number of rows.
    #[must_use]
    pub fn min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    /// Sets the maximum number of rows.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Accepts identical items.
    #[must_use]
    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }

    /// Returns the validation messages, defaults filled in.
    pub fn messages(&self) -> ValidationMessages {
        ValidationMessages {
            min: self.min_validation_msg.clone(),
            duplicate: self
                .duplicate_validation_msg
                .clone()
                .unwrap_or_else(|| DEFAULT_DUPLICATE_MESSAGE.to_string()),
            custom: self
                .custom_validation_msg
                .clone()
                .unwrap_or_else(|| DEFAULT_CUSTOM_MESSAGE.to_string()),
        }
    }
}

/// Returns the JSON kind of `value`, for messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Converts a JSON array into items, failing on anything else.
pub fn items_from_json<T: DeserializeOwned>(value: &serde_json::Value) -> Result<Vec<T>> {
    let serde_json::Value::Array(items) = value else {
        return Err(MultiValueError::NotAnArray {
            found: json_kind(value),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|source| MultiValueError::InvalidItem { index, source })
        })
        .collect()
}

/// Converts a JSON array into items, treating a malformed source as empty.
///
/// `null` means no value was given. Other non-arrays, and items that cannot
/// be converted, are logged and dropped.
pub fn items_from_json_lenient<T: DeserializeOwned>(value: &serde_json::Value) -> Vec<T> {
    match value {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match T::deserialize(item) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(index, error = %err, "skipping malformed item");
                    None
                }
            })
            .collect(),
        other => {
            warn!(found = json_kind(other), "value isn't an array, treating it as empty");
            Vec::new()
        }
    }
}
