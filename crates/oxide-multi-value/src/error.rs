//! Error types for multi-value fields.

use thiserror::Error;

/// Errors raised by multi-value field operations.
///
/// Only hard failures live here. A field that fails its minimum, duplicate
/// or custom checks is not an error: it is reported through
/// [`ValidationState`](crate::ValidationState).
#[derive(Debug, Error)]
pub enum MultiValueError {
    /// A value was assigned that is not an ordered sequence.
    #[error("value must be an array, got {found}")]
    NotAnArray {
        /// Kind of the value that was received.
        found: &'static str,
    },

    /// The minimum bound exceeds the maximum bound.
    #[error("min ({min}) must not exceed max ({max})")]
    InvalidBounds {
        /// Requested minimum.
        min: usize,
        /// Requested maximum.
        max: usize,
    },

    /// An item of a dynamic value could not be converted.
    #[error("invalid item at index {index}: {source}")]
    InvalidItem {
        /// Position of the offending item.
        index: usize,
        /// Underlying conversion error.
        source: serde_json::Error,
    },

    /// Field options could not be parsed.
    #[error("failed to parse field options: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for multi-value field operations.
pub type Result<T> = std::result::Result<T, MultiValueError>;
