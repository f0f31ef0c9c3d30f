//! Field-level validation: minimum count, duplicates and custom checks.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::registry::ChildRegistry;
use crate::store::ValueStore;

/// Default message when duplicate items are found.
pub const DEFAULT_DUPLICATE_MESSAGE: &str = "Duplicate values are not allowed";

/// Default message when the custom validator rejects the value.
pub const DEFAULT_CUSTOM_MESSAGE: &str = "Invalid value";

/// Predicate over the logical value; `true` means valid.
pub type CustomValidator<T> = Rc<dyn Fn(&[T]) -> bool>;

/// Which check rejected the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationFailure {
    /// The custom validator returned `false`.
    Custom,
    /// Fewer non-empty items than the minimum.
    Minimum,
    /// Two non-empty items share an identity.
    Duplicate,
    /// At least one editor rejected its own item.
    Item,
}

/// Outcome of the last validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationState {
    /// Result returned by the last `validate()` call.
    pub is_valid: bool,
    /// Message shown under the field; empty when there is none.
    pub error_message: String,
    /// Whether the field is flagged invalid for styling and re-validation.
    pub invalid: bool,
    /// The check that failed, if any.
    pub failure: Option<ValidationFailure>,
}

impl Default for ValidationState {
    fn default() -> Self {
        Self {
            is_valid: true,
            error_message: String::new(),
            invalid: false,
            failure: None,
        }
    }
}

impl ValidationState {
    fn fail(&mut self, failure: ValidationFailure, message: String) -> bool {
        self.is_valid = false;
        self.invalid = true;
        self.error_message = message;
        self.failure = Some(failure);
        false
    }
}

/// User-facing messages for the field-level checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessages {
    /// Overrides the generated minimum-count message.
    pub min: Option<String>,
    /// Message for duplicate items.
    pub duplicate: String,
    /// Message when the custom validator fails.
    pub custom: String,
}

impl Default for ValidationMessages {
    fn default() -> Self {
        Self {
            min: None,
            duplicate: DEFAULT_DUPLICATE_MESSAGE.to_string(),
            custom: DEFAULT_CUSTOM_MESSAGE.to_string(),
        }
    }
}

impl ValidationMessages {
    /// Returns the minimum-count message for `min`.
    pub fn min_message(&self, min: usize) -> String {
        self.min
            .clone()
            .unwrap_or_else(|| format!("Minimum {min} field(s) is required"))
    }
}

/// Runs the field-level checks and keeps the resulting state.
pub struct FieldValidator<T> {
    messages: ValidationMessages,
    allow_duplicates: bool,
    custom: Option<CustomValidator<T>>,
    state: ValidationState,
}

impl<T> fmt::Debug for FieldValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("messages", &self.messages)
            .field("allow_duplicates", &self.allow_duplicates)
            .field("custom", &self.custom.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl<T> FieldValidator<T> {
    /// Creates a validator.
    pub fn new(
        messages: ValidationMessages,
        allow_duplicates: bool,
        custom: Option<CustomValidator<T>>,
    ) -> Self {
        Self {
            messages,
            allow_duplicates,
            custom,
            state: ValidationState::default(),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    /// Returns the messages.
    pub fn messages(&self) -> &ValidationMessages {
        &self.messages
    }

    /// Returns a mutable reference to the messages.
    pub fn messages_mut(&mut self) -> &mut ValidationMessages {
        &mut self.messages
    }

    /// Returns whether duplicate items are accepted.
    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Sets whether duplicate items are accepted.
    pub fn set_allow_duplicates(&mut self, allow: bool) {
        self.allow_duplicates = allow;
    }

    /// Installs or removes the custom validator.
    pub fn set_custom(&mut self, custom: Option<CustomValidator<T>>) {
        self.custom = custom;
    }

    /// Overrides the error message without validating.
    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.state.error_message = message.into();
    }

    /// Validates the field.
    ///
    /// Every validatable editor is asked first. A custom validator, when set,
    /// then decides alone. Otherwise the minimum count and the duplicate
    /// checks run on the non-empty items and override the editors' verdict
    /// when they fail.
    pub fn validate(&mut self, store: &ValueStore<T>, registry: &ChildRegistry<T>) -> bool
    where
        T: Clone,
    {
        let items_valid = registry.validate_all();
        let value = store.value();

        if let Some(custom) = &self.custom {
            let valid = custom(value.as_slice());
            trace!(valid, "custom validation");
            if !valid {
                let message = self.messages.custom.clone();
                return self.state.fail(ValidationFailure::Custom, message);
            }
            self.state = ValidationState::default();
            return true;
        }

        if value.len() < store.min() {
            trace!(len = value.len(), min = store.min(), "minimum validation failed");
            let message = self.messages.min_message(store.min());
            return self.state.fail(ValidationFailure::Minimum, message);
        }

        if !self.allow_duplicates && store.strategy().has_duplicates(&value) {
            trace!("duplicate validation failed");
            let message = self.messages.duplicate.clone();
            return self.state.fail(ValidationFailure::Duplicate, message);
        }

        self.state = ValidationState {
            is_valid: items_valid,
            error_message: String::new(),
            invalid: !items_valid,
            failure: (!items_valid).then_some(ValidationFailure::Item),
        };
        trace!(valid = items_valid, "field validated");
        items_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FormElementId;
    use crate::item::ItemStrategy;

    fn fixture(min: usize, items: &[&str]) -> (ValueStore<String>, ChildRegistry<String>) {
        let mut store = ValueStore::new(ItemStrategy::default(), min, None).unwrap();
        store.set_value(Rc::new(items.iter().map(|s| (*s).to_string()).collect()));
        (store, ChildRegistry::new(FormElementId::next()))
    }

    #[test]
    fn test_default_state_is_valid() {
        let state = ValidationState::default();
        assert!(state.is_valid);
        assert!(!state.invalid);
        assert!(state.error_message.is_empty());
    }

    #[test]
    fn test_min_message_template() {
        let messages = ValidationMessages::default();
        assert_eq!(messages.min_message(2), "Minimum 2 field(s) is required");
        let custom = ValidationMessages {
            min: Some("Add at least two emails".into()),
            ..ValidationMessages::default()
        };
        assert_eq!(custom.min_message(2), "Add at least two emails");
    }

    #[test]
    fn test_duplicates_rejected() {
        let (store, registry) = fixture(0, &["a", "a", "b"]);
        let mut validator = FieldValidator::new(ValidationMessages::default(), false, None);
        assert!(!validator.validate(&store, &registry));
        assert_eq!(validator.state().error_message, DEFAULT_DUPLICATE_MESSAGE);
        assert_eq!(validator.state().failure, Some(ValidationFailure::Duplicate));
        assert!(validator.state().invalid);
    }

    #[test]
    fn test_duplicates_allowed() {
        let (store, registry) = fixture(0, &["a", "a", "b"]);
        let mut validator = FieldValidator::new(ValidationMessages::default(), true, None);
        assert!(validator.validate(&store, &registry));
        assert!(!validator.state().invalid);
    }

    #[test]
    fn test_empty_items_are_not_duplicates() {
        let (store, registry) = fixture(0, &["", "a", ""]);
        let mut validator = FieldValidator::new(ValidationMessages::default(), false, None);
        assert!(validator.validate(&store, &registry));
    }

    #[test]
    fn test_minimum_checked_before_duplicates() {
        let (store, registry) = fixture(3, &["a", "a"]);
        let mut validator = FieldValidator::new(ValidationMessages::default(), false, None);
        assert!(!validator.validate(&store, &registry));
        assert_eq!(validator.state().failure, Some(ValidationFailure::Minimum));
        assert_eq!(
            validator.state().error_message,
            "Minimum 3 field(s) is required"
        );
    }

    #[test]
    fn test_custom_validator_decides_alone() {
        let (store, registry) = fixture(3, &["a", "a"]);
        let accept_all: CustomValidator<String> = Rc::new(|_: &[String]| true);
        let mut validator =
            FieldValidator::new(ValidationMessages::default(), false, Some(accept_all));
        assert!(validator.validate(&store, &registry));
        assert!(validator.state().error_message.is_empty());

        validator.set_custom(Some(Rc::new(|_: &[String]| false)));
        assert!(!validator.validate(&store, &registry));
        assert_eq!(validator.state().error_message, DEFAULT_CUSTOM_MESSAGE);
        assert_eq!(validator.state().failure, Some(ValidationFailure::Custom));
    }

    #[test]
    fn test_success_clears_previous_error() {
        let (mut store, registry) = fixture(0, &["a", "a"]);
        let mut validator = FieldValidator::new(ValidationMessages::default(), false, None);
        assert!(!validator.validate(&store, &registry));
        store.replace_at(1, "b".to_string());
        assert!(validator.validate(&store, &registry));
        assert_eq!(validator.state(), &ValidationState::default());
    }
}
