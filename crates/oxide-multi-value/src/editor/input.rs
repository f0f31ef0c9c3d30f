//! Default text editor for one item.

use std::cell::{Cell, RefCell};
use std::fmt;

use super::rules::TextRule;
use super::{FormElementId, SubEditor};

/// Message reported for a blank required row.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// A single-line text editor for one row of a multi-value field.
///
/// A blank editor is only checked for being required. Its rules apply once
/// there is text, so blank placeholder rows never produce rule errors.
pub struct InputEditor {
    id: FormElementId,
    value: RefCell<String>,
    index: Cell<usize>,
    required: Cell<bool>,
    error: RefCell<Option<String>>,
    rules: Vec<TextRule>,
}

impl fmt::Debug for InputEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputEditor")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("index", &self.index)
            .field("required", &self.required)
            .field("error", &self.error)
            .field("rules", &self.rules)
            .finish()
    }
}

impl Default for InputEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl InputEditor {
    /// Creates an empty editor.
    pub fn new() -> Self {
        Self {
            id: FormElementId::next(),
            value: RefCell::new(String::new()),
            index: Cell::new(0),
            required: Cell::new(false),
            error: RefCell::new(None),
            rules: Vec::new(),
        }
    }

    /// Adds a rule. Rules are checked in the order they were added.
    #[must_use]
    pub fn rule(mut self, rule: TextRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = RefCell::new(value.into());
        self
    }

    /// Replaces the text, as typing into the editor would.
    pub fn set_text(&self, value: impl Into<String>) {
        *self.value.borrow_mut() = value.into();
    }

    /// Marks the editor as required.
    pub fn set_required(&self, required: bool) {
        self.required.set(required);
    }

    /// Returns whether the editor is required.
    pub fn is_required(&self) -> bool {
        self.required.get()
    }

    /// Returns the inline error from the last validation.
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    fn violation(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return self.required.get().then(|| REQUIRED_MESSAGE.to_string());
        }
        self.rules.iter().find_map(|rule| rule.violation(text))
    }
}

impl SubEditor<String> for InputEditor {
    fn id(&self) -> FormElementId {
        self.id
    }

    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn index(&self) -> usize {
        self.index.get()
    }

    fn set_index(&self, index: usize) {
        self.index.set(index);
    }

    fn is_validatable(&self) -> bool {
        true
    }

    fn validate(&self) -> bool {
        let error = self.violation(&self.value.borrow());
        let valid = error.is_none();
        *self.error.borrow_mut() = error;
        valid
    }
}
