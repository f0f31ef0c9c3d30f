//! The multi-value field controller.

use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::{items_from_json, items_from_json_lenient, MultiValueFieldConfig};
use crate::editor::{EditorRef, FormElementId};
use crate::error::Result;
use crate::item::{ItemStrategy, ItemValue};
use crate::registry::ChildRegistry;
use crate::render::{Presenter, RenderModel, RowKey, RowModel};
use crate::store::{ValueChange, ValueStore};
use crate::validation::{CustomValidator, FieldValidator, ValidationState};

type Observer<T> = Box<dyn FnMut(&ValueChange<T>)>;

/// Handle returned by [`MultiValueField::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A form field holding a user-editable list of values.
///
/// The field owns the list, keeps track of the editors mounted for its rows
/// and validates the list as a whole. Once a validation has failed, every
/// later edit validates again, so the error clears as soon as it is fixed.
pub struct MultiValueField<T> {
    id: FormElementId,
    label: String,
    name: String,
    store: ValueStore<T>,
    registry: ChildRegistry<T>,
    validator: FieldValidator<T>,
    observers: Vec<(SubscriptionId, Observer<T>)>,
    next_subscription: u64,
}

impl<T: fmt::Debug> fmt::Debug for MultiValueField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiValueField")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("name", &self.name)
            .field("store", &self.store)
            .field("registry", &self.registry)
            .field("validator", &self.validator)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<T: ItemValue + 'static> MultiValueField<T> {
    /// Starts building a field.
    pub fn builder() -> MultiValueFieldBuilder<T> {
        MultiValueFieldBuilder::new()
    }
}

impl<T: ItemValue + DeserializeOwned + 'static> MultiValueField<T> {
    /// Builds a field from serialized options alone.
    pub fn from_config(config: MultiValueFieldConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }
}

impl<T: Clone + PartialEq> MultiValueField<T> {
    /// Returns the field's own element identifier.
    pub fn id(&self) -> FormElementId {
        self.id
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the logical value: the non-empty items, in order.
    pub fn value(&self) -> Vec<T> {
        self.store.value()
    }

    /// Returns the raw rows, empty placeholders included.
    pub fn items(&self) -> &Rc<Vec<T>> {
        self.store.items()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Replaces all rows.
    ///
    /// Passing back the `Rc` this field last received or emitted does
    /// nothing.
    pub fn set_value(&mut self, items: impl Into<Rc<Vec<T>>>) {
        if let Some(change) = self.store.set_value(items.into()) {
            self.after_edit(&change);
        }
    }

    /// Replaces all rows from a JSON array.
    ///
    /// Anything but an array is rejected and leaves the field untouched.
    pub fn set_value_json(&mut self, value: &serde_json::Value) -> Result<()>
    where
        T: DeserializeOwned,
    {
        let items = items_from_json(value)?;
        self.set_value(items);
        Ok(())
    }

    /// Returns the minimum number of rows.
    pub fn min(&self) -> usize {
        self.store.min()
    }

    /// Updates the minimum, adding rows when there are too few.
    pub fn set_min(&mut self, min: usize) -> Result<()> {
        if let Some(change) = self.store.set_min(min)? {
            self.notify(&change);
        }
        Ok(())
    }

    /// Returns the maximum number of rows.
    pub fn max(&self) -> Option<usize> {
        self.store.max()
    }

    /// Updates the maximum.
    pub fn set_max(&mut self, max: Option<usize>) -> Result<()> {
        self.store.set_max(max)
    }

    /// Returns whether a row can be added.
    pub fn can_add(&self) -> bool {
        self.store.can_add()
    }

    /// Returns whether rows can be removed.
    pub fn can_remove(&self) -> bool {
        self.store.can_remove()
    }

    /// Appends a row with a new default value. Returns `false` when full.
    pub fn add_default(&mut self) -> bool {
        match self.store.add_default() {
            Some(change) => {
                self.notify(&change);
                true
            }
            None => false,
        }
    }

    /// Removes the row at `index`. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> bool {
        match self.store.remove_at(index) {
            Some(change) => {
                self.after_edit(&change);
                true
            }
            None => false,
        }
    }

    /// Replaces the row at `index`. Returns `false` if nothing changed.
    pub fn replace_at(&mut self, index: usize, value: T) -> bool {
        match self.store.replace_at(index, value) {
            Some(change) => {
                self.after_edit(&change);
                true
            }
            None => false,
        }
    }

    /// Attaches an editor that has been mounted for one of the rows.
    pub fn register(&mut self, editor: EditorRef<T>) -> bool {
        self.registry.register(editor)
    }

    /// Detaches an editor that is being unmounted.
    ///
    /// While the field is flagged invalid it is validated again, so a verdict
    /// that came from the detached editor does not outlive it.
    pub fn unregister(&mut self, editor: &EditorRef<T>) -> bool {
        let removed = self.registry.unregister(editor);
        if removed && self.validator.state().invalid {
            self.validate();
        }
        removed
    }

    /// Returns the attached editors.
    pub fn registry(&self) -> &ChildRegistry<T> {
        &self.registry
    }

    /// Takes the value of an edited editor into its row.
    ///
    /// Edits from editors that are not attached are dropped.
    pub fn editor_value_changed(&mut self, editor: &EditorRef<T>) -> bool {
        if !self.registry.contains(editor) {
            debug!(id = editor.id().raw(), "value change from detached editor");
            return false;
        }
        self.replace_at(editor.index(), editor.value())
    }

    /// Validates the field and its editors. See [`FieldValidator::validate`].
    pub fn validate(&mut self) -> bool {
        self.validator.validate(&self.store, &self.registry)
    }

    /// Returns the outcome of the last validation.
    pub fn validation_state(&self) -> &ValidationState {
        self.validator.state()
    }

    /// Returns the current error message, empty when there is none.
    pub fn error_message(&self) -> &str {
        &self.validator.state().error_message
    }

    /// Overrides the error message.
    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.validator.set_error_message(message);
    }

    /// Returns whether the field is flagged invalid.
    pub fn invalid(&self) -> bool {
        self.validator.state().invalid
    }

    /// Returns whether identical items are accepted.
    pub fn allow_duplicates(&self) -> bool {
        self.validator.allow_duplicates()
    }

    /// Sets whether identical items are accepted.
    pub fn set_allow_duplicates(&mut self, allow: bool) {
        self.validator.set_allow_duplicates(allow);
    }

    /// Installs a custom validator that replaces the built-in checks.
    pub fn set_custom_validator(&mut self, validator: impl Fn(&[T]) -> bool + 'static) {
        self.validator.set_custom(Some(Rc::new(validator)));
    }

    /// Removes the custom validator.
    pub fn clear_custom_validator(&mut self) {
        self.validator.set_custom(None);
    }

    /// Calls `observer` after every change of the rows.
    pub fn subscribe(&mut self, observer: impl FnMut(&ValueChange<T>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Stops notifying the observer behind `id`.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Builds the snapshot for a render pass.
    pub fn render_model(&self) -> RenderModel<T> {
        let min = self.store.min();
        let removable = self.store.can_remove();
        let state = self.validator.state();
        let strategy = self.store.strategy();
        let mut seen: Vec<serde_json::Value> = Vec::with_capacity(self.store.len());
        let mut rows = Vec::with_capacity(self.store.len());
        for (index, value) in self.store.items().iter().enumerate() {
            let identity = strategy.key(value);
            let occurrence = seen.iter().filter(|key| **key == identity).count();
            seen.push(identity.clone());
            rows.push(RowModel {
                index,
                key: RowKey {
                    identity,
                    occurrence,
                },
                value: value.clone(),
                required: index < min,
                removable,
            });
        }
        RenderModel {
            label: self.label.clone(),
            name: self.name.clone(),
            rows,
            can_add: self.store.can_add(),
            error_message: (!state.error_message.is_empty()).then(|| state.error_message.clone()),
            invalid: state.invalid,
        }
    }

    /// Hands the current snapshot to `presenter`.
    pub fn render(&self, presenter: &mut impl Presenter<T>) {
        presenter.present(&self.render_model());
    }

    fn after_edit(&mut self, change: &ValueChange<T>) {
        self.notify(change);
        if self.validator.state().invalid {
            self.validate();
        }
    }

    fn notify(&mut self, change: &ValueChange<T>) {
        for (_, observer) in &mut self.observers {
            observer(change);
        }
    }
}

/// Builder for [`MultiValueField`].
pub struct MultiValueFieldBuilder<T> {
    config: MultiValueFieldConfig,
    strategy: ItemStrategy<T>,
    custom: Option<CustomValidator<T>>,
    initial: Option<Vec<T>>,
}

impl<T> fmt::Debug for MultiValueFieldBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiValueFieldBuilder")
            .field("config", &self.config)
            .field("custom", &self.custom.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: ItemValue + 'static> Default for MultiValueFieldBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ItemValue + 'static> MultiValueFieldBuilder<T> {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self {
            config: MultiValueFieldConfig::default(),
            strategy: ItemStrategy::default(),
            custom: None,
            initial: None,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the minimum number of rows.
    #[must_use]
    pub fn min(mut self, min: usize) -> Self {
        self.config.min = min;
        self
    }

    /// Sets the maximum number of rows.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.config.max = Some(max);
        self
    }

    /// Accepts identical items.
    #[must_use]
    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.config.allow_duplicates = allow;
        self
    }

    /// Sets the message for duplicate items.
    #[must_use]
    pub fn duplicate_message(mut self, message: impl Into<String>) -> Self {
        self.config.duplicate_validation_msg = Some(message.into());
        self
    }

    /// Sets the message for too few items.
    #[must_use]
    pub fn min_message(mut self, message: impl Into<String>) -> Self {
        self.config.min_validation_msg = Some(message.into());
        self
    }

    /// Sets the message for a failed custom validation.
    #[must_use]
    pub fn custom_message(mut self, message: impl Into<String>) -> Self {
        self.config.custom_validation_msg = Some(message.into());
        self
    }

    /// Sets a validator that replaces the built-in checks.
    #[must_use]
    pub fn custom_validator(mut self, validator: impl Fn(&[T]) -> bool + 'static) -> Self {
        self.custom = Some(Rc::new(validator));
        self
    }

    /// Detects duplicates by a projection of each item. The projection also
    /// keys the rendered rows.
    #[must_use]
    pub fn identity<K, F>(mut self, identity: F) -> Self
    where
        K: PartialEq + Serialize,
        F: Fn(&T) -> K + 'static,
    {
        self.strategy = self.strategy.with_identity(identity);
        self
    }

    /// Replaces the empty check.
    #[must_use]
    pub fn empty_check(mut self, is_empty: impl Fn(&T) -> bool + 'static) -> Self {
        self.strategy = self.strategy.with_empty_check(is_empty);
        self
    }

    /// Replaces the factory for new rows.
    #[must_use]
    pub fn default_value(mut self, default_value: impl Fn() -> T + 'static) -> Self {
        self.strategy = self.strategy.with_default_value(default_value);
        self
    }

    /// Sets the initial rows.
    #[must_use]
    pub fn value(mut self, items: Vec<T>) -> Self {
        self.initial = Some(items);
        self
    }

    /// Builds the field, padded to the minimum.
    pub fn build(self) -> Result<MultiValueField<T>> {
        let messages = self.config.messages();
        let mut store = ValueStore::new(self.strategy, self.config.min, self.config.max)?;
        if let Some(items) = self.initial {
            store.set_value(Rc::new(items));
        }
        let id = FormElementId::next();
        Ok(MultiValueField {
            id,
            label: self.config.label,
            name: self.config.name,
            store,
            registry: ChildRegistry::new(id),
            validator: FieldValidator::new(messages, self.config.allow_duplicates, self.custom),
            observers: Vec::new(),
            next_subscription: 0,
        })
    }
}

impl<T: ItemValue + DeserializeOwned + 'static> MultiValueFieldBuilder<T> {
    /// Takes all serializable options, including the initial `value`.
    ///
    /// A `value` that is not an array is logged and treated as empty.
    #[must_use]
    pub fn config(mut self, config: MultiValueFieldConfig) -> Self {
        if !config.value.is_null() {
            self.initial = Some(items_from_json_lenient(&config.value));
        }
        self.config = config;
        self
    }
}
