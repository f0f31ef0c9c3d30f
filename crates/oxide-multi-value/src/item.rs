//! Item values and the pluggable strategies applied to them.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// A value that can be stored as one entry of a multi-value field.
///
/// The two hooks give the default behavior of a field: which items are
/// left out of the logical value, and what a freshly added row holds.
/// Both can be replaced per field through [`ItemStrategy`].
pub trait ItemValue: Clone + PartialEq {
    /// Returns whether this item counts as empty.
    fn is_empty_value(&self) -> bool;

    /// Returns the value used for a newly added row.
    fn empty_value() -> Self;

    /// Returns the identity of this item, used to key rendered rows.
    fn item_key(&self) -> serde_json::Value;
}

impl ItemValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn empty_value() -> Self {
        Self::new()
    }

    fn item_key(&self) -> serde_json::Value {
        serde_json::Value::String(self.clone())
    }
}

impl<T: ItemValue> ItemValue for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().map_or(true, ItemValue::is_empty_value)
    }

    fn empty_value() -> Self {
        None
    }

    fn item_key(&self) -> serde_json::Value {
        self.as_ref().map_or(serde_json::Value::Null, ItemValue::item_key)
    }
}

impl ItemValue for serde_json::Value {
    /// `null`, `false`, `""`, `[]` and `{}` are empty. Numbers never are,
    /// so `0` is a legitimate entry.
    fn is_empty_value(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Number(_) => false,
            Self::String(s) => s.is_empty(),
            Self::Array(items) => items.is_empty(),
            Self::Object(map) => map.is_empty(),
        }
    }

    fn empty_value() -> Self {
        Self::Null
    }

    fn item_key(&self) -> serde_json::Value {
        self.clone()
    }
}

/// Predicate deciding whether an item is empty.
pub type EmptyFn<T> = Rc<dyn Fn(&T) -> bool>;

/// Equality used for duplicate detection.
pub type EqualityFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

/// Factory for the value of a newly added row.
pub type DefaultFn<T> = Rc<dyn Fn() -> T>;

/// Projection of an item onto its identity, as JSON.
pub type KeyFn<T> = Rc<dyn Fn(&T) -> serde_json::Value>;

/// The pluggable behavior of a field's items: empty check, identity and
/// default value.
pub struct ItemStrategy<T> {
    is_empty: EmptyFn<T>,
    equality: EqualityFn<T>,
    default_value: DefaultFn<T>,
    key: KeyFn<T>,
}

impl<T> Clone for ItemStrategy<T> {
    fn clone(&self) -> Self {
        Self {
            is_empty: Rc::clone(&self.is_empty),
            equality: Rc::clone(&self.equality),
            default_value: Rc::clone(&self.default_value),
            key: Rc::clone(&self.key),
        }
    }
}

impl<T> fmt::Debug for ItemStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStrategy").finish_non_exhaustive()
    }
}

impl<T: ItemValue + 'static> Default for ItemStrategy<T> {
    fn default() -> Self {
        Self {
            is_empty: Rc::new(T::is_empty_value),
            equality: Rc::new(|a: &T, b: &T| a == b),
            default_value: Rc::new(T::empty_value),
            key: Rc::new(T::item_key),
        }
    }
}

impl<T: 'static> ItemStrategy<T> {
    /// Compares items by a projection instead of the whole value.
    ///
    /// Two items whose projections are equal are duplicates, even when they
    /// differ in fields the projection ignores. The projection also keys the
    /// rendered rows.
    #[must_use]
    pub fn with_identity<K, F>(mut self, identity: F) -> Self
    where
        K: PartialEq + Serialize,
        F: Fn(&T) -> K + 'static,
    {
        let identity = Rc::new(identity);
        let project = Rc::clone(&identity);
        self.equality = Rc::new(move |a: &T, b: &T| identity(a) == identity(b));
        self.key = Rc::new(move |value: &T| {
            serde_json::to_value(project(value)).unwrap_or(serde_json::Value::Null)
        });
        self
    }

    /// Replaces the equality used for duplicate detection.
    #[must_use]
    pub fn with_equality(mut self, equality: impl Fn(&T, &T) -> bool + 'static) -> Self {
        self.equality = Rc::new(equality);
        self
    }

    /// Replaces the empty check.
    #[must_use]
    pub fn with_empty_check(mut self, is_empty: impl Fn(&T) -> bool + 'static) -> Self {
        self.is_empty = Rc::new(is_empty);
        self
    }

    /// Replaces the factory for newly added rows.
    #[must_use]
    pub fn with_default_value(mut self, default_value: impl Fn() -> T + 'static) -> Self {
        self.default_value = Rc::new(default_value);
        self
    }
}

impl<T> ItemStrategy<T> {
    /// Returns whether `value` is empty.
    pub fn is_empty(&self, value: &T) -> bool {
        (self.is_empty)(value)
    }

    /// Returns whether `a` and `b` have the same identity.
    pub fn are_equal(&self, a: &T, b: &T) -> bool {
        (self.equality)(a, b)
    }

    /// Produces the value for a new row.
    pub fn new_value(&self) -> T {
        (self.default_value)()
    }

    /// Returns the identity of `value` as JSON.
    pub fn key(&self, value: &T) -> serde_json::Value {
        (self.key)(value)
    }

    /// Returns the non-empty items, in order.
    pub fn compact(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        items
            .iter()
            .filter(|item| !self.is_empty(item))
            .cloned()
            .collect()
    }

    /// Returns whether any two items share an identity.
    pub fn has_duplicates(&self, items: &[T]) -> bool {
        items.iter().enumerate().any(|(i, a)| {
            items[i + 1..]
                .iter()
                .any(|b| self.are_equal(a, b))
        })
    }
}
