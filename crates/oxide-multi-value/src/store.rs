//! Value store: the ordered collection of item values behind a field.
//!
//! The store keeps the raw collection, which may contain empty placeholder
//! rows, and derives the logical value from it by dropping empty items.
//! Every mutation replaces the collection with a new `Rc`, so snapshots
//! handed out in a [`ValueChange`] are never modified afterwards.

use std::rc::Rc;

use tracing::debug;

use crate::error::{MultiValueError, Result};
use crate::item::ItemStrategy;

/// Previous and current raw collections of a store mutation.
#[derive(Debug)]
pub struct ValueChange<T> {
    /// Collection before the mutation.
    pub previous: Rc<Vec<T>>,
    /// Collection after the mutation, padded to the minimum.
    pub current: Rc<Vec<T>>,
}

impl<T> Clone for ValueChange<T> {
    fn clone(&self) -> Self {
        Self {
            previous: Rc::clone(&self.previous),
            current: Rc::clone(&self.current),
        }
    }
}

/// Ordered, index-addressed item values with cardinality bounds.
#[derive(Debug)]
pub struct ValueStore<T> {
    items: Rc<Vec<T>>,
    last_external: Option<Rc<Vec<T>>>,
    min: usize,
    max: Option<usize>,
    strategy: ItemStrategy<T>,
}

impl<T: Clone> ValueStore<T> {
    /// Creates a store padded to `min` items.
    pub fn new(strategy: ItemStrategy<T>, min: usize, max: Option<usize>) -> Result<Self> {
        check_bounds(min, max)?;
        let mut store = Self {
            items: Rc::new(Vec::new()),
            last_external: None,
            min,
            max,
            strategy,
        };
        store.ensure_min();
        Ok(store)
    }

    /// Returns the raw collection, empty placeholders included.
    pub fn items(&self) -> &Rc<Vec<T>> {
        &self.items
    }

    /// Returns the number of stored rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Returns the logical value: the non-empty items, in order.
    pub fn value(&self) -> Vec<T> {
        self.strategy.compact(&self.items)
    }

    /// Returns the item strategy.
    pub fn strategy(&self) -> &ItemStrategy<T> {
        &self.strategy
    }

    /// Returns the minimum number of rows.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Returns the maximum number of rows, `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Returns whether another row may be added.
    pub fn can_add(&self) -> bool {
        self.max.map_or(true, |max| self.items.len() < max)
    }

    /// Returns whether rows may be removed without dropping below `min`.
    pub fn can_remove(&self) -> bool {
        self.items.len() > self.min
    }

    /// Replaces the whole collection.
    ///
    /// Assigning the collection that was last assigned, or the one the store
    /// currently holds, is ignored so that a value handed out to an observer
    /// can travel back in without starting another update.
    pub fn set_value(&mut self, items: Rc<Vec<T>>) -> Option<ValueChange<T>> {
        let is_echo = Rc::ptr_eq(&items, &self.items)
            || self
                .last_external
                .as_ref()
                .is_some_and(|last| Rc::ptr_eq(last, &items));
        if is_echo {
            debug!(len = items.len(), "ignoring echo of current value");
            return None;
        }

        self.last_external = Some(Rc::clone(&items));
        let previous = std::mem::replace(&mut self.items, items);
        self.ensure_min();
        Some(self.change_from(previous))
    }

    /// Updates the minimum and pads the collection if it is now too short.
    ///
    /// Lowering the minimum never removes rows.
    pub fn set_min(&mut self, min: usize) -> Result<Option<ValueChange<T>>> {
        check_bounds(min, self.max)?;
        self.min = min;
        let previous = Rc::clone(&self.items);
        if self.ensure_min() {
            Ok(Some(self.change_from(previous)))
        } else {
            Ok(None)
        }
    }

    /// Updates the maximum. Rows beyond it are kept.
    pub fn set_max(&mut self, max: Option<usize>) -> Result<()> {
        check_bounds(self.min, max)?;
        self.max = max;
        Ok(())
    }

    /// Appends a newly generated default item unless the field is full.
    pub fn add_default(&mut self) -> Option<ValueChange<T>> {
        if !self.can_add() {
            debug!(len = self.items.len(), max = ?self.max, "field is full, not adding");
            return None;
        }
        let mut next = Vec::clone(&self.items);
        next.push(self.strategy.new_value());
        Some(self.commit(next))
    }

    /// Removes the item at `index`, shifting later items down.
    ///
    /// An out-of-range index is ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<ValueChange<T>> {
        if index >= self.items.len() {
            debug!(index, len = self.items.len(), "remove index out of range");
            return None;
        }
        let mut next = Vec::clone(&self.items);
        next.remove(index);
        Some(self.commit(next))
    }

    /// Substitutes the item at `index` in place.
    ///
    /// Nothing happens when the index is out of range or the new value equals
    /// the stored one.
    pub fn replace_at(&mut self, index: usize, value: T) -> Option<ValueChange<T>>
    where
        T: PartialEq,
    {
        match self.items.get(index) {
            None => {
                debug!(index, len = self.items.len(), "replace index out of range");
                None
            }
            Some(current) if *current == value => {
                debug!(index, "value is already the same, skipping update");
                None
            }
            Some(_) => {
                let mut next = Vec::clone(&self.items);
                next[index] = value;
                Some(self.commit(next))
            }
        }
    }

    fn commit(&mut self, next: Vec<T>) -> ValueChange<T> {
        let previous = std::mem::replace(&mut self.items, Rc::new(next));
        self.ensure_min();
        self.change_from(previous)
    }

    fn change_from(&self, previous: Rc<Vec<T>>) -> ValueChange<T> {
        ValueChange {
            previous,
            current: Rc::clone(&self.items),
        }
    }

    /// Pads with default items until `min` rows exist. Returns whether any
    /// row was added.
    fn ensure_min(&mut self) -> bool {
        let mut padded = false;
        while self.items.len() < self.min {
            let item = self.strategy.new_value();
            Rc::make_mut(&mut self.items).push(item);
            padded = true;
        }
        padded
    }
}

fn check_bounds(min: usize, max: Option<usize>) -> Result<()> {
    match max {
        Some(max) if min > max => Err(MultiValueError::InvalidBounds { min, max }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(min: usize, max: Option<usize>) -> ValueStore<String> {
        ValueStore::new(ItemStrategy::default(), min, max).unwrap()
    }

    fn strings(items: &[&str]) -> Rc<Vec<String>> {
        Rc::new(items.iter().map(|s| (*s).to_string()).collect())
    }

    #[test]
    fn test_new_pads_to_min() {
        let s = store(3, None);
        assert_eq!(s.len(), 3);
        assert!(s.value().is_empty());
    }

    #[test]
    fn test_rejects_min_above_max() {
        let err = ValueStore::<String>::new(ItemStrategy::default(), 3, Some(2)).unwrap_err();
        assert!(matches!(err, MultiValueError::InvalidBounds { min: 3, max: 2 }));
    }

    #[test]
    fn test_set_value_pads_without_touching_input() {
        let mut s = store(3, None);
        let input = strings(&["a"]);
        let change = s.set_value(Rc::clone(&input)).unwrap();
        assert_eq!(input.len(), 1);
        assert_eq!(change.current.len(), 3);
        assert_eq!(s.value(), vec!["a"]);
    }

    #[test]
    fn test_set_value_same_reference_is_ignored() {
        let mut s = store(0, None);
        let input = strings(&["a", "b"]);
        assert!(s.set_value(Rc::clone(&input)).is_some());
        assert!(s.set_value(Rc::clone(&input)).is_none());
        let current = Rc::clone(s.items());
        assert!(s.set_value(current).is_none());
    }

    #[test]
    fn test_set_value_equal_but_distinct_is_applied() {
        let mut s = store(0, None);
        assert!(s.set_value(strings(&["a"])).is_some());
        assert!(s.set_value(strings(&["a"])).is_some());
    }

    #[test]
    fn test_value_filters_empty_items() {
        let mut s = store(0, None);
        s.set_value(strings(&["", "a", "", "b"]));
        assert_eq!(s.value(), vec!["a", "b"]);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_set_min_grows_but_never_shrinks() {
        let mut s = store(0, None);
        s.set_value(strings(&["a", "b", "c"]));
        assert!(s.set_min(1).unwrap().is_none());
        assert_eq!(s.len(), 3);
        let change = s.set_min(5).unwrap().unwrap();
        assert_eq!(change.previous.len(), 3);
        assert_eq!(change.current.len(), 5);
    }

    #[test]
    fn test_add_default_respects_max() {
        let mut s = store(0, Some(2));
        assert!(s.add_default().is_some());
        assert!(s.add_default().is_some());
        assert!(!s.can_add());
        assert!(s.add_default().is_none());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_remove_at_shifts_items() {
        let mut s = store(0, None);
        s.set_value(strings(&["a", "b", "c"]));
        s.remove_at(1).unwrap();
        assert_eq!(s.value(), vec!["a", "c"]);
        assert!(s.remove_at(2).is_none());
        assert!(s.remove_at(usize::MAX).is_none());
    }

    #[test]
    fn test_remove_at_repads_to_min() {
        let mut s = store(2, None);
        s.set_value(strings(&["a", "b"]));
        s.remove_at(0).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.value(), vec!["b"]);
    }

    #[test]
    fn test_replace_at_skips_equal_value() {
        let mut s = store(0, None);
        s.set_value(strings(&["a", "b"]));
        assert!(s.replace_at(0, "a".to_string()).is_none());
        assert!(s.replace_at(5, "z".to_string()).is_none());
        let change = s.replace_at(1, "c".to_string()).unwrap();
        assert_eq!(*change.previous, vec!["a", "b"]);
        assert_eq!(*change.current, vec!["a", "c"]);
    }
}
