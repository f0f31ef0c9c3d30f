//! The per-item sub-editor contract.
//!
//! A field does not create or destroy its editors; the presentation layer
//! mounts one editor per row and reports it to the field through
//! [`MultiValueField::register`](crate::MultiValueField::register). The field
//! only keeps track of which editors are attached, forwards their edits into
//! the value store and asks them to validate.

mod input;
pub mod rules;

pub use input::{InputEditor, REQUIRED_MESSAGE};

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a form element, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormElementId(u64);

impl FormElementId {
    /// Allocates a fresh identifier.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A child editor responsible for one item of a multi-value field.
///
/// Editors are shared through [`EditorRef`] and mutate through `&self`, the
/// way mounted UI elements are referenced from several places at once.
pub trait SubEditor<T> {
    /// Returns the element identifier.
    fn id(&self) -> FormElementId;

    /// Returns the editor's current value.
    fn value(&self) -> T;

    /// Returns the row index assigned on the last render pass.
    fn index(&self) -> usize;

    /// Assigns the row index for the current render pass.
    fn set_index(&self, index: usize);

    /// Returns whether the editor has its own validation.
    ///
    /// Editors without validation are always individually valid.
    fn is_validatable(&self) -> bool {
        false
    }

    /// Validates the editor's value, showing its own inline error.
    fn validate(&self) -> bool {
        true
    }
}

/// Shared reference to a mounted editor. Registration is keyed by this
/// reference, not by index, since indices shift on removal.
pub type EditorRef<T> = Rc<dyn SubEditor<T>>;

/// Returns whether two editor references point at the same editor.
pub fn same_editor<T>(a: &EditorRef<T>, b: &EditorRef<T>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
