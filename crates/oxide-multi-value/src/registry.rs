//! Registry of the editors currently mounted for a field.
//!
//! An editor is attached between its mount and unmount signals. Edits are
//! only forwarded while it is attached, which is the Rust form of wiring a
//! value-change listener on registration and removing it on unregistration.

use tracing::{debug, trace};

use crate::editor::{same_editor, EditorRef, FormElementId, SubEditor};

/// Tracks attached editors by reference.
pub struct ChildRegistry<T> {
    owner: FormElementId,
    editors: Vec<EditorRef<T>>,
}

impl<T> std::fmt::Debug for ChildRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildRegistry")
            .field("owner", &self.owner)
            .field("editors", &self.editors.len())
            .finish()
    }
}

impl<T> ChildRegistry<T> {
    /// Creates an empty registry for the field identified by `owner`.
    pub fn new(owner: FormElementId) -> Self {
        Self {
            owner,
            editors: Vec::new(),
        }
    }

    /// Attaches a mounted editor.
    ///
    /// Returns `false` when the editor is the owning field itself or is
    /// already attached; neither case changes the registry.
    pub fn register(&mut self, editor: EditorRef<T>) -> bool {
        if editor.id() == self.owner {
            debug!(id = editor.id().raw(), "ignoring registration of the owning field");
            return false;
        }
        if self.contains(&editor) {
            debug!(id = editor.id().raw(), "editor already registered");
            return false;
        }
        trace!(id = editor.id().raw(), index = editor.index(), "editor registered");
        self.editors.push(editor);
        true
    }

    /// Detaches an editor. Unknown or already detached editors are ignored.
    pub fn unregister(&mut self, editor: &EditorRef<T>) -> bool {
        match self.editors.iter().position(|e| same_editor(e, editor)) {
            Some(pos) => {
                let removed = self.editors.remove(pos);
                trace!(id = removed.id().raw(), "editor unregistered");
                true
            }
            None => {
                debug!(id = editor.id().raw(), "unregister for unknown editor");
                false
            }
        }
    }

    /// Returns whether `editor` is attached.
    pub fn contains(&self, editor: &EditorRef<T>) -> bool {
        self.editors.iter().any(|e| same_editor(e, editor))
    }

    /// Returns the number of attached editors.
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Returns whether no editor is attached.
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Iterates over attached editors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EditorRef<T>> {
        self.editors.iter()
    }

    /// Calls `f` for every attached editor that has its own validation.
    pub fn for_each_validatable(&self, mut f: impl FnMut(&dyn SubEditor<T>)) {
        for editor in self.editors.iter().filter(|e| e.is_validatable()) {
            f(&**editor);
        }
    }

    /// Validates every editor and returns whether all of them passed.
    ///
    /// All editors are asked, even after one fails, so each can show its own
    /// inline error.
    pub fn validate_all(&self) -> bool {
        let mut valid = true;
        self.for_each_validatable(|editor| {
            valid &= editor.validate();
        });
        valid
    }
}
