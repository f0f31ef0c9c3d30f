//! Tests for editor registration and edits coming from editors.

mod common;
use common::*;

use std::rc::Rc;

use oxide_multi_value::{EditorRef, InputEditor, MultiValueField, SubEditor};

#[test]
fn sync_registers_one_editor_per_row() {
    let mut field = email_field(2, &["a@example.com", "b@example.com", "c@example.com"]);
    let mut rows = MountedRows::new();
    rows.sync(&mut field);

    assert_eq!(field.registry().len(), 3);
    for (index, editor) in rows.editors.iter().enumerate() {
        assert_eq!(editor.index(), index);
        assert!(field.registry().contains(&editor_ref(editor)));
    }
    assert!(rows.editors[0].is_required());
    assert!(!rows.editors[2].is_required());
}

#[test]
fn removal_reindexes_and_drops_registration() {
    let mut field = email_field(0, &["a", "b", "c"]);
    let mut rows = MountedRows::new();
    rows.sync(&mut field);

    let removed = rows.remove(&mut field, 1);
    assert_eq!(field.value(), vec!["a", "c"]);
    assert!(!field.registry().contains(&editor_ref(&removed)));
    assert_eq!(field.registry().len(), 2);
    assert_eq!(rows.editors[1].index(), 1);
    assert_eq!(rows.editors[1].value(), "c");
}

#[test]
fn edits_from_removed_editor_are_dropped() {
    let mut field = email_field(0, &["a", "b", "c"]);
    let mut rows = MountedRows::new();
    rows.sync(&mut field);

    let removed = rows.remove(&mut field, 0);
    removed.set_text("zombie");
    assert!(!field.editor_value_changed(&editor_ref(&removed)));
    assert_eq!(field.value(), vec!["b", "c"]);
}

#[test]
fn editor_edit_lands_at_its_index() {
    let mut field = email_field(0, &["a", "b"]);
    let mut rows = MountedRows::new();
    rows.sync(&mut field);

    rows.type_into(&mut field, 1, "z");
    assert_eq!(field.value(), vec!["a", "z"]);
}

#[test]
fn unchanged_editor_value_is_not_an_edit() {
    let mut field = email_field(0, &["a"]);
    let mut rows = MountedRows::new();
    rows.sync(&mut field);

    let before = Rc::clone(field.items());
    let editor = editor_ref(&rows.editors[0]);
    assert!(!field.editor_value_changed(&editor));
    assert!(Rc::ptr_eq(&before, field.items()));
}

#[test]
fn field_ignores_its_own_registration() {
    struct Nested {
        field_id: oxide_multi_value::FormElementId,
    }

    impl SubEditor<String> for Nested {
        fn id(&self) -> oxide_multi_value::FormElementId {
            self.field_id
        }

        fn value(&self) -> String {
            String::new()
        }

        fn index(&self) -> usize {
            0
        }

        fn set_index(&self, _index: usize) {}
    }

    let mut field: MultiValueField<String> = MultiValueField::builder().build().unwrap();
    let own: EditorRef<String> = Rc::new(Nested {
        field_id: field.id(),
    });
    assert!(!field.register(own));
    assert!(field.registry().is_empty());
}

#[test]
fn unregister_is_tolerant() {
    let mut field = email_field(0, &["a"]);
    let stranger: EditorRef<String> = Rc::new(InputEditor::new());
    assert!(!field.unregister(&stranger));

    let mut rows = MountedRows::new();
    rows.sync(&mut field);
    let editor = editor_ref(&rows.editors[0]);
    assert!(field.unregister(&editor));
    assert!(!field.unregister(&editor));
    assert!(field.registry().is_empty());
}

#[test]
fn out_of_order_registration_events() {
    let mut field = email_field(0, &[]);
    let a: EditorRef<String> = Rc::new(InputEditor::new());
    let b: EditorRef<String> = Rc::new(InputEditor::new());

    assert!(!field.unregister(&b));
    assert!(field.register(Rc::clone(&b)));
    assert!(field.register(Rc::clone(&a)));
    assert!(field.unregister(&b));
    assert!(!field.register(Rc::clone(&a)));
    assert_eq!(field.registry().len(), 1);
}
