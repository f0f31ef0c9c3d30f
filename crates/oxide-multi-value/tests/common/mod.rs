#![allow(dead_code)]

use std::rc::Rc;

use oxide_multi_value::editor::rules::TextRule;
use oxide_multi_value::{
    EditorRef, InputEditor, MultiValueField, Presenter, RenderModel, SubEditor,
};

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub fn email_field(min: usize, items: &[&str]) -> MultiValueField<String> {
    MultiValueField::builder()
        .name("emails")
        .label("Email addresses")
        .min(min)
        .value(strings(items))
        .build()
        .unwrap_or_else(|e| panic!("Failed to build field: {e}"))
}

/// Mounts one `InputEditor` per row, like a keyed list renderer would.
#[derive(Default)]
pub struct MountedRows {
    pub editors: Vec<Rc<InputEditor>>,
}

impl MountedRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts or unmounts editors until there is one per row, then assigns
    /// index, value and required flag from the render snapshot.
    pub fn sync(&mut self, field: &mut MultiValueField<String>) {
        let model = field.render_model();
        while self.editors.len() > model.rows.len() {
            if let Some(editor) = self.editors.pop() {
                field.unregister(&editor_ref(&editor));
            }
        }
        while self.editors.len() < model.rows.len() {
            let editor = Rc::new(InputEditor::new().rule(TextRule::Email));
            field.register(editor_ref(&editor));
            self.editors.push(editor);
        }
        for (editor, row) in self.editors.iter().zip(&model.rows) {
            editor.set_index(row.index);
            editor.set_text(row.value.clone());
            editor.set_required(row.required);
        }
    }

    /// Removes a row through its remove control: the row's own editor is
    /// unmounted and the remaining ones are re-indexed.
    pub fn remove(&mut self, field: &mut MultiValueField<String>, index: usize) -> Rc<InputEditor> {
        let editor = self.editors.remove(index);
        field.remove_at(index);
        field.unregister(&editor_ref(&editor));
        self.sync(field);
        editor
    }

    /// Types into the editor of a row.
    pub fn type_into(&self, field: &mut MultiValueField<String>, index: usize, text: &str) {
        let editor = &self.editors[index];
        editor.set_text(text);
        field.editor_value_changed(&editor_ref(editor));
    }
}

pub fn editor_ref(editor: &Rc<InputEditor>) -> EditorRef<String> {
    editor.clone()
}

/// Records every snapshot it is given.
#[derive(Default)]
pub struct RecordingPresenter {
    pub frames: Vec<RenderModel<String>>,
}

impl Presenter<String> for RecordingPresenter {
    fn present(&mut self, model: &RenderModel<String>) {
        self.frames.push(model.clone());
    }
}
