//! # oxide-multi-value
//!
//! A form field that holds a user-editable list of values, such as several
//! email addresses entered into one field.
//!
//! This crate provides:
//! - A value store with minimum padding and a maximum row count
//! - A registry of the editors mounted for each row
//! - Field-level validation: minimum count, duplicates, custom predicates
//! - A render snapshot for whatever draws the field
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_multi_value::MultiValueField;
//!
//! let mut emails = MultiValueField::<String>::builder()
//!     .name("emails")
//!     .label("Email addresses")
//!     .min(2)
//!     .build()
//!     .unwrap();
//!
//! // Padded with two blank rows.
//! assert_eq!(emails.len(), 2);
//! assert!(emails.value().is_empty());
//!
//! emails.replace_at(0, "ada@example.com".to_string());
//! assert!(!emails.validate());
//! assert_eq!(emails.error_message(), "Minimum 2 field(s) is required");
//!
//! // Fixing the value clears the error without another validate() call.
//! emails.replace_at(1, "grace@example.com".to_string());
//! assert!(!emails.invalid());
//! assert_eq!(emails.value(), vec!["ada@example.com", "grace@example.com"]);
//! ```
//!
//! ## Editors
//!
//! ```rust
//! use std::rc::Rc;
//! use oxide_multi_value::{EditorRef, InputEditor, MultiValueField, SubEditor};
//! use oxide_multi_value::editor::rules::TextRule;
//!
//! let mut field = MultiValueField::<String>::builder().min(1).build().unwrap();
//!
//! let input = Rc::new(InputEditor::new().rule(TextRule::Email));
//! input.set_index(0);
//! let editor: EditorRef<String> = input.clone();
//! field.register(editor.clone());
//!
//! input.set_text("not an email");
//! field.editor_value_changed(&editor);
//! assert!(!field.validate());
//! assert!(input.error().is_some());
//! ```
//!
//! ## Duplicates of structured items
//!
//! ```rust
//! use oxide_multi_value::MultiValueField;
//! use serde_json::json;
//!
//! let mut contacts = MultiValueField::<serde_json::Value>::builder()
//!     .identity(|contact| contact.get("email").cloned())
//!     .value(vec![
//!         json!({"email": "ada@example.com", "label": "work"}),
//!         json!({"email": "ada@example.com", "label": "home"}),
//!     ])
//!     .build()
//!     .unwrap();
//! assert!(!contacts.validate());
//! ```

mod config;
pub mod editor;
mod error;
mod field;
mod item;
mod registry;
mod render;
mod store;
mod validation;

pub use config::{items_from_json, items_from_json_lenient, MultiValueFieldConfig};
pub use editor::{EditorRef, FormElementId, InputEditor, SubEditor};
pub use error::{MultiValueError, Result};
pub use field::{MultiValueField, MultiValueFieldBuilder, SubscriptionId};
pub use item::{ItemStrategy, ItemValue};
pub use registry::ChildRegistry;
pub use render::{Presenter, RenderModel, RowKey, RowModel};
pub use store::{ValueChange, ValueStore};
pub use validation::{
    CustomValidator, FieldValidator, ValidationFailure, ValidationMessages, ValidationState,
    DEFAULT_CUSTOM_MESSAGE, DEFAULT_DUPLICATE_MESSAGE,
};
