//! Structural edits on `serde_json::Value` trees with undo/redo.
//!
//! Every edit is built from two self-inverting primitives, `set` and
//! `splice`. Applying one returns the operation that undoes it, so a user
//! action made of several primitives can be recorded as a [`Transaction`]
//! and later undone or redone from a bounded [`History`].
//!
//! ```
//! use serde_json::json;
//! use tree_edit::Editor;
//!
//! let mut editor = Editor::new(json!({"name": "A", "items": [1, 2, 3, 4, 5]}));
//! editor.set("name", json!("B")).unwrap();
//! editor.splice("items", 1, 2, vec![]).unwrap();
//! assert_eq!(editor.doc(), &json!({"name": "B", "items": [1, 4, 5]}));
//!
//! editor.undo().unwrap();
//! editor.undo().unwrap();
//! assert_eq!(editor.doc(), &json!({"name": "A", "items": [1, 2, 3, 4, 5]}));
//! ```

pub mod cli;
pub mod codec;
pub mod editor;
pub mod history;
pub mod op;
pub mod transaction;

pub use editor::{Editor, EditorOptions};
pub use history::{History, HistoryOptions, DEFAULT_CAPACITY};
pub use op::{apply_op, apply_ops, apply_set, apply_splice, EditError, Op, SetOp, SpliceOp};
pub use transaction::{Transaction, TransactionBuilder};
pub use tree_edit_address::{resolve, resolve_mut, Address, AddressError, IntoAddress, Step};
