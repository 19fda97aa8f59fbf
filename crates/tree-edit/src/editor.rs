//! An editing session: one document and its undo/redo history.

use serde_json::Value;
use tree_edit_address::IntoAddress;

use crate::history::{History, HistoryOptions};
use crate::op::{EditError, Op};
use crate::transaction::{Transaction, TransactionBuilder};

/// Options for [`Editor`].
#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    pub history: HistoryOptions,
}

/// Owns a document together with the history of edits made to it.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tree_edit::Editor;
///
/// let mut editor = Editor::new(json!({"columns": ["a"], "rows": [["1"], ["2"]]}));
///
/// // "Add a column": header first, then one cell per row.
/// editor
///     .transact(|tx| {
///         tx.splice("columns", 1, 0, vec![json!("b")])?;
///         let rows = tx.doc()["rows"].as_array().map_or(0, Vec::len);
///         for row in 0..rows {
///             tx.splice(format!("rows[{row}]"), 1, 0, vec![json!("")])?;
///         }
///         Ok(())
///     })
///     .unwrap();
/// assert_eq!(editor.doc()["columns"], json!(["a", "b"]));
///
/// editor.undo().unwrap();
/// assert_eq!(editor.doc(), &json!({"columns": ["a"], "rows": [["1"], ["2"]]}));
/// editor.redo().unwrap();
/// assert_eq!(editor.doc()["rows"], json!([["1", ""], ["2", ""]]));
/// ```
#[derive(Debug, Clone)]
pub struct Editor {
    doc: Value,
    history: History,
}

impl Editor {
    pub fn new(doc: Value) -> Self {
        Self::with_options(doc, EditorOptions::default())
    }

    pub fn with_options(doc: Value, options: EditorOptions) -> Self {
        Self {
            doc,
            history: History::with_options(options.history),
        }
    }

    pub fn doc(&self) -> &Value {
        &self.doc
    }

    pub fn into_doc(self) -> Value {
        self.doc
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Swap in an unrelated document, returning the old one.
    ///
    /// History recorded against the old document cannot apply to the new
    /// one, so it is cleared.
    pub fn replace_doc(&mut self, doc: Value) -> Value {
        self.history.clear();
        std::mem::replace(&mut self.doc, doc)
    }

    /// Run an edit action as a single undoable step.
    ///
    /// If `action` returns `Ok`, everything it applied becomes one history
    /// entry (nothing is recorded when it applied nothing). If it returns
    /// `Err`, its changes are rolled back and the history is untouched.
    pub fn transact<T, F>(&mut self, action: F) -> Result<T, EditError>
    where
        F: FnOnce(&mut TransactionBuilder<'_>) -> Result<T, EditError>,
    {
        let mut builder = TransactionBuilder::new(&mut self.doc);
        match action(&mut builder) {
            Ok(out) => {
                let tx = builder.commit();
                if !tx.is_empty() {
                    self.history.push(tx);
                }
                Ok(out)
            }
            Err(err) => {
                builder.rollback();
                Err(err)
            }
        }
    }

    /// Overwrite one node as its own undoable step.
    pub fn set(&mut self, address: impl IntoAddress, value: Value) -> Result<Value, EditError> {
        self.transact(|tx| tx.set(address, value))
    }

    /// Splice one array as its own undoable step.
    pub fn splice(
        &mut self,
        address: impl IntoAddress,
        start: isize,
        delete_count: usize,
        items: Vec<Value>,
    ) -> Result<Vec<Value>, EditError> {
        self.transact(|tx| tx.splice(address, start, delete_count, items))
    }

    /// Apply `ops` as one undoable step, all or nothing.
    pub fn execute(&mut self, ops: Vec<Op>) -> Result<(), EditError> {
        let tx = Transaction::record(&mut self.doc, ops)?;
        if !tx.is_empty() {
            self.history.push(tx);
        }
        Ok(())
    }

    /// Record a transaction whose forward ops have already been applied to
    /// this editor's document.
    ///
    /// The transaction is taken on trust. If its forward ops were never
    /// applied, the next [`Editor::undo`] replays an inverse that does not
    /// match the document: it fails (leaving the document and history
    /// untouched) or, where addresses happen to line up, writes stale values.
    /// Prefer [`Editor::transact`] or [`Editor::execute`].
    pub fn push(&mut self, tx: Transaction) {
        self.history.push(tx);
    }

    pub fn undo(&mut self) -> Result<bool, EditError> {
        self.history.undo(&mut self.doc)
    }

    pub fn redo(&mut self) -> Result<bool, EditError> {
        self.history.redo(&mut self.doc)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
