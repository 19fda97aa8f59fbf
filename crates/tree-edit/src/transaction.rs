//! Transactions: one undoable user action made of several atomic operations.

use serde_json::Value;
use tree_edit_address::IntoAddress;

use crate::op::apply::rollback;
use crate::op::{apply_op, apply_ops, apply_set, apply_splice, EditError, Op, SetOp, SpliceOp};

/// An ordered bundle of operations together with the sequence that undoes it.
///
/// `forward` is in application order. `inverse` holds the reverse of each
/// forward op, last-applied first, so running `forward` then `inverse`
/// restores the document exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    forward: Vec<Op>,
    inverse: Vec<Op>,
}

impl Transaction {
    /// Pair a forward sequence with its undo sequence.
    ///
    /// The caller is responsible for `inverse` actually undoing `forward`;
    /// prefer [`Transaction::record`] or [`TransactionBuilder`].
    pub fn new(forward: Vec<Op>, inverse: Vec<Op>) -> Self {
        Self { forward, inverse }
    }

    /// Apply `ops` to `doc` and capture their undo sequence.
    ///
    /// All-or-nothing: if an op fails, the document is restored and the error
    /// is returned.
    pub fn record(doc: &mut Value, ops: Vec<Op>) -> Result<Self, EditError> {
        let inverse = apply_ops(doc, &ops)?;
        Ok(Self { forward: ops, inverse })
    }

    pub fn forward(&self) -> &[Op] {
        &self.forward
    }

    pub fn inverse(&self) -> &[Op] {
        &self.inverse
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Re-run the forward sequence (redo).
    pub fn apply(&self, doc: &mut Value) -> Result<(), EditError> {
        apply_ops(doc, &self.forward).map(|_| ())
    }

    /// Run the inverse sequence (undo).
    pub fn revert(&self, doc: &mut Value) -> Result<(), EditError> {
        apply_ops(doc, &self.inverse).map(|_| ())
    }
}

/// Builds a [`Transaction`] by applying operations to a document one by one.
///
/// Each step is applied immediately, so later steps see the state produced
/// by earlier ones. If a step fails, every step applied so far is undone and
/// the builder is left empty. Dropping the builder without committing also
/// undoes its steps.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tree_edit::TransactionBuilder;
///
/// let mut doc = json!({"columns": ["id"], "rows": [[1], [2]]});
///
/// let mut tx = TransactionBuilder::new(&mut doc);
/// tx.splice("columns", 1, 0, vec![json!("name")]).unwrap();
/// let rows = tx.doc()["rows"].as_array().map_or(0, Vec::len);
/// for row in 0..rows {
///     tx.splice(format!("rows[{row}]"), 1, 0, vec![json!("")]).unwrap();
/// }
/// let tx = tx.commit();
///
/// assert_eq!(doc, json!({"columns": ["id", "name"], "rows": [[1, ""], [2, ""]]}));
/// tx.revert(&mut doc).unwrap();
/// assert_eq!(doc, json!({"columns": ["id"], "rows": [[1], [2]]}));
/// ```
pub struct TransactionBuilder<'doc> {
    doc: &'doc mut Value,
    forward: Vec<Op>,
    // Reverse ops in application order; flipped on commit.
    reverse: Vec<Op>,
}

impl<'doc> TransactionBuilder<'doc> {
    pub fn new(doc: &'doc mut Value) -> Self {
        Self {
            doc,
            forward: Vec::new(),
            reverse: Vec::new(),
        }
    }

    /// The document as modified by the steps applied so far.
    pub fn doc(&self) -> &Value {
        &*self.doc
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Overwrite the node at `address`, returning the previous value.
    pub fn set(&mut self, address: impl IntoAddress, value: Value) -> Result<Value, EditError> {
        let address = match address.into_address() {
            Ok(address) => address,
            Err(err) => return Err(self.abort(err.into())),
        };
        let op = SetOp::new(address, value);
        match apply_set(self.doc, &op) {
            Ok(out) => {
                self.forward.push(Op::Set(op));
                self.reverse.push(Op::Set(out.reverse));
                Ok(out.old_value)
            }
            Err(err) => Err(self.abort(err)),
        }
    }

    /// Splice the array at `address`, returning the removed elements.
    pub fn splice(
        &mut self,
        address: impl IntoAddress,
        start: isize,
        delete_count: usize,
        items: Vec<Value>,
    ) -> Result<Vec<Value>, EditError> {
        let address = match address.into_address() {
            Ok(address) => address,
            Err(err) => return Err(self.abort(err.into())),
        };
        let op = SpliceOp::new(address, start, delete_count, items);
        match apply_splice(self.doc, &op) {
            Ok(out) => {
                self.forward.push(Op::Splice(op));
                self.reverse.push(Op::Splice(out.reverse));
                Ok(out.deleted)
            }
            Err(err) => Err(self.abort(err)),
        }
    }

    /// Apply an already constructed operation.
    pub fn apply(&mut self, op: impl Into<Op>) -> Result<(), EditError> {
        let op = op.into();
        match apply_op(self.doc, &op) {
            Ok(reverse) => {
                self.forward.push(op);
                self.reverse.push(reverse);
                Ok(())
            }
            Err(err) => Err(self.abort(err)),
        }
    }

    /// Finish the action.
    pub fn commit(mut self) -> Transaction {
        let forward = std::mem::take(&mut self.forward);
        let mut inverse = std::mem::take(&mut self.reverse);
        inverse.reverse();
        Transaction { forward, inverse }
    }

    /// Undo every step applied so far and discard them.
    pub fn rollback(mut self) {
        self.undo_applied();
    }

    fn abort(&mut self, err: EditError) -> EditError {
        if !self.forward.is_empty() {
            log::warn!(
                "transaction aborted after {} applied step(s), rolling back: {err}",
                self.forward.len()
            );
        }
        self.undo_applied();
        err
    }

    fn undo_applied(&mut self) {
        let mut undo = std::mem::take(&mut self.reverse);
        undo.reverse();
        rollback(self.doc, &undo);
        self.forward.clear();
    }
}

/// A builder dropped without [`TransactionBuilder::commit`] rolls back.
impl Drop for TransactionBuilder<'_> {
    fn drop(&mut self) {
        if !self.reverse.is_empty() {
            log::warn!(
                "transaction dropped with {} uncommitted step(s), rolling back",
                self.reverse.len()
            );
            self.undo_applied();
        }
    }
}
