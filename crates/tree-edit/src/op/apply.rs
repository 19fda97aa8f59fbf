//! Atomic operation apply logic.

use serde_json::Value;
use tree_edit_address::{kind_of, resolve_mut};

use super::types::{EditError, Op, SetOp, SetOutcome, SpliceOp, SpliceOutcome};

/// Normalize a splice start position against an array of length `len`.
///
/// Negative positions count from the end and stop at `0`; positions past the
/// end stop at `len`.
///
/// # Example
///
/// ```
/// use tree_edit::op::splice_start;
///
/// assert_eq!(splice_start(-1, 3), 2);
/// assert_eq!(splice_start(-10, 3), 0);
/// assert_eq!(splice_start(1, 3), 1);
/// assert_eq!(splice_start(5, 2), 2);
/// ```
pub fn splice_start(start: isize, len: usize) -> usize {
    if start < 0 {
        len.saturating_sub(start.unsigned_abs())
    } else {
        (start as usize).min(len)
    }
}

/// Overwrite the node at `op.address`.
///
/// # Errors
///
/// [`EditError::AddressNotFound`] if the address does not resolve. The
/// document is left untouched.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tree_edit::op::{apply_set, SetOp};
/// use tree_edit_address::Address;
///
/// let mut doc = json!({"name": "A"});
/// let op = SetOp::new(Address::parse("name").unwrap(), json!("B"));
/// let out = apply_set(&mut doc, &op).unwrap();
/// assert_eq!(out.old_value, json!("A"));
/// assert_eq!(doc, json!({"name": "B"}));
///
/// apply_set(&mut doc, &out.reverse).unwrap();
/// assert_eq!(doc, json!({"name": "A"}));
/// ```
pub fn apply_set(doc: &mut Value, op: &SetOp) -> Result<SetOutcome, EditError> {
    let Some(target) = resolve_mut(doc, &op.address) else {
        log::warn!("set: address `{}` does not match any node", op.address);
        return Err(EditError::AddressNotFound(op.address.clone()));
    };
    let old_value = std::mem::replace(target, op.value.clone());
    log::trace!("set `{}`", op.address);
    Ok(SetOutcome {
        reverse: SetOp::new(op.address.clone(), old_value.clone()),
        old_value,
    })
}

/// Splice the array at `op.address`.
///
/// # Errors
///
/// - [`EditError::AddressNotFound`] if the address does not resolve.
/// - [`EditError::TypeMismatch`] if it resolves to something other than an array.
///
/// The document is left untouched on error.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tree_edit::op::{apply_splice, SpliceOp};
/// use tree_edit_address::Address;
///
/// let mut doc = json!({"items": [1, 2, 3, 4, 5]});
/// let op = SpliceOp::delete(Address::parse("items").unwrap(), 1, 2);
/// let out = apply_splice(&mut doc, &op).unwrap();
/// assert_eq!(out.deleted, vec![json!(2), json!(3)]);
/// assert_eq!(doc, json!({"items": [1, 4, 5]}));
///
/// apply_splice(&mut doc, &out.reverse).unwrap();
/// assert_eq!(doc, json!({"items": [1, 2, 3, 4, 5]}));
/// ```
pub fn apply_splice(doc: &mut Value, op: &SpliceOp) -> Result<SpliceOutcome, EditError> {
    let Some(target) = resolve_mut(doc, &op.address) else {
        log::warn!("splice: address `{}` does not match any node", op.address);
        return Err(EditError::AddressNotFound(op.address.clone()));
    };
    let arr = match target {
        Value::Array(arr) => arr,
        other => {
            let found = kind_of(other);
            log::error!("splice: address `{}` holds {found}, not an array", op.address);
            return Err(EditError::TypeMismatch {
                address: op.address.clone(),
                found,
            });
        }
    };

    let start = splice_start(op.start, arr.len());
    let end = start + op.delete_count.min(arr.len() - start);
    let deleted: Vec<Value> = arr.splice(start..end, op.items.iter().cloned()).collect();
    log::trace!(
        "splice `{}` at {start}: -{} +{}",
        op.address,
        deleted.len(),
        op.items.len()
    );

    Ok(SpliceOutcome {
        reverse: SpliceOp::new(op.address.clone(), start as isize, op.items.len(), deleted.clone()),
        deleted,
    })
}

/// Apply a single operation and return the operation that undoes it.
pub fn apply_op(doc: &mut Value, op: &Op) -> Result<Op, EditError> {
    match op {
        Op::Set(set) => apply_set(doc, set).map(|out| Op::Set(out.reverse)),
        Op::Splice(splice) => apply_splice(doc, splice).map(|out| Op::Splice(out.reverse)),
    }
}

/// Apply `ops` in order.
///
/// Returns the undo sequence: the reverse of every op, last applied first.
/// If any op fails, the ops already applied are undone before the error is
/// returned, so the document is either fully updated or unchanged.
pub fn apply_ops(doc: &mut Value, ops: &[Op]) -> Result<Vec<Op>, EditError> {
    let mut reverses = Vec::with_capacity(ops.len());
    for op in ops {
        match apply_op(doc, op) {
            Ok(reverse) => reverses.push(reverse),
            Err(err) => {
                reverses.reverse();
                rollback(doc, &reverses);
                return Err(err);
            }
        }
    }
    reverses.reverse();
    Ok(reverses)
}

/// Execute an undo sequence, logging instead of stopping on failure.
pub(crate) fn rollback(doc: &mut Value, undo: &[Op]) {
    for op in undo {
        if let Err(err) = apply_op(doc, op) {
            log::error!("rollback of `{} {}` failed: {err}", op.name(), op.address());
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
