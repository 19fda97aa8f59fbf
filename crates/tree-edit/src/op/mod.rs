//! Atomic operations.
//!
//! Two primitive mutations are supported:
//!
//! - `set` overwrites the node at an address,
//! - `splice` removes and inserts elements of the array at an address.
//!
//! Applying either one mutates the document in place and yields the
//! operation that undoes it.

pub mod apply;
pub mod types;

pub use apply::{apply_op, apply_ops, apply_set, apply_splice, splice_start};
pub use types::{EditError, Op, SetOp, SetOutcome, SpliceOp, SpliceOutcome};
