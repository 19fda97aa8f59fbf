//! Core types for atomic operations.

use serde_json::Value;
use thiserror::Error;

pub use tree_edit_address::{Address, AddressError};

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditError {
    /// The address does not exist in the document.
    #[error("ADDRESS_NOT_FOUND: {0}")]
    AddressNotFound(Address),
    /// A splice target is not an array.
    #[error("TYPE_MISMATCH: {address} is {found}, expected array")]
    TypeMismatch { address: Address, found: &'static str },
    /// The address could not be interpreted at all.
    #[error("EXECUTION_FAULT: {0}")]
    ExecutionFault(#[from] AddressError),
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
}

// ── Operations ────────────────────────────────────────────────────────────

/// Replace the node at `address` with `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOp {
    pub address: Address,
    pub value: Value,
}

impl SetOp {
    pub fn new(address: Address, value: Value) -> Self {
        Self { address, value }
    }
}

/// Remove `delete_count` elements at `start` from the array at `address`
/// and insert `items` in their place.
///
/// A negative `start` counts from the end of the array.
#[derive(Debug, Clone, PartialEq)]
pub struct SpliceOp {
    pub address: Address,
    pub start: isize,
    pub delete_count: usize,
    pub items: Vec<Value>,
}

impl SpliceOp {
    pub fn new(address: Address, start: isize, delete_count: usize, items: Vec<Value>) -> Self {
        Self { address, start, delete_count, items }
    }

    /// Pure insertion of `items` before position `at`.
    pub fn insert(address: Address, at: isize, items: Vec<Value>) -> Self {
        Self::new(address, at, 0, items)
    }

    /// Pure deletion of `count` elements starting at `at`.
    pub fn delete(address: Address, at: isize, count: usize) -> Self {
        Self::new(address, at, count, Vec::new())
    }
}

/// An atomic operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Set(SetOp),
    Splice(SpliceOp),
}

impl Op {
    pub fn address(&self) -> &Address {
        match self {
            Op::Set(op) => &op.address,
            Op::Splice(op) => &op.address,
        }
    }

    /// The operation name used by the JSON codec.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Set(_) => "set",
            Op::Splice(_) => "splice",
        }
    }
}

impl From<SetOp> for Op {
    fn from(op: SetOp) -> Self {
        Op::Set(op)
    }
}

impl From<SpliceOp> for Op {
    fn from(op: SpliceOp) -> Self {
        Op::Splice(op)
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────

/// Result of applying a [`SetOp`].
#[derive(Debug, Clone, PartialEq)]
pub struct SetOutcome {
    /// The value that was overwritten.
    pub old_value: Value,
    /// Writes `old_value` back.
    pub reverse: SetOp,
}

/// Result of applying a [`SpliceOp`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpliceOutcome {
    /// The removed elements, in array order.
    pub deleted: Vec<Value>,
    /// Removes the inserted items and puts `deleted` back.
    pub reverse: SpliceOp,
}
