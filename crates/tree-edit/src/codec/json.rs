//! JSON codec for operations and transactions.
//!
//! ```text
//! {"op": "set",    "address": "a.b[0]", "value": ...}
//! {"op": "splice", "address": "items", "start": 1, "deleteCount": 2, "items": [...]}
//! {"forward": [...], "inverse": [...]}
//! ```
//!
//! Addresses are written in their textual form, or as an array of steps
//! (strings for keys, integers for indices) when the text would exceed
//! [`MAX_ADDRESS_LENGTH`]. Both forms are accepted on input.

use serde_json::{json, Map, Value};
use tree_edit_address::{validate_steps, Address, Step, MAX_ADDRESS_LENGTH};

use crate::op::{EditError, Op, SetOp, SpliceOp};
use crate::transaction::Transaction;

// ── Helpers ───────────────────────────────────────────────────────────────

fn invalid(msg: impl Into<String>) -> EditError {
    EditError::InvalidOp(msg.into())
}

fn encode_address(address: &Address) -> Value {
    let text = address.to_string();
    if text.len() <= MAX_ADDRESS_LENGTH {
        return Value::String(text);
    }
    Value::Array(
        address
            .steps()
            .iter()
            .map(|step| match step {
                Step::Key(key) => Value::String(key.clone()),
                Step::Index(i) => json!(i),
            })
            .collect(),
    )
}

fn decode_address(v: &Value) -> Result<Address, EditError> {
    match v {
        Value::String(s) => Ok(Address::parse(s)?),
        Value::Array(arr) => {
            let steps = arr
                .iter()
                .map(|step| match step {
                    Value::String(key) => Ok(Step::Key(key.clone())),
                    Value::Number(n) => n
                        .as_i64()
                        .and_then(|i| isize::try_from(i).ok())
                        .map(Step::Index)
                        .ok_or_else(|| invalid("address index must be an integer")),
                    _ => Err(invalid("address step must be a string or integer")),
                })
                .collect::<Result<Vec<_>, _>>()?;
            validate_steps(&steps)?;
            Ok(Address::from_steps(steps))
        }
        _ => Err(invalid("address must be a string or array")),
    }
}

fn field<'a>(m: &'a Map<String, Value>, name: &str) -> Result<&'a Value, EditError> {
    m.get(name).ok_or_else(|| invalid(format!("missing field `{name}`")))
}

fn decode_start(v: &Value) -> Result<isize, EditError> {
    v.as_i64()
        .and_then(|i| isize::try_from(i).ok())
        .ok_or_else(|| invalid("start must be an integer"))
}

fn decode_delete_count(v: Option<&Value>) -> Result<usize, EditError> {
    match v {
        None => Ok(0),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid("deleteCount must be a non-negative integer")),
    }
}

fn decode_items(v: Option<&Value>) -> Result<Vec<Value>, EditError> {
    match v {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(invalid("items must be an array")),
    }
}

// ── Operations ────────────────────────────────────────────────────────────

/// Serialize an [`Op`].
pub fn to_json(op: &Op) -> Value {
    match op {
        Op::Set(op) => json!({
            "op": "set",
            "address": encode_address(&op.address),
            "value": op.value,
        }),
        Op::Splice(op) => json!({
            "op": "splice",
            "address": encode_address(&op.address),
            "start": op.start,
            "deleteCount": op.delete_count,
            "items": op.items,
        }),
    }
}

/// Deserialize an [`Op`].
///
/// # Errors
///
/// [`EditError::InvalidOp`] for a malformed object and
/// [`EditError::ExecutionFault`] for an address that does not parse.
pub fn from_json(v: &Value) -> Result<Op, EditError> {
    let m = v
        .as_object()
        .ok_or_else(|| invalid("operation must be an object"))?;
    let name = field(m, "op")?
        .as_str()
        .ok_or_else(|| invalid("op must be a string"))?;
    match name {
        "set" => {
            let address = decode_address(field(m, "address")?)?;
            let value = field(m, "value")?.clone();
            Ok(Op::Set(SetOp::new(address, value)))
        }
        "splice" => {
            let address = decode_address(field(m, "address")?)?;
            let start = decode_start(field(m, "start")?)?;
            let delete_count = decode_delete_count(m.get("deleteCount"))?;
            let items = decode_items(m.get("items"))?;
            Ok(Op::Splice(SpliceOp::new(address, start, delete_count, items)))
        }
        other => Err(invalid(format!("unknown op `{other}`"))),
    }
}

pub fn ops_to_json(ops: &[Op]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}

/// Deserialize an array of operations.
pub fn ops_from_json(v: &Value) -> Result<Vec<Op>, EditError> {
    v.as_array()
        .ok_or_else(|| invalid("operations must be an array"))?
        .iter()
        .map(from_json)
        .collect()
}

// ── Transactions ──────────────────────────────────────────────────────────

pub fn transaction_to_json(tx: &Transaction) -> Value {
    json!({
        "forward": ops_to_json(tx.forward()),
        "inverse": ops_to_json(tx.inverse()),
    })
}

/// Deserialize a [`Transaction`].
///
/// The pairing of `forward` and `inverse` is taken on trust.
pub fn transaction_from_json(v: &Value) -> Result<Transaction, EditError> {
    let m = v
        .as_object()
        .ok_or_else(|| invalid("transaction must be an object"))?;
    let forward = ops_from_json(field(m, "forward")?)?;
    let inverse = ops_from_json(field(m, "inverse")?)?;
    Ok(Transaction::new(forward, inverse))
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tree_edit_address::AddressError;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn encode_set() {
        let op = Op::Set(SetOp::new(addr("a.b[0]"), json!({"x": 1})));
        assert_eq!(
            to_json(&op),
            json!({"op": "set", "address": "a.b[0]", "value": {"x": 1}})
        );
    }

    #[test]
    fn encode_splice() {
        let op = Op::Splice(SpliceOp::new(addr("items"), -1, 2, vec![json!(9)]));
        assert_eq!(
            to_json(&op),
            json!({"op": "splice", "address": "items", "start": -1, "deleteCount": 2, "items": [9]})
        );
    }

    #[test]
    fn decode_splice_defaults() {
        let op = from_json(&json!({"op": "splice", "address": "items", "start": 0})).unwrap();
        assert_eq!(op, Op::Splice(SpliceOp::new(addr("items"), 0, 0, vec![])));
    }

    #[test]
    fn decode_set_with_null_value() {
        let op = from_json(&json!({"op": "set", "address": "a", "value": null})).unwrap();
        assert_eq!(op, Op::Set(SetOp::new(addr("a"), Value::Null)));
    }

    #[test]
    fn decode_step_array_address() {
        let op = from_json(&json!({"op": "set", "address": ["a.b", 0, "c"], "value": 1})).unwrap();
        let expected = Address::root().key("a.b").index(0).key("c");
        assert_eq!(op.address(), &expected);
        // Re-encoding quotes the awkward key.
        assert_eq!(to_json(&op)["address"], json!(r#"["a.b"][0].c"#));
    }

    #[test]
    fn decode_errors() {
        let cases = [
            json!([]),
            json!({"address": "a", "value": 1}),
            json!({"op": "move", "address": "a"}),
            json!({"op": "set", "address": "a"}),
            json!({"op": "set", "address": 5, "value": 1}),
            json!({"op": "set", "address": [true], "value": 1}),
            json!({"op": "splice", "address": "a"}),
            json!({"op": "splice", "address": "a", "start": 1.5}),
            json!({"op": "splice", "address": "a", "start": 0, "deleteCount": -1}),
            json!({"op": "splice", "address": "a", "start": 0, "items": {}}),
        ];
        for case in cases {
            assert!(
                matches!(from_json(&case), Err(EditError::InvalidOp(_))),
                "expected InvalidOp for {case}"
            );
        }
    }

    #[test]
    fn malformed_address_is_execution_fault() {
        let err = from_json(&json!({"op": "set", "address": "a..b", "value": 1})).unwrap_err();
        assert!(matches!(err, EditError::ExecutionFault(AddressError::EmptyKey { .. })));
    }

    #[test]
    fn ops_array() {
        let v = json!([
            {"op": "set", "address": "a", "value": 1},
            {"op": "splice", "address": "b", "start": 0, "deleteCount": 1},
        ]);
        let ops = ops_from_json(&v).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].name(), "splice");
        assert!(ops_from_json(&json!({})).is_err());
    }

    #[test]
    fn long_address_is_written_as_steps() {
        let key = "k".repeat(MAX_ADDRESS_LENGTH + 76);
        let op = Op::Set(SetOp::new(Address::root().key(key.clone()).index(-1), json!(1)));
        let encoded = to_json(&op);
        assert_eq!(encoded["address"], json!([key, -1]));
        assert_eq!(from_json(&encoded).unwrap(), op);
    }

    #[test]
    fn transaction_with_long_key_round_trips() {
        let key = "x".repeat(1100);
        let mut doc = json!({});
        doc[key.as_str()] = json!("old");
        let tx = Transaction::record(
            &mut doc,
            vec![Op::Set(SetOp::new(Address::root().key(key.clone()), json!("new")))],
        )
        .unwrap();

        let decoded = transaction_from_json(&transaction_to_json(&tx)).unwrap();
        assert_eq!(decoded, tx);
        decoded.revert(&mut doc).unwrap();
        assert_eq!(doc[key.as_str()], json!("old"));
    }

    #[test]
    fn transaction_round_trip_replays() {
        let mut doc = json!({"name": "A", "items": [1, 2, 3]});
        let original = doc.clone();
        let tx = Transaction::record(
            &mut doc,
            vec![
                Op::Set(SetOp::new(addr("name"), json!("B"))),
                Op::Splice(SpliceOp::delete(addr("items"), 0, 2)),
            ],
        )
        .unwrap();
        let edited = doc.clone();

        let encoded = transaction_to_json(&tx);
        assert_eq!(encoded["inverse"][0]["items"], json!([1, 2]));
        let decoded = transaction_from_json(&encoded).unwrap();
        assert_eq!(decoded, tx);

        decoded.revert(&mut doc).unwrap();
        assert_eq!(doc, original);
        decoded.apply(&mut doc).unwrap();
        assert_eq!(doc, edited);
    }
}
