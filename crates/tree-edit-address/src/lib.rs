//! Addresses for nodes inside a `serde_json::Value` tree.
//!
//! An address is a sequence of object keys and array indices. The text form
//! uses dot-separated keys and bracketed integer indices, composable to any
//! depth, with negative indices counting from the end of an array:
//!
//! ```
//! use tree_edit_address::{resolve, Address};
//! use serde_json::json;
//!
//! let doc = json!({"data": {"items": [{"name": "a"}, {"name": "b"}]}});
//!
//! let addr = Address::parse("data.items[-1].name").unwrap();
//! assert_eq!(resolve(&doc, &addr), Some(&json!("b")));
//!
//! // A missing node is `None`; an explicit null is `Some(&Value::Null)`.
//! assert_eq!(resolve(&doc, &Address::parse("data.missing").unwrap()), None);
//! ```

use std::borrow::Cow;

use serde_json::Value;

pub mod parser;
pub mod types;
pub mod validate;

pub use parser::{AddressError, AddressParser};
pub use types::{Address, IntoAddress, Step};
pub use validate::{validate_address, validate_steps, MAX_ADDRESS_LENGTH, MAX_STEPS};

/// Check if a string is a canonical non-negative integer (`0`, `12`, not `01`).
///
/// # Example
///
/// ```
/// use tree_edit_address::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("abc"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Map a possibly negative element index onto `0..len`.
///
/// Returns `None` when the index falls outside the array.
///
/// # Example
///
/// ```
/// use tree_edit_address::normalize_index;
///
/// assert_eq!(normalize_index(-1, 3), Some(2));
/// assert_eq!(normalize_index(2, 3), Some(2));
/// assert_eq!(normalize_index(3, 3), None);
/// assert_eq!(normalize_index(-4, 3), None);
/// ```
pub fn normalize_index(index: isize, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        let idx = index as usize;
        (idx < len).then_some(idx)
    }
}

fn array_slot(step: &Step, len: usize) -> Option<usize> {
    match step {
        Step::Index(i) => normalize_index(*i, len),
        Step::Key(k) if is_valid_index(k) => k.parse::<usize>().ok().filter(|&i| i < len),
        Step::Key(_) => None,
    }
}

fn object_key(step: &Step) -> Option<Cow<'_, str>> {
    match step {
        Step::Key(k) => Some(Cow::Borrowed(k.as_str())),
        Step::Index(i) if *i >= 0 => Some(Cow::Owned(i.to_string())),
        Step::Index(_) => None,
    }
}

/// Resolve an address against a document.
///
/// Returns `None` if any step does not exist: a missing key, an index outside
/// the array, or a step into a scalar. A present `null` resolves to
/// `Some(&Value::Null)`.
pub fn resolve<'a>(doc: &'a Value, address: &Address) -> Option<&'a Value> {
    let mut current = doc;
    for step in address.steps() {
        current = match current {
            Value::Array(arr) => arr.get(array_slot(step, arr.len())?)?,
            Value::Object(map) => map.get(&*object_key(step)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(doc: &'a mut Value, address: &Address) -> Option<&'a mut Value> {
    let mut current = doc;
    for step in address.steps() {
        current = match current {
            Value::Array(arr) => {
                let idx = array_slot(step, arr.len())?;
                arr.get_mut(idx)?
            }
            Value::Object(map) => map.get_mut(&*object_key(step)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Parse `address` and resolve it in one call.
///
/// # Errors
///
/// Returns the parse error when `address` is malformed.
///
/// # Example
///
/// ```
/// use tree_edit_address::get;
/// use serde_json::json;
///
/// let doc = json!({"users": [{"name": "A"}]});
/// assert_eq!(get(&doc, "users[0].name").unwrap(), Some(&json!("A")));
/// assert_eq!(get(&doc, "users[1].name").unwrap(), None);
/// assert!(get(&doc, "users[").is_err());
/// ```
pub fn get<'a>(doc: &'a Value, address: &str) -> Result<Option<&'a Value>, AddressError> {
    let address = Address::parse(address)?;
    Ok(resolve(doc, &address))
}

/// A short human-readable name for the kind of a value.
pub fn kind_of(val: &Value) -> &'static str {
    match val {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
