//! Type definitions for addresses.

use std::fmt;
use std::str::FromStr;

use crate::parser::{AddressError, AddressParser};

/// A single step of an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Object property access: `.name`, `["name"]`.
    Key(String),
    /// Array element access: `[0]`, `[-1]`. Negative values count from the end.
    Index(isize),
}

impl Step {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Step::Key(k) => Some(k),
            Step::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<isize> {
        match self {
            Step::Key(_) => None,
            Step::Index(i) => Some(*i),
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Key(key.to_string())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Step::Key(key)
    }
}

impl From<isize> for Step {
    fn from(index: isize) -> Self {
        Step::Index(index)
    }
}

/// A typed address of one node inside a container.
///
/// The empty address refers to the root. Text addresses use dot-separated
/// keys and bracketed indices, e.g. `data.items[0].name` or `matrix[1][-1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    steps: Vec<Step>,
}

impl Address {
    /// The root address.
    pub fn root() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Parse an address string.
    ///
    /// # Example
    ///
    /// ```
    /// use tree_edit_address::{Address, Step};
    ///
    /// let addr = Address::parse("users[0].name").unwrap();
    /// assert_eq!(
    ///     addr.steps(),
    ///     &[Step::Key("users".into()), Step::Index(0), Step::Key("name".into())]
    /// );
    /// ```
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        AddressParser::parse(input)
    }

    /// Append an object key step.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.steps.push(Step::Key(key.into()));
        self
    }

    /// Append an array index step.
    pub fn index(mut self, index: isize) -> Self {
        self.steps.push(Step::Index(index));
        self
    }

    pub fn push(&mut self, step: impl Into<Step>) {
        self.steps.push(step.into());
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// The address of the enclosing node, or `None` for the root.
    pub fn parent(&self) -> Option<Address> {
        if self.steps.is_empty() {
            return None;
        }
        Some(Address {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }

    /// Returns `true` if `prefix` is equal to this address or one of its ancestors.
    pub fn starts_with(&self, prefix: &Address) -> bool {
        self.steps.len() >= prefix.steps.len() && self.steps[..prefix.steps.len()] == prefix.steps[..]
    }
}

/// Returns `true` when `key` can be written in dot notation and read back unchanged.
fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['.', '[', ']'])
}

fn write_quoted(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    f.write_str("[\"")?;
    for c in key.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"]")
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Key(k) if is_plain_key(k) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(k)?;
                }
                Step::Key(k) => write_quoted(f, k)?,
                Step::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl From<Vec<Step>> for Address {
    fn from(steps: Vec<Step>) -> Self {
        Address { steps }
    }
}

/// Conversion into an [`Address`], parsing text when needed.
pub trait IntoAddress {
    fn into_address(self) -> Result<Address, AddressError>;
}

impl IntoAddress for Address {
    fn into_address(self) -> Result<Address, AddressError> {
        Ok(self)
    }
}

impl IntoAddress for &Address {
    fn into_address(self) -> Result<Address, AddressError> {
        Ok(self.clone())
    }
}

impl IntoAddress for &str {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::parse(self)
    }
}

impl IntoAddress for String {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::parse(&self)
    }
}

impl IntoAddress for &String {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::parse(self)
    }
}
