//! Codecs for operations and transactions.

pub mod json;
