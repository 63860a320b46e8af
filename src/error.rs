//! Unified error type for typed-data hashing
//!
//! Every fallible path in the crate reports through `Eip712Error`.
//! Nothing is retried internally; the first failure aborts the digest
//! computation and no partial result is returned.

/// Errors that can occur while hashing EIP-712 typed data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Eip712Error {
    /// Input document is not parseable JSON, or has the wrong shape
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// A required top-level property (`types`, `primaryType`, `domain`,
    /// `message`) is absent from its document
    #[error("missing property: {0}")]
    MissingProperty(String),

    /// A type name referenced from the schema does not resolve
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A field's type token matches no primitive pattern and no
    /// user-defined struct
    #[error("type not encodable: {0}")]
    NotEncodable(String),

    /// Two user-defined type names collide by prefix; refusing to merge
    #[error("ambiguous user-defined type name: {0}")]
    DuplicateTypeName(String),

    /// More distinct user-defined types than one encoding permits
    #[error("too many user-defined types (limit {0})")]
    TooManyUserTypes(usize),

    /// Type definitions or struct values nest deeper than the guard allows
    #[error("type nesting too deep (limit {0})")]
    TypeNestingTooDeep(usize),

    /// Address value is not a well-formed 20-byte hex string
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A value does not conform to its declared field type
    #[error("invalid value for {type_name}: {reason}")]
    InvalidValue { type_name: String, reason: String },

    /// Arrays of this primitive kind are not supported (v4 limitation)
    #[error("arrays of {0} are not supported")]
    UnsupportedArray(String),

    /// A schema-declared field has no counterpart in the value object
    #[error("missing value for field: {0}")]
    MissingValue(String),
}

impl Eip712Error {
    pub(crate) fn invalid_value(type_name: &str, reason: impl Into<String>) -> Self {
        Eip712Error::InvalidValue {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}
