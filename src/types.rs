//! Type Definitions for EIP-712 Hashing
//!
//! Core data structures: the parsed type schema, the tagged field-type
//! classifier, the per-encoding registry of user-defined type names, and
//! the domain/message hash pair produced by a top-level computation.

use crate::error::Eip712Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use zeroize::Zeroize;

/// Maximum number of distinct user-defined types in one encoding
pub const MAX_USER_TYPES: usize = 10;

/// Recursion guard for nested type definitions and struct values
pub const MAX_NESTING_DEPTH: usize = 16;

/// A field in a struct type definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypedDataField {
    /// The name of the field
    pub name: String,
    /// The type of the field (e.g., "address", "uint256", "Person[]")
    #[serde(rename = "type")]
    pub type_name: String,
}

/// The parsed `types` document: struct name -> ordered field list
///
/// Field order within a struct is declaration order and drives the
/// canonical type string; iteration order of the map itself is never
/// significant. The schema is read-only for the duration of a digest
/// computation.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    types: HashMap<String, Vec<TypedDataField>>,
}

impl TypeSchema {
    /// Parse a `{"types": {...}}` document
    pub fn from_json(json: &str) -> Result<Self, Eip712Error> {
        let doc: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Eip712Error::InvalidJson(e.to_string()))?;
        let types = doc
            .get("types")
            .ok_or_else(|| Eip712Error::MissingProperty("types".to_string()))?;
        let types = serde_json::from_value(types.clone())
            .map_err(|e| Eip712Error::InvalidJson(e.to_string()))?;
        Ok(Self { types })
    }

    /// Look up the declared fields of a struct type
    pub fn get(&self, type_name: &str) -> Option<&[TypedDataField]> {
        self.types.get(type_name).map(Vec::as_slice)
    }

    /// Check whether a struct type is defined
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }
}

impl From<HashMap<String, Vec<TypedDataField>>> for TypeSchema {
    fn from(types: HashMap<String, Vec<TypedDataField>>) -> Self {
        Self { types }
    }
}

/// Classified form of a raw type-string token
///
/// Produced once per token and dispatched on, instead of re-matching the
/// string in every encoder path. Width suffixes on `uint`/`int` are not
/// validated here; integer values are range-checked during encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType<'a> {
    Address,
    String,
    /// Dynamic byte string, hashed rather than padded
    Bytes,
    /// Fixed-size byte string of the given width, 1..=32
    BytesN(usize),
    Uint,
    Int,
    Bool,
    /// Single-level array; holds the element type token
    Array(&'a str),
    /// Reference to a user-defined struct type
    Struct(&'a str),
}

impl<'a> FieldType<'a> {
    /// Classify a type token
    ///
    /// Multi-dimensional arrays (`T[][]`) are rejected: the v4 reference
    /// behavior only strips a single array suffix.
    pub fn classify(token: &'a str) -> Result<Self, Eip712Error> {
        if let Some(open) = token.find('[') {
            if !token.ends_with(']') || token.matches('[').count() > 1 {
                return Err(Eip712Error::NotEncodable(token.to_string()));
            }
            return Ok(FieldType::Array(&token[..open]));
        }
        Ok(match token {
            "address" => FieldType::Address,
            "string" => FieldType::String,
            "bytes" => FieldType::Bytes,
            "bool" => FieldType::Bool,
            _ => {
                if let Some(width) = token.strip_prefix("bytes") {
                    let n: usize = width
                        .parse()
                        .map_err(|_| Eip712Error::NotEncodable(token.to_string()))?;
                    if !(1..=32).contains(&n) {
                        return Err(Eip712Error::NotEncodable(token.to_string()));
                    }
                    FieldType::BytesN(n)
                } else if token.starts_with("uint") {
                    FieldType::Uint
                } else if token.starts_with("int") {
                    FieldType::Int
                } else {
                    FieldType::Struct(token)
                }
            }
        })
    }
}

/// Registry of user-defined type names seen while building one canonical
/// type string
///
/// A fresh registry is created per top-level `encode_type` call and
/// threaded through the recursion, so concurrent digest computations never
/// share state. Capacity is bounded; overflow is an error, not a panic.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    seen: Vec<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user-defined type name
    ///
    /// Returns `Ok(true)` the first time a name is seen (its definition
    /// must be emitted), `Ok(false)` on repeats. Two distinct names where
    /// one is a strict prefix of the other are ambiguous and refused
    /// rather than merged.
    pub fn observe(&mut self, name: &str) -> Result<bool, Eip712Error> {
        for earlier in &self.seen {
            if earlier == name {
                return Ok(false);
            }
            if earlier.starts_with(name) || name.starts_with(earlier) {
                return Err(Eip712Error::DuplicateTypeName(name.to_string()));
            }
        }
        if self.seen.len() == MAX_USER_TYPES {
            return Err(Eip712Error::TooManyUserTypes(MAX_USER_TYPES));
        }
        self.seen.push(name.to_string());
        Ok(true)
    }
}

/// The two struct hashes a top-level computation produces
///
/// The message hash is legally absent when the primary type is the domain
/// type itself; callers must treat that as success with a partial result.
/// Cleared on drop.
#[derive(Debug, Clone, Zeroize)]
#[zeroize(drop)]
pub struct TypedDataSignature {
    /// hashStruct of the `EIP712Domain` values
    pub domain_separator: [u8; 32],
    /// hashStruct of the primary type's values, when present
    pub message_hash: Option<[u8; 32]>,
}

impl TypedDataSignature {
    pub fn has_message_hash(&self) -> bool {
        self.message_hash.is_some()
    }
}
