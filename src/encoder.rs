//! Type and Value Encoding
//!
//! Canonical type-string construction and per-field 32-byte word encoding,
//! following the MetaMask v4 signing convention. The one place this
//! deliberately diverges from the EIP-712 text: referenced struct
//! definitions are appended in the order they are first discovered, not
//! alphabetically. Third-party wallets hash the discovery-order string, so
//! byte-for-byte compatibility requires reproducing it.
//!
//! Integer values are limited to the 64-bit decimal range. The v4
//! reference behavior parses them with a 64-bit conversion even though the
//! type system nominally allows 256-bit widths; larger magnitudes are an
//! error, never truncated.

use crate::error::Eip712Error;
use crate::hasher::{hash_struct_at, keccak256};
use crate::types::{FieldType, TypeRegistry, TypeSchema, MAX_NESTING_DEPTH};
use serde_json::Value;
use tiny_keccak::{Hasher, Keccak};

/// Longest accepted address string: "0x" + 40 hex chars
const ADDRESS_STR_MAX: usize = 42;

/// Longest accepted bytesN string: "0x" + 64 hex chars
const BYTES_STR_MAX: usize = 66;

/// Build the canonical type string for a struct type
///
/// Format: `"TypeName(type1 name1,type2 name2,...)"` followed by the
/// definitions of every transitively referenced struct type in
/// first-discovery order.
pub fn encode_type(schema: &TypeSchema, type_name: &str) -> Result<String, Eip712Error> {
    let mut registry = TypeRegistry::new();
    let mut out = String::new();
    append_type(schema, type_name, &mut out, &mut registry, 0)?;
    Ok(out)
}

/// Calculate the type hash for a struct type
///
/// typeHash = keccak256(encodeType(typeOf(s)))
pub fn type_hash(schema: &TypeSchema, type_name: &str) -> Result<[u8; 32], Eip712Error> {
    Ok(keccak256(encode_type(schema, type_name)?.as_bytes()))
}

fn append_type(
    schema: &TypeSchema,
    type_name: &str,
    out: &mut String,
    registry: &mut TypeRegistry,
    depth: usize,
) -> Result<(), Eip712Error> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Eip712Error::TypeNestingTooDeep(MAX_NESTING_DEPTH));
    }
    let fields = schema
        .get(type_name)
        .ok_or_else(|| Eip712Error::UnknownType(type_name.to_string()))?;

    out.push_str(type_name);
    out.push('(');

    // Referenced struct definitions are held back until the field list is
    // closed, then appended in first-discovery order.
    let mut referenced = String::new();

    for (i, field) in fields.iter().enumerate() {
        if let Some(struct_name) = struct_reference(schema, &field.type_name)? {
            if registry.observe(struct_name)? {
                append_type(schema, struct_name, &mut referenced, registry, depth + 1)?;
            }
        }
        if i > 0 {
            out.push(',');
        }
        out.push_str(&field.type_name);
        out.push(' ');
        out.push_str(&field.name);
    }

    out.push(')');
    out.push_str(&referenced);
    Ok(())
}

/// Resolve a field type token to the struct type it references, if any
///
/// Strips a single array suffix first. A token that matches no primitive
/// pattern and is not defined in the schema is not encodable.
fn struct_reference<'a>(
    schema: &TypeSchema,
    token: &'a str,
) -> Result<Option<&'a str>, Eip712Error> {
    let base = match FieldType::classify(token)? {
        FieldType::Array(element) => match FieldType::classify(element)? {
            FieldType::Struct(name) => Some(name),
            _ => None,
        },
        FieldType::Struct(name) => Some(name),
        _ => None,
    };
    match base {
        Some(name) if schema.contains(name) => Ok(Some(name)),
        Some(name) => Err(Eip712Error::NotEncodable(name.to_string())),
        None => Ok(None),
    }
}

/// Encode a value as its 32-byte ABI-style word
pub fn encode_value(
    schema: &TypeSchema,
    type_name: &str,
    value: &Value,
) -> Result<[u8; 32], Eip712Error> {
    encode_value_at(schema, type_name, value, 0)
}

pub(crate) fn encode_value_at(
    schema: &TypeSchema,
    type_name: &str,
    value: &Value,
    depth: usize,
) -> Result<[u8; 32], Eip712Error> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Eip712Error::TypeNestingTooDeep(MAX_NESTING_DEPTH));
    }
    match FieldType::classify(type_name)? {
        FieldType::Address => encode_address(&scalar_text(type_name, value)?),
        FieldType::String => Ok(keccak256(scalar_text(type_name, value)?.as_bytes())),
        FieldType::Bytes => encode_bytes(&scalar_text(type_name, value)?),
        FieldType::BytesN(width) => {
            encode_bytes_n(type_name, width, &scalar_text(type_name, value)?)
        }
        FieldType::Uint => encode_integer(type_name, false, &scalar_text(type_name, value)?),
        FieldType::Int => encode_integer(type_name, true, &scalar_text(type_name, value)?),
        FieldType::Bool => Ok(encode_bool(&scalar_text(type_name, value)?)),
        FieldType::Array(element) => encode_array(schema, type_name, element, value, depth),
        FieldType::Struct(name) => hash_struct_at(schema, name, value, depth + 1),
    }
}

/// Extract the textual form of a scalar value node
///
/// Numbers and booleans arrive as their JSON token text, matching a
/// tokenizer that hands every scalar over as a string.
fn scalar_text(type_name: &str, value: &Value) -> Result<String, Eip712Error> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Eip712Error::invalid_value(type_name, "expected a scalar value")),
    }
}

/// Encode an address: 20 bytes right-aligned in the word
fn encode_address(value: &str) -> Result<[u8; 32], Eip712Error> {
    if value.len() > ADDRESS_STR_MAX {
        return Err(Eip712Error::InvalidAddress(format!(
            "longer than {ADDRESS_STR_MAX} chars"
        )));
    }
    let hex_part = value
        .strip_prefix("0x")
        .ok_or_else(|| Eip712Error::InvalidAddress("missing 0x prefix".to_string()))?;
    let bytes =
        hex::decode(hex_part).map_err(|e| Eip712Error::InvalidAddress(e.to_string()))?;
    if bytes.len() != 20 {
        return Err(Eip712Error::InvalidAddress(format!(
            "expected 20 bytes, got {}",
            bytes.len()
        )));
    }
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&bytes);
    Ok(word)
}

/// Encode dynamic bytes: the word is the hash of the decoded content
fn encode_bytes(value: &str) -> Result<[u8; 32], Eip712Error> {
    let hex_part = value
        .strip_prefix("0x")
        .ok_or_else(|| Eip712Error::invalid_value("bytes", "missing 0x prefix"))?;
    let bytes =
        hex::decode(hex_part).map_err(|e| Eip712Error::invalid_value("bytes", e.to_string()))?;
    Ok(keccak256(&bytes))
}

/// Encode bytesN: decoded bytes left-aligned, zero-padded on the right
///
/// The opposite padding direction from integers.
fn encode_bytes_n(type_name: &str, width: usize, value: &str) -> Result<[u8; 32], Eip712Error> {
    if value.len() > BYTES_STR_MAX {
        return Err(Eip712Error::invalid_value(
            type_name,
            format!("longer than {BYTES_STR_MAX} chars"),
        ));
    }
    let hex_part = value
        .strip_prefix("0x")
        .ok_or_else(|| Eip712Error::invalid_value(type_name, "missing 0x prefix"))?;
    let bytes = hex::decode(hex_part)
        .map_err(|e| Eip712Error::invalid_value(type_name, e.to_string()))?;
    if bytes.len() > width {
        return Err(Eip712Error::invalid_value(
            type_name,
            format!("{} bytes does not fit {type_name}", bytes.len()),
        ));
    }
    let mut word = [0u8; 32];
    word[..bytes.len()].copy_from_slice(&bytes);
    Ok(word)
}

/// Encode an integer: big-endian in the low 8 bytes of the word
///
/// Values must fit a signed 64-bit decimal parse. Negative signed values
/// sign-extend the high 24 bytes with 0xFF.
fn encode_integer(type_name: &str, signed: bool, value: &str) -> Result<[u8; 32], Eip712Error> {
    let parsed: i64 = value.trim().parse().map_err(|_| {
        Eip712Error::invalid_value(type_name, "not a decimal integer in 64-bit range")
    })?;
    let mut word = if signed && parsed < 0 {
        [0xFF; 32]
    } else {
        [0u8; 32]
    };
    word[24..].copy_from_slice(&parsed.to_be_bytes());
    Ok(word)
}

/// Encode a bool: the literal text "true" is 1, anything else is 0
fn encode_bool(value: &str) -> [u8; 32] {
    let mut word = [0u8; 32];
    if value == "true" {
        word[31] = 0x01;
    }
    word
}

/// Encode an array value
///
/// The word is keccak256 of the concatenated element words, never the
/// concatenation itself. Only address, string, and struct elements are
/// supported; the v4 reference behavior rejects primitive arrays.
fn encode_array(
    schema: &TypeSchema,
    type_name: &str,
    element: &str,
    value: &Value,
    depth: usize,
) -> Result<[u8; 32], Eip712Error> {
    let items = value
        .as_array()
        .ok_or_else(|| Eip712Error::invalid_value(type_name, "expected an array"))?;

    enum Element<'a> {
        Address,
        Text,
        Struct(&'a str),
    }

    let element = match FieldType::classify(element)? {
        FieldType::Address => Element::Address,
        FieldType::String => Element::Text,
        FieldType::Struct(name) => {
            if !schema.contains(name) {
                return Err(Eip712Error::NotEncodable(name.to_string()));
            }
            Element::Struct(name)
        }
        FieldType::Uint => return Err(Eip712Error::UnsupportedArray("uint".to_string())),
        FieldType::Int => return Err(Eip712Error::UnsupportedArray("int".to_string())),
        FieldType::Bytes | FieldType::BytesN(_) => {
            return Err(Eip712Error::UnsupportedArray("bytes".to_string()))
        }
        FieldType::Bool => return Err(Eip712Error::UnsupportedArray("bool".to_string())),
        // classify() rejects multi-dimensional tokens before we get here
        FieldType::Array(_) => return Err(Eip712Error::NotEncodable(type_name.to_string())),
    };

    let mut ctx = Keccak::v256();
    for item in items {
        let word = match element {
            Element::Address => encode_address(&scalar_text(type_name, item)?)?,
            Element::Text => keccak256(scalar_text(type_name, item)?.as_bytes()),
            Element::Struct(name) => hash_struct_at(schema, name, item, depth + 1)?,
        };
        ctx.update(&word);
    }
    let mut out = [0u8; 32];
    ctx.finalize(&mut out);
    Ok(out)
}
