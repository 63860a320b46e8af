//! Struct Hashing and Digest Assembly
//!
//! hashStruct(s) = keccak256(typeHash || encodeData(s)), and the top-level
//! v4 digest keccak256("\x19\x01" || domainSeparator || hashStruct(message)).
//! Also carries the two plain hashing companions: raw keccak256 and the
//! EIP-191 personal-message variant.

use crate::encoder::{encode_type, encode_value_at};
use crate::error::Eip712Error;
use crate::types::{TypeSchema, TypedDataSignature, MAX_NESTING_DEPTH};
use serde_json::Value;
use tiny_keccak::{Hasher, Keccak};

/// Magic prefix for EIP-712 encoding
const EIP712_PREFIX: &[u8] = b"\x19\x01";

/// EIP-191 personal-message prefix
const PERSONAL_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// The reserved name of the signing-domain struct
pub const DOMAIN_TYPE: &str = "EIP712Domain";

/// Compute keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Compute the EIP-191 personal-message hash
///
/// keccak256("\x19Ethereum Signed Message:\n" || decimalLength(data) || data)
pub fn hash_personal_message(data: &[u8]) -> [u8; 32] {
    let mut ctx = Keccak::v256();
    ctx.update(PERSONAL_PREFIX);
    ctx.update(data.len().to_string().as_bytes());
    ctx.update(data);
    let mut output = [0u8; 32];
    ctx.finalize(&mut output);
    output
}

/// Hash one struct instance
///
/// Fields are encoded in schema declaration order; the matching value is
/// located in the object by name, so the value document's key order never
/// affects the result.
pub fn hash_struct(
    schema: &TypeSchema,
    type_name: &str,
    values: &Value,
) -> Result<[u8; 32], Eip712Error> {
    hash_struct_at(schema, type_name, values, 0)
}

pub(crate) fn hash_struct_at(
    schema: &TypeSchema,
    type_name: &str,
    values: &Value,
    depth: usize,
) -> Result<[u8; 32], Eip712Error> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Eip712Error::TypeNestingTooDeep(MAX_NESTING_DEPTH));
    }
    let type_hash = keccak256(encode_type(schema, type_name)?.as_bytes());
    let fields = schema
        .get(type_name)
        .ok_or_else(|| Eip712Error::UnknownType(type_name.to_string()))?;
    let object = values
        .as_object()
        .ok_or_else(|| Eip712Error::invalid_value(type_name, "expected an object"))?;

    let mut ctx = Keccak::v256();
    ctx.update(&type_hash);
    for field in fields {
        let value = object.get(&field.name).ok_or_else(|| {
            Eip712Error::MissingValue(format!("{type_name}.{}", field.name))
        })?;
        let word = encode_value_at(schema, &field.type_name, value, depth)?;
        ctx.update(&word);
    }
    let mut output = [0u8; 32];
    ctx.finalize(&mut output);
    Ok(output)
}

impl TypedDataSignature {
    /// Combine the struct hashes into the digest a wallet signs
    ///
    /// The message term is omitted entirely when the primary type was the
    /// domain type itself.
    pub fn digest(&self) -> [u8; 32] {
        let mut ctx = Keccak::v256();
        ctx.update(EIP712_PREFIX);
        ctx.update(&self.domain_separator);
        if let Some(message_hash) = &self.message_hash {
            ctx.update(message_hash);
        }
        let mut output = [0u8; 32];
        ctx.finalize(&mut output);
        output
    }
}

/// Compute domain separator and message hash from the four JSON documents
///
/// Documents: `{"types": {...}}`, `{"primaryType": "..."}`,
/// `{"domain": {...}}`, `{"message": {...}}`. When the primary type is
/// `EIP712Domain` the message document is ignored and the result carries no
/// message hash (a legal partial result, not an error).
pub fn typed_data_signature(
    types_json: &str,
    primary_type_json: &str,
    domain_json: &str,
    message_json: &str,
) -> Result<TypedDataSignature, Eip712Error> {
    let schema = TypeSchema::from_json(types_json)?;
    let primary_type = parse_primary_type(primary_type_json)?;

    let domain = parse_document(domain_json, "domain")?;
    let domain_separator = hash_struct(&schema, DOMAIN_TYPE, &domain)?;

    let message_hash = if primary_type == DOMAIN_TYPE {
        None
    } else {
        let message = parse_document(message_json, "message")?;
        Some(hash_struct(&schema, &primary_type, &message)?)
    };

    Ok(TypedDataSignature {
        domain_separator,
        message_hash,
    })
}

/// Calculate the final EIP-712 v4 digest for signing
pub fn hash_typed_data_v4(
    types_json: &str,
    primary_type_json: &str,
    domain_json: &str,
    message_json: &str,
) -> Result<[u8; 32], Eip712Error> {
    Ok(typed_data_signature(types_json, primary_type_json, domain_json, message_json)?.digest())
}

fn parse_document(json: &str, property: &str) -> Result<Value, Eip712Error> {
    let doc: Value =
        serde_json::from_str(json).map_err(|e| Eip712Error::InvalidJson(e.to_string()))?;
    doc.get(property)
        .cloned()
        .ok_or_else(|| Eip712Error::MissingProperty(property.to_string()))
}

fn parse_primary_type(json: &str) -> Result<String, Eip712Error> {
    let doc: Value =
        serde_json::from_str(json).map_err(|e| Eip712Error::InvalidJson(e.to_string()))?;
    doc.get("primaryType")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Eip712Error::MissingProperty("primaryType".to_string()))
}
