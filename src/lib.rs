//! EIP-712 Typed Data Hashing
//!
//! Computes the 32-byte digest a wallet signs for EIP-712 structured data,
//! following the MetaMask v4 convention: referenced struct definitions are
//! emitted in first-discovery order rather than the alphabetical order the
//! EIP-712 text prescribes, which is what third-party tooling actually
//! hashes for struct arrays.
//!
//! # Reference
//! - <https://eips.ethereum.org/EIPS/eip-712>
//! - <https://github.com/MetaMask/eth-sig-util/pull/107>
//!
//! # Example
//! ```rust,ignore
//! use eth_typed_data::hash_typed_data_v4;
//!
//! let digest = hash_typed_data_v4(types_json, primary_type_json, domain_json, message_json)?;
//! ```
//!
//! Signature generation over the digest, key derivation, and transaction
//! decoding are caller concerns; this crate is the hashing core only.
//! Integer values are limited to the 64-bit decimal range (a documented
//! v4-reference limitation, not silent truncation).

pub mod encoder;
pub mod error;
pub mod hasher;
pub mod types;

pub use encoder::{encode_type, encode_value, type_hash};
pub use error::Eip712Error;
pub use hasher::{
    hash_personal_message, hash_struct, hash_typed_data_v4, keccak256, typed_data_signature,
    DOMAIN_TYPE,
};
pub use types::{FieldType, TypeRegistry, TypeSchema, TypedDataField, TypedDataSignature};
