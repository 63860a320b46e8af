use eth_typed_data::{
    encode_type, encode_value, hash_typed_data_v4, keccak256, TypeSchema, TypedDataField,
};
use proptest::prelude::*;
use std::collections::HashMap;

const TYPES: &str = r#"{
    "types": {
        "EIP712Domain": [
            {"name": "name", "type": "string"},
            {"name": "chainId", "type": "uint256"}
        ],
        "Note": [
            {"name": "author", "type": "string"},
            {"name": "body", "type": "string"},
            {"name": "priority", "type": "uint256"}
        ]
    }
}"#;

const DOMAIN: &str = r#"{"domain": {"name": "Notes", "chainId": 1}}"#;
const PRIMARY: &str = r#"{"primaryType": "Note"}"#;

fn plain_text() -> impl Strategy<Value = String> {
    // Alphanumeric only, so the strings can be spliced into JSON literals
    "[a-zA-Z0-9 ]{0,24}"
}

fn schema_of(entries: Vec<(&str, Vec<TypedDataField>)>) -> TypeSchema {
    let map: HashMap<String, Vec<TypedDataField>> = entries
        .into_iter()
        .map(|(name, fields)| (name.to_string(), fields))
        .collect();
    TypeSchema::from(map)
}

fn text_field(name: &str) -> TypedDataField {
    TypedDataField {
        name: name.to_string(),
        type_name: "string".to_string(),
    }
}

proptest! {
    #[test]
    fn digest_is_deterministic(author in plain_text(), body in plain_text(), priority in 0u32..) {
        let message = format!(
            r#"{{"message": {{"author": "{author}", "body": "{body}", "priority": {priority}}}}}"#
        );
        let a = hash_typed_data_v4(TYPES, PRIMARY, DOMAIN, &message).unwrap();
        let b = hash_typed_data_v4(TYPES, PRIMARY, DOMAIN, &message).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn value_key_order_never_matters(author in plain_text(), body in plain_text(), priority in 0u32..) {
        let forward = format!(
            r#"{{"message": {{"author": "{author}", "body": "{body}", "priority": {priority}}}}}"#
        );
        let backward = format!(
            r#"{{"message": {{"priority": {priority}, "body": "{body}", "author": "{author}"}}}}"#
        );
        let a = hash_typed_data_v4(TYPES, PRIMARY, DOMAIN, &forward).unwrap();
        let b = hash_typed_data_v4(TYPES, PRIMARY, DOMAIN, &backward).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn schema_field_order_always_matters(
        first in "[a-z]{1,12}",
        second in "[A-Z]{1,12}",
    ) {
        // Distinct names by construction (different character classes)
        let declared = schema_of(vec![(
            "Pair",
            vec![text_field(&first), text_field(&second)],
        )]);
        let swapped = schema_of(vec![(
            "Pair",
            vec![text_field(&second), text_field(&first)],
        )]);

        let a = encode_type(&declared, "Pair").unwrap();
        let b = encode_type(&swapped, "Pair").unwrap();
        prop_assert_ne!(a, b);
    }

    #[test]
    fn integer_words_use_low_eight_bytes(value in any::<i64>()) {
        let schema = schema_of(vec![]);
        let word = encode_value(&schema, "int256", &serde_json::json!(value.to_string())).unwrap();

        let fill = if value < 0 { 0xFFu8 } else { 0x00 };
        prop_assert_eq!(&word[..24], &[fill; 24][..]);
        prop_assert_eq!(&word[24..], &value.to_be_bytes()[..]);
    }

    #[test]
    fn address_words_are_right_aligned(bytes in prop::array::uniform20(any::<u8>())) {
        let schema = schema_of(vec![]);
        let text = format!("0x{}", hex::encode(bytes));
        let word = encode_value(&schema, "address", &serde_json::json!(text)).unwrap();

        prop_assert_eq!(&word[..12], &[0u8; 12][..]);
        prop_assert_eq!(&word[12..], &bytes[..]);
    }

    #[test]
    fn bytes_n_words_are_left_aligned(bytes in prop::collection::vec(any::<u8>(), 1..=32)) {
        let schema = schema_of(vec![]);
        let token = format!("bytes{}", bytes.len());
        let text = format!("0x{}", hex::encode(&bytes));
        let word = encode_value(&schema, &token, &serde_json::json!(text)).unwrap();

        prop_assert_eq!(&word[..bytes.len()], &bytes[..]);
        prop_assert_eq!(&word[bytes.len()..], &vec![0u8; 32 - bytes.len()][..]);
    }

    #[test]
    fn dynamic_words_are_content_hashes(text in plain_text()) {
        let schema = schema_of(vec![]);
        let word = encode_value(&schema, "string", &serde_json::json!(text.clone())).unwrap();
        prop_assert_eq!(word, keccak256(text.as_bytes()));
    }
}
