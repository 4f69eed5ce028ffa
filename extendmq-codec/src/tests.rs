use super::*;
use message::{AttributeValue, MessageAttributes};
use pointer::StoragePointer;

fn attrs(entries: &[(&str, AttributeValue)]) -> MessageAttributes {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn empty_attributes_contribute_zero() {
    assert_eq!(size::attributes_size(&MessageAttributes::new()), 0);
}

#[test]
fn attribute_size_counts_name_type_and_values() {
    let attributes = attrs(&[
        ("trace-id", AttributeValue::string("abcd")),
        ("payload", AttributeValue::binary(vec![0u8; 16])),
    ]);

    // "trace-id" + "String" + "abcd" = 8 + 6 + 4
    // "payload" + "Binary" + 16 bytes = 7 + 6 + 16
    assert_eq!(size::attributes_size(&attributes), 18 + 29);
}

#[test]
fn attribute_with_no_value_counts_name_and_type_only() {
    let attributes = attrs(&[(
        "empty",
        AttributeValue {
            data_type: "String".to_string(),
            string_value: None,
            binary_value: None,
        },
    )]);

    assert_eq!(size::attributes_size(&attributes), 5 + 6);
}

#[test]
fn size_counts_utf8_bytes() {
    let attributes = attrs(&[("név", AttributeValue::string("árvíztűrő"))]);

    assert_eq!(
        size::message_size("tükörfúrógép", &attributes),
        "név".len() + "String".len() + "árvíztűrő".len() + "tükörfúrógép".len()
    );
}

#[test]
fn message_on_the_threshold_is_not_large() {
    let body = "x".repeat(size::DEFAULT_MESSAGE_SIZE_THRESHOLD);
    let attributes = MessageAttributes::new();

    assert!(!size::is_large(&body, &attributes, size::DEFAULT_MESSAGE_SIZE_THRESHOLD));
}

#[test]
fn message_one_byte_over_the_threshold_is_large() {
    let body = "x".repeat(size::DEFAULT_MESSAGE_SIZE_THRESHOLD + 1);
    let attributes = MessageAttributes::new();

    assert!(size::is_large(&body, &attributes, size::DEFAULT_MESSAGE_SIZE_THRESHOLD));
}

#[test]
fn attributes_push_a_small_body_over_the_threshold() {
    let attributes = attrs(&[("padding", AttributeValue::string("x".repeat(100)))]);
    let body = "y".repeat(200);

    assert!(size::is_large(&body, &attributes, 300));
    assert!(!size::is_large(&body, &attributes, 320));
}

#[test]
fn encode_attribute_value_uses_bucket_then_key() {
    let pointer = StoragePointer {
        bucket: "offload-bucket".to_string(),
        key: "11112222-3333".to_string(),
    };

    assert_eq!(pointer::encode_attribute_value(&pointer), "(offload-bucket)11112222-3333");
}

#[test]
fn attribute_value_round_trip() {
    let pointer = StoragePointer {
        bucket: "b".to_string(),
        key: "k".to_string(),
    };

    let parsed = pointer::parse_attribute_value(&pointer::encode_attribute_value(&pointer)).unwrap();

    assert_eq!(parsed, pointer);
}

#[test]
fn key_may_contain_closing_paren() {
    let parsed = pointer::parse_attribute_value("(bucket)key-with-)-inside").unwrap();

    assert_eq!(parsed.bucket, "bucket");
    assert_eq!(parsed.key, "key-with-)-inside");
}

#[test]
fn attribute_value_without_key_is_malformed() {
    assert!(pointer::parse_attribute_value("(bucket)").is_err());
    assert!(pointer::parse_attribute_value("no-parens").is_err());
}

#[test]
fn decode_attribute_absent_is_none() {
    let result = pointer::decode_attribute(&MessageAttributes::new()).unwrap();

    assert!(result.is_none());
}

#[test]
fn decode_attribute_present_without_value_is_malformed() {
    let attributes = attrs(&[(
        pointer::RESERVED_ATTRIBUTE_NAME,
        AttributeValue {
            data_type: "String".to_string(),
            string_value: None,
            binary_value: None,
        },
    )]);

    let result = pointer::decode_attribute(&attributes);

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .downcast_ref::<MalformedPointerError>()
        .is_some());
}

#[test]
fn decode_attribute_parses_bucket_and_key() {
    let attributes = attrs(&[(
        pointer::RESERVED_ATTRIBUTE_NAME,
        AttributeValue::string("(my-bucket)my-key"),
    )]);

    let pointer = pointer::decode_attribute(&attributes).unwrap().unwrap();

    assert_eq!(pointer.bucket, "my-bucket");
    assert_eq!(pointer.key, "my-key");
}

#[test]
fn compat_body_requires_a_signal_attribute() {
    let body = r#"{"s3BucketName": "b", "s3Key": "k"}"#;

    let result = pointer::decode_compat_body(&MessageAttributes::new(), body).unwrap();

    assert!(result.is_none());
}

#[test]
fn compat_body_is_parsed_when_signaled() {
    for name in pointer::LEGACY_ATTRIBUTE_NAMES {
        let attributes = attrs(&[(name, AttributeValue::string("1048576"))]);
        let body = r#"{"s3BucketName": "legacy-bucket", "s3Key": "legacy-key"}"#;

        let pointer = pointer::decode_compat_body(&attributes, body).unwrap().unwrap();

        assert_eq!(pointer.bucket, "legacy-bucket");
        assert_eq!(pointer.key, "legacy-key");
    }
}

#[test]
fn signaled_but_unparsable_body_is_malformed() {
    let attributes = attrs(&[("SQSLargePayloadSize", AttributeValue::string("1048576"))]);

    let result = pointer::decode_compat_body(&attributes, "not json at all");

    assert!(result.is_err());
}

#[test]
fn decode_pointer_prefers_the_attribute_form() {
    let attributes = attrs(&[
        (pointer::RESERVED_ATTRIBUTE_NAME, AttributeValue::string("(new)k1")),
        ("SQSLargePayloadSize", AttributeValue::string("1048576")),
    ]);
    let body = r#"{"s3BucketName": "old", "s3Key": "k2"}"#;

    let pointer = pointer::decode_pointer(&attributes, body, true).unwrap().unwrap();

    assert_eq!(pointer.bucket, "new");
}

#[test]
fn decode_pointer_ignores_compat_body_outside_compatibility_mode() {
    let attributes = attrs(&[("SQSLargePayloadSize", AttributeValue::string("1048576"))]);
    let body = r#"{"s3BucketName": "old", "s3Key": "k2"}"#;

    let result = pointer::decode_pointer(&attributes, body, false).unwrap();

    assert!(result.is_none());
}

#[test]
fn token_embedding_round_trip() {
    let token = "AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a";

    let embedded = pointer::embed_in_token("bucket", "key", token);
    let (bucket, key) = pointer::extract_from_token(&embedded);

    assert_eq!(bucket.as_deref(), Some("bucket"));
    assert_eq!(key.as_deref(), Some("key"));
    assert_eq!(pointer::strip_token(&embedded), token);
}

#[test]
fn embedded_token_layout_is_wire_compatible() {
    let embedded = pointer::embed_in_token("b", "k", "token");

    assert_eq!(
        embedded,
        "-..s3BucketName..-b-..s3BucketName..--..s3Key..-k-..s3Key..-token"
    );
}

#[test]
fn unembedded_token_extracts_nothing() {
    let (bucket, key) = pointer::extract_from_token("AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a");

    assert!(bucket.is_none());
    assert!(key.is_none());
}

#[test]
fn unembedded_token_strips_to_itself() {
    let token = "AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a";

    assert_eq!(pointer::strip_token(token), token);
}

#[test]
fn empty_bucket_and_key_still_round_trip() {
    let embedded = pointer::embed_in_token("", "", "t");
    let (bucket, key) = pointer::extract_from_token(&embedded);

    assert_eq!(bucket.as_deref(), Some(""));
    assert_eq!(key.as_deref(), Some(""));
    assert_eq!(pointer::strip_token(&embedded), "t");
}
