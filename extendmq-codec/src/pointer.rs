//! Encoding and decoding of storage pointers.
//!
//! A pointer travels on two channels. On the way out it is written into a
//! reserved message attribute as `(<bucket>)<key>`. On the way back in it is
//! embedded into the queue's addressing token between fixed markers, so that a
//! later delete or visibility call can recover the object location from the
//! token alone.

use serde_derive::{Deserialize, Serialize};

use crate::message::MessageAttributes;
use crate::{malformed_pointer, Result};

/// Attribute name carrying the `(<bucket>)<key>` pointer value.
pub const RESERVED_ATTRIBUTE_NAME: &str = "S3MessageBodyKey";

/// Attribute names used by older offloading clients. Their presence signals
/// that the message body itself is a JSON pointer. Checked in this order.
pub const LEGACY_ATTRIBUTE_NAMES: [&str; 2] = ["SQSLargePayloadSize", "ExtendedPayloadSize"];

/// Delimiter of the bucket name inside an addressing token.
pub const BUCKET_NAME_MARKER: &str = "-..s3BucketName..-";

/// Delimiter of the object key inside an addressing token.
pub const MESSAGE_KEY_MARKER: &str = "-..s3Key..-";

/// Location of an offloaded message body in the object store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoragePointer {
    pub bucket: String,
    pub key: String,
}

/// JSON body shape written by older offloading clients in place of the real
/// message body.
#[derive(Debug, Deserialize, Serialize)]
struct CompatBodyPointer {
    #[serde(rename = "s3BucketName")]
    bucket: String,
    #[serde(rename = "s3Key")]
    key: String,
}

/// Text form of a pointer as carried by the reserved attribute.
pub fn encode_attribute_value(pointer: &StoragePointer) -> String {
    format!("({}){}", pointer.bucket, pointer.key)
}

/// Parses the `(<bucket>)<key>` pattern. The bucket runs up to the first `)`
/// and the key is the non-empty remainder.
pub fn parse_attribute_value(value: &str) -> Result<StoragePointer> {
    if let Some(rest) = value.strip_prefix('(') {
        if let Some(end) = rest.find(')') {
            if end + 1 < rest.len() {
                return Ok(StoragePointer {
                    bucket: rest[..end].to_string(),
                    key: rest[end + 1..].to_string(),
                });
            }
        }
    }

    malformed_pointer!(format!("Invalid pointer attribute value: {}", value))
}

/// Reads the pointer from the reserved attribute. Returns `None` if the
/// attribute is absent, and fails if it is present without a parsable string
/// value.
pub fn decode_attribute(attributes: &MessageAttributes) -> Result<Option<StoragePointer>> {
    let attribute = match attributes.get(RESERVED_ATTRIBUTE_NAME) {
        Some(attribute) => attribute,
        None => return Ok(None),
    };

    let value = match &attribute.string_value {
        Some(value) => value,
        None => {
            return malformed_pointer!(format!(
                "Invalid {} message attribute: missing string value",
                RESERVED_ATTRIBUTE_NAME
            ))
        }
    };

    parse_attribute_value(value).map(Some)
}

/// Reads the pointer of an older offloading client. Any legacy attribute name
/// being present is taken as the signal that the body is a JSON pointer; an
/// unparsable body is then an error, not a passthrough.
pub fn decode_compat_body(attributes: &MessageAttributes, body: &str) -> Result<Option<StoragePointer>> {
    let signaled = LEGACY_ATTRIBUTE_NAMES
        .iter()
        .any(|name| attributes.contains_key(*name));

    if !signaled {
        return Ok(None);
    }

    match serde_json::from_str::<CompatBodyPointer>(body) {
        Ok(pointer) => Ok(Some(StoragePointer {
            bucket: pointer.bucket,
            key: pointer.key,
        })),
        Err(e) => malformed_pointer!(format!(
            "Legacy payload attribute present but body is not a JSON pointer: {}",
            e
        )),
    }
}

/// Reads the pointer of a received message, trying the attribute form first
/// and the compatibility body form second.
pub fn decode_pointer(
    attributes: &MessageAttributes,
    body: &str,
    compatibility: bool,
) -> Result<Option<StoragePointer>> {
    if let Some(pointer) = decode_attribute(attributes)? {
        return Ok(Some(pointer));
    }

    if compatibility {
        return decode_compat_body(attributes, body);
    }

    Ok(None)
}

/// Embeds bucket and key into an addressing token. `strip_token` recovers the
/// original token byte for byte as long as the token itself does not contain
/// the markers.
pub fn embed_in_token(bucket: &str, key: &str, token: &str) -> String {
    format!(
        "{m1}{bucket}{m1}{m2}{key}{m2}{token}",
        m1 = BUCKET_NAME_MARKER,
        m2 = MESSAGE_KEY_MARKER,
        bucket = bucket,
        key = key,
        token = token
    )
}

/// Recovers bucket and key from an addressing token. A token without an
/// embedded pointer yields `(None, None)`.
pub fn extract_from_token(token: &str) -> (Option<String>, Option<String>) {
    (
        extract_between_markers(token, BUCKET_NAME_MARKER),
        extract_between_markers(token, MESSAGE_KEY_MARKER),
    )
}

fn extract_between_markers(token: &str, marker: &str) -> Option<String> {
    let start = token.find(marker)? + marker.len();
    let end = token.rfind(marker)?;

    if end < start {
        return None;
    }

    Some(token[start..end].to_string())
}

/// Strips an embedded pointer off an addressing token. Tokens without an
/// embedding pass through unchanged.
pub fn strip_token(token: &str) -> &str {
    match token.rfind(MESSAGE_KEY_MARKER) {
        Some(position) => &token[position + MESSAGE_KEY_MARKER.len()..],
        None => token,
    }
}
