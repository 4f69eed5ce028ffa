use std::collections::HashMap;

use serde_derive::{Deserialize, Serialize};

/// Typed value of a single message attribute.
///
/// The serde aliases absorb the two wire casings used by the queue service:
/// SDK responses carry `StringValue` while batch event records carry
/// `stringValue`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AttributeValue {
    #[serde(rename = "DataType", alias = "dataType")]
    pub data_type: String,
    #[serde(
        rename = "StringValue",
        alias = "stringValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub string_value: Option<String>,
    #[serde(
        rename = "BinaryValue",
        alias = "binaryValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub binary_value: Option<Vec<u8>>,
}

/// Attribute map of a message, keyed by attribute name.
pub type MessageAttributes = HashMap<String, AttributeValue>;

impl AttributeValue {
    /// A text attribute.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: Some(value.into()),
            binary_value: None,
        }
    }

    /// A binary attribute.
    pub fn binary(value: Vec<u8>) -> Self {
        Self {
            data_type: "Binary".to_string(),
            string_value: None,
            binary_value: Some(value),
        }
    }
}
