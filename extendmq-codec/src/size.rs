use crate::message::MessageAttributes;

/// Queue services commonly refuse messages over 256 KiB, counting body and
/// attributes together.
pub const DEFAULT_MESSAGE_SIZE_THRESHOLD: usize = 262_144;

/// Wire size contribution of the attribute map in bytes.
///
/// Every attribute counts its name, its declared data type name and whichever
/// value fields are set, all in UTF-8 bytes. An attribute with no value set
/// still counts its name and data type.
pub fn attributes_size(attributes: &MessageAttributes) -> usize {
    let mut size = 0;

    for (name, value) in attributes {
        size += name.len();
        size += value.data_type.len();

        if let Some(string_value) = &value.string_value {
            size += string_value.len();
        }

        if let Some(binary_value) = &value.binary_value {
            size += binary_value.len();
        }
    }

    size
}

/// Total wire size of a message in bytes.
pub fn message_size(body: &str, attributes: &MessageAttributes) -> usize {
    attributes_size(attributes) + body.len()
}

/// Tells if a message needs to be offloaded. A message sitting exactly on the
/// threshold is not large.
pub fn is_large(body: &str, attributes: &MessageAttributes, threshold: usize) -> bool {
    message_size(body, attributes) > threshold
}
