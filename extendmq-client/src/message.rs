use extendmq_codec::message::{AttributeValue, MessageAttributes};

/// A message published by the caller. The body is treated as text and the
/// attributes follow the queue service's name/typed-value shape.
#[derive(Clone, Debug, Default)]
pub struct OutgoingMessage {
    pub body: String,
    pub attributes: MessageAttributes,
}

impl From<&str> for OutgoingMessage {
    fn from(value: &str) -> Self {
        Self {
            body: value.to_string(),
            ..Default::default()
        }
    }
}

impl OutgoingMessage {
    pub fn body(mut self, value: &str) -> Self {
        self.body = value.to_string();
        self
    }

    pub fn attribute(mut self, name: &str, value: AttributeValue) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }
}

/// A message delivered by the queue.
///
/// The `receipt_handle` is the queue's addressing token. After a receive it
/// carries the embedded storage pointer of an offloaded message, so it must
/// be handed back unmodified to the delete and visibility calls.
#[derive(Clone, Debug, Default)]
pub struct ReceivedMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
    pub attributes: MessageAttributes,
}
