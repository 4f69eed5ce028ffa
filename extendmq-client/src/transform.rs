//! Pluggable split and recombine hooks around the offload decision.
//!
//! The hooks are pure; all object store traffic is driven by the
//! orchestrator in `client_api`.

use extendmq_codec::size;

use crate::message::{OutgoingMessage, ReceivedMessage};

/// Result of splitting an outgoing message into the queue body and the
/// content bound for the object store.
///
/// A non-`None` `offloaded_content` drives an object store write. When
/// `message_body` is `None` at the same time, the generated object key itself
/// becomes the queue body, which older consumers rely on.
#[derive(Clone, Debug, Default)]
pub struct SendSplit {
    pub message_body: Option<String>,
    pub offloaded_content: Option<String>,
}

/// Splits an outgoing message. Custom transforms may keep a small envelope in
/// the queue and offload only part of the payload.
pub type SendTransform = dyn Fn(&OutgoingMessage) -> SendSplit + Send + Sync;

/// Recombines a received message with its fetched offloaded content, if any,
/// into the body the application expects.
pub type ReceiveTransform = dyn Fn(&ReceivedMessage, Option<String>) -> String + Send + Sync;

/// Default split: the whole body moves to the store when offloading is forced
/// or the message is over the threshold, otherwise the whole body stays in
/// the queue.
pub fn default_send_transform(
    message: &OutgoingMessage,
    always_offload: bool,
    threshold: usize,
) -> SendSplit {
    let offload = always_offload || size::is_large(&message.body, &message.attributes, threshold);

    if offload {
        SendSplit {
            message_body: None,
            offloaded_content: Some(message.body.clone()),
        }
    } else {
        SendSplit {
            message_body: Some(message.body.clone()),
            offloaded_content: None,
        }
    }
}

/// Default recombination: the fetched content when the message was offloaded,
/// the queue-delivered body otherwise.
pub fn default_receive_transform(message: &ReceivedMessage, offloaded_content: Option<String>) -> String {
    offloaded_content.unwrap_or_else(|| message.body.clone())
}
