//! In-memory queue and object store adapters.
//!
//! They back the demo binaries and the client tests, standing in for the SDK
//! adapters a deployment would plug in.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use extendmq_codec::message::MessageAttributes;

use crate::message::ReceivedMessage;
use crate::services::{
    ChangeVisibilityBatchRequest, ChangeVisibilityBatchResponse, ChangeVisibilityRequest, DeleteBatchRequest,
    DeleteBatchResponse, DeleteRequest, ObjectStore, QueueService, ReceiveRequest, ReceiveResponse, SendBatchRequest,
    SendBatchResponse, SendBatchResult, SendRequest, SendResponse,
};

#[derive(Debug, Default)]
struct StoredMessage {
    message_id: String,
    body: String,
    attributes: MessageAttributes,
}

#[derive(Debug, Default)]
struct QueueState {
    queues: HashMap<String, VecDeque<StoredMessage>>,
    /// Receipt handles of delivered but not yet deleted messages.
    in_flight: HashMap<String, String>,
}

/// In-memory queue. Messages are delivered at most once; visibility changes
/// are accepted but not timed.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    state: Mutex<QueueState>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages waiting in a queue.
    pub fn queued_len(&self, queue_url: &str) -> usize {
        let state = self.state.lock().unwrap();

        state.queues.get(queue_url).map(|q| q.len()).unwrap_or(0)
    }

    /// Number of delivered but not yet deleted messages.
    pub fn in_flight_len(&self) -> usize {
        self.state.lock().unwrap().in_flight.len()
    }

    fn filter_attributes(attributes: &MessageAttributes, names: &[String]) -> MessageAttributes {
        if names.iter().any(|n| n == "All") {
            return attributes.clone();
        }

        let mut filtered = MessageAttributes::new();

        for name in names {
            if let Some(value) = attributes.get(name) {
                filtered.insert(name.clone(), value.clone());
            }
        }

        filtered
    }
}

#[async_trait]
impl QueueService for MemoryQueue {
    async fn send(&self, request: SendRequest) -> Result<SendResponse> {
        let message_id = Uuid::new_v4().to_string();
        let mut state = self.state.lock().unwrap();

        state
            .queues
            .entry(request.queue_url)
            .or_default()
            .push_back(StoredMessage {
                message_id: message_id.clone(),
                body: request.message.body,
                attributes: request.message.attributes,
            });

        Ok(SendResponse { message_id })
    }

    async fn send_batch(&self, request: SendBatchRequest) -> Result<SendBatchResponse> {
        let mut response = SendBatchResponse::default();
        let mut state = self.state.lock().unwrap();
        let queue = state.queues.entry(request.queue_url).or_default();

        for entry in request.entries {
            let message_id = Uuid::new_v4().to_string();

            queue.push_back(StoredMessage {
                message_id: message_id.clone(),
                body: entry.message.body,
                attributes: entry.message.attributes,
            });

            response.successful.push(SendBatchResult {
                id: entry.id,
                message_id,
            });
        }

        Ok(response)
    }

    async fn receive(&self, request: ReceiveRequest) -> Result<ReceiveResponse> {
        let limit = request.max_messages.unwrap_or(1) as usize;
        let mut state = self.state.lock().unwrap();
        let mut messages = Vec::new();

        for _ in 0..limit {
            let stored = match state.queues.get_mut(&request.queue_url).and_then(|q| q.pop_front()) {
                Some(stored) => stored,
                None => break,
            };

            let receipt_handle = format!("rh-{}", Uuid::new_v4());

            messages.push(ReceivedMessage {
                message_id: stored.message_id,
                receipt_handle: receipt_handle.clone(),
                body: stored.body,
                attributes: Self::filter_attributes(&stored.attributes, &request.attribute_names),
            });

            state.in_flight.insert(receipt_handle, request.queue_url.clone());
        }

        Ok(ReceiveResponse { messages })
    }

    async fn delete(&self, request: DeleteRequest) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        match state.in_flight.remove(&request.receipt_handle) {
            Some(_) => Ok(()),
            None => Err(anyhow!("Unknown receipt handle {}", request.receipt_handle)),
        }
    }

    async fn delete_batch(&self, request: DeleteBatchRequest) -> Result<DeleteBatchResponse> {
        let mut response = DeleteBatchResponse::default();
        let mut state = self.state.lock().unwrap();

        for entry in request.entries {
            match state.in_flight.remove(&entry.receipt_handle) {
                Some(_) => response.successful.push(entry.id),
                None => response.failed.push(crate::services::BatchError {
                    id: entry.id,
                    message: "Unknown receipt handle".to_string(),
                }),
            }
        }

        Ok(response)
    }

    async fn change_visibility(&self, request: ChangeVisibilityRequest) -> Result<()> {
        let state = self.state.lock().unwrap();

        if state.in_flight.contains_key(&request.receipt_handle) {
            Ok(())
        } else {
            Err(anyhow!("Unknown receipt handle {}", request.receipt_handle))
        }
    }

    async fn change_visibility_batch(
        &self,
        request: ChangeVisibilityBatchRequest,
    ) -> Result<ChangeVisibilityBatchResponse> {
        let mut response = ChangeVisibilityBatchResponse::default();
        let state = self.state.lock().unwrap();

        for entry in request.entries {
            if state.in_flight.contains_key(&entry.receipt_handle) {
                response.successful.push(entry.id);
            } else {
                response.failed.push(crate::services::BatchError {
                    id: entry.id,
                    message: "Unknown receipt handle".to_string(),
                });
            }
        }

        Ok(response)
    }
}

/// In-memory object store with the usual put/get/delete semantics. Deleting a
/// missing object succeeds, getting one fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, bucket: &str, key: &str, content: Vec<u8>) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), content);

        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("No object at ({}){}", bucket, key))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));

        Ok(())
    }
}
