//! Capability interfaces of the two external collaborators.
//!
//! The extended client only ever talks through these traits. Adapters over
//! the real SDK clients live outside this crate; `crate::mem` ships in-memory
//! implementations for demos and tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::message::{OutgoingMessage, ReceivedMessage};

/// Parameters of a single send.
#[derive(Clone, Debug, Default)]
pub struct SendRequest {
    pub queue_url: String,
    pub message: OutgoingMessage,
}

/// The queue service's native send response.
#[derive(Clone, Debug, Default)]
pub struct SendResponse {
    pub message_id: String,
}

/// One entry of a batch send, identified by a caller-chosen id.
#[derive(Clone, Debug, Default)]
pub struct SendBatchEntry {
    pub id: String,
    pub message: OutgoingMessage,
}

#[derive(Clone, Debug, Default)]
pub struct SendBatchRequest {
    pub queue_url: String,
    pub entries: Vec<SendBatchEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct SendBatchResult {
    pub id: String,
    pub message_id: String,
}

/// Per-entry failure reported by the queue service itself.
#[derive(Clone, Debug, Default)]
pub struct BatchError {
    pub id: String,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct SendBatchResponse {
    pub successful: Vec<SendBatchResult>,
    pub failed: Vec<BatchError>,
}

/// Parameters of a receive call.
#[derive(Clone, Debug, Default)]
pub struct ReceiveRequest {
    pub queue_url: String,
    pub max_messages: Option<u32>,
    pub wait_time_seconds: Option<u32>,
    pub visibility_timeout: Option<u32>,
    /// Message attribute names the queue should return. The extended client
    /// appends the reserved pointer attribute names here.
    pub attribute_names: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ReceiveResponse {
    pub messages: Vec<ReceivedMessage>,
}

#[derive(Clone, Debug, Default)]
pub struct DeleteRequest {
    pub queue_url: String,
    pub receipt_handle: String,
}

#[derive(Clone, Debug, Default)]
pub struct DeleteBatchEntry {
    pub id: String,
    pub receipt_handle: String,
}

#[derive(Clone, Debug, Default)]
pub struct DeleteBatchRequest {
    pub queue_url: String,
    pub entries: Vec<DeleteBatchEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct DeleteBatchResponse {
    pub successful: Vec<String>,
    pub failed: Vec<BatchError>,
}

#[derive(Clone, Debug, Default)]
pub struct ChangeVisibilityRequest {
    pub queue_url: String,
    pub receipt_handle: String,
    pub visibility_timeout: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ChangeVisibilityBatchEntry {
    pub id: String,
    pub receipt_handle: String,
    pub visibility_timeout: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ChangeVisibilityBatchRequest {
    pub queue_url: String,
    pub entries: Vec<ChangeVisibilityBatchEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct ChangeVisibilityBatchResponse {
    pub successful: Vec<String>,
    pub failed: Vec<BatchError>,
}

/// Queue operations the extended client builds on. Assumed to be a reliable
/// request/response SDK; retries and timeouts belong to the implementation.
#[async_trait]
pub trait QueueService: Send + Sync {
    async fn send(&self, request: SendRequest) -> Result<SendResponse>;

    async fn send_batch(&self, request: SendBatchRequest) -> Result<SendBatchResponse>;

    async fn receive(&self, request: ReceiveRequest) -> Result<ReceiveResponse>;

    async fn delete(&self, request: DeleteRequest) -> Result<()>;

    async fn delete_batch(&self, request: DeleteBatchRequest) -> Result<DeleteBatchResponse>;

    async fn change_visibility(&self, request: ChangeVisibilityRequest) -> Result<()>;

    async fn change_visibility_batch(
        &self,
        request: ChangeVisibilityBatchRequest,
    ) -> Result<ChangeVisibilityBatchResponse>;
}

/// Object store primitives the extended client needs, each independently
/// failable.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, content: Vec<u8>) -> Result<()>;

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;
}
