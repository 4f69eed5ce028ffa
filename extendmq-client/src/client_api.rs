use std::sync::Arc;

use anyhow::Result;
use futures::future::try_join_all;
use log::debug;
use uuid::Uuid;

use extendmq_codec::message::AttributeValue;
use extendmq_codec::pointer::{self, StoragePointer};
use extendmq_codec::size;

use crate::error::{pointer_error, queue_error, storage_error, ErrorKind};
use crate::extended_error;
use crate::message::{OutgoingMessage, ReceivedMessage};
use crate::services::{
    ChangeVisibilityBatchEntry, ChangeVisibilityBatchRequest, ChangeVisibilityBatchResponse, ChangeVisibilityRequest,
    DeleteBatchEntry, DeleteBatchRequest, DeleteBatchResponse, DeleteRequest, ObjectStore, QueueService,
    ReceiveRequest, ReceiveResponse, SendBatchEntry, SendBatchRequest, SendBatchResponse, SendRequest, SendResponse,
};
use crate::transform::{
    default_receive_transform, default_send_transform, ReceiveTransform, SendSplit, SendTransform,
};

/// Configuration of the extended client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Bucket offloaded payloads are written to. Required for send operations.
    pub bucket: Option<String>,
    /// Offload every message regardless of its size.
    pub always_offload: bool,
    /// Size in bytes over which a message is offloaded.
    pub message_size_threshold: usize,
    /// Accept the attribute names and the JSON body pointer convention of
    /// older offloading clients.
    pub compatibility_mode: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            always_offload: false,
            message_size_threshold: size::DEFAULT_MESSAGE_SIZE_THRESHOLD,
            compatibility_mode: false,
        }
    }
}

/// Queue client which offloads oversized payloads to an object store.
///
/// Every operation is stateless; consistency between the queue and the store
/// comes from call ordering only. The object write completes before the queue
/// send starts, and the object delete completes before the queue delete
/// starts, so the queue never references an object that was not written and a
/// deleted queue entry can at worst leave an orphaned object behind.
pub struct ExtendedClient {
    queue: Arc<dyn QueueService>,
    store: Arc<dyn ObjectStore>,
    config: ClientConfig,
    send_transform: Option<Box<SendTransform>>,
    receive_transform: Option<Box<ReceiveTransform>>,
}

struct PreparedSend {
    store_write: Option<(StoragePointer, String)>,
    message: OutgoingMessage,
}

impl ExtendedClient {
    pub fn new(queue: Arc<dyn QueueService>, store: Arc<dyn ObjectStore>, config: ClientConfig) -> Self {
        Self {
            queue,
            store,
            config,
            send_transform: None,
            receive_transform: None,
        }
    }

    /// Replaces the default send split.
    pub fn send_transform(mut self, transform: Box<SendTransform>) -> Self {
        self.send_transform = Some(transform);
        self
    }

    /// Replaces the default receive recombination.
    pub fn receive_transform(mut self, transform: Box<ReceiveTransform>) -> Self {
        self.receive_transform = Some(transform);
        self
    }

    /// Sends a message, offloading its payload first when the transform says
    /// so. The object write must succeed before the queue call is attempted.
    pub async fn send(&self, request: SendRequest) -> Result<SendResponse> {
        let bucket = self.offload_bucket()?;
        let PreparedSend { store_write, message } = self.prepare_send(bucket, request.message)?;

        if let Some((pointer_value, content)) = store_write {
            debug!(
                "Offloading {} byte payload to ({}){}",
                content.len(),
                pointer_value.bucket,
                pointer_value.key
            );

            self.store
                .put(&pointer_value.bucket, &pointer_value.key, content.into_bytes())
                .await
                .map_err(storage_error)?;
        }

        self.queue
            .send(SendRequest {
                queue_url: request.queue_url,
                message,
            })
            .await
            .map_err(queue_error)
    }

    /// Sends a batch. Offload decisions are made per entry; all object writes
    /// run concurrently and every one of them must succeed before the single
    /// queue batch call is made.
    pub async fn send_batch(&self, request: SendBatchRequest) -> Result<SendBatchResponse> {
        let bucket = self.offload_bucket()?;
        let mut entries = Vec::with_capacity(request.entries.len());
        let mut writes = Vec::new();

        for entry in request.entries {
            let PreparedSend { store_write, message } = self.prepare_send(bucket, entry.message)?;

            if let Some(write) = store_write {
                writes.push(write);
            }

            entries.push(SendBatchEntry {
                id: entry.id,
                message,
            });
        }

        let store = &self.store;

        try_join_all(
            writes
                .into_iter()
                .map(|(pointer_value, content)| async move {
                    store
                        .put(&pointer_value.bucket, &pointer_value.key, content.into_bytes())
                        .await
                }),
        )
        .await
        .map_err(storage_error)?;

        self.queue
            .send_batch(SendBatchRequest {
                queue_url: request.queue_url,
                entries,
            })
            .await
            .map_err(queue_error)
    }

    /// Receives messages and resolves offloaded payloads. The reserved
    /// pointer attribute names are always requested, the fetched content
    /// replaces the body and the pointer is embedded into the receipt handle.
    pub async fn receive(&self, request: ReceiveRequest) -> Result<ReceiveResponse> {
        let mut request = request;
        self.append_pointer_attribute_names(&mut request.attribute_names);

        let response = self.queue.receive(request).await.map_err(queue_error)?;

        let messages = try_join_all(
            response
                .messages
                .into_iter()
                .map(|message| self.resolve_message(message)),
        )
        .await?;

        Ok(ReceiveResponse { messages })
    }

    /// Deletes a message. The pointer is recovered from the receipt handle,
    /// the object is deleted first and the stripped handle goes to the queue.
    pub async fn delete(&self, request: DeleteRequest) -> Result<()> {
        let (receipt_handle, pointer_value) = Self::prepare_delete(&request.receipt_handle);

        if let Some(pointer_value) = pointer_value {
            debug!("Deleting offloaded payload at ({}){}", pointer_value.bucket, pointer_value.key);

            self.store
                .delete(&pointer_value.bucket, &pointer_value.key)
                .await
                .map_err(storage_error)?;
        }

        self.queue
            .delete(DeleteRequest {
                queue_url: request.queue_url,
                receipt_handle,
            })
            .await
            .map_err(queue_error)
    }

    /// Deletes a batch of messages. All object deletes run concurrently and
    /// must succeed before the queue batch call is made; objects already
    /// deleted by a partially failed batch are not restored.
    pub async fn delete_batch(&self, request: DeleteBatchRequest) -> Result<DeleteBatchResponse> {
        let mut entries = Vec::with_capacity(request.entries.len());
        let mut deletes = Vec::new();

        for entry in request.entries {
            let (receipt_handle, pointer_value) = Self::prepare_delete(&entry.receipt_handle);

            if let Some(pointer_value) = pointer_value {
                deletes.push(pointer_value);
            }

            entries.push(DeleteBatchEntry {
                id: entry.id,
                receipt_handle,
            });
        }

        let store = &self.store;

        try_join_all(
            deletes
                .iter()
                .map(|pointer_value| store.delete(&pointer_value.bucket, &pointer_value.key)),
        )
        .await
        .map_err(storage_error)?;

        self.queue
            .delete_batch(DeleteBatchRequest {
                queue_url: request.queue_url,
                entries,
            })
            .await
            .map_err(queue_error)
    }

    /// Changes message visibility. Pure passthrough apart from stripping the
    /// embedded pointer off the receipt handle.
    pub async fn change_visibility(&self, request: ChangeVisibilityRequest) -> Result<()> {
        let receipt_handle = pointer::strip_token(&request.receipt_handle).to_string();

        self.queue
            .change_visibility(ChangeVisibilityRequest {
                queue_url: request.queue_url,
                receipt_handle,
                visibility_timeout: request.visibility_timeout,
            })
            .await
            .map_err(queue_error)
    }

    pub async fn change_visibility_batch(
        &self,
        request: ChangeVisibilityBatchRequest,
    ) -> Result<ChangeVisibilityBatchResponse> {
        let entries = request
            .entries
            .into_iter()
            .map(|entry| ChangeVisibilityBatchEntry {
                id: entry.id,
                receipt_handle: pointer::strip_token(&entry.receipt_handle).to_string(),
                visibility_timeout: entry.visibility_timeout,
            })
            .collect();

        self.queue
            .change_visibility_batch(ChangeVisibilityBatchRequest {
                queue_url: request.queue_url,
                entries,
            })
            .await
            .map_err(queue_error)
    }

    fn offload_bucket(&self) -> Result<&str> {
        match &self.config.bucket {
            Some(bucket) => Ok(bucket),
            None => extended_error!(
                ErrorKind::Configuration,
                "The bucket configuration is required for sending messages"
            ),
        }
    }

    fn split(&self, message: &OutgoingMessage) -> SendSplit {
        match &self.send_transform {
            Some(transform) => transform(message),
            None => default_send_transform(
                message,
                self.config.always_offload,
                self.config.message_size_threshold,
            ),
        }
    }

    fn recombine(&self, message: &ReceivedMessage, offloaded_content: Option<String>) -> String {
        match &self.receive_transform {
            Some(transform) => transform(message, offloaded_content),
            None => default_receive_transform(message, offloaded_content),
        }
    }

    /// Rewrites one outgoing message. A pointer attribute supplied by the
    /// caller is authoritative: no fresh key is generated and no object write
    /// happens, the caller has stored the content already.
    fn prepare_send(&self, bucket: &str, message: OutgoingMessage) -> Result<PreparedSend> {
        let split = self.split(&message);
        let existing = pointer::decode_attribute(&message.attributes).map_err(pointer_error)?;
        let mut message = message;

        if let Some(existing) = existing {
            message.body = split.message_body.unwrap_or(existing.key);

            return Ok(PreparedSend {
                store_write: None,
                message,
            });
        }

        match split.offloaded_content {
            Some(content) => {
                let key = Uuid::new_v4().to_string();
                let pointer_value = StoragePointer {
                    bucket: bucket.to_string(),
                    key: key.clone(),
                };

                message.attributes.insert(
                    pointer::RESERVED_ATTRIBUTE_NAME.to_string(),
                    AttributeValue::string(pointer::encode_attribute_value(&pointer_value)),
                );
                message.body = split.message_body.unwrap_or(key);

                Ok(PreparedSend {
                    store_write: Some((pointer_value, content)),
                    message,
                })
            }
            None => {
                if let Some(body) = split.message_body {
                    message.body = body;
                }

                Ok(PreparedSend {
                    store_write: None,
                    message,
                })
            }
        }
    }

    fn append_pointer_attribute_names(&self, names: &mut Vec<String>) {
        if !names.iter().any(|n| n == pointer::RESERVED_ATTRIBUTE_NAME) {
            names.push(pointer::RESERVED_ATTRIBUTE_NAME.to_string());
        }

        if self.config.compatibility_mode {
            for name in pointer::LEGACY_ATTRIBUTE_NAMES {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
    }

    /// Resolves one received message: fetches the offloaded content if the
    /// message carries a pointer, recombines the body and embeds the pointer
    /// into the receipt handle for the later delete or visibility call.
    pub(crate) async fn resolve_message(&self, mut message: ReceivedMessage) -> Result<ReceivedMessage> {
        let pointer_value = pointer::decode_pointer(
            &message.attributes,
            &message.body,
            self.config.compatibility_mode,
        )
        .map_err(pointer_error)?;

        match pointer_value {
            Some(pointer_value) => {
                let content = self.fetch_content(&pointer_value).await?;

                message.body = self.recombine(&message, Some(content));
                message.receipt_handle =
                    pointer::embed_in_token(&pointer_value.bucket, &pointer_value.key, &message.receipt_handle);
            }
            None => {
                message.body = self.recombine(&message, None);
            }
        }

        Ok(message)
    }

    async fn fetch_content(&self, pointer_value: &StoragePointer) -> Result<String> {
        let content = self
            .store
            .get(&pointer_value.bucket, &pointer_value.key)
            .await
            .map_err(storage_error)?;

        match String::from_utf8(content) {
            Ok(content) => Ok(content),
            Err(_) => extended_error!(
                ErrorKind::Storage,
                format!(
                    "Offloaded content at ({}){} is not valid UTF-8",
                    pointer_value.bucket, pointer_value.key
                )
            ),
        }
    }

    fn prepare_delete(receipt_handle: &str) -> (String, Option<StoragePointer>) {
        let (bucket, key) = pointer::extract_from_token(receipt_handle);
        let original = pointer::strip_token(receipt_handle).to_string();

        let pointer_value = match (bucket, key) {
            (Some(bucket), Some(key)) => Some(StoragePointer { bucket, key }),
            _ => None,
        };

        (original, pointer_value)
    }
}
