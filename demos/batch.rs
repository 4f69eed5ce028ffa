use std::sync::Arc;

use anyhow::Result;
use extendmq_client::mem::{MemoryQueue, MemoryStore};
use extendmq_client::message::OutgoingMessage;
use extendmq_client::services::{
    DeleteBatchEntry, DeleteBatchRequest, ReceiveRequest, SendBatchEntry, SendBatchRequest,
};
use extendmq_client::{ClientConfig, ExtendedClient};

#[tokio::main]
async fn main() -> Result<()> {
    let queue_url = "https://queue.demo/batch";

    extendmq_client::setup_logger();

    let store = Arc::new(MemoryStore::new());
    let client = ExtendedClient::new(
        Arc::new(MemoryQueue::new()),
        store.clone(),
        ClientConfig {
            bucket: Some("demo-bucket".to_string()),
            message_size_threshold: 1024,
            ..Default::default()
        },
    );

    let entries = (0..5)
        .map(|i| SendBatchEntry {
            id: i.to_string(),
            message: if i % 2 == 0 {
                OutgoingMessage::from(format!("small message {}", i).as_str())
            } else {
                OutgoingMessage::from("z".repeat(4096).as_str())
            },
        })
        .collect();

    let sent = client
        .send_batch(SendBatchRequest {
            queue_url: queue_url.to_string(),
            entries,
        })
        .await?;

    println!(
        "sent {} messages, {} offloaded objects",
        sent.successful.len(),
        store.object_count()
    );

    let response = client
        .receive(ReceiveRequest {
            queue_url: queue_url.to_string(),
            max_messages: Some(10),
            ..Default::default()
        })
        .await?;

    let entries = response
        .messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            println!("entry {} delivers {} bytes", i, message.body.len());

            DeleteBatchEntry {
                id: i.to_string(),
                receipt_handle: message.receipt_handle.clone(),
            }
        })
        .collect();

    let deleted = client
        .delete_batch(DeleteBatchRequest {
            queue_url: queue_url.to_string(),
            entries,
        })
        .await?;

    println!(
        "deleted {} messages, {} objects left",
        deleted.successful.len(),
        store.object_count()
    );

    Ok(())
}
