use std::sync::Arc;

use anyhow::Result;
use extendmq_client::mem::{MemoryQueue, MemoryStore};
use extendmq_client::message::OutgoingMessage;
use extendmq_client::services::{DeleteRequest, ReceiveRequest, SendRequest};
use extendmq_client::{ClientConfig, ExtendedClient};

#[tokio::main]
async fn main() -> Result<()> {
    let queue_url = "https://queue.demo/lifecycle";

    extendmq_client::setup_logger();

    let store = Arc::new(MemoryStore::new());
    let client = ExtendedClient::new(
        Arc::new(MemoryQueue::new()),
        store.clone(),
        ClientConfig {
            bucket: Some("demo-bucket".to_string()),
            ..Default::default()
        },
    );

    client
        .send(SendRequest {
            queue_url: queue_url.to_string(),
            message: OutgoingMessage::from("a small message"),
        })
        .await?;

    client
        .send(SendRequest {
            queue_url: queue_url.to_string(),
            message: OutgoingMessage::from("x".repeat(300_000).as_str()),
        })
        .await?;

    println!("objects in the store after sending: {}", store.object_count());

    let response = client
        .receive(ReceiveRequest {
            queue_url: queue_url.to_string(),
            max_messages: Some(10),
            ..Default::default()
        })
        .await?;

    for message in response.messages {
        println!("received {} bytes (id {})", message.body.len(), message.message_id);

        client
            .delete(DeleteRequest {
                queue_url: queue_url.to_string(),
                receipt_handle: message.receipt_handle,
            })
            .await?;
    }

    println!("objects in the store after deleting: {}", store.object_count());

    Ok(())
}
