//! Interception point for batch-style consumers.
//!
//! Event-driven runtimes hand a whole batch of queue records to application
//! code without going through `ExtendedClient::receive`. This hook performs
//! the same decode-and-rewrite steps on those records in place, before the
//! application sees them.

use anyhow::Result;
use futures::future::try_join_all;

use crate::client_api::ExtendedClient;
use crate::message::ReceivedMessage;

impl ExtendedClient {
    /// Resolves offloaded payloads of a record batch in place: bodies are
    /// replaced with the fetched content and pointers are embedded into the
    /// receipt handles. Any failure aborts the whole batch and leaves the
    /// records untouched, so no partially rewritten batch reaches the
    /// application.
    pub async fn process_inbound(&self, records: &mut Vec<ReceivedMessage>) -> Result<()> {
        let resolved = try_join_all(
            records
                .iter()
                .map(|record| self.resolve_message(record.clone())),
        )
        .await?;

        *records = resolved;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_api::ClientConfig;
    use crate::error::{ErrorKind, ExtendedError};
    use crate::mem::{MemoryQueue, MemoryStore};
    use crate::services::ObjectStore;
    use extendmq_codec::message::AttributeValue;
    use extendmq_codec::pointer;
    use std::sync::Arc;

    fn inbound_client(store: Arc<MemoryStore>) -> ExtendedClient {
        ExtendedClient::new(
            Arc::new(MemoryQueue::new()),
            store,
            ClientConfig {
                bucket: Some("records-bucket".to_string()),
                ..Default::default()
            },
        )
    }

    fn offloaded_record(bucket: &str, key: &str) -> ReceivedMessage {
        let mut record = ReceivedMessage {
            message_id: "m1".to_string(),
            receipt_handle: "rh-original".to_string(),
            body: key.to_string(),
            ..Default::default()
        };

        record.attributes.insert(
            pointer::RESERVED_ATTRIBUTE_NAME.to_string(),
            AttributeValue::string(format!("({}){}", bucket, key)),
        );

        record
    }

    #[tokio::test]
    async fn records_are_rewritten_in_place() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("records-bucket", "k1", b"offloaded one".to_vec())
            .await
            .unwrap();
        let client = inbound_client(store);

        let mut records = vec![
            offloaded_record("records-bucket", "k1"),
            ReceivedMessage {
                message_id: "m2".to_string(),
                receipt_handle: "rh-plain".to_string(),
                body: "inline".to_string(),
                ..Default::default()
            },
        ];

        client.process_inbound(&mut records).await.unwrap();

        assert_eq!(records[0].body, "offloaded one");
        assert!(records[0].receipt_handle.ends_with("rh-original"));
        assert!(records[0].receipt_handle.contains(pointer::MESSAGE_KEY_MARKER));
        assert_eq!(records[1].body, "inline");
        assert_eq!(records[1].receipt_handle, "rh-plain");
    }

    #[tokio::test]
    async fn a_single_failing_record_aborts_the_whole_batch() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("records-bucket", "k1", b"offloaded one".to_vec())
            .await
            .unwrap();
        let client = inbound_client(store);

        let mut records = vec![
            offloaded_record("records-bucket", "k1"),
            // no such object in the store
            offloaded_record("records-bucket", "k-missing"),
        ];

        let error = client.process_inbound(&mut records).await.unwrap_err();

        assert_eq!(
            error.downcast_ref::<ExtendedError>().unwrap().kind,
            ErrorKind::Storage
        );
        // untouched on failure
        assert_eq!(records[0].body, "k1");
        assert_eq!(records[0].receipt_handle, "rh-original");
    }
}
