use tokio::sync::RwLock;

use crate::replication::types::Message;

/// Append-only in-memory message log, the master's source of truth for ids.
///
/// The id of a message is its position, so the log never shrinks and never
/// mutates in place. Appends take the write lock for the whole
/// read-length-then-push section so no two appends can observe the same
/// length.
pub struct ReplicationLog {
    entries: RwLock<Vec<String>>,
}

impl ReplicationLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append a payload and return the message with its assigned id.
    pub async fn append(&self, text: String) -> Message {
        let mut entries = self.entries.write().await;
        let id = entries.len() as u64;
        entries.push(text.clone());

        tracing::info!("Appended message id {} to the log", id);
        Message { id, text }
    }

    /// Snapshot of all payloads in id order.
    pub async fn read_all(&self) -> Vec<String> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> u64 {
        self.entries.read().await.len() as u64
    }

    /// Messages from id `start` to the end of the log, for catch-up
    /// replication of a lagging secondary.
    pub async fn entries_from(&self, start: u64) -> Vec<Message> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .enumerate()
            .skip(start as usize)
            .map(|(id, text)| Message {
                id: id as u64,
                text: text.clone(),
            })
            .collect()
    }
}

impl Default for ReplicationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_append_assigns_dense_ids() {
        let log = ReplicationLog::new();

        let first = log.append("message 0".to_string()).await;
        let second = log.append("message 1".to_string()).await;

        assert_eq!(first.id, 0);
        assert_eq!(second.id, 1);
        assert_eq!(log.len().await, 2);
        assert_eq!(log.read_all().await, vec!["message 0", "message 1"]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_never_share_an_id() {
        let log = Arc::new(ReplicationLog::new());

        let mut handles = Vec::new();
        for i in 0..50 {
            let log = log.clone();
            handles.push(tokio::spawn(
                async move { log.append(format!("message {}", i)).await },
            ));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().id);
        }
        ids.sort_unstable();

        assert_eq!(ids, (0..50).collect::<Vec<u64>>());
        assert_eq!(log.len().await, 50);
    }

    #[tokio::test]
    async fn test_entries_from_returns_tail_with_ids() {
        let log = ReplicationLog::new();
        for i in 0..4 {
            log.append(format!("message {}", i)).await;
        }

        let tail = log.entries_from(2).await;
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0], Message::new(2, "message 2"));
        assert_eq!(tail[1], Message::new(3, "message 3"));

        assert!(log.entries_from(4).await.is_empty());
        assert!(log.entries_from(100).await.is_empty());
    }
}
