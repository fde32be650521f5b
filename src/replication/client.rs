use async_trait::async_trait;
use std::time::Duration;

use super::types::{Heartbeat, Message};

/// Outbound side of the replication protocol. Both roles speak the same
/// wire vocabulary: messages go to a secondary's `POST /`, heartbeats to
/// the master's `POST /health`.
///
/// Transport failures and timeouts are folded into `false`: callers decide
/// whether to retry (the write path) or drop (catch-up and heartbeats).
#[async_trait]
pub trait ReplicaClient: Send + Sync {
    /// Deliver one message to the secondary at `ip`. True means the
    /// secondary acknowledged with a success status within the timeout.
    async fn replicate(&self, ip: &str, message: &Message, timeout: Duration) -> bool;

    /// Report delivery progress to the master at `master_url`.
    async fn send_heartbeat(&self, master_url: &str, beat: &Heartbeat, timeout: Duration) -> bool;
}

/// HTTP implementation over a shared reqwest client.
pub struct HttpReplicaClient {
    http: reqwest::Client,
    replica_port: u16,
}

impl HttpReplicaClient {
    pub fn new(replica_port: u16) -> Self {
        Self {
            http: reqwest::Client::new(),
            replica_port,
        }
    }
}

#[async_trait]
impl ReplicaClient for HttpReplicaClient {
    async fn replicate(&self, ip: &str, message: &Message, timeout: Duration) -> bool {
        let url = format!("http://{}:{}/", ip, self.replica_port);
        tracing::info!("Replicate to {} message id {}", url, message.id);

        match self.http.post(&url).json(message).timeout(timeout).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(err) => {
                tracing::debug!("Replicate to {} failed: {}", url, err);
                false
            }
        }
    }

    async fn send_heartbeat(&self, master_url: &str, beat: &Heartbeat, timeout: Duration) -> bool {
        let url = format!("{}/health", master_url.trim_end_matches('/'));
        tracing::debug!("Heartbeat to {} with delivered {}", url, beat.delivered);

        match self.http.post(&url).json(beat).timeout(timeout).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(err) => {
                tracing::debug!("Heartbeat to {} failed: {}", url, err);
                false
            }
        }
    }
}
