use futures::stream::FuturesUnordered;
use futures::StreamExt;

use super::MasterState;
use crate::replication::types::WriteResponse;

use std::sync::Arc;

/// Accept (or reject) one client write and fan it out.
///
/// After the quorum gate passes, the message is appended and one detached
/// retry task is spawned per currently non-Unhealthy secondary. The client
/// response waits only for the first `wc - 1` of those tasks to finish, in
/// completion order; the rest keep running after the response is sent, so
/// the acknowledged write concern is a lower bound on durability, not an
/// upper one. Task failures are logged here and never reach the client.
pub async fn handle_write(state: Arc<MasterState>, write_concern: u32, text: String) -> WriteResponse {
    if !state.health.has_quorum(write_concern).await {
        tracing::warn!(
            "Rejected write with wc {}: no quorum, master is read-only",
            write_concern
        );
        return WriteResponse::no_quorum();
    }

    let message = state.log.append(text).await;
    let targets = state.health.alive().await;
    tracing::info!("Send message id {} to secondaries {:?}", message.id, targets);

    let mut tasks: FuturesUnordered<_> = targets
        .into_iter()
        .map(|ip| {
            tokio::spawn(super::retry::replicate_with_retry(
                state.client.clone(),
                state.health.clone(),
                state.config.heartbeat_secs,
                ip,
                message.clone(),
            ))
        })
        .collect();

    let wait_for = (write_concern as usize).saturating_sub(1);
    let mut completed = 0;
    while completed < wait_for {
        match tasks.next().await {
            Some(Ok(Ok(()))) => {}
            Some(Ok(Err(err))) => tracing::error!("Replication task failed: {}", err),
            Some(Err(err)) => tracing::error!("Replication task panicked: {}", err),
            None => break,
        }
        completed += 1;
    }

    // dropping the remaining join handles detaches the tasks, they run on
    WriteResponse::accepted(&message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::config::Config;
    use crate::master::health::HealthTracker;
    use crate::master::log::ReplicationLog;
    use crate::replication::client::ReplicaClient;
    use crate::replication::types::{Heartbeat, Message};

    struct CountingClient {
        calls: AtomicUsize,
        fail_first: usize,
    }

    impl CountingClient {
        fn acking() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: 0,
            }
        }

        fn failing_first(fail_first: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReplicaClient for CountingClient {
        async fn replicate(&self, _ip: &str, _message: &Message, _timeout: Duration) -> bool {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            n >= self.fail_first
        }

        async fn send_heartbeat(&self, _url: &str, _beat: &Heartbeat, _timeout: Duration) -> bool {
            true
        }
    }

    fn state_with(client: Arc<CountingClient>) -> Arc<MasterState> {
        Arc::new(MasterState {
            config: Config::default(),
            log: ReplicationLog::new(),
            health: Arc::new(HealthTracker::new(Duration::from_secs(3))),
            client,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_wc_one_accepts_with_no_secondaries() {
        let state = state_with(Arc::new(CountingClient::acking()));

        let response = handle_write(state.clone(), 1, "message 0".to_string()).await;

        assert_eq!(response.ask, 1);
        assert_eq!(response.id, Some(0));
        assert_eq!(state.log.read_all().await, vec!["message 0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quorum_rejection_mutates_nothing() {
        let state = state_with(Arc::new(CountingClient::acking()));

        let response = handle_write(state.clone(), 2, "message 0".to_string()).await;

        assert_eq!(response, WriteResponse::no_quorum());
        assert_eq!(state.log.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wc_two_waits_for_one_ack() {
        let client = Arc::new(CountingClient::acking());
        let state = state_with(client.clone());
        state.health.record_heartbeat("s1", 0).await;

        let response = handle_write(state.clone(), 2, "message 0".to_string()).await;

        assert_eq!(response.ask, 1);
        assert!(client.calls() >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wc_one_detaches_replication() {
        // first delivery attempt fails; the write must still return right
        // away and the background retry must finish on its own. The log is
        // pre-filled so the new id sits well past the reported progress and
        // the heartbeat short-circuit stays out of the picture.
        let client = Arc::new(CountingClient::failing_first(1));
        let state = state_with(client.clone());
        state.health.record_heartbeat("s1", 0).await;
        state.log.append("message 0".to_string()).await;
        state.log.append("message 1".to_string()).await;

        let response = handle_write(state.clone(), 1, "message 2".to_string()).await;
        assert_eq!(response.ask, 1);
        assert_eq!(response.id, Some(2));

        for _ in 0..200 {
            if client.calls() >= 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(client.calls() >= 2, "background retry never ran");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unhealthy_secondary_excluded_from_fanout() {
        let client = Arc::new(CountingClient::acking());
        let state = state_with(client.clone());
        state.health.record_heartbeat("s1", 0).await;
        tokio::time::advance(Duration::from_secs(6)).await;

        let response = handle_write(state.clone(), 1, "message 0".to_string()).await;
        assert_eq!(response.ask, 1);

        tokio::task::yield_now().await;
        assert_eq!(client.calls(), 0);
    }
}
