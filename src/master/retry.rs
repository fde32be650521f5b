use std::sync::Arc;
use std::time::Duration;

use super::health::HealthTracker;
use crate::replication::backoff::retry_timeout;
use crate::replication::client::ReplicaClient;
use crate::replication::types::Message;
use crate::util::errors::Result;

/// Drive one message to one secondary until it is known to have it.
///
/// Unbounded retry loop with jittered exponential backoff. Each attempt
/// doubles as the request timeout and, on failure, the sleep before the
/// next attempt. After every failed attempt the heartbeat channel is
/// consulted: if the secondary has independently reported progress through
/// this message (catch-up replication racing this loop), the loop ends
/// without a direct ack. That self-report is unauthenticated, so this is a
/// convergence short-circuit, not a proof of delivery.
///
/// A missing tracker record aborts the task: the loop only ever targets
/// ips that heartbeated, so an unknown ip means a lost registration.
pub async fn replicate_with_retry(
    client: Arc<dyn ReplicaClient>,
    health: Arc<HealthTracker>,
    heartbeat_secs: f64,
    ip: String,
    message: Message,
) -> Result<()> {
    let mut attempt: u32 = 0;

    loop {
        let timeout = retry_timeout(attempt, heartbeat_secs, &mut rand::thread_rng());
        tracing::info!(
            "Retry to {} for message id {}, attempt #{} with timeout {}",
            ip,
            message.id,
            attempt,
            timeout
        );

        if client
            .replicate(&ip, &message, Duration::from_secs_f64(timeout))
            .await
        {
            return Ok(());
        }

        tokio::time::sleep(Duration::from_secs_f64(timeout)).await;

        // Heartbeats may have shown the target caught up while we slept.
        // The threshold deliberately stays `delivered >= id - 1`, signed so
        // id 0 compares against -1 exactly as the formula reads.
        let delivered = health.delivered_of(&ip).await.map_err(|err| {
            // detached runs have no one awaiting the join handle, so the
            // lost registration gets logged here as well as propagated
            tracing::error!("Retry to {} aborted: {}", ip, err);
            err
        })?;
        if delivered as i64 >= message.id as i64 - 1 {
            tracing::debug!(
                "Retry to {} for message id {} ended by heartbeat (delivered {})",
                ip,
                message.id,
                delivered
            );
            return Ok(());
        }

        attempt += 1;
    }
}
