use std::sync::Arc;

use super::MasterState;
use crate::replication::types::HeartbeatAck;

/// Record one heartbeat and close any replication gap it reveals.
///
/// Every message the secondary reports missing gets one detached,
/// best-effort delivery with a timeout just under the heartbeat period.
/// These calls are never retried and their failures are dropped: the
/// retry engine on the next regular write is the durable fallback. The
/// acknowledgement does not wait for any of them.
pub async fn handle_heartbeat(state: Arc<MasterState>, ip: String, delivered: u64) -> HeartbeatAck {
    state.health.record_heartbeat(&ip, delivered).await;

    let missed = state.log.entries_from(delivered).await;
    if !missed.is_empty() {
        tracing::info!(
            "Answer heartbeat from {}: catching up {} missed messages",
            ip,
            missed.len()
        );
    }

    let timeout = state.config.catchup_timeout();
    for message in missed {
        let client = state.client.clone();
        let target = ip.clone();
        tokio::spawn(async move {
            if !client.replicate(&target, &message, timeout).await {
                tracing::debug!("Catch-up to {} for message id {} dropped", target, message.id);
            }
        });
    }

    HeartbeatAck { ask: 1, ip }
}
