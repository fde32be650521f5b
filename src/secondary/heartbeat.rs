use std::sync::Arc;
use tokio::task::JoinHandle;

use super::SecondaryState;
use crate::replication::types::Heartbeat;

/// Endless heartbeat loop, one tick per heartbeat interval.
///
/// Each tick reports the current contiguous delivery count to the master
/// as a detached send: the loop never waits on the network, so a slow
/// master cannot delay the next tick. Overlapping sends are fine, the
/// master keeps only the latest arrival per ip. Failed sends are dropped.
pub fn spawn_heartbeat_loop(state: Arc<SecondaryState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = state.config.heartbeat_interval();
        let mut ticks = tokio::time::interval(period);

        loop {
            ticks.tick().await;

            let delivered = state.store.visible().await.len() as u64;
            let beat = Heartbeat {
                ip: state.config.node_ip.clone(),
                delivered,
            };
            tracing::debug!("Heartbeat tick with delivered {}", delivered);

            let client = state.client.clone();
            let master_url = state.config.master_url.clone();
            tokio::spawn(async move {
                if !client.send_heartbeat(&master_url, &beat, period).await {
                    tracing::debug!("Heartbeat to {} dropped", master_url);
                }
            });
        }
    })
}
