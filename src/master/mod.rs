pub mod api;
pub mod coordinator;
pub mod health;
pub mod heartbeat;
pub mod log;
pub mod retry;

use std::sync::Arc;

use crate::config::Config;
use crate::replication::client::{HttpReplicaClient, ReplicaClient};
use health::HealthTracker;
use log::ReplicationLog;

/// Everything the master's request handlers share: the log, the
/// heartbeat-fed health registry and the outbound client. Built once at
/// startup, no ambient globals.
pub struct MasterState {
    pub config: Config,
    pub log: ReplicationLog,
    pub health: Arc<HealthTracker>,
    pub client: Arc<dyn ReplicaClient>,
}

impl MasterState {
    pub fn new(config: Config) -> Self {
        Self {
            health: Arc::new(HealthTracker::new(config.heartbeat_interval())),
            log: ReplicationLog::new(),
            client: Arc::new(HttpReplicaClient::new(config.replica_port)),
            config,
        }
    }
}
