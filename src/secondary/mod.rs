pub mod api;
pub mod heartbeat;
pub mod store;

use std::sync::Arc;

use crate::config::Config;
use crate::replication::client::{HttpReplicaClient, ReplicaClient};
use store::SecondaryStore;

/// Shared state of a secondary: the sparse local log (with its injected
/// response delay) and the client used for heartbeating the master.
pub struct SecondaryState {
    pub config: Config,
    pub store: SecondaryStore,
    pub client: Arc<dyn ReplicaClient>,
}

impl SecondaryState {
    pub fn new(config: Config) -> Self {
        Self {
            store: SecondaryStore::new(),
            client: Arc::new(HttpReplicaClient::new(config.replica_port)),
            config,
        }
    }
}
