pub mod backoff;
pub mod client;
pub mod types;

pub use backoff::retry_timeout;
pub use client::{HttpReplicaClient, ReplicaClient};
pub use types::{
    Heartbeat, HeartbeatAck, HealthReportEntry, Message, ReplicaAck, SleepResponse, SleepSetting,
    WriteRequest, WriteResponse,
};
