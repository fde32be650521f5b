use serde::{Deserialize, Serialize};

use crate::master::health::HealthStatus;

/// A single replicated message. Ids are assigned by the master as the log
/// length at append time: dense, zero-based, never reused.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Position of this message in the master's log
    pub id: u64,
    /// The payload
    pub text: String,
}

impl Message {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Client write request against the master.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteRequest {
    /// Write concern: how many nodes (master included) must hold the
    /// message before the client gets its response
    pub wc: u32,
    /// The payload
    pub text: String,
}

/// Master's answer to a client write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriteResponse {
    /// 1 on accept, 0 on quorum rejection
    pub ask: u8,
    /// Echo of the payload, or the rejection reason
    pub text: String,
    /// Assigned id; absent when the write was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl WriteResponse {
    pub fn accepted(message: &Message) -> Self {
        Self {
            ask: 1,
            text: message.text.clone(),
            id: Some(message.id),
        }
    }

    /// Soft rejection: the master is effectively read-only without a quorum.
    pub fn no_quorum() -> Self {
        Self {
            ask: 0,
            text: "does not have a quorum".to_string(),
            id: None,
        }
    }
}

/// One heartbeat from a secondary to the master.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heartbeat {
    /// Ip of the reporting secondary, also the address the master dials back
    pub ip: String,
    /// Number of messages delivered without gaps, counted from id 0
    pub delivered: u64,
}

/// Master's acknowledgement of a heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeartbeatAck {
    pub ask: u8,
    pub ip: String,
}

/// One row of the master's health report, ordered by ip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReportEntry {
    pub ip: String,
    pub status: HealthStatus,
}

/// Secondary's acknowledgement of a replicated message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplicaAck {
    pub ask: u8,
    pub item: Message,
}

/// Injected response delay of a secondary, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SleepSetting {
    pub time: f64,
}

/// Envelope for the secondary's `/sleep` endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SleepResponse {
    pub sleep: SleepSetting,
}
