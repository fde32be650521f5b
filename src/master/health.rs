use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::util::errors::{ReplogError, Result};

/// Heartbeat-derived classification of a secondary. Never stored;
/// recomputed from the last-seen timestamp on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Heartbeated within 0.75 of the heartbeat interval
    Healthy,
    /// Between 0.75 and 1.25 intervals since the last heartbeat
    Suspected,
    /// More than 1.25 intervals silent; excluded from quorum and fan-out
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Suspected => write!(f, "Suspected"),
            HealthStatus::Unhealthy => write!(f, "Unhealthy"),
        }
    }
}

/// Classify a secondary by the time elapsed since its last heartbeat.
pub fn classify(elapsed: Duration, heartbeat: Duration) -> HealthStatus {
    if elapsed > heartbeat.mul_f64(1.25) {
        HealthStatus::Unhealthy
    } else if elapsed < heartbeat.mul_f64(0.75) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Suspected
    }
}

/// What the master remembers about one secondary: its self-reported
/// contiguous delivery count and when it last heartbeated. Overwritten
/// wholesale on every heartbeat, never merged and never evicted.
#[derive(Debug, Clone)]
pub struct SecondaryRecord {
    pub delivered: u64,
    pub last_seen: Instant,
}

/// Per-secondary registry fed by heartbeats. Secondaries self-register by
/// heartbeating; an ip that was never seen is not a member and is excluded
/// from quorum counting and fan-out rather than classified.
pub struct HealthTracker {
    heartbeat: Duration,
    secondaries: RwLock<HashMap<String, SecondaryRecord>>,
}

impl HealthTracker {
    pub fn new(heartbeat: Duration) -> Self {
        Self {
            heartbeat,
            secondaries: RwLock::new(HashMap::new()),
        }
    }

    /// Upsert the record for `ip` with a fresh timestamp.
    pub async fn record_heartbeat(&self, ip: &str, delivered: u64) {
        let mut secondaries = self.secondaries.write().await;
        secondaries.insert(
            ip.to_string(),
            SecondaryRecord {
                delivered,
                last_seen: Instant::now(),
            },
        );

        tracing::debug!("Recorded heartbeat from {} with delivered {}", ip, delivered);
    }

    /// Current status of `ip`, or None if it never heartbeated.
    pub async fn status_of(&self, ip: &str) -> Option<HealthStatus> {
        let secondaries = self.secondaries.read().await;
        secondaries
            .get(ip)
            .map(|record| classify(record.last_seen.elapsed(), self.heartbeat))
    }

    /// Last self-reported delivery count of `ip`. Unlike `status_of` an
    /// unknown ip here is a contract violation and fails loudly.
    pub async fn delivered_of(&self, ip: &str) -> Result<u64> {
        let secondaries = self.secondaries.read().await;
        secondaries
            .get(ip)
            .map(|record| record.delivered)
            .ok_or_else(|| ReplogError::UnknownSecondary(ip.to_string()))
    }

    /// All known secondaries with their current status, ordered by ip.
    pub async fn report(&self) -> Vec<(String, HealthStatus)> {
        let secondaries = self.secondaries.read().await;
        let mut report: Vec<(String, HealthStatus)> = secondaries
            .iter()
            .map(|(ip, record)| (ip.clone(), classify(record.last_seen.elapsed(), self.heartbeat)))
            .collect();
        report.sort_by(|a, b| a.0.cmp(&b.0));
        report
    }

    /// Ips of all secondaries currently not Unhealthy, the fan-out set for
    /// a new write.
    pub async fn alive(&self) -> Vec<String> {
        self.report()
            .await
            .into_iter()
            .filter(|(_, status)| *status != HealthStatus::Unhealthy)
            .map(|(ip, _)| ip)
            .collect()
    }

    /// Quorum gate: the master itself plus every non-Unhealthy secondary
    /// must cover the requested write concern.
    pub async fn has_quorum(&self, write_concern: u32) -> bool {
        let available = 1 + self.alive().await.len() as u32;
        available >= write_concern
    }
}
