use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

use super::{coordinator, heartbeat, MasterState};
use crate::replication::types::{
    Heartbeat, HeartbeatAck, HealthReportEntry, WriteRequest, WriteResponse,
};

pub fn router(state: Arc<MasterState>) -> Router {
    Router::new()
        .route("/", get(get_messages).post(post_message))
        .route("/health", get(get_health).post(post_health))
        .with_state(state)
}

/// GET / - the full log, ids implicit by position
async fn get_messages(State(state): State<Arc<MasterState>>) -> Json<Vec<String>> {
    Json(state.log.read_all().await)
}

/// POST / - quorum-gated write, answered after `wc - 1` secondary acks
async fn post_message(
    State(state): State<Arc<MasterState>>,
    Json(request): Json<WriteRequest>,
) -> Json<WriteResponse> {
    Json(coordinator::handle_write(state, request.wc, request.text).await)
}

/// GET /health - per-secondary status, ordered by ip
async fn get_health(State(state): State<Arc<MasterState>>) -> Json<Vec<HealthReportEntry>> {
    let report = state
        .health
        .report()
        .await
        .into_iter()
        .map(|(ip, status)| HealthReportEntry { ip, status })
        .collect();
    Json(report)
}

/// POST /health - heartbeat intake, also triggers catch-up replication
async fn post_health(
    State(state): State<Arc<MasterState>>,
    Json(beat): Json<Heartbeat>,
) -> Json<HeartbeatAck> {
    Json(heartbeat::handle_heartbeat(state, beat.ip, beat.delivered).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::Config;
    use crate::master::health::{HealthStatus, HealthTracker};
    use crate::master::log::ReplicationLog;
    use crate::replication::client::HttpReplicaClient;

    fn state() -> Arc<MasterState> {
        let config = Config::default();
        Arc::new(MasterState {
            health: Arc::new(HealthTracker::new(config.heartbeat_interval())),
            log: ReplicationLog::new(),
            client: Arc::new(HttpReplicaClient::new(config.replica_port)),
            config,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_then_read_back() {
        let state = state();

        let Json(response) = post_message(
            State(state.clone()),
            Json(WriteRequest {
                wc: 1,
                text: "message 0".to_string(),
            }),
        )
        .await;
        assert_eq!(response.ask, 1);
        assert_eq!(response.id, Some(0));

        let Json(messages) = get_messages(State(state)).await;
        assert_eq!(messages, vec!["message 0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_report_lifecycle() {
        let state = state();

        let Json(empty) = get_health(State(state.clone())).await;
        assert!(empty.is_empty());

        let Json(ack) = post_health(
            State(state.clone()),
            Json(Heartbeat {
                ip: "s1".to_string(),
                delivered: 0,
            }),
        )
        .await;
        assert_eq!(ack, HeartbeatAck { ask: 1, ip: "s1".to_string() });

        let Json(report) = get_health(State(state.clone())).await;
        assert_eq!(
            report,
            vec![HealthReportEntry {
                ip: "s1".to_string(),
                status: HealthStatus::Healthy,
            }]
        );

        // two missed heartbeat intervals: unhealthy, and wc=2 is rejected
        tokio::time::advance(Duration::from_secs(6)).await;
        let Json(report) = get_health(State(state.clone())).await;
        assert_eq!(report[0].status, HealthStatus::Unhealthy);

        let Json(response) = post_message(
            State(state),
            Json(WriteRequest {
                wc: 2,
                text: "no quorum".to_string(),
            }),
        )
        .await;
        assert_eq!(response, WriteResponse::no_quorum());
    }
}
