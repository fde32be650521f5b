use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Duration;

use super::SecondaryState;
use crate::replication::types::{Message, ReplicaAck, SleepResponse, SleepSetting};

pub fn router(state: Arc<SecondaryState>) -> Router {
    Router::new()
        .route("/", get(get_messages).post(post_message))
        .route("/sleep", get(get_sleep).post(post_sleep))
        .with_state(state)
}

/// GET / - the contiguous visible prefix of the local log
async fn get_messages(State(state): State<Arc<SecondaryState>>) -> Json<Vec<String>> {
    Json(state.store.visible().await)
}

/// POST / - store one replicated message, then hold the ack for the
/// injected delay
async fn post_message(
    State(state): State<Arc<SecondaryState>>,
    Json(item): Json<Message>,
) -> Json<ReplicaAck> {
    state.store.write(item.id, item.text.clone()).await;

    let delay = state.store.delay().await;
    if delay > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(delay)).await;
    }

    Json(ReplicaAck { ask: 1, item })
}

/// GET /sleep - current injected response delay
async fn get_sleep(State(state): State<Arc<SecondaryState>>) -> Json<SleepResponse> {
    Json(SleepResponse {
        sleep: SleepSetting {
            time: state.store.delay().await,
        },
    })
}

/// POST /sleep - set the injected response delay
async fn post_sleep(
    State(state): State<Arc<SecondaryState>>,
    Json(setting): Json<SleepSetting>,
) -> Json<SleepResponse> {
    state.store.set_delay(setting.time).await;
    Json(SleepResponse { sleep: setting })
}
