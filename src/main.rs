use std::sync::Arc;

use replog::config::{Config, Role};
use replog::master::MasterState;
use replog::secondary::heartbeat::spawn_heartbeat_loop;
use replog::secondary::SecondaryState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env(&args)?;

    tracing::info!(
        "Starting replog {} node (heartbeat interval {}s) on {}",
        config.role,
        config.heartbeat_secs,
        config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    match config.role {
        Role::Master => {
            let state = Arc::new(MasterState::new(config));
            axum::serve(listener, replog::master::api::router(state)).await?;
        }
        Role::Secondary => {
            let state = Arc::new(SecondaryState::new(config));
            // detached; reports progress to the master for as long as the
            // process lives
            spawn_heartbeat_loop(state.clone());
            axum::serve(listener, replog::secondary::api::router(state)).await?;
        }
    }

    Ok(())
}
