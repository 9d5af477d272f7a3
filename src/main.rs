//! Pomodoro Daemon - A work/break interval timer behind a launcher query boundary
//!
//! This is the main entry point for the pomodoro-daemon application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_daemon::{
    api::create_router,
    commands::{Matcher, COMMANDS},
    config::Config,
    notify::BroadcastNotifier,
    state::{AppState, Engine},
    tasks::notification_log_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_daemon={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-daemon v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}min, break={}min, max_distance={}",
          config.host, config.port, config.work, config.break_minutes, config.max_distance);

    // Notifications fan out to the log task and any other subscriber
    let notifier = Arc::new(BroadcastNotifier::new(64));
    tokio::spawn(notification_log_task(notifier.subscribe()));

    let engine = Engine::new(config.durations(), notifier).map_err(anyhow::Error::msg)?;
    let state = Arc::new(AppState::new(
        engine,
        Matcher::new(config.max_distance),
        config.port,
        config.host.clone(),
    ));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /query?q=...        - Rank commands for a search string");
    info!("  POST /commands/:keyword  - Invoke a command ({})",
          COMMANDS.iter().map(|c| c.keyword).collect::<Vec<_>>().join(", "));
    info!("  PUT  /durations/:phase   - Set work or break minutes");
    info!("  GET  /status             - Session status and timer");
    info!("  GET  /health             - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
