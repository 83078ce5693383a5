use std::sync::Arc;

use quiz_leaderboard::{
    build_router, AppState, CelebrationLogger, Config, EventBus, LeaderboardService,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quiz_leaderboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!(
        port = config.port,
        visibility = %config.default_visibility,
        scoring = ?config.scoring,
        "Starting quiz leaderboard server"
    );

    let event_bus = EventBus::new(config.event_channel_capacity);
    let leaderboards = LeaderboardService::builder(event_bus)
        .with_default_config(config.scoring.clone())
        .with_default_visibility(config.default_visibility)
        .with_handler(Arc::new(CelebrationLogger))
        .build();

    let app = build_router(AppState::new(Arc::new(leaderboards)));

    let address = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, address = %address, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    info!("Server running on http://localhost:{}", config.port);
    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "Server terminated");
    }
}
