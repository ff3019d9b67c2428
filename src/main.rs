//! Liquid Clock - a state-managed local desk widget
//!
//! This is the main entry point for the liquid-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use liquid_clock::{
    api::create_router,
    config::Config,
    services::LocalMediaHost,
    state::AppState,
    tasks::clock_ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("liquid_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting liquid-clock v{}", env!("CARGO_PKG_VERSION"));

    let clock = config.clock();
    info!(
        "Configuration: host={}, port={}, timezone={}, {}-hour",
        config.host,
        config.port,
        clock.time_zone.name(),
        if clock.use_24_hour { 24 } else { 12 }
    );

    let state = Arc::new(AppState::new(
        clock,
        Arc::new(LocalMediaHost::new()),
        config.host.clone(),
        config.port,
        config.viewport_width,
    ));

    // Start the clock face ticker
    let clock_state = Arc::clone(&state);
    let clock_task = tokio::spawn(async move {
        clock_ticker_task(clock_state).await;
    });

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Widget running on http://{}", addr);

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            info!("Shutting down on {}", signal);
        }
    }

    clock_task.abort();
    state.shutdown();
    info!("Shutdown complete");
    Ok(())
}
