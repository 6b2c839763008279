//! `messagecraft` server. See `--help` for settings.

use clap::Parser;
use messagecraft::{
    config::Config,
    server::{router, AppState},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    // Read the command line arguments and environment.
    let config = Config::parse();

    let state = AppState::from_config(&config)?;
    if !state.is_configured() {
        log::warn!(
            "No API key configured. Set OPENAI_API_KEY; until then every \
             generation request fails."
        );
    }

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down...");
}
