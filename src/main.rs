use anyhow::Result;

use spotify_registry::{config, routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let config = config::Config::load()?;
    config.validate()?;

    // Initialize logging with a configured level
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Spotify Registry starting...");
    tracing::info!(
        "Server configured: {}:{}",
        config.server_host,
        config.server_port
    );

    if config.expose_session_tokens {
        tracing::warn!(
            "EXPOSE_SESSION_TOKENS is enabled: /spotify/callback returns raw access and refresh tokens"
        );
    }

    let state = routes::AppState::from_config(config.clone())?;
    tracing::info!("Database opened: {}", config.database_file.display());

    // Warm the app token so the first request does not pay for the exchange
    match state.client_credentials.get_token().await {
        Ok(token) => {
            tracing::info!(
                "Client-credentials token ready (expires_at: {})",
                token.expires_at
            );
        }
        Err(e) => {
            tracing::error!("Client-credentials authentication failed: {}", e);
            tracing::warn!(
                "Server will start but /spotify endpoints will fail until Spotify accepts the credentials"
            );
        }
    }

    let app = routes::build_app(state);

    // Bind to configured host and port
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    print_startup_banner(&config);

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Print startup banner
fn print_startup_banner(config: &config::Config) {
    println!();
    println!("  Spotify Registry v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  Server:      http://{}:{}",
        config.server_host, config.server_port
    );
    println!("  Database:    {}", config.database_file.display());
    println!("  Accounts:    {}", config.spotify_accounts_url);
    println!("  API:         {}", config.spotify_api_url);
    println!("  Redirect:    {}", config.spotify_redirect_uri);
    println!(
        "  Safety margin on app token: {}s",
        spotify_registry::store::SAFETY_MARGIN_SECS
    );
    println!("  Log Level:   {}", config.log_level);
    println!();
}

/// Handle graceful shutdown signal
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}
