//! Audio guide HTTP server.
//!
//! Sells tickets through a Telegram bot and serves the tour to redeemed
//! ticket holders.

use audio_guide_core::environment::SystemClock;
use audio_guide_core::{CommerceGate, MediaDelivery, TicketLedger};
use audio_guide_postgres::PostgresStorage;
use audio_guide_server::auth::JwtCredentials;
use audio_guide_server::i18n::Translator;
use audio_guide_server::{build_router, metrics, AppState, Config};
use audio_guide_telegram::TelegramBot;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audio_guide=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting audio guide server");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        database = %config.database.redacted_url(),
        blob = %config.redacted_blob_location(),
        telegram_api = %config.telegram.api_url,
        "Configuration loaded"
    );

    let metrics_handle = metrics::install_recorder()?;

    // Storage gateway
    info!("Connecting to database...");
    let storage = Arc::new(
        PostgresStorage::connect(
            &config.database.url,
            config.database.max_connections,
            config.database.connect_timeout(),
        )
        .await?,
    );
    storage.migrate().await?;
    info!("Database connected and migrated");

    // Blob gateway, bot transport, credentials
    let blobs = audio_guide_blob::open(&config.blob_location)?;
    let bot = Arc::new(
        TelegramBot::new(
            config.telegram.bot_token.clone(),
            config.telegram.payments_token.clone(),
        )
        .with_api_url(&config.telegram.api_url),
    );
    let credentials = Arc::new(JwtCredentials::new(&config.jwt_secret)?);

    let state = AppState {
        gate: CommerceGate::new(TicketLedger::new(storage.clone()), storage.clone()),
        catalog: storage.clone(),
        media: MediaDelivery::new(blobs),
        credentials,
        clock: Arc::new(SystemClock),
        bot,
        translator: Translator,
        web_app_url: config.telegram.web_app_url.clone(),
        readiness: storage,
        metrics: metrics_handle,
    };

    let app = build_router(state, &config.server.cors_allowed_origins);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    // Run server with graceful shutdown, bounded by the drain timeout
    let draining = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let draining = draining.clone();
            async move {
                shutdown_signal().await;
                draining.notify_one();
            }
        })
        .into_future();
    tokio::pin!(server);

    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout);
    tokio::select! {
        result = &mut server => result?,
        () = async {
            draining.notified().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            warn!(timeout_secs = drain_timeout.as_secs(), "Shutdown timeout elapsed, dropping in-flight requests");
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C).
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (in production environments)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
