use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use docent_core::calendar::HolidayCalendar;
use docent_core::clock::{Clock, SystemClock};
use docent_core::recommendation::CompletionModel;
use docent_notify::{EmailConfig, EmailDelivery};
use docent_providers::holidays::{HolidayConfig, NagerHolidayCalendar};
use docent_providers::openai::{OpenAiClient, OpenAiConfig, UnconfiguredModel};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docent_api::background;
use docent_api::config::ServerConfig;
use docent_api::router::build_app_router;
use docent_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docent_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = docent_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    docent_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    docent_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Providers ---
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let holiday_config = HolidayConfig::from_env();
    tracing::info!(
        country = %holiday_config.country,
        region = %holiday_config.region,
        "Holiday calendar configured"
    );
    let holidays: Arc<dyn HolidayCalendar> =
        Arc::new(NagerHolidayCalendar::new(holiday_config, Arc::clone(&clock)));

    let model: Arc<dyn CompletionModel> = match OpenAiConfig::from_env() {
        Some(openai) => {
            let client = OpenAiClient::new(openai);
            tracing::info!(model = client.model(), "Completion model configured");
            Arc::new(client)
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, recommendations will use fallback ranking");
            Arc::new(UnconfiguredModel)
        }
    };

    let mailer = match EmailConfig::from_env() {
        Some(email) => {
            tracing::info!(smtp_host = %email.smtp_host, "Email notifications enabled");
            Some(EmailDelivery::new(email))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, email notifications disabled");
            None
        }
    };

    // --- App state ---
    let state = AppState::new(pool, config.clone(), clock, holidays, model, mailer);

    // --- Cache sweep ---
    let sweep_cancel = CancellationToken::new();
    let sweep_handle = tokio::spawn(background::cache_sweep::run(
        Arc::clone(&state.cache),
        sweep_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!("Cache sweep stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
