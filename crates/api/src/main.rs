//! API server entry point.

use std::sync::Arc;

use api::AppState;
use api::config::Config;
use order_store::PostgresStore;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Builds the application state, connecting to PostgreSQL when configured.
async fn build_state(config: &Config) -> Result<AppState, order_store::StoreError> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, using in-memory stores");
        let (state, sessions) = AppState::in_memory(config.session_cookie.clone());
        match config.session_seed.as_deref() {
            Some(seed) => {
                let count = sessions.load_json(seed).await?;
                tracing::info!(count, "registered sessions from SESSION_SEED");
            }
            None => tracing::warn!("SESSION_SEED not set, role endpoints will answer 401"),
        }
        return Ok(state);
    };

    if config.session_seed.is_some() {
        tracing::warn!("SESSION_SEED ignored, sessions are read from PostgreSQL");
    }
    let store = PostgresStore::connect(url, &config.connect_options()).await?;
    store.run_migrations().await?;
    tracing::info!("connected to PostgreSQL and applied migrations");
    Ok(AppState::postgres(store, config.session_cookie.clone()))
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Connect stores; an unreachable database is fatal
    let state = match build_state(&config).await {
        Ok(state) => Arc::new(state),
        Err(err) => {
            tracing::error!(error = %err, "failed to initialize store");
            std::process::exit(1);
        }
    };

    // 4. Build the application
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
