//! RectifAI Server Entry Point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use rectifai_config::{load_settings, ProvidersConfig, Settings};
use rectifai_persistence::{InMemorySubmissionStore, ScyllaConfig, SubmissionStore};
use rectifai_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("RECTIFAI_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => {
            // Tracing not yet initialized
            eprintln!(
                "Loaded configuration from files (env: {})",
                env.as_deref().unwrap_or("default")
            );
            settings
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings {
                providers: ProvidersConfig::default().with_env_credentials(),
                ..Settings::default()
            }
        }
    };

    init_tracing(&config);

    tracing::info!("Starting RectifAI Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        configured_providers = ?config.providers.configured(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled && init_metrics().is_some() {
        tracing::info!("Initialized Prometheus metrics at /metrics");
    }

    let store = init_store(&config).await;
    let state = AppState::with_store(config.clone(), store)?;

    if state.service.orchestrator().configured_providers().is_empty() {
        tracing::warn!("No correction provider configured; every request uses the rule-based corrector");
    }

    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// ScyllaDB when enabled and reachable, in-memory otherwise
async fn init_store(config: &Settings) -> Arc<dyn SubmissionStore> {
    if !config.persistence.enabled {
        tracing::info!(
            capacity = config.persistence.memory_capacity,
            "Persistence disabled, using in-memory submission store"
        );
        return Arc::new(memory_store(config));
    }

    tracing::info!("Initializing ScyllaDB persistence layer...");
    let scylla_config = ScyllaConfig::new(
        config.persistence.scylla_hosts.clone(),
        config.persistence.keyspace.clone(),
        config.persistence.replication_factor,
    );

    match rectifai_persistence::init(scylla_config).await {
        Ok(store) => {
            tracing::info!(
                hosts = ?config.persistence.scylla_hosts,
                keyspace = %config.persistence.keyspace,
                "ScyllaDB persistence initialized"
            );
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!("Failed to initialize ScyllaDB: {}. Falling back to in-memory.", e);
            Arc::new(memory_store(config))
        }
    }
}

fn memory_store(config: &Settings) -> InMemorySubmissionStore {
    InMemorySubmissionStore::with_capacity(config.persistence.memory_capacity)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("rectifai={},tower_http=debug", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
