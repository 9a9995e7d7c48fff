use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tdm_api::background::batch_retention;
use tdm_api::config::ServerConfig;
use tdm_api::router::build_app_router;
use tdm_api::state::AppState;
use tdm_core::orchestrator::GenerationOrchestrator;
use tdm_core::registry::SchemaRegistry;
use tdm_core::seed::seed_default_schemas;
use tdm_core::strategy::StrategyTable;
use tdm_db::{PgBatchStore, PgSchemaStore};
use tdm_llm::{ChatApi, LlmSynthesizer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tdm_api=debug,tdm_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = tdm_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    tdm_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    tdm_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Synthesizer ---
    // The HTTP client gets a little headroom over the orchestrator's own cap.
    let http = reqwest::Client::builder()
        .timeout(config.generation.synthesis_timeout + Duration::from_secs(5))
        .build()
        .expect("Failed to build HTTP client");
    let chat = ChatApi::with_client(http, config.llm.api_url.clone(), config.llm.api_key.clone());
    if config.llm.api_key.is_none() {
        tracing::warn!("LLM_API_KEY is not set; provider calls are unauthenticated");
    }
    let synthesizer = Arc::new(LlmSynthesizer::new(chat));

    // --- Domain services ---
    let strategies = StrategyTable::with_builtin_types();
    tracing::info!(types = ?strategies.type_names(), "Named-type strategies registered");
    let registry = SchemaRegistry::new(Arc::new(PgSchemaStore::new(pool.clone())));

    if config.seed_default_schemas {
        let seeded = seed_default_schemas(&registry, &strategies)
            .await
            .expect("Failed to seed default schemas");
        tracing::info!(seeded, "Default schemas seeded");
    }

    let orchestrator = Arc::new(GenerationOrchestrator::new(
        registry.clone(),
        Arc::new(PgBatchStore::new(pool.clone())),
        synthesizer,
        strategies,
        config.generation.clone(),
    ));

    // --- Expiration sweeper ---
    let sweeper_cancel = CancellationToken::new();
    let sweeper_handle = tokio::spawn(batch_retention::run(
        Arc::clone(&orchestrator),
        Duration::from_secs(config.cleanup_interval_secs),
        sweeper_cancel.clone(),
    ));

    // --- App state and router ---
    let state = AppState {
        pool: Some(pool),
        config: Arc::new(config.clone()),
        registry,
        orchestrator,
    };
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
    sweeper_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    tracing::info!("Graceful shutdown complete");
}

/// Resolve on SIGINT, or SIGTERM on Unix.
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
            tracing::info!("Received SIGINT, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
