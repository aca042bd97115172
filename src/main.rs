mod app_state;
mod cache;
mod config;
mod database;
mod handlers;
mod models;
mod rabbitmq;
mod services;
mod storage;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use log;
use stderrlog::{self, Timestamp};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::app_state::AppState;
use crate::cache::CandidateCache;
use crate::rabbitmq::{CandidateSubscriber, ReportEventPublisher};
use crate::services::duplicates::DuplicatePolicy;
use crate::services::evidence::EvidenceTracker;
use crate::storage::{BlobStore, S3BlobStore};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("FATAL ERROR: {}", e);
        eprintln!("Error details: {:?}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    stderrlog::new()
        .verbosity(log::Level::Info)
        .timestamp(Timestamp::Millisecond)
        .show_module_names(true)
        .init()
        .unwrap();

    log::info!("=== Incident Reports Service Starting ===");
    log::info!("Process ID: {}", std::process::id());

    match dotenvy::dotenv() {
        Ok(_) => log::info!("Environment variables loaded from .env file"),
        Err(_) => log::info!("No .env file found, using system environment variables"),
    }

    let config = config::Config::load();
    log::info!("Configuration loaded successfully");
    log::info!("Database host: {}", config.db_host);
    log::info!("Database name: {}", config.db_name);
    log::info!("Server port: {}", config.port);

    log::info!("Creating database connection pool...");
    let pool = database::create_pool(&config).await?;
    log::info!("Database connection pool created successfully");

    database::schema::initialize_schema(&pool).await?;

    log::info!("Priming candidate cache from database...");
    let cache = CandidateCache::new();
    let summaries = database::reports::fetch_summaries(&pool).await?;
    cache.prime(summaries);

    let blob_store: Arc<dyn BlobStore> = Arc::new(S3BlobStore::from_config(&config).await);

    // Publisher and subscriber are optional: without a broker the HTTP API
    // still works, with staler cross-instance caches.
    let publisher = match ReportEventPublisher::new(
        &config.amqp_url(),
        &config.rabbitmq_exchange,
        &config.rabbitmq_report_routing_key,
    )
    .await
    {
        Ok(publisher) => {
            log::info!("RabbitMQ publisher initialized successfully");
            Some(Arc::new(publisher))
        }
        Err(e) => {
            log::warn!(
                "Failed to initialize RabbitMQ publisher: {}. Continuing without RabbitMQ.",
                e
            );
            None
        }
    };

    match CandidateSubscriber::new(&config).await {
        Ok(mut subscriber) => {
            log::info!("RabbitMQ subscriber initialized successfully");
            let cache_clone = cache.clone();
            let pool_clone = pool.clone();
            let routing_key = config.rabbitmq_report_routing_key.clone();
            tokio::spawn(async move {
                match subscriber.start(cache_clone, pool_clone, &routing_key).await {
                    Ok(_) => log::info!(
                        "RabbitMQ subscriber started successfully for routing key: {}",
                        routing_key
                    ),
                    Err(e) => log::error!(
                        "Failed to start RabbitMQ subscriber: {}. Continuing without RabbitMQ.",
                        e
                    ),
                }
            });
        }
        Err(e) => {
            log::warn!(
                "Failed to initialize RabbitMQ subscriber: {}. Continuing without live cache updates.",
                e
            );
        }
    }

    let app_state = AppState {
        pool,
        cache,
        evidence: EvidenceTracker::new(),
        blob_store,
        publisher,
        duplicate_policy: DuplicatePolicy {
            radius_km: config.duplicate_radius_km,
            title_threshold: config.duplicate_title_threshold,
            description_threshold: config.duplicate_description_threshold,
            window_days: config.duplicate_window_days,
        },
    };

    let app = create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on {}", addr);
    log::info!("=== Incident Reports Service Ready ===");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shutdown complete");
    Ok(())
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/version", get(handlers::version::version))
        .route("/api/v1/reports", post(handlers::reports::submit_report))
        .route("/api/v1/reports", get(handlers::reports::list_reports))
        .route(
            "/api/v1/reports/check-duplicates",
            post(handlers::reports::check_duplicates),
        )
        .route("/api/v1/reports/:id", get(handlers::reports::get_report))
        .route(
            "/api/v1/reports/:id/status",
            put(handlers::reports::update_report_status),
        )
        .route(
            "/api/v1/reports/:id/evidence",
            get(handlers::reports::get_evidence_status),
        )
        .route(
            "/api/v1/users/:user_id/reputation",
            get(handlers::reputation::get_reputation),
        )
        .route("/api/v1/stats", get(handlers::stats::get_stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
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
            log::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log::info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
