use duckdb::Connection;
use encore_analytics::api::AppState;
use encore_analytics::config::Config;
use encore_analytics::{server, storage};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_analytics=info,tower_http=info".into()),
        )
        .init();

    // Load configuration
    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref().map(std::path::Path::new));

    tracing::info!(
        host = %config.host,
        port = config.port,
        db_path = ?config.db_path,
        "Starting Encore Analytics"
    );

    // Initialize DuckDB (file-backed if configured, otherwise in-memory)
    let conn = match &config.db_path {
        Some(path) => Connection::open(path).expect("Failed to open DuckDB database file"),
        None => {
            tracing::warn!("No db_path configured; using an in-memory database");
            Connection::open_in_memory().expect("Failed to open DuckDB")
        }
    };
    storage::migrations::run_migrations(&conn).expect("Failed to run migrations");

    let state = Arc::new(AppState {
        conn: parking_lot::Mutex::new(conn),
        allowed_origin: config.allowed_origin.clone(),
        request_timeout_secs: config.request_timeout_secs,
        events_recorded_total: AtomicU64::new(0),
        visits_recorded_total: AtomicU64::new(0),
    });

    let app = server::build_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {addr}: {e}"));

    tracing::info!(addr = %addr, "Listening");
    axum::serve(listener, app).await.expect("Server error");
}
