use crate::api::{engagement, record, AppState};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = build_cors(state.allowed_origin.as_deref());

    // Recording endpoints with a small body limit (largest valid payload
    // is a visit row, well under 1 KB)
    let record_routes = Router::new()
        .route("/artists", post(record::register_artist))
        .route("/users", post(record::register_user))
        .route("/visits", post(record::record_visit))
        .route("/events", post(record::record_event))
        .layer(DefaultBodyLimit::max(8_192));

    let engagement_routes = Router::new()
        .route("/engagement/hourly", get(engagement::get_hourly_engagement))
        .route("/engagement/visits", get(engagement::get_visit_summary));

    let api_routes = record_routes.merge(engagement_routes).layer(cors);

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        .nest("/api", api_routes)
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(state.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer based on the configured origin.
fn build_cors(allowed_origin: Option<&str>) -> CorsLayer {
    allowed_origin.map_or_else(
        || {
            // No origin configured — allow all origins.
            // Set `allowed_origin` in config to restrict cross-origin access.
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        },
        |origin| {
            let allowed_origin = origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("*"));
            CorsLayer::new()
                .allow_origin(allowed_origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        },
    )
}

/// GET /health — Simple health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

/// GET /metrics — Prometheus-compatible metrics endpoint.
async fn prometheus_metrics(
    State(state): State<Arc<AppState>>,
) -> ([(header::HeaderName, &'static str); 1], String) {
    use std::fmt::Write;
    use std::sync::atomic::Ordering;

    let events_recorded = state.events_recorded_total.load(Ordering::Relaxed);
    let visits_recorded = state.visits_recorded_total.load(Ordering::Relaxed);

    let mut out = String::with_capacity(512);
    let _ = writeln!(
        out,
        "# HELP encore_events_recorded_total Total interaction events recorded since startup"
    );
    let _ = writeln!(out, "# TYPE encore_events_recorded_total counter");
    let _ = writeln!(out, "encore_events_recorded_total {events_recorded}");
    let _ = writeln!(
        out,
        "# HELP encore_visits_recorded_total Total visits recorded since startup"
    );
    let _ = writeln!(out, "# TYPE encore_visits_recorded_total counter");
    let _ = writeln!(out, "encore_visits_recorded_total {visits_recorded}");

    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], out)
}
