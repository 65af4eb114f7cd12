use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::pipeline::{self, HourlyScoreRow, VisitSummaryRow};
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

/// GET /api/engagement/hourly — engagement scores by artist and local hour.
///
/// Offsets are resolved at the moment the request runs, so the view
/// reflects each user's current daylight-saving state.
pub async fn get_hourly_engagement(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HourlyScoreRow>>, ApiError> {
    let rows = run_query(state, |conn| pipeline::hourly_engagement(conn, Utc::now())).await?;
    Ok(Json(rows))
}

/// GET /api/engagement/visits — visit duration totals and session counts
/// per artist.
pub async fn get_visit_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VisitSummaryRow>>, ApiError> {
    let rows = run_query(state, pipeline::visit_summary).await?;
    Ok(Json(rows))
}

/// Run a pipeline invocation on a blocking thread with the connection
/// held for its duration.
async fn run_query<T, F>(state: Arc<AppState>, query: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&duckdb::Connection) -> Result<T, duckdb::Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state.conn.lock();
        query(&conn)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Query task panicked: {e}")))?
    .map_err(ApiError::from)
}
