use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::storage::snapshot::EventType;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Inbound artist registration payload.
#[derive(Debug, Deserialize)]
pub struct ArtistPayload {
    pub id: i64,
    pub name: String,
}

/// Inbound user registration payload. The timezone is stored verbatim;
/// the engagement pipeline falls back to UTC if it turns out invalid.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub id: i64,
    pub timezone: String,
}

/// Inbound visit payload. Times are epoch milliseconds.
#[derive(Debug, Deserialize)]
pub struct VisitPayload {
    pub artist_id: i64,
    pub session_id: String,
    pub start_time: i64,
    pub end_time: i64,
}

/// Inbound interaction event payload. `created_at` defaults to the time
/// of receipt when omitted.
#[derive(Debug, Deserialize)]
pub struct EventPayload {
    pub user_id: i64,
    pub artist_id: i64,
    pub event_type: EventType,
    pub created_at: Option<i64>,
}

/// POST /api/artists — register an artist in the catalog.
pub async fn register_artist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ArtistPayload>,
) -> Result<StatusCode, ApiError> {
    validate_text("name", &payload.name, 512)?;

    run_insert(state, move |conn| {
        conn.execute(
            "INSERT INTO artists (id, name) VALUES (?, ?)",
            duckdb::params![payload.id, payload.name],
        )
    })
    .await?;
    Ok(StatusCode::CREATED)
}

/// POST /api/users — register a user with their timezone name.
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserPayload>,
) -> Result<StatusCode, ApiError> {
    validate_text("timezone", &payload.timezone, 64)?;

    if payload.timezone.parse::<chrono_tz::Tz>().is_err() {
        tracing::debug!(
            user_id = payload.id,
            timezone = %payload.timezone,
            "Storing unrecognized timezone; engagement queries will treat it as UTC"
        );
    }

    run_insert(state, move |conn| {
        conn.execute(
            "INSERT INTO users (id, timezone) VALUES (?, ?)",
            duckdb::params![payload.id, payload.timezone],
        )
    })
    .await?;
    Ok(StatusCode::CREATED)
}

/// POST /api/visits — record a listening-session visit.
pub async fn record_visit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VisitPayload>,
) -> Result<StatusCode, ApiError> {
    validate_text("session_id", &payload.session_id, 256)?;
    if payload.end_time < payload.start_time {
        return Err(ApiError::BadRequest(
            "end_time must not be earlier than start_time".to_string(),
        ));
    }

    let state2 = Arc::clone(&state);
    run_insert(state2, move |conn| {
        conn.execute(
            "INSERT INTO visits (artist_id, session_id, start_time, end_time) VALUES (?, ?, ?, ?)",
            duckdb::params![
                payload.artist_id,
                payload.session_id,
                payload.start_time,
                payload.end_time
            ],
        )
    })
    .await?;
    state.visits_recorded_total.fetch_add(1, Ordering::Relaxed);
    Ok(StatusCode::CREATED)
}

/// POST /api/events — record a user interaction event.
pub async fn record_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EventPayload>,
) -> Result<StatusCode, ApiError> {
    let created_at = payload
        .created_at
        .unwrap_or_else(|| Utc::now().timestamp_millis());

    let state2 = Arc::clone(&state);
    run_insert(state2, move |conn| {
        conn.execute(
            "INSERT INTO user_events (user_id, artist_id, event_type, created_at) VALUES (?, ?, ?, ?)",
            duckdb::params![
                payload.user_id,
                payload.artist_id,
                payload.event_type.as_str(),
                created_at
            ],
        )
    })
    .await?;
    state.events_recorded_total.fetch_add(1, Ordering::Relaxed);
    Ok(StatusCode::ACCEPTED)
}

/// Reject empty or oversized text fields before they reach storage.
fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(ApiError::BadRequest(format!(
            "{field} must be at most {max_len} bytes"
        )));
    }
    Ok(())
}

/// Run an insert on a blocking thread with the connection held.
async fn run_insert<F>(state: Arc<AppState>, insert: F) -> Result<usize, ApiError>
where
    F: FnOnce(&duckdb::Connection) -> Result<usize, duckdb::Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state.conn.lock();
        insert(&conn)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Insert task panicked: {e}")))?
    .map_err(ApiError::from)
}
