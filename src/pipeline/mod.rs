//! The engagement pipeline: read-only row snapshots in, ordered result
//! tables out.
//!
//! Two independent views are computed per invocation. The hourly view
//! resolves every user's timezone to a UTC offset first, then localizes,
//! scores, and aggregates events against that completed table. The visit
//! view is a plain join-and-aggregate. Neither holds state across
//! invocations and neither writes to storage.

pub mod hourly;
pub mod score;
pub mod timezone;
pub mod visits;

pub use hourly::HourlyScoreRow;
pub use visits::VisitSummaryRow;

use crate::storage::snapshot;
use chrono::{DateTime, Utc};
use duckdb::Connection;

/// Compute per-artist, per-local-hour engagement scores.
///
/// `at` is the instant used to resolve every user's current UTC offset,
/// daylight-saving state included; callers pass `Utc::now()`. The offset
/// table is fully built before any event is localized. Storage failure
/// aborts the whole computation; timezone failures never do.
pub fn hourly_engagement(
    conn: &Connection,
    at: DateTime<Utc>,
) -> Result<Vec<HourlyScoreRow>, duckdb::Error> {
    let users = snapshot::fetch_users(conn)?;
    let offsets = timezone::resolve_offsets(&users, at);
    let events = snapshot::fetch_events(conn)?;
    Ok(hourly::aggregate_hourly(&events, &offsets))
}

/// Compute per-artist total visit duration and distinct session counts.
pub fn visit_summary(conn: &Connection) -> Result<Vec<VisitSummaryRow>, duckdb::Error> {
    let artists = snapshot::fetch_artists(conn)?;
    let visits = snapshot::fetch_visits(conn)?;
    Ok(visits::summarize_visits(&visits, &artists))
}
