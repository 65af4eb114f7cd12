pub mod engagement;
pub mod errors;
pub mod record;

use duckdb::Connection;
use parking_lot::Mutex;
use std::sync::atomic::AtomicU64;

/// Shared application state: the embedded database plus operational
/// counters and the request policy knobs read by the router.
pub struct AppState {
    pub conn: Mutex<Connection>,
    /// Origin allowed to call the API cross-origin. `None` allows any.
    pub allowed_origin: Option<String>,
    /// Upper bound on any single request, enforced by the timeout layer.
    pub request_timeout_secs: u64,
    pub events_recorded_total: AtomicU64,
    pub visits_recorded_total: AtomicU64,
}

impl AppState {
    /// State over an already-migrated connection, with default policy.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            allowed_origin: None,
            request_timeout_secs: 30,
            events_recorded_total: AtomicU64::new(0),
            visits_recorded_total: AtomicU64::new(0),
        }
    }
}
