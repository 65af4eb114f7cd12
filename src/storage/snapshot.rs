use duckdb::Connection;
use serde::{Deserialize, Serialize};

/// An artist catalog row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
}

/// A user row. `timezone` is user-supplied and not guaranteed to name a
/// valid IANA zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub timezone: String,
}

/// A listening-session visit row. Times are epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub artist_id: i64,
    pub session_id: String,
    pub start_time: i64,
    pub end_time: i64,
}

/// Interaction event types carrying an engagement weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    LikeTrack,
    AddTrackToPlaylist,
    PlayTrack,
    ShareTrack,
    /// Anything the catalog does not recognize. Kept, never rejected.
    #[serde(other)]
    Other,
}

impl EventType {
    /// Stored string form, as written by the recording endpoints.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LikeTrack => "like_track",
            Self::AddTrackToPlaylist => "add_track_to_playlist",
            Self::PlayTrack => "play_track",
            Self::ShareTrack => "share_track",
            Self::Other => "other",
        }
    }

    /// Parse a stored value. Unrecognized strings map to `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "like_track" => Self::LikeTrack,
            "add_track_to_playlist" => Self::AddTrackToPlaylist,
            "play_track" => Self::PlayTrack,
            "share_track" => Self::ShareTrack,
            _ => Self::Other,
        }
    }
}

/// A raw user interaction event row. `created_at` is epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEvent {
    pub user_id: i64,
    pub artist_id: i64,
    pub event_type: EventType,
    pub created_at: i64,
}

/// Read the full artist catalog.
pub fn fetch_artists(conn: &Connection) -> Result<Vec<Artist>, duckdb::Error> {
    let mut stmt = conn.prepare("SELECT id, name FROM artists")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Artist {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Read all users with their stored timezone names.
pub fn fetch_users(conn: &Connection) -> Result<Vec<User>, duckdb::Error> {
    let mut stmt = conn.prepare("SELECT id, timezone FROM users")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                timezone: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Read all visit rows.
///
/// The ORDER BY pins group-discovery order in the visit aggregator, so an
/// unchanged snapshot always produces byte-identical summary output.
pub fn fetch_visits(conn: &Connection) -> Result<Vec<Visit>, duckdb::Error> {
    let mut stmt = conn.prepare(
        "SELECT artist_id, session_id, start_time, end_time FROM visits
         ORDER BY artist_id, session_id, start_time, end_time",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Visit {
                artist_id: row.get(0)?,
                session_id: row.get(1)?,
                start_time: row.get(2)?,
                end_time: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Read all user interaction events.
pub fn fetch_events(conn: &Connection) -> Result<Vec<UserEvent>, duckdb::Error> {
    let mut stmt =
        conn.prepare("SELECT user_id, artist_id, event_type, created_at FROM user_events")?;
    let rows = stmt
        .query_map([], |row| {
            let raw: String = row.get(2)?;
            Ok(UserEvent {
                user_id: row.get(0)?,
                artist_id: row.get(1)?,
                event_type: EventType::parse(&raw),
                created_at: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::storage::schema::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_fetch_empty_tables() {
        let conn = setup_test_db();
        assert!(fetch_artists(&conn).unwrap().is_empty());
        assert!(fetch_users(&conn).unwrap().is_empty());
        assert!(fetch_visits(&conn).unwrap().is_empty());
        assert!(fetch_events(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_artists_round_trip() {
        let conn = setup_test_db();
        conn.execute(
            "INSERT INTO artists (id, name) VALUES (1, 'Nova Tide'), (2, 'Glasshouse')",
            [],
        )
        .unwrap();

        let artists = fetch_artists(&conn).unwrap();
        assert_eq!(artists.len(), 2);
        assert!(artists.iter().any(|a| a.id == 1 && a.name == "Nova Tide"));
    }

    #[test]
    fn test_fetch_events_parses_known_types() {
        let conn = setup_test_db();
        conn.execute(
            "INSERT INTO user_events (user_id, artist_id, event_type, created_at)
             VALUES (1, 1, 'share_track', 1000), (1, 1, 'play_track', 2000)",
            [],
        )
        .unwrap();

        let events = fetch_events(&conn).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .any(|e| e.event_type == EventType::ShareTrack && e.created_at == 1000));
    }

    #[test]
    fn test_fetch_events_unknown_type_maps_to_other() {
        let conn = setup_test_db();
        conn.execute(
            "INSERT INTO user_events (user_id, artist_id, event_type, created_at)
             VALUES (1, 1, 'skip_track', 1000)",
            [],
        )
        .unwrap();

        let events = fetch_events(&conn).unwrap();
        assert_eq!(events[0].event_type, EventType::Other);
    }

    #[test]
    fn test_fetch_visits_ordered() {
        let conn = setup_test_db();
        conn.execute(
            "INSERT INTO visits (artist_id, session_id, start_time, end_time)
             VALUES (2, 's1', 0, 100), (1, 's2', 0, 100), (1, 's1', 0, 100)",
            [],
        )
        .unwrap();

        let visits = fetch_visits(&conn).unwrap();
        let keys: Vec<_> = visits
            .iter()
            .map(|v| (v.artist_id, v.session_id.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (1, "s1".to_string()),
                (1, "s2".to_string()),
                (2, "s1".to_string())
            ]
        );
    }

    #[test]
    fn test_event_type_string_round_trip() {
        for ty in [
            EventType::LikeTrack,
            EventType::AddTrackToPlaylist,
            EventType::PlayTrack,
            EventType::ShareTrack,
            EventType::Other,
        ] {
            assert_eq!(EventType::parse(ty.as_str()), ty);
        }
    }

    #[test]
    fn test_event_type_deserialize_unknown() {
        let ty: EventType = serde_json::from_str("\"follow_artist\"").unwrap();
        assert_eq!(ty, EventType::Other);
    }
}
