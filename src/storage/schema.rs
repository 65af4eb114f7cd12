use duckdb::Connection;

/// SQL statements to create the catalog and event tables.
///
/// `start_time`, `end_time`, and `created_at` are epoch milliseconds.
pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS artists (
    id         BIGINT  NOT NULL,
    name       VARCHAR NOT NULL
);
CREATE TABLE IF NOT EXISTS users (
    id         BIGINT  NOT NULL,
    timezone   VARCHAR NOT NULL
);
CREATE TABLE IF NOT EXISTS visits (
    artist_id  BIGINT  NOT NULL,
    session_id VARCHAR NOT NULL,
    start_time BIGINT  NOT NULL,
    end_time   BIGINT  NOT NULL
);
CREATE TABLE IF NOT EXISTS user_events (
    user_id    BIGINT  NOT NULL,
    artist_id  BIGINT  NOT NULL,
    event_type VARCHAR NOT NULL,
    created_at BIGINT  NOT NULL
)
";

/// Initialize the database schema.
pub fn init_schema(conn: &Connection) -> Result<(), duckdb::Error> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}
