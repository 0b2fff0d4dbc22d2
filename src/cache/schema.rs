//! Database schema for the persistent icon cache

/// SQL schema for the cache database
pub const SCHEMA_SQL: &str = r#"
-- One resolved icon per origin
CREATE TABLE IF NOT EXISTS favicons (
    origin TEXT PRIMARY KEY,
    data_uri TEXT NOT NULL,
    stored_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_favicons_expires ON favicons(expires_at);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
