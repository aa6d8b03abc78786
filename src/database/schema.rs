//! Fixed schema for the bookmark database.
//!
//! One table, `bookmarks(id TEXT PRIMARY KEY, data TEXT)`, where `data` holds the
//! JSON-serialized posting. The schema is created once and never migrated.

use rusqlite::Connection;

/// Version recorded in `PRAGMA user_version` once the schema exists.
pub const SCHEMA_VERSION: i32 = 1;

/// Returns the schema version recorded in the database (0 for a fresh file).
pub fn get_schema_version(conn: &Connection) -> Result<i32, rusqlite::Error> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Creates the `bookmarks` table if it does not exist yet. Idempotent.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn ensure(conn: &Connection) -> Result<(), rusqlite::Error> {
    // In-memory databases answer "memory" and stay that way.
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS bookmarks (
             id TEXT PRIMARY KEY NOT NULL,
             data TEXT NOT NULL
         );",
    )?;

    if get_schema_version(conn)? < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}
