//! SQLite connection management for the bookmark database.
//!
//! Provides the [`Database`] handle. The underlying `rusqlite::Connection`
//! is opened lazily: the first operation that needs it opens the file and
//! creates the schema, so a missed [`Database::initialize`] call heals itself.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::schema;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    /// Private in-memory database, discarded when the handle is dropped.
    Memory,
}

/// Owned handle to the bookmark database.
///
/// Constructed once at application start and shared behind an `Arc`.
/// All access goes through a single connection guarded by a mutex, so
/// statements are serialized.
pub struct Database {
    location: DatabaseLocation,
    conn: Mutex<Option<Connection>>,
}

impl Database {
    /// Creates a handle for the database file at `path` without touching the disk.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            location: DatabaseLocation::File(path.as_ref().to_path_buf()),
            conn: Mutex::new(None),
        }
    }

    /// Creates a handle for a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            location: DatabaseLocation::Memory,
            conn: Mutex::new(None),
        }
    }

    /// Opens (or creates) the database file at `path` and ensures the schema exists.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the file cannot be opened or the schema cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let db = Self::new(path);
        db.initialize()?;
        Ok(db)
    }

    /// Opens an initialized in-memory database. Useful for testing.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let db = Self::in_memory();
        db.initialize()?;
        Ok(db)
    }

    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    /// Ensures the connection is open and the schema exists.
    ///
    /// Uses `CREATE TABLE IF NOT EXISTS`, so it is safe to call any number of times.
    pub fn initialize(&self) -> Result<(), rusqlite::Error> {
        let mut guard = self.lock();
        match guard.as_ref() {
            Some(conn) => schema::ensure(conn),
            None => {
                *guard = Some(self.connect()?);
                Ok(())
            }
        }
    }

    /// Returns true once a connection has been opened.
    pub fn is_initialized(&self) -> bool {
        self.lock().is_some()
    }

    /// Runs `f` against the connection, opening and initializing it first if needed.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T, rusqlite::Error>
    where
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    {
        let mut guard = self.lock();
        let conn = match &mut *guard {
            Some(conn) => conn,
            slot => {
                tracing::debug!(location = ?self.location, "opening bookmark database lazily");
                slot.insert(self.connect()?)
            }
        };
        f(conn)
    }

    fn connect(&self) -> Result<Connection, rusqlite::Error> {
        let conn = match &self.location {
            DatabaseLocation::File(path) => Connection::open(path)?,
            DatabaseLocation::Memory => Connection::open_in_memory()?,
        };
        conn.busy_timeout(BUSY_TIMEOUT)?;
        schema::ensure(&conn)?;
        tracing::info!(location = ?self.location, "bookmark database initialized");
        Ok(conn)
    }

    // A panic while holding the lock cannot leave a half-applied statement
    // behind, so a poisoned mutex is still usable.
    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
