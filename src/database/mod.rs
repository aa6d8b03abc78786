//! Bookmark database layer.
//!
//! Provides the SQLite connection handle and the fixed bookmark schema.
//!
//! # Usage
//!
//! ```no_run
//! use lokaljobs::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("bookmarks.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//!
//! // Run queries against the connection, which is opened on first use
//! let count: i64 = db
//!     .with_connection(|conn| conn.query_row("SELECT COUNT(*) FROM bookmarks", [], |r| r.get(0)))
//!     .expect("query failed");
//! ```

pub mod connection;
pub mod schema;

pub use connection::{Database, DatabaseLocation};
