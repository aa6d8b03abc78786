use thiserror::Error;

// === FeedError ===

/// Errors raised while fetching a page from the remote job feed.
///
/// Both variants are recoverable; the caller offers a retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The feed was unreachable, timed out or answered with a non-success status.
    #[error("Feed network error: {0}")]
    NetworkError(String),
    /// The response body was not the expected JSON shape.
    #[error("Feed parse error: {0}")]
    ParseError(String),
}

impl FeedError {
    /// Short message shown to the user next to a retry action.
    pub fn user_message(&self) -> &'static str {
        match self {
            FeedError::NetworkError(_) => "Error fetching jobs.",
            FeedError::ParseError(_) => "Failed to load jobs.",
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::ParseError(err.to_string())
        } else {
            FeedError::NetworkError(err.to_string())
        }
    }
}

// === StoreError ===

/// Errors raised by the local bookmark store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A write (upsert or delete) did not complete. No partial success is implied.
    #[error("Bookmark storage write error: {0}")]
    StorageWriteError(String),
    /// A read failed, or a stored record could not be deserialized.
    #[error("Bookmark storage read error: {0}")]
    StorageReadError(String),
}

impl StoreError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::StorageWriteError(_) => "Failed to update bookmark.",
            StoreError::StorageReadError(_) => "Failed to load bookmarks.",
        }
    }

    pub(crate) fn write(err: impl std::fmt::Display) -> Self {
        StoreError::StorageWriteError(err.to_string())
    }

    pub(crate) fn read(err: impl std::fmt::Display) -> Self {
        StoreError::StorageReadError(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    IoError(String),
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
