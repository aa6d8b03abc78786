//! App Core for Lokal Jobs.
//!
//! Composition root: builds the bookmark store, the feed client and the job
//! board once, and hands them to the front-ends.

use std::sync::Arc;

use crate::database::Database;
use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::managers::job_board::JobBoard;
use crate::services::feed_client::{FeedClient, JobFeed};
use crate::services::settings_engine::SettingsEngine;
use crate::types::errors::StoreError;

/// Central application struct holding the store, the feed and the board.
pub struct App {
    pub db: Arc<Database>,
    pub store: Arc<BookmarkStore>,
    pub feed: Arc<dyn JobFeed>,
    pub board: JobBoard,
}

impl App {
    /// Wires the components together. Nothing touches the disk or network yet.
    pub fn new(db: Arc<Database>, feed: Arc<dyn JobFeed>) -> Self {
        let store = Arc::new(BookmarkStore::new(Arc::clone(&db)));
        let board = JobBoard::new(Arc::clone(&feed), store.clone());
        Self {
            db,
            store,
            feed,
            board,
        }
    }

    /// Builds the app from loaded settings, creating the data directory if needed.
    pub fn from_settings(engine: &SettingsEngine) -> Result<Self, Box<dyn std::error::Error>> {
        use crate::services::settings_engine::SettingsEngineTrait;

        let db_path = engine.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("cannot create data directory {}: {}", parent.display(), e))?;
        }
        let feed = FeedClient::from_settings(&engine.get_settings().feed)?;
        tracing::info!(database = %db_path.display(), feed = %feed.base_url(), "starting");
        Ok(Self::new(Arc::new(Database::new(db_path)), Arc::new(feed)))
    }

    /// Startup sequence: make sure the bookmark table exists.
    ///
    /// A failure is returned to the caller but is not fatal; store operations
    /// retry the initialization lazily.
    pub async fn startup(&self) -> Result<(), StoreError> {
        match self.store.initialize().await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "error initializing bookmark database");
                Err(e)
            }
        }
    }
}
