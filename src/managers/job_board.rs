//! Job Board controller for Lokal Jobs.
//!
//! Owns everything the jobs screen shows: the postings accumulated across
//! pages, the page cursor, the bookmarked id set and the last error. Feed
//! and store calls run without holding the state lock, so loads may overlap;
//! a generation counter makes a refresh discard pages requested before it.

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::managers::bookmark_store::BookmarkStoreTrait;
use crate::services::feed_client::JobFeed;
use crate::services::reconcile::{self, BookmarkIds};
use crate::types::errors::{FeedError, StoreError};
use crate::types::job::JobPosting;
use crate::types::view::{BookmarkCard, BookmarkListView, JobCard, JobListView};

pub const NO_JOBS_MESSAGE: &str = "No jobs available.";
pub const NO_BOOKMARKS_MESSAGE: &str = "No bookmarks available.";

struct BoardState {
    jobs: Vec<JobPosting>,
    next_page: NonZeroU32,
    /// Set by the first empty page; cleared by a reload.
    exhausted: bool,
    generation: u64,
    in_flight: bool,
    refreshing: bool,
    error: Option<String>,
    bookmarks: BookmarkIds,
    bookmarks_version: u64,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            next_page: NonZeroU32::MIN,
            exhausted: false,
            generation: 0,
            in_flight: false,
            refreshing: false,
            error: None,
            bookmarks: BookmarkIds::new(),
            bookmarks_version: 0,
        }
    }
}

/// Outcome of a page load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    /// The page arrived and this many postings were appended.
    Appended(usize),
    /// The page was empty; the board is now exhausted.
    Exhausted,
    /// No request was made: the board is exhausted or a page is already loading.
    Skipped,
    /// The page arrived after a refresh superseded it and was dropped.
    Stale,
}

/// Controller for the jobs list and its bookmark icons.
pub struct JobBoard {
    feed: Arc<dyn JobFeed>,
    store: Arc<dyn BookmarkStoreTrait>,
    state: Mutex<BoardState>,
    /// Held from a toggle's write through its re-read, so toggles apply in order.
    toggle_lock: tokio::sync::Mutex<()>,
}

impl JobBoard {
    pub fn new(feed: Arc<dyn JobFeed>, store: Arc<dyn BookmarkStoreTrait>) -> Self {
        Self {
            feed,
            store,
            state: Mutex::new(BoardState::default()),
            toggle_lock: tokio::sync::Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// First load: page 1 and the bookmarked set, fetched concurrently.
    pub async fn load_initial(&self) -> Result<PageLoad, FeedError> {
        self.reload(false).await
    }

    /// Pull-to-refresh: drops the accumulated list, resets the cursor and
    /// reloads page 1 and the bookmarked set. Also serves as the retry action.
    pub async fn refresh(&self) -> Result<PageLoad, FeedError> {
        self.reload(true).await
    }

    async fn reload(&self, refreshing: bool) -> Result<PageLoad, FeedError> {
        let (generation, page) = {
            let mut st = self.lock();
            st.generation += 1;
            st.jobs.clear();
            st.next_page = NonZeroU32::MIN;
            st.exhausted = false;
            st.error = None;
            st.refreshing = refreshing;
            st.in_flight = true;
            (st.generation, st.next_page)
        };

        let (load, _) = tokio::join!(self.fetch_into(generation, page), self.refresh_bookmarks());
        load
    }

    /// Fetches the page after the last one loaded and appends it.
    ///
    /// Does nothing once an empty page has been seen, or while another page
    /// is loading; a failed page is retried at the same number next time.
    pub async fn load_more(&self) -> Result<PageLoad, FeedError> {
        let (generation, page) = {
            let mut st = self.lock();
            if st.exhausted || st.in_flight {
                return Ok(PageLoad::Skipped);
            }
            st.in_flight = true;
            (st.generation, st.next_page)
        };
        self.fetch_into(generation, page).await
    }

    async fn fetch_into(&self, generation: u64, page: NonZeroU32) -> Result<PageLoad, FeedError> {
        let result = self.feed.fetch_page(page).await;

        let mut st = self.lock();
        if st.generation != generation {
            tracing::debug!(page = page.get(), generation, "dropping page from a superseded load");
            return Ok(PageLoad::Stale);
        }
        st.in_flight = false;
        st.refreshing = false;

        match result {
            Ok(jobs) if jobs.is_empty() => {
                tracing::info!(page = page.get(), "empty page; no more results for now");
                st.exhausted = true;
                Ok(PageLoad::Exhausted)
            }
            Ok(jobs) => {
                let count = jobs.len();
                st.jobs.extend(jobs);
                st.next_page = page.saturating_add(1);
                st.error = None;
                Ok(PageLoad::Appended(count))
            }
            Err(e) => {
                tracing::warn!(page = page.get(), error = %e, "failed to load job page");
                st.error = Some(e.user_message().to_string());
                Err(e)
            }
        }
    }

    /// Re-reads the bookmarked set from the store.
    ///
    /// Failures are only logged: the previous status stays until the next
    /// successful read. Returns whether the read succeeded.
    pub async fn refresh_bookmarks(&self) -> bool {
        let version = self.lock().bookmarks_version;
        match reconcile::load_ids(&*self.store).await {
            Ok(ids) => {
                self.apply_bookmarks(version, ids);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "bookmark refresh failed; keeping previous status");
                false
            }
        }
    }

    /// Bookmarks `job` if it is not bookmarked, unbookmarks it otherwise.
    ///
    /// Returns the new status as read back from the store. On failure the
    /// status shown stays at its last reconciled value and a background
    /// re-read is attempted. Concurrent toggles run one after another.
    pub async fn toggle_bookmark(&self, job: &JobPosting) -> Result<bool, StoreError> {
        let _serialized = self.toggle_lock.lock().await;
        let currently = self.is_bookmarked(&job.id);
        match reconcile::toggle(&*self.store, job, currently).await {
            Ok(ids) => {
                let now = ids.contains(&job.id);
                let mut st = self.lock();
                st.bookmarks = ids;
                st.bookmarks_version += 1;
                Ok(now)
            }
            Err(e) => {
                tracing::warn!(id = %job.id, error = %e, "bookmark toggle failed");
                self.refresh_bookmarks().await;
                Err(e)
            }
        }
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.lock().bookmarks.contains(id)
    }

    pub fn bookmarked_ids(&self) -> BookmarkIds {
        self.lock().bookmarks.clone()
    }

    pub fn jobs(&self) -> Vec<JobPosting> {
        self.lock().jobs.clone()
    }

    /// Bookmark status of every accumulated posting, in list order.
    pub fn statuses(&self) -> Vec<bool> {
        let st = self.lock();
        reconcile::compute_status(&st.jobs, &st.bookmarks)
    }

    /// First accumulated posting with this id.
    pub fn find_job(&self, id: &str) -> Option<JobPosting> {
        self.lock().jobs.iter().find(|job| job.id == id).cloned()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn is_exhausted(&self) -> bool {
        self.lock().exhausted
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight
    }

    pub fn next_page(&self) -> NonZeroU32 {
        self.lock().next_page
    }

    /// What the jobs screen should render right now.
    pub fn view(&self) -> JobListView {
        let st = self.lock();
        if st.jobs.is_empty() {
            if st.in_flight {
                return JobListView::Loading;
            }
            if let Some(message) = &st.error {
                return JobListView::Error {
                    message: message.clone(),
                };
            }
            return JobListView::Empty {
                message: NO_JOBS_MESSAGE.to_string(),
            };
        }

        let statuses = reconcile::compute_status(&st.jobs, &st.bookmarks);
        let cards = st
            .jobs
            .iter()
            .zip(statuses)
            .enumerate()
            .map(|(index, (job, bookmarked))| JobCard::new(job, index, bookmarked))
            .collect();
        JobListView::Jobs {
            cards,
            error: st.error.clone(),
            refreshing: st.refreshing,
        }
    }

    /// What the bookmarks screen should render, read fresh from the store.
    pub async fn bookmark_view(&self) -> BookmarkListView {
        let version = self.lock().bookmarks_version;
        match self.store.list().await {
            Ok(records) if records.is_empty() => {
                self.apply_bookmarks(version, BookmarkIds::new());
                BookmarkListView::Empty {
                    message: NO_BOOKMARKS_MESSAGE.to_string(),
                }
            }
            Ok(records) => {
                self.apply_bookmarks(version, reconcile::bookmark_ids(&records));
                BookmarkListView::Bookmarks {
                    cards: records.iter().map(BookmarkCard::from).collect(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load bookmarks");
                BookmarkListView::Error {
                    message: e.user_message().to_string(),
                }
            }
        }
    }

    fn apply_bookmarks(&self, version: u64, ids: BookmarkIds) {
        let mut st = self.lock();
        // A toggle that finished meanwhile carries a newer set.
        if st.bookmarks_version == version {
            st.bookmarks = ids;
            st.bookmarks_version += 1;
        }
    }
}
