//! Bookmark reconciliation.
//!
//! Derives per-job bookmark status from the store and applies toggles. The
//! bookmarked set is always re-read from the store after a write; no flag is
//! kept here that could drift from what is on disk.

use std::collections::HashSet;

use crate::managers::bookmark_store::BookmarkStoreTrait;
use crate::types::errors::StoreError;
use crate::types::job::JobPosting;

/// Ids of the currently bookmarked postings.
pub type BookmarkIds = HashSet<String>;

pub fn bookmark_ids(records: &[JobPosting]) -> BookmarkIds {
    records.iter().map(|job| job.id.clone()).collect()
}

/// For each job, whether its id is in `bookmarks`. Pure and total.
pub fn compute_status(jobs: &[JobPosting], bookmarks: &BookmarkIds) -> Vec<bool> {
    jobs.iter().map(|job| bookmarks.contains(&job.id)).collect()
}

/// Reads the bookmarked ids from the store.
pub async fn load_ids<S>(store: &S) -> Result<BookmarkIds, StoreError>
where
    S: BookmarkStoreTrait + ?Sized,
{
    Ok(bookmark_ids(&store.list().await?))
}

/// Removes `job` if `currently_bookmarked`, stores it otherwise, then returns
/// the bookmarked ids as re-read from the store.
///
/// On error the caller keeps its last reconciled set.
pub async fn toggle<S>(
    store: &S,
    job: &JobPosting,
    currently_bookmarked: bool,
) -> Result<BookmarkIds, StoreError>
where
    S: BookmarkStoreTrait + ?Sized,
{
    if currently_bookmarked {
        store.remove(&job.id).await?;
    } else {
        store.put(job).await?;
    }
    load_ids(store).await
}
