use serde::Serialize;

use super::job::JobPosting;

/// One row of the job list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobCard {
    /// List identity: the job id with its position as a tiebreak, since the
    /// feed may repeat a posting across pages.
    pub key: String,
    pub id: String,
    pub title: String,
    pub location: String,
    pub salary: String,
    pub job_type: String,
    pub bookmarked: bool,
}

impl JobCard {
    pub fn new(job: &JobPosting, index: usize, bookmarked: bool) -> Self {
        Self {
            key: format!("{}_{}", job.id, index),
            id: job.id.clone(),
            title: job.title.clone(),
            location: job.location().to_string(),
            salary: job.salary().to_string(),
            job_type: job.job_type().to_string(),
            bookmarked,
        }
    }
}

/// One row of the bookmarks list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkCard {
    pub id: String,
    pub title: String,
    pub location: String,
    pub salary: String,
    pub excerpt: String,
}

impl From<&JobPosting> for BookmarkCard {
    fn from(job: &JobPosting) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            location: job.location().to_string(),
            salary: job.salary().to_string(),
            excerpt: job.description_excerpt(),
        }
    }
}

/// What the jobs screen should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobListView {
    /// A load is in flight and nothing has been shown yet.
    Loading,
    /// The last operation failed and there is nothing to show; offer a retry.
    Error { message: String },
    Empty { message: String },
    /// Accumulated postings, with an inline error if the latest page failed.
    Jobs {
        cards: Vec<JobCard>,
        error: Option<String>,
        refreshing: bool,
    },
}

/// What the bookmarks screen should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BookmarkListView {
    Error { message: String },
    Empty { message: String },
    Bookmarks { cards: Vec<BookmarkCard> },
}
