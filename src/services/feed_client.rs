//! Job Feed Client for Lokal Jobs.
//!
//! Fetches one page of postings at a time from the remote paginated endpoint.
//! The client is stateless: the page cursor and the accumulated list belong
//! to the caller (see [`crate::managers::job_board`]).

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::errors::FeedError;
use crate::types::job::JobPosting;
use crate::types::settings::FeedSettings;

/// Source of job postings, one page per call.
#[async_trait]
pub trait JobFeed: Send + Sync {
    /// Fetches page `page` (1-based). An empty vector means there is nothing
    /// more to show for now.
    async fn fetch_page(&self, page: NonZeroU32) -> Result<Vec<JobPosting>, FeedError>;
}

/// HTTP implementation of [`JobFeed`] using `reqwest`.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Creates a client for `base_url`; every request gives up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lokaljobs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::NetworkError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn from_settings(settings: &FeedSettings) -> Result<Self, FeedError> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl JobFeed for FeedClient {
    async fn fetch_page(&self, page: NonZeroU32) -> Result<Vec<JobPosting>, FeedError> {
        tracing::debug!(page = page.get(), url = %self.base_url, "fetching job page");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("page", page.get())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::NetworkError(format!(
                "feed answered {} for page {}",
                status,
                page
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::NetworkError(e.to_string()))?;
        let jobs = parse_page(&body)?;
        tracing::debug!(page = page.get(), count = jobs.len(), "job page received");
        Ok(jobs)
    }
}

/// Parses a feed response body into postings, preserving their order.
///
/// A missing or `null` `results` field is an empty page. Items that are not
/// postings with an id are skipped; a body that is not a JSON object, or a
/// `results` that is not an array, is a [`FeedError::ParseError`].
pub fn parse_page(body: &[u8]) -> Result<Vec<JobPosting>, FeedError> {
    let root: Value = serde_json::from_slice(body)
        .map_err(|e| FeedError::ParseError(format!("invalid JSON: {}", e)))?;
    let object = root
        .as_object()
        .ok_or_else(|| FeedError::ParseError("expected a JSON object".to_string()))?;

    let items = match object.get("results") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(FeedError::ParseError(
                "`results` is not an array".to_string(),
            ))
        }
    };

    let mut jobs = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<JobPosting>(item.clone()) {
            Ok(job) if !job.id.is_empty() => jobs.push(job),
            Ok(_) => tracing::warn!(index, "skipping feed item with an empty id"),
            Err(e) => tracing::warn!(index, error = %e, "skipping feed item that is not a posting"),
        }
    }
    Ok(jobs)
}
