//! RPC method handler for the Lokal Jobs JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` is the presentation boundary: the UI layer reaches the
//! store, the feed and the job board only through these methods.

use std::num::NonZeroU32;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_store::BookmarkStoreTrait;
use crate::managers::job_board::PageLoad;
use crate::services::reconcile;
use crate::types::errors::FeedError;
use crate::types::job::JobPosting;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn page_param(params: &Value) -> Result<NonZeroU32, String> {
    let page = params.get("page").and_then(|v| v.as_u64()).ok_or("missing page")?;
    u32::try_from(page)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| format!("invalid page: {} (pages start at 1)", page))
}

fn job_param(params: &Value) -> Result<JobPosting, String> {
    let raw = params.get("job").cloned().ok_or("missing job")?;
    serde_json::from_value(raw).map_err(|e| format!("invalid job: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Reports a page load together with the resulting screen state.
fn page_load_response(app: &App, result: Result<PageLoad, FeedError>) -> Result<Value, String> {
    let (outcome, error) = match result {
        Ok(PageLoad::Appended(count)) => (json!({"appended": count}), Value::Null),
        Ok(PageLoad::Exhausted) => (json!("exhausted"), Value::Null),
        Ok(PageLoad::Skipped) => (json!("skipped"), Value::Null),
        Ok(PageLoad::Stale) => (json!("stale"), Value::Null),
        Err(e) => (json!("failed"), json!(e.user_message())),
    };
    Ok(json!({
        "outcome": outcome,
        "error": error,
        "view": to_json(&app.board.view())?,
    }))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Store ───
        "store.initialize" => {
            app.store.initialize().await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Feed ───
        "jobs.fetch_page" => {
            let page = page_param(params)?;
            let jobs = app.feed.fetch_page(page).await.map_err(|e| e.to_string())?;
            to_json(&jobs)
        }
        "jobs.load_initial" => {
            let result = app.board.load_initial().await;
            page_load_response(app, result)
        }
        "jobs.load_more" => {
            let result = app.board.load_more().await;
            page_load_response(app, result)
        }
        "jobs.refresh" => {
            let result = app.board.refresh().await;
            page_load_response(app, result)
        }
        "jobs.view" => to_json(&app.board.view()),
        "jobs.get" => {
            let id = str_param(params, "id")?;
            let job = app.board.find_job(id).ok_or_else(|| format!("job not loaded: {}", id))?;
            to_json(&job)
        }

        // ─── Bookmarks ───
        "bookmark.put" => {
            let job = job_param(params)?;
            app.store.put(&job).await.map_err(|e| e.to_string())?;
            app.board.refresh_bookmarks().await;
            Ok(json!({"ok": true, "id": job.id}))
        }
        "bookmark.remove" => {
            let id = str_param(params, "id")?;
            app.store.remove(id).await.map_err(|e| e.to_string())?;
            app.board.refresh_bookmarks().await;
            Ok(json!({"ok": true}))
        }
        "bookmark.get" => {
            let id = str_param(params, "id")?;
            let job = app.store.get(id).await.map_err(|e| e.to_string())?;
            to_json(&job)
        }
        "bookmark.list" => {
            let jobs = app.store.list().await.map_err(|e| e.to_string())?;
            Ok(json!({"items": to_json(&jobs)?, "total": jobs.len()}))
        }
        "bookmark.view" => to_json(&app.board.bookmark_view().await),
        "bookmark.status" => {
            let jobs: Vec<JobPosting> = match params.get("ids").and_then(|v| v.as_array()) {
                Some(ids) => ids
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|id| JobPosting::new(id, ""))
                    .collect(),
                None => app.board.jobs(),
            };
            let ids = reconcile::load_ids(app.store.as_ref())
                .await
                .map_err(|e| e.to_string())?;
            let status = reconcile::compute_status(&jobs, &ids);
            let entries: Vec<Value> = jobs
                .iter()
                .zip(status)
                .map(|(job, bookmarked)| json!({"id": job.id, "bookmarked": bookmarked}))
                .collect();
            Ok(json!(entries))
        }
        "bookmark.toggle" => {
            let job = match params.get("job") {
                Some(_) => job_param(params)?,
                None => {
                    let id = str_param(params, "id")?;
                    match app.board.find_job(id) {
                        Some(job) => job,
                        None => app
                            .store
                            .get(id)
                            .await
                            .map_err(|e| e.to_string())?
                            .ok_or_else(|| format!("unknown job: {}", id))?,
                    }
                }
            };
            let bookmarked = app
                .board
                .toggle_bookmark(&job)
                .await
                .map_err(|e| e.user_message().to_string())?;
            Ok(json!({"id": job.id, "bookmarked": bookmarked}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
