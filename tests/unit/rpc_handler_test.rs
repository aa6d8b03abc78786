//! Tests for the JSON-RPC method dispatch.
//!
//! Builds a full `App` over an in-memory database and a fixed in-memory feed,
//! then drives it only through `handle_method`.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use lokaljobs::app::App;
use lokaljobs::database::Database;
use lokaljobs::rpc_handler::handle_method;
use lokaljobs::services::feed_client::JobFeed;
use lokaljobs::types::errors::FeedError;
use lokaljobs::types::job::JobPosting;
use serde_json::{json, Value};

/// Serves fixed pages; any other page is empty. Page 99 fails.
struct FixedFeed {
    pages: HashMap<u32, Vec<JobPosting>>,
}

#[async_trait]
impl JobFeed for FixedFeed {
    async fn fetch_page(&self, page: NonZeroU32) -> Result<Vec<JobPosting>, FeedError> {
        if page.get() == 99 {
            return Err(FeedError::NetworkError("unreachable".to_string()));
        }
        Ok(self.pages.get(&page.get()).cloned().unwrap_or_default())
    }
}

fn setup() -> App {
    let mut pages = HashMap::new();
    pages.insert(1, vec![JobPosting::new("1", "Driver"), JobPosting::new("2", "Cook")]);
    pages.insert(2, vec![JobPosting::new("3", "Tailor")]);
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    App::new(Arc::new(db), Arc::new(FixedFeed { pages }))
}

async fn call(app: &App, method: &str, params: Value) -> Value {
    handle_method(app, method, &params)
        .await
        .unwrap_or_else(|e| panic!("{} failed: {}", method, e))
}

fn card_ids(view: &Value) -> Vec<String> {
    view["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_ping() {
    let app = setup();
    assert_eq!(call(&app, "ping", json!({})).await, json!({"pong": true}));
}

#[tokio::test]
async fn test_unknown_method_is_an_error() {
    let app = setup();
    let err = handle_method(&app, "jobs.teleport", &json!({})).await.unwrap_err();
    assert_eq!(err, "unknown method: jobs.teleport");
}

#[tokio::test]
async fn test_store_initialize() {
    let app = setup();
    assert_eq!(call(&app, "store.initialize", json!({})).await, json!({"ok": true}));
}

#[tokio::test]
async fn test_fetch_page_validates_page_number() {
    let app = setup();

    let jobs = call(&app, "jobs.fetch_page", json!({"page": 2})).await;
    assert_eq!(jobs[0]["id"], "3");

    for params in [json!({}), json!({"page": 0}), json!({"page": "one"})] {
        assert!(handle_method(&app, "jobs.fetch_page", &params).await.is_err(), "{}", params);
    }
    let err = handle_method(&app, "jobs.fetch_page", &json!({"page": 99})).await.unwrap_err();
    assert!(err.contains("network"), "{}", err);
}

#[tokio::test]
async fn test_load_initial_and_more_until_exhausted() {
    let app = setup();

    let first = call(&app, "jobs.load_initial", json!({})).await;
    assert_eq!(first["outcome"], json!({"appended": 2}));
    assert_eq!(first["view"]["state"], "jobs");
    assert_eq!(card_ids(&first["view"]), vec!["1", "2"]);

    let second = call(&app, "jobs.load_more", json!({})).await;
    assert_eq!(second["outcome"], json!({"appended": 1}));
    assert_eq!(card_ids(&second["view"]), vec!["1", "2", "3"]);

    let third = call(&app, "jobs.load_more", json!({})).await;
    assert_eq!(third["outcome"], "exhausted");
    let fourth = call(&app, "jobs.load_more", json!({})).await;
    assert_eq!(fourth["outcome"], "skipped");
    assert_eq!(fourth["error"], Value::Null);

    let refreshed = call(&app, "jobs.refresh", json!({})).await;
    assert_eq!(card_ids(&refreshed["view"]), vec!["1", "2"]);
}

#[tokio::test]
async fn test_jobs_view_and_get() {
    let app = setup();
    let empty = call(&app, "jobs.view", json!({})).await;
    assert_eq!(empty["state"], "empty");

    call(&app, "jobs.load_initial", json!({})).await;
    let job = call(&app, "jobs.get", json!({"id": "2"})).await;
    assert_eq!(job["title"], "Cook");

    assert!(handle_method(&app, "jobs.get", &json!({"id": "404"})).await.is_err());
}

#[tokio::test]
async fn test_bookmark_crud() {
    let app = setup();
    let job = json!({"id": 10, "title": "Electrician", "primary_details": {"Place": "Pune"}, "views": 3});

    assert_eq!(
        call(&app, "bookmark.put", json!({"job": job})).await,
        json!({"ok": true, "id": "10"})
    );

    let fetched = call(&app, "bookmark.get", json!({"id": "10"})).await;
    assert_eq!(fetched["title"], "Electrician");
    assert_eq!(fetched["primary_details"]["Place"], "Pune");
    assert_eq!(fetched["views"], 3, "unknown fields are kept");

    let list = call(&app, "bookmark.list", json!({})).await;
    assert_eq!(list["total"], 1);

    call(&app, "bookmark.remove", json!({"id": "10"})).await;
    assert_eq!(call(&app, "bookmark.get", json!({"id": "10"})).await, Value::Null);
    assert_eq!(call(&app, "bookmark.list", json!({})).await["total"], 0);
}

#[tokio::test]
async fn test_bookmark_put_rejects_invalid_job() {
    let app = setup();
    assert!(handle_method(&app, "bookmark.put", &json!({})).await.is_err());
    let err = handle_method(&app, "bookmark.put", &json!({"job": {"title": "no id"}}))
        .await
        .unwrap_err();
    assert!(err.starts_with("invalid job"), "{}", err);
}

#[tokio::test]
async fn test_toggle_by_id_updates_status_and_view() {
    let app = setup();
    call(&app, "jobs.load_initial", json!({})).await;

    let toggled = call(&app, "bookmark.toggle", json!({"id": "2"})).await;
    assert_eq!(toggled, json!({"id": "2", "bookmarked": true}));

    let status = call(&app, "bookmark.status", json!({})).await;
    assert_eq!(
        status,
        json!([{"id": "1", "bookmarked": false}, {"id": "2", "bookmarked": true}])
    );
    let view = call(&app, "jobs.view", json!({})).await;
    assert_eq!(view["cards"][1]["bookmarked"], true);

    let untoggled = call(&app, "bookmark.toggle", json!({"id": "2"})).await;
    assert_eq!(untoggled["bookmarked"], false);
}

#[tokio::test]
async fn test_toggle_unknown_id_is_an_error() {
    let app = setup();
    let err = handle_method(&app, "bookmark.toggle", &json!({"id": "nope"})).await.unwrap_err();
    assert_eq!(err, "unknown job: nope");
}

#[tokio::test]
async fn test_status_for_explicit_ids() {
    let app = setup();
    call(&app, "bookmark.put", json!({"job": {"id": "b", "title": "B"}})).await;

    let status = call(&app, "bookmark.status", json!({"ids": ["a", "b"]})).await;
    assert_eq!(
        status,
        json!([{"id": "a", "bookmarked": false}, {"id": "b", "bookmarked": true}])
    );
}

#[tokio::test]
async fn test_bookmark_view() {
    let app = setup();
    let empty = call(&app, "bookmark.view", json!({})).await;
    assert_eq!(empty, json!({"state": "empty", "message": "No bookmarks available."}));

    call(
        &app,
        "bookmark.put",
        json!({"job": {"id": "1", "title": "Driver", "description": "Drive"}}),
    )
    .await;
    let view = call(&app, "bookmark.view", json!({})).await;
    assert_eq!(view["state"], "bookmarks");
    assert_eq!(view["cards"][0]["excerpt"], "Drive");
    assert_eq!(view["cards"][0]["salary"], "N/A");
}
