//! Unit tests for the HTTP job feed client.
//!
//! Each test starts a throwaway HTTP responder on 127.0.0.1 that answers
//! per `page` query parameter.

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lokaljobs::services::feed_client::{FeedClient, JobFeed};
use lokaljobs::types::errors::FeedError;
use lokaljobs::types::settings::FeedSettings;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Route = Arc<dyn Fn(u32) -> (u16, String) + Send + Sync>;

fn page(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn page_number(request_line: &str) -> u32 {
    request_line
        .split(|c| c == '?' || c == '&' || c == ' ')
        .find_map(|part| part.strip_prefix("page="))
        .and_then(|p| p.parse().ok())
        .unwrap_or(0)
}

/// Starts a responder; returns its base URL and the request lines it has seen.
async fn serve(route: Route) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let route = Arc::clone(&route);
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf).to_string();
                let line = request.lines().next().unwrap_or_default().to_string();
                log.lock().unwrap().push(line.clone());

                let (status, body) = route(page_number(&line));
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}/common/jobs", addr), seen)
}

fn client(base_url: &str) -> FeedClient {
    FeedClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_page_parses_results_in_order() {
    let (url, seen) = serve(Arc::new(|p: u32| {
        (200, format!(r#"{{"results": [{{"id": {}1, "title": "First"}}, {{"id": "{}2", "title": "Second"}}], "next": null}}"#, p, p))
    }))
    .await;

    let jobs = client(&url).fetch_page(page(3)).await.unwrap();

    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["31", "32"]);
    assert_eq!(jobs[0].title, "First");
    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /common/jobs?page=3 "), "{}", requests[0]);
}

#[tokio::test]
async fn test_fetch_page_keeps_optional_fields() {
    let (url, _) = serve(Arc::new(|_: u32| {
        (
            200,
            r#"{"results": [{"id": 7, "title": "Telecaller", "company_name": "Acme",
                "created_at": "2024-06-01T10:00:00Z", "description": "Call customers",
                "primary_details": {"Place": "Chennai", "Salary": "₹15000", "Job_Type": "Full Time", "Experience": "Fresher"}}]}"#
                .to_string(),
        )
    }))
    .await;

    let jobs = client(&url).fetch_page(page(1)).await.unwrap();
    let job = &jobs[0];
    assert_eq!(job.company_name.as_deref(), Some("Acme"));
    assert_eq!(job.location(), "Chennai");
    assert_eq!(job.salary(), "₹15000");
    assert_eq!(job.job_type(), "Full Time");
    assert_eq!(job.experience(), "Fresher");
}

#[tokio::test]
async fn test_empty_and_missing_results_are_empty_pages() {
    let (url, _) = serve(Arc::new(|p: u32| match p {
        1 => (200, r#"{"results": []}"#.to_string()),
        _ => (200, r#"{"count": 0}"#.to_string()),
    }))
    .await;
    let feed = client(&url);

    assert!(feed.fetch_page(page(1)).await.unwrap().is_empty());
    assert!(feed.fetch_page(page(2)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let (url, _) = serve(Arc::new(|_: u32| (200, "<html>oops</html>".to_string()))).await;
    let err = client(&url).fetch_page(page(1)).await.unwrap_err();
    assert!(matches!(err, FeedError::ParseError(_)), "{:?}", err);
}

#[tokio::test]
async fn test_server_errors_are_network_errors() {
    for status in [429u16, 500, 503, 404] {
        let (url, _) = serve(Arc::new(move |_: u32| (status, r#"{"detail": "nope"}"#.to_string()))).await;
        let err = client(&url).fetch_page(page(1)).await.unwrap_err();
        assert!(matches!(err, FeedError::NetworkError(_)), "status {}: {:?}", status, err);
    }
}

#[tokio::test]
async fn test_unreachable_feed_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}/jobs", addr))
        .fetch_page(page(1))
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::NetworkError(_)), "{:?}", err);
}

#[tokio::test]
async fn test_timeout_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept and never answer
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let feed = FeedClient::new(format!("http://{}/jobs", addr), Duration::from_millis(200)).unwrap();
    let err = feed.fetch_page(page(1)).await.unwrap_err();
    assert!(matches!(err, FeedError::NetworkError(_)), "{:?}", err);
}

#[test]
fn test_from_settings_uses_configured_url() {
    let settings = FeedSettings {
        base_url: "http://localhost:9/jobs".to_string(),
        timeout_secs: 3,
    };
    let feed = FeedClient::from_settings(&settings).unwrap();
    assert_eq!(feed.base_url(), "http://localhost:9/jobs");
}
