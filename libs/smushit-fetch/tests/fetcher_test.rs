//! Integration tests for the HTTP fetcher
//!
//! These tests verify that:
//! 1. An extension in the URL path is kept regardless of the body
//! 2. Extension-less URLs get an extension from the sniffed content type
//! 3. Unrecognized content keeps no extension
//! 4. Non-2xx statuses and transport errors become failed results
//! 5. Scratch names are stable per URL

use smushit_domain::batch::FetchError;
use smushit_domain::content::scratch_base_name;
use smushit_domain::ports::ResourceFetcher;
use smushit_fetch::{FetcherConfig, HttpFetcher, DEFAULT_USER_AGENT};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xff\xff\xff\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";
const UNKNOWN: &[u8] = &[0x00, 0x13, 0x37, 0x00, 0xBE, 0xEF];

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(FetcherConfig::default()).expect("Failed to build fetcher")
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

async fn serve(server: &MockServer, route: &str, status: u16, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// A URL ending in .png keeps .png even when the body is a GIF
#[tokio::test]
async fn test_url_extension_wins_over_sniffed_type() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    serve(&server, "/images/a.png", 200, GIF).await;

    let url = format!("{}/images/a.png", server.uri());
    let result = fetcher().fetch(&url, dir.path()).await;

    assert!(result.is_success(), "fetch failed: {:?}", result.error());
    let local = result.local_path().unwrap();
    assert_eq!(file_name(local), format!("{}.png", scratch_base_name(&url)));
    assert_eq!(std::fs::read(local).unwrap(), GIF);
}

/// An extension-less URL serving GIF bytes ends up as .gif
#[tokio::test]
async fn test_sniffed_gif_gets_gif_extension() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    serve(&server, "/b", 200, GIF).await;

    let url = format!("{}/b", server.uri());
    let result = fetcher().fetch(&url, dir.path()).await;

    assert!(result.is_success());
    let local = result.local_path().unwrap();
    assert_eq!(file_name(local), format!("{}.gif", scratch_base_name(&url)));
    assert!(local.exists());
    // The extension-less staging file was renamed, not copied
    assert!(!dir.path().join(scratch_base_name(&url)).exists());
}

/// Unrecognized content keeps no extension at all
#[tokio::test]
async fn test_unknown_content_has_no_extension() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    serve(&server, "/blob", 200, UNKNOWN).await;

    let url = format!("{}/blob", server.uri());
    let result = fetcher().fetch(&url, dir.path()).await;

    assert!(result.is_success());
    assert_eq!(file_name(result.local_path().unwrap()), scratch_base_name(&url));
}

/// The query string does not hide the path's extension
#[tokio::test]
async fn test_query_string_is_ignored_for_extension() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    serve(&server, "/song.mp3", 200, UNKNOWN).await;

    let url = format!("{}/song.mp3?download=1", server.uri());
    let result = fetcher().fetch(&url, dir.path()).await;

    assert!(result.is_success());
    assert!(file_name(result.local_path().unwrap()).ends_with(".mp3"));
}

/// A non-2xx status is a failed result and writes nothing
#[tokio::test]
async fn test_non_success_status_fails() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    serve(&server, "/missing", 404, b"not found").await;

    let url = format!("{}/missing", server.uri());
    let result = fetcher().fetch(&url, dir.path()).await;

    assert!(!result.is_success());
    assert_eq!(result.source_url(), url);
    assert_eq!(result.error(), Some(&FetchError::status(404)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// A refused connection is a transport failure
#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{}/gone", addr);
    let result = fetcher().fetch(&url, dir.path()).await;

    assert!(matches!(result.error(), Some(FetchError::Transport(_))));
}

/// Requests identify with the configured browser-like user agent
#[tokio::test]
async fn test_sends_browser_user_agent() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    serve(&server, "/ua.gif", 200, GIF).await;

    let url = format!("{}/ua.gif", server.uri());
    let result = fetcher().fetch(&url, dir.path()).await;
    assert!(result.is_success());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let user_agent = requests[0]
        .headers
        .get("user-agent")
        .expect("user-agent header sent")
        .to_str()
        .unwrap();
    assert_eq!(user_agent, DEFAULT_USER_AGENT);
}

/// Bodies larger than the sniff window are written in full
#[tokio::test]
async fn test_large_body_is_streamed_completely() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let mut body = GIF.to_vec();
    body.extend(std::iter::repeat(0xAB).take(256 * 1024));
    serve(&server, "/big", 200, &body).await;

    let url = format!("{}/big", server.uri());
    let result = fetcher().fetch(&url, dir.path()).await;

    assert!(result.is_success());
    let local = result.local_path().unwrap();
    assert!(file_name(local).ends_with(".gif"));
    assert_eq!(std::fs::metadata(local).unwrap().len(), body.len() as u64);
}

/// Re-fetching a URL lands on the same scratch file
#[tokio::test]
async fn test_refetch_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    serve(&server, "/again", 200, GIF).await;

    let fetcher = fetcher();
    let url = format!("{}/again", server.uri());
    let first = fetcher.fetch(&url, dir.path()).await;
    let second = fetcher.fetch(&url, dir.path()).await;

    assert_eq!(first.local_path(), second.local_path());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

/// The scratch directory is created on demand
#[tokio::test]
async fn test_missing_scratch_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = dir.path().join("nested").join("scratch");
    let server = MockServer::start().await;
    serve(&server, "/x.gif", 200, GIF).await;

    let result = fetcher()
        .fetch(&format!("{}/x.gif", server.uri()), &scratch)
        .await;

    assert!(result.is_success());
    assert!(result.local_path().unwrap().starts_with(&scratch));
}
