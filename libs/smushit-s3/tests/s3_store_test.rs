//! Integration tests for the S3 object store
//!
//! Presigning is pure computation and runs offline with static credentials.
//! Uploads go to a wiremock server standing in for an S3-compatible endpoint.

use aws_sdk_s3::config::{
    retry::RetryConfig, BehaviorVersion, Credentials, Region,
};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{Duration as ChronoDuration, Utc};
use smushit_domain::ports::{ObjectStore, ObjectUpload, ObjectVisibility};
use smushit_domain::StorageError;
use smushit_s3::infrastructure::S3ObjectStore;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(endpoint: Option<&str>) -> Client {
    let mut builder = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .retry_config(RetryConfig::disabled());
    if let Some(endpoint) = endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }
    Client::from_conf(builder.build())
}

fn upload(key: &str) -> ObjectUpload {
    ObjectUpload {
        key: key.to_string(),
        body: Bytes::from_static(b"PK\x03\x04archive"),
        content_type: "application/zip".to_string(),
        content_disposition: "attachment".to_string(),
        visibility: ObjectVisibility::Private,
        expires: Utc::now() + ChronoDuration::days(1),
    }
}

#[tokio::test]
async fn test_presign_produces_signed_time_limited_url() {
    let store = S3ObjectStore::new(test_client(None), "smushit");

    let url = store
        .presign_get("abc123/photos.zip", Duration::from_secs(24 * 60 * 60))
        .await
        .expect("presign");

    assert!(url.starts_with("https://"));
    assert!(url.contains("smushit"));
    assert!(url.contains("abc123/photos.zip"));
    assert!(url.contains("X-Amz-Expires=86400"));
    assert!(url.contains("X-Amz-Signature="));
}

#[tokio::test]
async fn test_presign_with_custom_endpoint_uses_path_style() {
    let store = S3ObjectStore::new(test_client(Some("http://localhost:9000")), "smushit");

    let url = store
        .presign_get("ns/a.zip", Duration::from_secs(60))
        .await
        .unwrap();

    assert!(url.starts_with("http://localhost:9000/smushit/ns/a.zip?"));
}

#[tokio::test]
async fn test_presign_rejects_lifetime_over_a_week() {
    let store = S3ObjectStore::new(test_client(None), "smushit");

    let result = store
        .presign_get("ns/a.zip", Duration::from_secs(8 * 24 * 60 * 60))
        .await;

    assert!(matches!(result, Err(StorageError::Signing(_))));
}

#[tokio::test]
async fn test_put_object_sends_private_attachment() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/smushit/ns/photos.zip"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let store = S3ObjectStore::new(test_client(Some(&server.uri())), "smushit");
    store.put_object(upload("ns/photos.zip")).await.expect("upload");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    let header = |name: &str| headers.get(name).map(|v| v.to_str().unwrap().to_string());

    assert_eq!(header("content-type").as_deref(), Some("application/zip"));
    assert_eq!(header("content-disposition").as_deref(), Some("attachment"));
    assert_eq!(header("x-amz-acl").as_deref(), Some("private"));
    assert!(header("expires").is_some());
}

#[tokio::test]
async fn test_rejected_upload_is_upload_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>",
        ))
        .mount(&server)
        .await;

    let store = S3ObjectStore::new(test_client(Some(&server.uri())), "smushit");
    let result = store.put_object(upload("ns/denied.zip")).await;

    match result {
        Err(StorageError::Upload(msg)) => assert!(msg.contains("ns/denied.zip")),
        other => panic!("expected upload error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_session_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = format!("http://{}", addr);
    let store = S3ObjectStore::new(test_client(Some(&endpoint)), "smushit");
    let result = store.put_object(upload("ns/offline.zip")).await;

    assert!(matches!(result, Err(StorageError::Session(_))));
}
