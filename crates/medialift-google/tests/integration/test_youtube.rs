//! Integration tests for the YouTube-shaped publish adapter
//!
//! Covers catalog enumeration through the uploads playlist and the
//! resumable upload protocol, including resume-after-failure behavior:
//! acknowledged bytes are never re-sent.

use medialift_core::ports::publish_provider::{IPublishProvider, IUploadSession, UploadMetadata};
use medialift_core::ports::transfer::{ChunkErrorKind, ChunkStatus};
use wiremock::matchers::{body_bytes, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

fn metadata(title: &str) -> UploadMetadata {
    UploadMetadata {
        title: title.to_string(),
        description: "uploaded by medialift".to_string(),
        tags: vec!["festival".to_string()],
        made_for_kids: false,
    }
}

/// Writes a scratch file and returns its directory handle plus path.
async fn scratch_file(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.mp4");
    tokio::fs::write(&path, content).await.unwrap();
    (dir, path)
}

// ============================================================================
// Catalog tests
// ============================================================================

#[tokio::test]
async fn catalog_lists_the_own_channel_uploads() {
    let (server, publisher) = common::tube_publisher(1024).await;
    common::mount_own_channel(&server, "UU-own").await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UU-own"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {"snippet": {"title": "A", "resourceId": {"videoId": "A"}}},
                {"snippet": {"title": "Old clip", "resourceId": {"videoId": "vid-old"}}}
            ]
        })))
        .mount(&server)
        .await;

    let page = publisher.list_catalog(None, None).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].publish_id, "A");
    assert_eq!(page.items[1].title, "Old clip");
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn catalog_pages_come_from_the_same_playlist() {
    let (server, publisher) = common::tube_publisher(1024).await;
    common::mount_own_channel(&server, "UU-own").await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{"snippet": {"title": "B", "resourceId": {"videoId": "B"}}}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{"snippet": {"title": "A", "resourceId": {"videoId": "A"}}}],
            "nextPageToken": "page-2"
        })))
        .mount(&server)
        .await;

    let first = publisher.list_catalog(None, None).await.unwrap();
    assert_eq!(first.next_cursor.as_deref(), Some("page-2"));

    let second = publisher
        .list_catalog(None, first.next_cursor.as_deref())
        .await
        .unwrap();
    assert_eq!(second.items[0].publish_id, "B");
    assert!(second.next_cursor.is_none());

    // channel resolution happened exactly once across both pages
    let channel_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/channels")
        .count();
    assert_eq!(channel_calls, 1);
}

#[tokio::test]
async fn catalog_uses_the_configured_channel_id() {
    let (server, publisher) = common::tube_publisher(1024).await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "chan-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "contentDetails": {"relatedPlaylists": {"uploads": "UU-42"}}
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UU-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": []
        })))
        .mount(&server)
        .await;

    let page = publisher.list_catalog(Some("chan-42"), None).await.unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn missing_channel_is_an_error() {
    let (server, publisher) = common::tube_publisher(1024).await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": []
        })))
        .mount(&server)
        .await;

    assert!(publisher.list_catalog(None, None).await.is_err());
}

// ============================================================================
// Resumable upload tests
// ============================================================================

/// Mounts the session initiation endpoint, pointing the session URL back
/// at the mock server.
async fn mount_initiation(server: &wiremock::MockServer) {
    Mock::given(method("POST"))
        .and(path("/videos"))
        .and(query_param("uploadType", "resumable"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Location", format!("{}/upload-session/abc", server.uri()).as_str()),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn upload_sends_each_byte_exactly_once() {
    let (server, publisher) = common::tube_publisher(4).await;
    mount_initiation(&server).await;

    // three chunks of a 10-byte file, each byte range sent exactly once
    Mock::given(method("PUT"))
        .and(path("/upload-session/abc"))
        .and(header("Content-Range", "bytes 0-3/10"))
        .and(body_bytes(b"0123".to_vec()))
        .respond_with(ResponseTemplate::new(308).insert_header("Range", "bytes=0-3"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload-session/abc"))
        .and(header("Content-Range", "bytes 4-7/10"))
        .and(body_bytes(b"4567".to_vec()))
        .respond_with(ResponseTemplate::new(308).insert_header("Range", "bytes=0-7"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload-session/abc"))
        .and(header("Content-Range", "bytes 8-9/10"))
        .and(body_bytes(b"89".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "xyz",
            "snippet": {"title": "clip"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, file) = scratch_file(b"0123456789").await;
    let mut session = publisher.begin_upload(&file, &metadata("clip")).await.unwrap();

    match session.send_chunk().await.unwrap() {
        ChunkStatus::Progress(fraction) => assert!((fraction - 0.4).abs() < 1e-9),
        other => panic!("expected progress, got {other:?}"),
    }
    match session.send_chunk().await.unwrap() {
        ChunkStatus::Progress(fraction) => assert!((fraction - 0.8).abs() < 1e-9),
        other => panic!("expected progress, got {other:?}"),
    }
    match session.send_chunk().await.unwrap() {
        ChunkStatus::Complete(body) => assert_eq!(body["id"], "xyz"),
        other => panic!("expected terminal response, got {other:?}"),
    }
}

#[tokio::test]
async fn upload_resumes_from_the_acknowledged_offset_after_a_failure() {
    let (server, publisher) = common::tube_publisher(4).await;
    mount_initiation(&server).await;

    Mock::given(method("PUT"))
        .and(path("/upload-session/abc"))
        .and(header("Content-Range", "bytes 0-3/10"))
        .respond_with(ResponseTemplate::new(308).insert_header("Range", "bytes=0-3"))
        .mount(&server)
        .await;
    // the second chunk fails once, then succeeds on the re-send
    Mock::given(method("PUT"))
        .and(path("/upload-session/abc"))
        .and(header("Content-Range", "bytes 4-7/10"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload-session/abc"))
        .and(header("Content-Range", "bytes 4-7/10"))
        .and(body_bytes(b"4567".to_vec()))
        .respond_with(ResponseTemplate::new(308).insert_header("Range", "bytes=0-7"))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, file) = scratch_file(b"0123456789").await;
    let mut session = publisher.begin_upload(&file, &metadata("clip")).await.unwrap();

    assert!(matches!(
        session.send_chunk().await.unwrap(),
        ChunkStatus::Progress(_)
    ));

    // transient failure: the confirmed offset stays at 4
    let err = session.send_chunk().await.unwrap_err();
    assert_eq!(err.kind, ChunkErrorKind::Http(503));

    // the re-sent chunk starts at byte 4, not byte 0
    match session.send_chunk().await.unwrap() {
        ChunkStatus::Progress(fraction) => assert!((fraction - 0.8).abs() < 1e-9),
        other => panic!("expected progress, got {other:?}"),
    }
}

#[tokio::test]
async fn a_308_without_a_range_header_keeps_the_offset() {
    let (server, publisher) = common::tube_publisher(4).await;
    mount_initiation(&server).await;

    Mock::given(method("PUT"))
        .and(path("/upload-session/abc"))
        .respond_with(ResponseTemplate::new(308))
        .mount(&server)
        .await;

    let (_dir, file) = scratch_file(b"0123456789").await;
    let mut session = publisher.begin_upload(&file, &metadata("clip")).await.unwrap();

    match session.send_chunk().await.unwrap() {
        ChunkStatus::Progress(fraction) => assert_eq!(fraction, 0.0),
        other => panic!("expected progress, got {other:?}"),
    }
}

#[tokio::test]
async fn initiation_without_a_session_url_is_an_error() {
    let (server, publisher) = common::tube_publisher(4).await;

    Mock::given(method("POST"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let (_dir, file) = scratch_file(b"0123456789").await;
    let err = publisher
        .begin_upload(&file, &metadata("clip"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Location"));
}

#[tokio::test]
async fn empty_files_are_rejected_before_initiation() {
    let (_server, publisher) = common::tube_publisher(4).await;

    let (_dir, file) = scratch_file(b"").await;
    assert!(publisher.begin_upload(&file, &metadata("clip")).await.is_err());
}

#[tokio::test]
async fn watch_url_points_at_the_published_item() {
    let (_server, publisher) = common::tube_publisher(4).await;
    assert_eq!(
        publisher.watch_url("xyz"),
        "https://www.youtube.com/watch?v=xyz"
    );
}
