//! Integration tests for the Drive-shaped store adapter
//!
//! Covers folder listings with pagination, Range-based chunked downloads,
//! metadata patches (rename/move), deletion, container creation and label
//! resolution.

use medialift_core::ports::store_provider::{IMediaDownload, IStoreProvider, MetadataPatch};
use medialift_core::ports::transfer::ChunkErrorKind;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

// ============================================================================
// Listing tests
// ============================================================================

#[tokio::test]
async fn list_children_maps_files_and_folders() {
    let (server, store) = common::drive_store(1024).await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("q", "'root-1' in parents and trashed=false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                {
                    "id": "file-1",
                    "name": "clip.mp4",
                    "mimeType": "video/mp4",
                    "size": "2048",
                    "description": "festival cut",
                    "properties": {"season": "2"},
                    "labelInfo": {"labels": [{"id": "label-7"}]}
                },
                {
                    "id": "folder-1",
                    "name": "Season 2",
                    "mimeType": "application/vnd.google-apps.folder"
                }
            ]
        })))
        .mount(&server)
        .await;

    let page = store.list_children("root-1", None).await.unwrap();

    assert_eq!(page.nodes.len(), 2);
    assert!(page.next_cursor.is_none());

    let file = &page.nodes[0];
    assert_eq!(file.id, "file-1");
    assert_eq!(file.size, Some(2048));
    assert!(!file.is_container);
    assert_eq!(file.label_refs, vec!["label-7"]);

    assert!(page.nodes[1].is_container);
}

#[tokio::test]
async fn list_children_passes_the_page_cursor() {
    let (server, store) = common::drive_store(1024).await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [{"id": "file-2", "name": "b.mp4", "mimeType": "video/mp4"}],
            "nextPageToken": "page-3"
        })))
        .mount(&server)
        .await;

    let page = store.list_children("root-1", Some("page-2")).await.unwrap();
    assert_eq!(page.nodes.len(), 1);
    assert_eq!(page.next_cursor.as_deref(), Some("page-3"));
}

#[tokio::test]
async fn list_children_propagates_permission_errors() {
    let (server, store) = common::drive_store(1024).await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "insufficient permissions"}
        })))
        .mount(&server)
        .await;

    assert!(store.list_children("locked", None).await.is_err());
}

// ============================================================================
// Chunked download tests
// ============================================================================

#[tokio::test]
async fn download_fetches_the_file_in_range_chunks() {
    let (server, store) = common::drive_store(4).await;

    let ranges = [
        ("bytes=0-3", "0123", "bytes 0-3/10"),
        ("bytes=4-7", "4567", "bytes 4-7/10"),
        ("bytes=8-11", "89", "bytes 8-9/10"),
    ];
    for (range, body, content_range) in ranges {
        Mock::given(method("GET"))
            .and(path("/files/file-1"))
            .and(query_param("alt", "media"))
            .and(header("Range", range))
            .respond_with(
                ResponseTemplate::new(206)
                    .set_body_bytes(body.as_bytes().to_vec())
                    .insert_header("Content-Range", content_range),
            )
            .mount(&server)
            .await;
    }

    let mut download = store.open_download("file-1").await.unwrap();

    let first = download.next_chunk().await.unwrap();
    assert_eq!(first.data, b"0123");
    assert_eq!(first.bytes_confirmed, 4);
    assert_eq!(first.total, Some(10));
    assert!(!first.done);

    let second = download.next_chunk().await.unwrap();
    assert_eq!(second.bytes_confirmed, 8);
    assert!(!second.done);

    let third = download.next_chunk().await.unwrap();
    assert_eq!(third.data, b"89");
    assert_eq!(third.bytes_confirmed, 10);
    assert!(third.done);
}

#[tokio::test]
async fn download_handles_a_full_body_response() {
    let (server, store) = common::drive_store(1024).await;

    // server ignores the Range header and sends everything
    Mock::given(method("GET"))
        .and(path("/files/small-1"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tiny".to_vec()))
        .mount(&server)
        .await;

    let mut download = store.open_download("small-1").await.unwrap();
    let chunk = download.next_chunk().await.unwrap();
    assert_eq!(chunk.data, b"tiny");
    assert_eq!(chunk.total, Some(4));
    assert!(chunk.done);
}

#[tokio::test]
async fn download_surfaces_http_errors_as_chunk_errors() {
    let (server, store) = common::drive_store(1024).await;

    Mock::given(method("GET"))
        .and(path("/files/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut download = store.open_download("missing").await.unwrap();
    let err = download.next_chunk().await.unwrap_err();
    assert_eq!(err.kind, ChunkErrorKind::Http(404));
}

// ============================================================================
// Metadata and mutation tests
// ============================================================================

#[tokio::test]
async fn rename_patches_only_the_name() {
    let (server, store) = common::drive_store(1024).await;

    Mock::given(method("PATCH"))
        .and(path("/files/file-1"))
        .and(body_json(serde_json::json!({"name": "xyz.mp4"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "file-1", "name": "xyz.mp4"
        })))
        .expect(1)
        .mount(&server)
        .await;

    store
        .update_metadata("file-1", &MetadataPatch::rename("xyz.mp4"))
        .await
        .unwrap();
}

#[tokio::test]
async fn move_swaps_the_parents() {
    let (server, store) = common::drive_store(1024).await;

    Mock::given(method("GET"))
        .and(path("/files/file-1"))
        .and(query_param("fields", "parents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "parents": ["old-folder"]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/files/file-1"))
        .and(query_param("addParents", "done-folder"))
        .and(query_param("removeParents", "old-folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "file-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    store
        .update_metadata("file-1", &MetadataPatch::move_to("done-folder"))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_issues_a_delete_request() {
    let (server, store) = common::drive_store(1024).await;

    Mock::given(method("DELETE"))
        .and(path("/files/file-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store.delete_node("file-1").await.unwrap();
}

#[tokio::test]
async fn create_container_returns_the_new_id() {
    let (server, store) = common::drive_store(1024).await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_json(serde_json::json!({
            "name": "Completed",
            "mimeType": "application/vnd.google-apps.folder",
            "parents": ["root-1"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "folder-new"
        })))
        .mount(&server)
        .await;

    let id = store.create_container("Completed", "root-1").await.unwrap();
    assert_eq!(id, "folder-new");
}

// ============================================================================
// Label tests
// ============================================================================

#[tokio::test]
async fn list_labels_follows_pages_and_maps_titles() {
    let (server, store) = common::drive_store(1024).await;

    Mock::given(method("GET"))
        .and(path("/labels"))
        .and(query_param("publishedOnly", "true"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "labels": [{"id": "label-2", "properties": {"title": "Interviews"}}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/labels"))
        .and(query_param("publishedOnly", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "labels": [
                {"id": "label-1", "properties": {"title": "Archive Reel"}},
                {"id": "label-untitled"}
            ],
            "nextPageToken": "page-2"
        })))
        .mount(&server)
        .await;

    let labels = store.list_labels().await.unwrap();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels.get("label-1").map(String::as_str), Some("Archive Reel"));
    assert_eq!(labels.get("label-2").map(String::as_str), Some("Interviews"));
}
