//! Shared test helpers for the adapter integration tests
//!
//! Provides wiremock-based mock server setup. Each helper returns a
//! `(MockServer, adapter)` pair with the adapter's base URLs pointed at
//! the mock server.

use std::sync::Arc;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medialift_google::client::ApiClient;
use medialift_google::drive::DriveStore;
use medialift_google::sheets::SheetAudit;
use medialift_google::youtube::TubePublisher;

pub fn api_client() -> Arc<ApiClient> {
    Arc::new(ApiClient::new("test-access-token"))
}

/// A store adapter pointed at a fresh mock server.
pub async fn drive_store(chunk_size: u64) -> (MockServer, DriveStore) {
    let server = MockServer::start().await;
    let store = DriveStore::with_base_urls(api_client(), server.uri(), server.uri())
        .with_chunk_size(chunk_size);
    (server, store)
}

/// A publish adapter pointed at a fresh mock server.
pub async fn tube_publisher(chunk_size: u64) -> (MockServer, TubePublisher) {
    let server = MockServer::start().await;
    let publisher = TubePublisher::with_base_urls(api_client(), server.uri(), server.uri())
        .with_chunk_size(chunk_size);
    (server, publisher)
}

/// An audit sink adapter pointed at a fresh mock server.
pub async fn sheet_audit(spreadsheet_id: &str) -> (MockServer, SheetAudit) {
    let server = MockServer::start().await;
    let sink = SheetAudit::with_base_url(api_client(), server.uri(), spreadsheet_id);
    (server, sink)
}

/// Mounts the channel lookup for the authenticated user, resolving to the
/// given uploads playlist.
pub async fn mount_own_channel(server: &MockServer, uploads_playlist: &str) {
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("mine", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "contentDetails": {
                    "relatedPlaylists": {"uploads": uploads_playlist}
                }
            }]
        })))
        .mount(server)
        .await;
}
