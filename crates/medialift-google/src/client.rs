//! Shared authenticated HTTP client
//!
//! Wraps `reqwest::Client` with the bearer token used by every adapter.
//! One instance is created per batch and shared; its lifetime is owned by
//! whoever wires the adapters together.

use reqwest::{Client, Method, RequestBuilder};

use medialift_core::ports::transfer::ChunkError;

/// Authenticated HTTP client shared by the Drive, YouTube and Sheets
/// adapters.
pub struct ApiClient {
    http: Client,
    access_token: String,
}

impl ApiClient {
    /// Creates a client around the given OAuth2 access token.
    ///
    /// Token acquisition and refresh happen outside this crate; the token
    /// is expected to outlive the batch.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            access_token: access_token.into(),
        }
    }

    /// Creates an authenticated request builder for an absolute URL.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(&self.access_token)
    }

    /// Returns the underlying HTTP client, for requests against absolute
    /// session URLs that manage their own auth headers.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Returns the current access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// Maps a reqwest transport failure into the port-level chunk error.
pub(crate) fn chunk_error_from_reqwest(err: reqwest::Error) -> ChunkError {
    if err.is_timeout() {
        ChunkError::timeout(err.to_string())
    } else if err.is_connect() {
        ChunkError::connection(err.to_string())
    } else {
        ChunkError::other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_carries_the_bearer_token() {
        let client = ApiClient::new("test-token");
        let request = client
            .request(Method::GET, "http://localhost:8080/files")
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:8080/files");
        let auth = request
            .headers()
            .get("authorization")
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(auth, "Bearer test-token");
    }

    #[test]
    fn access_token_is_exposed_for_session_requests() {
        let client = ApiClient::new("abc");
        assert_eq!(client.access_token(), "abc");
    }
}
