//! CLI subcommands

pub mod run;
pub mod scan;

use std::sync::Arc;

use anyhow::{Context, Result};
use medialift_google::client::ApiClient;

/// Environment variable carrying the OAuth access token.
const TOKEN_ENV: &str = "MEDIALIFT_ACCESS_TOKEN";

/// Builds the shared API client from the environment.
pub(crate) fn api_client_from_env() -> Result<Arc<ApiClient>> {
    let token = std::env::var(TOKEN_ENV)
        .with_context(|| format!("{TOKEN_ENV} is not set; export a valid OAuth access token"))?;
    Ok(Arc::new(ApiClient::new(token)))
}
