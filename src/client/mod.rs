//! HTTP client for the gotLocks backend
//!
//! The backend owns odds validation, persistence and grading. This module
//! only builds requests and maps failures into [`PickError`].

pub mod odds;
pub mod picks;


pub use odds::{FallbackOdds, HttpOddsSource, LegQuery, OddsSource, Quote};
pub use picks::{PicksClient, SubmitResponse};

use crate::config::ApiConfig;
use crate::error::{PickError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Shared HTTP plumbing: base URL, bearer token and status handling
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST `body` as JSON and decode a JSON reply. Non-2xx statuses become
    /// [`PickError::Api`] with the response body passed through.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let mut request = self.http.post(&url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        debug!(%url, status = status.as_u16(), "backend response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PickError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }
}
