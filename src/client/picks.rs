//! Pick submission

use super::ApiClient;
use crate::error::Result;
use crate::slip::PickSubmission;
use serde::Deserialize;
use tracing::info;

/// Backend acknowledgement for a submitted pick
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct PicksClient {
    api: ApiClient,
}

impl PicksClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn submit(&self, pick: &PickSubmission) -> Result<SubmitResponse> {
        let resp: SubmitResponse = self.api.post_json("picks", pick).await?;
        info!(
            pick = %pick.id,
            success = resp.success,
            backend_id = resp.id.as_deref().unwrap_or("-"),
            "pick submitted"
        );
        Ok(resp)
    }
}
