use serde_json::Value;

use super::RemoteClient;
use super::types::{ApiError, ApiResult};
use crate::model::{self, CampaignId, ProgressSnapshot};

impl RemoteClient {
    pub fn campaign_progress(&self, id: &CampaignId) -> ApiResult<ProgressSnapshot> {
        let resp = self
            .client
            .get(self.url(&format!("/campaigns/{}/progress", id)))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .map_err(|e| ApiError::network(e, "get campaign progress"))?;
        let body: Value = self
            .classify(resp, "get campaign progress")?
            .json()
            .map_err(|e| ApiError::network(e, "read campaign progress"))?;
        Ok(model::snapshot_from_value(&body, crate::model::now_ts())?)
    }
}
