use reqwest::StatusCode;
use serde_json::Value;

use super::types::{ApiError, ApiResult};
use super::RemoteClient;
use crate::model::{
    self, FlowDefinition, FlowId, FlowTab, UsageReport, campaigns_from_conflict, server_message,
};

impl RemoteClient {
    /// Map a non-2xx response into the error taxonomy. 409 bodies are parsed
    /// for a verbatim message and the attached-campaign list.
    pub(super) fn classify(
        &self,
        resp: reqwest::blocking::Response,
        label: &'static str,
    ) -> ApiResult<reqwest::blocking::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        let body: Value = resp.json().unwrap_or(Value::Null);
        if status == StatusCode::CONFLICT {
            return Err(ApiError::Conflict {
                message: server_message(&body)
                    .unwrap_or_else(|| format!("{}: conflict", label)),
                campaigns: campaigns_from_conflict(&body),
            });
        }
        Err(ApiError::Server {
            status: status.as_u16(),
            message: server_message(&body).unwrap_or_else(|| label.to_string()),
        })
    }

    pub fn list_flows(&self, tab: FlowTab) -> ApiResult<Vec<FlowDefinition>> {
        let resp = self
            .client
            .get(self.url(&format!("/flows?tab={}", tab.as_str())))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .map_err(|e| ApiError::network(e, "list flows"))?;
        let body: Value = self
            .classify(resp, "list flows")?
            .json()
            .map_err(|e| ApiError::network(e, "read flow list"))?;
        Ok(model::flows_from_value(&body)?)
    }

    /// Fetch the usage report for a flow. Ephemeral; callers must not cache
    /// it across delete attempts.
    pub fn flow_usage(&self, id: &FlowId) -> ApiResult<UsageReport> {
        let resp = self
            .client
            .get(self.url(&format!("/flows/{}/usage", id)))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .map_err(|e| ApiError::network(e, "get flow usage"))?;
        let body: Value = self
            .classify(resp, "get flow usage")?
            .json()
            .map_err(|e| ApiError::network(e, "read flow usage"))?;
        Ok(model::usage_from_value(&body)?)
    }

    pub fn publish_flow(&self, id: &FlowId) -> ApiResult<()> {
        let resp = self
            .client
            .post(self.url(&format!("/flows/{}/publish", id)))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .map_err(|e| ApiError::network(e, "publish flow"))?;
        self.classify(resp, "publish flow")?;
        Ok(())
    }

    /// Force-delete a flow. Only ever called after a fresh usage check and a
    /// satisfied local confirmation gate.
    pub fn delete_flow(&self, id: &FlowId) -> ApiResult<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/flows/{}?force=true", id)))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .map_err(|e| ApiError::network(e, "delete flow"))?;
        self.classify(resp, "delete flow")?;
        Ok(())
    }
}
