use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

impl CampaignId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A campaign that references ("is attached to") a flow. Shown in the
/// attached-mode modal so the operator can see what blocks a delete.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignRef {
    pub id: CampaignId,
    pub name: String,
    pub status: String,

    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub first_sent_at: Option<String>,
}

/// Server-computed answer to "can this flow be deleted right now". Fetched
/// fresh on every delete attempt and never cached; a 409 on the delete call
/// itself carries the authoritative replacement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsageReport {
    pub can_delete: bool,
    pub campaigns: Vec<CampaignRef>,
}
