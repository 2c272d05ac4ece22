use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(pub String);

impl FlowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two flow list tabs. Publishing is one-way: a flow only ever moves
/// from `Draft` to `Published`, never back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowTab {
    #[default]
    Published,
    Draft,
}

impl FlowTab {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowTab::Published => "published",
            FlowTab::Draft => "draft",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "published" => Some(FlowTab::Published),
            "draft" => Some(FlowTab::Draft),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            FlowTab::Published => FlowTab::Draft,
            FlowTab::Draft => FlowTab::Published,
        }
    }
}

impl std::fmt::Display for FlowTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical flow record. The backend is the owner; the console only caches
/// the per-tab list for the current view and re-fetches on tab switch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub id: FlowId,
    pub name: String,
    pub is_published: bool,
    pub created_at: String,

    #[serde(default)]
    pub updated_at: Option<String>,
}
