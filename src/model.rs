mod campaign;
mod flow;
mod normalize;
mod progress;

pub use self::campaign::{CampaignId, CampaignRef, UsageReport};
pub use self::flow::{FlowDefinition, FlowId, FlowTab};
pub use self::normalize::{
    ShapeError, campaign_from_value, campaigns_from_conflict, flow_from_value, flows_from_value,
    server_message, snapshot_from_value, usage_from_value,
};
pub use self::progress::{HistoryPoint, ProgressSnapshot, resolved_pct};

/// Current UTC time as an RFC 3339 string, the wire/display timestamp format
/// used throughout the console.
pub fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}
