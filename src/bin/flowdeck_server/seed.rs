use serde::{Deserialize, Serialize};

pub(crate) fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}

fn mint_id(prefix: &str) -> String {
    let mut bytes = [0u8; 4];
    getrandom::getrandom(&mut bytes).expect("os rng");
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}-{}", prefix, hex)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct FlowRec {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) published: bool,
    /// Publishing a flow with zero steps is a business-rule violation (409).
    pub(crate) steps: u32,
    pub(crate) created_at: String,
    #[serde(default)]
    pub(crate) updated_at: Option<String>,
}

/// Which field-name convention the progress endpoint answers in. The real
/// backend has shipped both; the console's normalizer must accept either.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WireStyle {
    #[default]
    Snake,
    Camel,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct ProgressRec {
    pub(crate) total: u64,
    pub(crate) completed: u64,
    pub(crate) failed: u64,
    pub(crate) dead: u64,
    pub(crate) in_flight: u64,
    pub(crate) p50_ms: u64,
    pub(crate) p95_ms: u64,
    pub(crate) p99_ms: u64,
    /// Jobs that complete per progress request, so polls observe movement.
    #[serde(default)]
    pub(crate) step: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct CampaignRec {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) status: String,
    /// Flow this campaign is attached to; blocks that flow's deletion.
    #[serde(default)]
    pub(crate) flow_id: Option<String>,
    pub(crate) created_at: String,
    #[serde(default)]
    pub(crate) created_by: Option<String>,
    #[serde(default)]
    pub(crate) scheduled_at: Option<String>,
    #[serde(default)]
    pub(crate) first_sent_at: Option<String>,
    pub(crate) progress: ProgressRec,
    #[serde(default)]
    pub(crate) wire: WireStyle,
    /// Test knob: hold every progress request for this campaign open.
    #[serde(default)]
    pub(crate) delay_ms: Option<u64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct Seed {
    pub(crate) flows: Vec<FlowRec>,
    pub(crate) campaigns: Vec<CampaignRec>,
}

impl Seed {
    pub(crate) fn default_fixtures() -> Self {
        let ts = now_ts();
        let welcome = mint_id("f");
        let cart = mint_id("f");
        Seed {
            flows: vec![
                FlowRec {
                    id: welcome.clone(),
                    name: "Welcome Flow".to_string(),
                    published: true,
                    steps: 4,
                    created_at: ts.clone(),
                    updated_at: None,
                },
                FlowRec {
                    id: cart,
                    name: "Abandoned Cart".to_string(),
                    published: false,
                    steps: 2,
                    created_at: ts.clone(),
                    updated_at: None,
                },
                FlowRec {
                    id: mint_id("f"),
                    name: "Empty Draft".to_string(),
                    published: false,
                    steps: 0,
                    created_at: ts.clone(),
                    updated_at: None,
                },
            ],
            campaigns: vec![CampaignRec {
                id: mint_id("c"),
                name: "Spring Promo".to_string(),
                status: "Running".to_string(),
                flow_id: Some(welcome),
                created_at: ts.clone(),
                created_by: Some("ops@example.com".to_string()),
                scheduled_at: Some(ts.clone()),
                first_sent_at: Some(ts),
                progress: ProgressRec {
                    total: 1000,
                    completed: 120,
                    failed: 3,
                    dead: 0,
                    in_flight: 25,
                    p50_ms: 140,
                    p95_ms: 900,
                    p99_ms: 2100,
                    step: 40,
                },
                wire: WireStyle::Snake,
                delay_ms: None,
            }],
        }
    }
}
