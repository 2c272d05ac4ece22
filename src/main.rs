use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use flowdeck::linkstate::LinkState;
use flowdeck::model::FlowTab;
use flowdeck::remote::RemoteClient;
use flowdeck::session::{self, SessionConfig};
use flowdeck::tui_shell;

#[derive(Parser)]
#[command(name = "flowdeck")]
#[command(about = "Flow lifecycle & campaign monitoring console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store backend URL and token for subsequent commands
    Login {
        #[arg(long)]
        url: String,
        #[arg(long)]
        token: String,
    },

    /// List flows for a tab
    Flows {
        /// published | draft
        #[arg(long, default_value = "published")]
        tab: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish a draft flow
    Publish { flow_id: String },

    /// Show the usage report for a flow
    Usage {
        flow_id: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the live monitor for a campaign
    Monitor {
        campaign_id: String,
        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 4000)]
        interval_ms: u64,
    },

    /// Open the console (default)
    Tui {
        /// Restore a shared view state, e.g. "tab=draft"
        #[arg(long)]
        link: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Login { url, token }) => {
            let config = SessionConfig {
                version: session::CONFIG_VERSION,
                base_url: url.trim_end_matches('/').to_string(),
                token,
            };
            session::save(&config)?;
            println!("logged in to {}", config.base_url);
            Ok(())
        }

        Some(Commands::Flows { tab, json }) => {
            let tab = FlowTab::parse(&tab)
                .with_context(|| format!("unknown tab {:?} (expected published|draft)", tab))?;
            let client = client()?;
            let flows = client
                .list_flows(tab)
                .with_context(|| format!("list {} flows", tab))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&flows)?);
            } else {
                for f in &flows {
                    println!("{}  {}  {}", f.id, f.name, f.created_at);
                }
            }
            Ok(())
        }

        Some(Commands::Publish { flow_id }) => {
            let client = client()?;
            client
                .publish_flow(&flowdeck::model::FlowId(flow_id.clone()))
                .context("publish flow")?;
            println!("published {}", flow_id);
            Ok(())
        }

        Some(Commands::Usage { flow_id, json }) => {
            let client = client()?;
            let usage = client
                .flow_usage(&flowdeck::model::FlowId(flow_id))
                .context("get flow usage")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&usage)?);
            } else if usage.can_delete {
                println!("deletable (no campaigns attached)");
            } else {
                println!("attached to {} campaign(s):", usage.campaigns.len());
                for c in &usage.campaigns {
                    println!("  {}  {}  {}", c.id, c.name, c.status);
                }
            }
            Ok(())
        }

        Some(Commands::Monitor {
            campaign_id,
            interval_ms,
        }) => {
            let client = client()?;
            let opts = tui_shell::RunOptions {
                link: LinkState {
                    tab: FlowTab::default(),
                    campaign: Some(flowdeck::model::CampaignId(campaign_id)),
                },
                poll_interval: Duration::from_millis(interval_ms),
            };
            tui_shell::run(client, opts)
        }

        Some(Commands::Tui { link }) => run_tui(link),
        None => run_tui(None),
    }
}

fn run_tui(link: Option<String>) -> Result<()> {
    let client = client()?;
    let link = match link {
        Some(q) => LinkState::parse(&q).context("parse --link")?,
        None => LinkState::default(),
    };
    tui_shell::run(
        client,
        tui_shell::RunOptions {
            link,
            ..Default::default()
        },
    )
}

fn client() -> Result<RemoteClient> {
    let config = session::require()?;
    RemoteClient::new(config.base_url, config.token)
}
