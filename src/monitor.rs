mod history;
mod poller;

pub use self::history::{HISTORY_CAP, ProgressAggregator};
pub use self::poller::{DEFAULT_INTERVAL, MetricsPoller, PollEvent, PollOutcome};
