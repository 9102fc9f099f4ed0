pub mod harvest_stats;
pub mod retry_policy;

pub use harvest_stats::{HarvestStats, StatsSnapshot};
pub use retry_policy::{Attempted, RetryPolicy};
