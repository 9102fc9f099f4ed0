pub mod context;
pub mod dispatcher;
pub mod summary;
pub mod worker;

pub use context::HarvestContext;
pub use dispatcher::Dispatcher;
pub use summary::RunSummary;
pub use worker::{PoolReport, ResolutionWorkerPool};
