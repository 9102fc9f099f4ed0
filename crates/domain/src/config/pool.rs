use serde::{Deserialize, Serialize};

/// Worker pool sizing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    /// Number of concurrent resolution workers (default: 25)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Domains buffered between the dispatcher and the workers.
    /// The dispatcher parks when the queue is full.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_workers() -> usize {
    25
}

fn default_queue_capacity() -> usize {
    1000
}
