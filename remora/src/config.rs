use serde::{Deserialize, Serialize};

/// Configuration for the dispatcher's worker pool.
///
/// The pool size is fixed for the lifetime of the dispatcher; there is no
/// dynamic scaling. It is passed explicitly at construction rather than
/// read from shared global state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Number of workers in the pool. Must be positive.
    pub pool_size: usize,
    /// How long `shutdown` waits for each worker to drain, in seconds.
    pub drain_timeout_secs: u64,
}

impl DispatcherConfig {
    /// Create a configuration with the given pool size.
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            drain_timeout_secs: 30,
        }
    }

    /// Set the shutdown drain timeout.
    pub fn with_drain_timeout(mut self, secs: u64) -> Self {
        self.drain_timeout_secs = secs;
        self
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        let pool_size = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(pool_size)
    }
}
