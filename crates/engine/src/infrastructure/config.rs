//! Environment-driven engine configuration.

/// Tunables read from the environment at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Buffer depth per encounter channel before slow subscribers are asked
    /// to resync.
    pub change_feed_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            change_feed_capacity: 64,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let change_feed_capacity = std::env::var("SPRAWL_FEED_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(64);
        Self {
            change_feed_capacity,
        }
    }
}
