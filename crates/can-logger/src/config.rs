//! Logger configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use storage::CapacityConfig;

/// Fixed epoch offset added to the monotonic session clock
///
/// The device has no battery-backed RTC; see [`crate::SessionClock`].
pub const FICTIONAL_START_TIME: f64 = 1755839937.312293;

/// Configuration for a logging session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Mount point of the removable volume
    pub mount_dir: PathBuf,

    /// Frame queue capacity (capture → formatting)
    pub frame_queue_len: usize,

    /// Line queue capacity (formatting → storage writer)
    pub line_queue_len: usize,

    /// Batch buffer capacity in bytes
    pub batch_max_bytes: usize,

    /// Time budget for coalescing one batch (milliseconds)
    pub batch_max_wait_ms: u64,

    /// Hardware receive poll timeout (milliseconds)
    pub receive_timeout_ms: u64,

    /// Storage writer's bounded wait on the line queue (milliseconds)
    pub line_wait_ms: u64,

    /// Supervisor durability-sync interval (milliseconds)
    pub sync_interval_ms: u64,

    /// Emit the throughput stat every this many supervisor ticks
    pub stats_every_ticks: u32,

    /// Epoch offset for the session clock (seconds)
    pub epoch_offset: f64,

    /// Volume eviction thresholds
    pub capacity: CapacityConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            mount_dir: PathBuf::from("/SDCARD"),
            frame_queue_len: 600,
            line_queue_len: 1600,
            batch_max_bytes: 64 * 1024,
            batch_max_wait_ms: 20,
            receive_timeout_ms: 100,
            line_wait_ms: 50,
            sync_interval_ms: 1000,
            stats_every_ticks: 60,
            epoch_offset: FICTIONAL_START_TIME,
            capacity: CapacityConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Batch coalescing time budget
    pub fn batch_max_wait(&self) -> Duration {
        Duration::from_millis(self.batch_max_wait_ms)
    }

    /// Hardware receive poll timeout
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }

    /// Writer's bounded wait on the line queue
    pub fn line_wait(&self) -> Duration {
        Duration::from_millis(self.line_wait_ms)
    }

    /// Supervisor sync interval
    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_firmware_constants() {
        let config = LoggerConfig::default();
        assert_eq!(config.frame_queue_len, 600);
        assert_eq!(config.line_queue_len, 1600);
        assert_eq!(config.batch_max_bytes, 64 * 1024);
        assert_eq!(config.batch_max_wait(), Duration::from_millis(20));
        assert_eq!(config.sync_interval(), Duration::from_secs(1));
        assert_eq!(config.stats_every_ticks, 60);
    }
}
