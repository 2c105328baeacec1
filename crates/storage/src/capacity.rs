//! Storage capacity management and session file naming
//!
//! Keeps the removable volume writable indefinitely: when free space falls
//! below the low-water mark the oldest log files are evicted until the
//! target-free mark is met, then the next unused sequential filename is
//! picked for the session.

use crate::space::SpaceProbe;
use crate::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Log file name prefix
pub const LOG_PREFIX: &str = "LOG-";

/// Fixed width of the decimal sequence number
pub const LOG_INDEX_DIGITS: usize = 5;

/// Eviction thresholds for the removable volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Eviction starts below this many free bytes (default: 2 GiB)
    pub low_water_bytes: u64,
    /// Eviction continues until this many free bytes (default: 4 GiB)
    pub target_free_bytes: u64,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            low_water_bytes: 2 * 1024 * 1024 * 1024,
            target_free_bytes: 4 * 1024 * 1024 * 1024,
        }
    }
}

/// Parse a `LOG-NNNNN` file name into its sequence index
///
/// Only fixed-width, all-digit names match; anything else is ignored by
/// both the eviction scan and the next-index scan.
pub fn parse_log_index(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(LOG_PREFIX)?;
    if digits.len() != LOG_INDEX_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Format a sequence index into its `LOG-NNNNN` file name
pub fn log_file_name(index: u32) -> String {
    format!("{LOG_PREFIX}{index:0width$}", width = LOG_INDEX_DIGITS)
}

/// Next unused sequence index: highest existing index + 1, or 0 if none
///
/// Idempotent while no file is created in between.
pub fn next_log_index(dir: &Path) -> Result<u32, StorageError> {
    Ok(scan_indices(dir)?.1.map_or(0, |max| max + 1))
}

/// Lowest and highest log indices currently in the directory
fn scan_indices(dir: &Path) -> Result<(Option<u32>, Option<u32>), StorageError> {
    let mut min = None;
    let mut max = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(index) = name.to_str().and_then(parse_log_index) else {
            continue;
        };
        min = Some(min.map_or(index, |m: u32| m.min(index)));
        max = Some(max.map_or(index, |m: u32| m.max(index)));
    }
    Ok((min, max))
}

/// Capacity manager invoked once before the pipeline starts
pub struct CapacityManager<P: SpaceProbe> {
    config: CapacityConfig,
    probe: P,
}

impl<P: SpaceProbe> CapacityManager<P> {
    /// Create a capacity manager
    pub fn new(config: CapacityConfig, probe: P) -> Self {
        Self { config, probe }
    }

    /// Make room if needed and pick the session's log file path
    pub fn prepare(&mut self, dir: &Path) -> Result<PathBuf, StorageError> {
        let space = self.probe.query(dir)?;
        info!("Free space: {} bytes", space.free);

        if space.free < self.config.low_water_bytes {
            warn!(
                "Low free space (<{} bytes). Deleting old log files...",
                self.config.low_water_bytes
            );
            self.evict(dir)?;
        }

        let index = next_log_index(dir)?;
        Ok(dir.join(log_file_name(index)))
    }

    /// Delete oldest-first until the target-free mark is met or no
    /// matching files remain
    fn evict(&mut self, dir: &Path) -> Result<(), StorageError> {
        loop {
            let space = self.probe.query(dir)?;
            if space.free >= self.config.target_free_bytes {
                break;
            }

            let (lowest, _) = scan_indices(dir)?;
            let Some(index) = lowest else {
                warn!("No {LOG_PREFIX} files left to delete, free space still low");
                break;
            };

            let path = dir.join(log_file_name(index));
            warn!("Deleting {}", path.display());
            fs::remove_file(&path)?;
        }

        let space = self.probe.query(dir)?;
        info!("Free space after cleanup: {} bytes", space.free);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::DiskSpace;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    /// Probe that replays a scripted sequence of free-space readings
    struct ScriptedProbe {
        readings: VecDeque<u64>,
        last: u64,
    }

    impl ScriptedProbe {
        fn new(readings: &[u64]) -> Self {
            Self {
                readings: readings.to_vec().into(),
                last: *readings.last().unwrap(),
            }
        }
    }

    impl SpaceProbe for ScriptedProbe {
        fn query(&mut self, _path: &Path) -> Result<DiskSpace, StorageError> {
            if let Some(free) = self.readings.pop_front() {
                self.last = free;
            }
            Ok(DiskSpace {
                total: 32 * 1024 * 1024 * 1024,
                free: self.last,
            })
        }
    }

    const GIB: u64 = 1024 * 1024 * 1024;

    fn touch_logs(dir: &Path, indices: &[u32]) {
        for &index in indices {
            std::fs::write(dir.join(log_file_name(index)), b"x").unwrap();
        }
    }

    fn existing_indices(dir: &Path) -> Vec<u32> {
        let mut found: Vec<u32> = std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.unwrap().file_name().to_str().and_then(parse_log_index))
            .collect();
        found.sort_unstable();
        found
    }

    #[test]
    fn test_parse_log_index() {
        assert_eq!(parse_log_index("LOG-00042"), Some(42));
        assert_eq!(parse_log_index("LOG-99999"), Some(99999));
        assert_eq!(parse_log_index("LOG-0042"), None); // wrong width
        assert_eq!(parse_log_index("LOG-000421"), None); // wrong width
        assert_eq!(parse_log_index("LOG-0004x"), None); // not a digit
        assert_eq!(parse_log_index("log-00042"), None); // case matters
        assert_eq!(parse_log_index("README"), None);
    }

    #[test]
    fn test_log_file_name_round_trip() {
        assert_eq!(log_file_name(0), "LOG-00000");
        assert_eq!(log_file_name(42), "LOG-00042");
        assert_eq!(parse_log_index(&log_file_name(7)), Some(7));
    }

    #[test]
    fn test_next_index_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_log_index(dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_next_index_ignores_malformed_names() {
        let dir = TempDir::new().unwrap();
        touch_logs(dir.path(), &[3]);
        std::fs::write(dir.path().join("LOG-9"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        assert_eq!(next_log_index(dir.path()).unwrap(), 4);
    }

    #[test]
    fn test_next_index_is_idempotent() {
        let dir = TempDir::new().unwrap();
        touch_logs(dir.path(), &[1, 9]);
        let first = next_log_index(dir.path()).unwrap();
        let second = next_log_index(dir.path()).unwrap();
        assert_eq!(first, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_eviction_above_low_water() {
        let dir = TempDir::new().unwrap();
        touch_logs(dir.path(), &[3, 7, 1, 9]);

        let probe = ScriptedProbe::new(&[8 * GIB]);
        let mut manager = CapacityManager::new(CapacityConfig::default(), probe);
        let path = manager.prepare(dir.path()).unwrap();

        assert_eq!(existing_indices(dir.path()), vec![1, 3, 7, 9]);
        assert_eq!(path, dir.path().join("LOG-00010"));
    }

    #[test]
    fn test_eviction_removes_lowest_first_until_target() {
        let dir = TempDir::new().unwrap();
        touch_logs(dir.path(), &[3, 7, 1, 9]);

        // Below low water; each deletion reclaims one reading's worth
        let probe = ScriptedProbe::new(&[GIB, GIB, 2 * GIB, 3 * GIB, 5 * GIB]);
        let mut manager = CapacityManager::new(CapacityConfig::default(), probe);
        let path = manager.prepare(dir.path()).unwrap();

        // 1, 3, 7 deleted in that order; 9 survived once free >= 4 GiB
        assert_eq!(existing_indices(dir.path()), vec![9]);
        assert_eq!(path, dir.path().join("LOG-00010"));
    }

    #[test]
    fn test_eviction_stops_when_files_exhausted() {
        let dir = TempDir::new().unwrap();
        touch_logs(dir.path(), &[2, 5]);

        // Free space never recovers
        let probe = ScriptedProbe::new(&[GIB]);
        let mut manager = CapacityManager::new(CapacityConfig::default(), probe);
        let path = manager.prepare(dir.path()).unwrap();

        // Everything evicted, logging proceeds at index 0
        assert_eq!(existing_indices(dir.path()), Vec::<u32>::new());
        assert_eq!(path, dir.path().join("LOG-00000"));
    }

    #[test]
    fn test_eviction_ignores_foreign_files() {
        let dir = TempDir::new().unwrap();
        touch_logs(dir.path(), &[4]);
        std::fs::write(dir.path().join("config.json"), b"{}").unwrap();

        let probe = ScriptedProbe::new(&[GIB]);
        let mut manager = CapacityManager::new(CapacityConfig::default(), probe);
        manager.prepare(dir.path()).unwrap();

        assert!(dir.path().join("config.json").exists());
        assert!(!dir.path().join("LOG-00004").exists());
    }
}
