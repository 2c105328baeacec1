//! Volume free-space probing

use crate::StorageError;
use std::path::Path;
use sysinfo::Disks;

/// Total and free bytes reported for a mounted volume
#[derive(Debug, Clone, Copy)]
pub struct DiskSpace {
    pub total: u64,
    pub free: u64,
}

/// Source of live volume capacity readings
///
/// Capacity state is derived, never cached: every eviction decision
/// re-queries through this seam.
pub trait SpaceProbe: Send {
    /// Query total/free bytes for the volume holding `path`
    fn query(&mut self, path: &Path) -> Result<DiskSpace, StorageError>;
}

/// Probe backed by the operating system's mounted-disk list
pub struct SystemSpaceProbe;

impl SystemSpaceProbe {
    /// Create a system probe
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemSpaceProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaceProbe for SystemSpaceProbe {
    fn query(&mut self, path: &Path) -> Result<DiskSpace, StorageError> {
        // Re-enumerate so the reading reflects deletions made since the
        // previous call
        let disks = Disks::new_with_refreshed_list();

        // Longest mount-point prefix wins ("/" also matches "/SDCARD")
        let disk = disks
            .list()
            .iter()
            .filter(|d| path.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len())
            .ok_or_else(|| {
                StorageError::Volume(format!("no mounted volume for {}", path.display()))
            })?;

        Ok(DiskSpace {
            total: disk.total_space(),
            free: disk.available_space(),
        })
    }
}
