//! Storage Layer
//!
//! Removable-volume concerns for the logger: live free-space probing,
//! oldest-first eviction of historic log files, sequential session file
//! naming, the shared append-only file sink, and the writer task's batch
//! staging buffer.

mod batch;
mod capacity;
mod sink;
mod space;

pub use batch::BatchBuffer;
pub use capacity::{log_file_name, next_log_index, parse_log_index, CapacityConfig, CapacityManager};
pub use sink::LogSink;
pub use space::{DiskSpace, SpaceProbe, SystemSpaceProbe};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Volume error: {0}")]
    Volume(String),
    #[error("Lock error: {0}")]
    Lock(String),
}
