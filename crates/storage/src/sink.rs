//! Append-only session log file

use crate::StorageError;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// Application-level I/O buffer in front of the file descriptor
const IO_BUF_BYTES: usize = 8 * 1024;

/// Banner written once when a new log file is opened
const BANNER: &str = "* CAN Bus Log Started\n";

/// The session's log file, shared by the writer task and the supervisor
///
/// The writer task appends and flushes batches; the supervisor forces a
/// durability sync. Both go through the internal mutex, so a sync only
/// ever covers flushed data, never a partial in-flight write.
pub struct LogSink {
    inner: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl LogSink {
    /// Create the session file and write the banner
    ///
    /// Fails if the file already exists; session file names come from the
    /// capacity manager and are never reused.
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        let file = OpenOptions::new()
            .create_new(true)
            .append(true)
            .open(path)?;
        let mut writer = BufWriter::with_capacity(IO_BUF_BYTES, file);

        writer.write_all(BANNER.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_data()?;

        info!("Logging to: {}", path.display());
        Ok(Self {
            inner: Mutex::new(writer),
            path: path.to_path_buf(),
        })
    }

    /// Path of the open session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one batch and flush the stream buffer
    pub fn write_batch(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let mut writer = self.lock()?;
        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Push flushed data to the physical medium
    pub fn sync(&self) -> Result<(), StorageError> {
        let mut writer = self.lock()?;
        writer.flush()?;
        writer.get_ref().sync_data()?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BufWriter<File>>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_writes_banner() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("LOG-00000");
        let _sink = LogSink::create(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, BANNER);
    }

    #[test]
    fn test_create_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("LOG-00001");
        std::fs::write(&path, b"old").unwrap();

        assert!(LogSink::create(&path).is_err());
    }

    #[test]
    fn test_batches_append_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("LOG-00000");
        let sink = LogSink::create(&path).unwrap();

        sink.write_batch(b"first\n").unwrap();
        sink.write_batch(b"second\n").unwrap();
        sink.sync().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{BANNER}first\nsecond\n"));
    }

    #[test]
    fn test_sync_after_unflushed_write_is_safe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("LOG-00000");
        let sink = LogSink::create(&path).unwrap();

        sink.write_batch(b"line\n").unwrap();
        sink.sync().unwrap();
        sink.sync().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("line\n"));
    }
}
