//! Logging session context
//!
//! Owns everything the pipeline shares: the open log file, the
//! processed-message counter and the spawned task handles. Constructed
//! once at session start; a session runs until device reset.

use crate::clock::SessionClock;
use crate::config::LoggerConfig;
use crate::tasks::{capture_task, format_task, writer_task};
use can_source::FrameSource;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use storage::{BatchBuffer, CapacityManager, LogSink, StorageError, SystemSpaceProbe};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// A running logging session
pub struct Session {
    config: LoggerConfig,
    sink: Arc<LogSink>,
    processed: Arc<AtomicU64>,
    tasks: Vec<JoinHandle<()>>,
}

impl Session {
    /// Prepare the volume, open the session file and start the pipeline
    ///
    /// Any failure here (no volume, file not creatable, eviction failure)
    /// aborts the session before a single task is spawned; no partial
    /// pipeline is ever left running.
    pub fn start<S>(config: LoggerConfig, source: S) -> Result<Self, StorageError>
    where
        S: FrameSource + 'static,
    {
        let mut manager =
            CapacityManager::new(config.capacity.clone(), SystemSpaceProbe::new());
        let path = manager.prepare(&config.mount_dir)?;
        let sink = Arc::new(LogSink::create(&path)?);
        Ok(Self::start_with_sink(config, source, sink))
    }

    /// Wire the pipeline around an already-opened sink
    ///
    /// Split out so tests can point the session at a scratch directory.
    pub fn start_with_sink<S>(config: LoggerConfig, source: S, sink: Arc<LogSink>) -> Self
    where
        S: FrameSource + 'static,
    {
        let (frame_tx, frame_rx) = mpsc::channel(config.frame_queue_len);
        let (line_tx, line_rx) = mpsc::channel(config.line_queue_len);
        let clock = Arc::new(SessionClock::new(config.epoch_offset));
        let processed = Arc::new(AtomicU64::new(0));

        let batch = BatchBuffer::allocate(config.batch_max_bytes);
        match &batch {
            Some(buf) => info!("Batch buffer allocated: {} bytes", buf.capacity()),
            None => {
                warn!("Batch buffer allocation failed; will write line-by-line without batching")
            }
        }

        let tasks = vec![
            tokio::spawn(capture_task(
                source,
                frame_tx,
                clock,
                config.receive_timeout(),
            )),
            tokio::spawn(format_task(frame_rx, line_tx, processed.clone())),
            tokio::spawn(writer_task(
                line_rx,
                sink.clone(),
                batch,
                config.line_wait(),
                config.batch_max_wait(),
            )),
        ];

        Self {
            config,
            sink,
            processed,
            tasks,
        }
    }

    /// Lines handed to the write path so far
    ///
    /// Polled by the status display collaborator; reads may be slightly
    /// stale, only eventual consistency is needed.
    pub fn message_count(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Path of the session's log file
    pub fn log_path(&self) -> &Path {
        self.sink.path()
    }

    /// Control-task loop: periodic durability sync plus a throughput stat
    ///
    /// Forces buffered data to stable storage every sync interval, so a
    /// power loss costs at most roughly one second of frames. Performs no
    /// data-path work and cannot be starved by the pipeline tasks.
    pub async fn supervise(&self) {
        let mut interval = tokio::time::interval(self.config.sync_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u32;

        loop {
            interval.tick().await;

            if let Err(e) = self.sink.sync() {
                error!("durability sync failed: {}", e);
            }

            ticks += 1;
            if ticks >= self.config.stats_every_ticks {
                info!("Messages: {}", self.message_count());
                ticks = 0;
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
