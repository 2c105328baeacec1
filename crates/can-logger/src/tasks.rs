//! Pipeline tasks
//!
//! Three tasks connected by bounded queues: capture drains the bus
//! controller, formatting renders text lines, the storage writer batches
//! them onto the volume. Producers never wait for queue space; a full
//! queue sheds the item so downstream slowness can never stall capture.

use crate::clock::SessionClock;
use crate::throttle::WarnThrottle;
use can_source::{CanFrame, FrameSource};
use log_format::{render_frame, LogLine, LINE_CAPACITY};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::{BatchBuffer, LogSink};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, warn};

/// Cooldown between repeated queue-full warnings
const DROP_WARN_INTERVAL: Duration = Duration::from_secs(1);

/// Capture task: drain the bus controller into the frame queue
///
/// Frame loss at this stage is unrecoverable, so the task never waits for
/// queue space; a full frame queue drops the frame with a rate-limited
/// warning and the controller keeps getting drained.
pub async fn capture_task<S: FrameSource>(
    mut source: S,
    frames: mpsc::Sender<CanFrame>,
    clock: Arc<SessionClock>,
    receive_timeout: Duration,
) {
    let mut drops = WarnThrottle::new(DROP_WARN_INTERVAL);

    loop {
        match source.receive(receive_timeout).await {
            Ok(Some(mut frame)) => {
                frame.timestamp = clock.now();
                match frames.try_send(frame) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        if let Some(count) = drops.register() {
                            warn!("frame queue full, dropped {} frame(s)", count);
                        }
                    }
                    Err(TrySendError::Closed(_)) => {
                        debug!("frame queue closed, capture task exiting");
                        break;
                    }
                }
            }
            Ok(None) => {} // quiet bus, poll again
            Err(e) => warn!("CAN receive failed: {}", e),
        }
    }
}

/// Formatting task: render frames into fixed-capacity text lines
///
/// The processed-message counter moves only when a line was accepted into
/// the line queue, so it reflects lines that reached the write path, not
/// frames captured.
pub async fn format_task(
    mut frames: mpsc::Receiver<CanFrame>,
    lines: mpsc::Sender<LogLine>,
    processed: Arc<AtomicU64>,
) {
    let mut drops = WarnThrottle::new(DROP_WARN_INTERVAL);

    while let Some(frame) = frames.recv().await {
        let line = render_frame(&frame);
        match lines.try_send(line) {
            Ok(()) => {
                processed.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Full(_)) => {
                if let Some(count) = drops.register() {
                    warn!("line queue full, dropped {} line(s)", count);
                }
            }
            Err(TrySendError::Closed(_)) => {
                debug!("line queue closed, formatting task exiting");
                break;
            }
        }
    }
}

/// Storage writer task: batch lines onto the volume
///
/// Dual threshold: a batch is closed by the byte budget (buffer capacity)
/// or the time budget, whichever comes first, bounding both worst-case
/// write latency and worst-case write frequency. Without a batch buffer
/// the task degrades to direct write-and-flush per line.
pub async fn writer_task(
    mut lines: mpsc::Receiver<LogLine>,
    sink: Arc<LogSink>,
    mut batch: Option<BatchBuffer>,
    line_wait: Duration,
    batch_max_wait: Duration,
) {
    loop {
        let first = match tokio::time::timeout(line_wait, lines.recv()).await {
            Ok(Some(line)) => line,
            Ok(None) => {
                // Upstream gone and queue drained; push out whatever is staged
                if let Some(buf) = batch.as_mut() {
                    flush(&sink, buf);
                }
                debug!("line queue closed, writer task exiting");
                break;
            }
            Err(_) => continue, // idle timeout, no wasted I/O
        };

        let Some(buf) = batch.as_mut() else {
            write_through(&sink, &first);
            continue;
        };

        let mut deferred = stage(buf, first);
        let deadline = Instant::now() + batch_max_wait;

        // Opportunistically coalesce ready lines while the budgets allow;
        // stop early if the next line would overflow the buffer
        while deferred.is_none() && buf.remaining() >= LINE_CAPACITY && Instant::now() < deadline {
            match lines.try_recv() {
                Ok(line) => deferred = stage(buf, line),
                Err(_) => break,
            }
        }

        flush(&sink, buf);

        // A line that missed this batch opens the next one
        if let Some(line) = deferred {
            if !buf.try_push(line.as_bytes()) {
                write_through(&sink, &line);
            }
        }
    }
}

/// Stage a line into the batch; hand it back when it does not fit
fn stage(buf: &mut BatchBuffer, line: LogLine) -> Option<LogLine> {
    if buf.try_push(line.as_bytes()) {
        None
    } else {
        Some(line)
    }
}

/// Write out the staged batch, if any
///
/// A short write or flush failure is logged and the cycle proceeds; the
/// file stays open and the buffer is cleared either way.
fn flush(sink: &LogSink, buf: &mut BatchBuffer) {
    if buf.is_empty() {
        return;
    }
    if let Err(e) = sink.write_batch(buf.as_slice()) {
        error!("log write failed: {}", e);
    }
    buf.clear();
}

/// Degraded path: write one line directly and flush immediately
fn write_through(sink: &LogSink, line: &LogLine) {
    if let Err(e) = sink.write_batch(line.as_bytes()) {
        error!("log write failed: {}", e);
    }
}
