//! Frame source boundary trait

use crate::{CanError, CanFrame};
use async_trait::async_trait;
use std::time::Duration;

/// Boundary trait for a running CAN bus controller
///
/// Implementations wrap the platform's receive primitive. The contract:
///
/// - `receive` blocks the calling task for at most `timeout` and returns
///   `Ok(None)` when nothing arrived in that window.
/// - A hardware fault surfaces as `Err`; callers log it and simply poll
///   again on the next iteration, there is no inline retry.
/// - Frames with a zero-length payload are filtered out by the source and
///   never returned (not logged either).
#[async_trait]
pub trait FrameSource: Send {
    /// Wait up to `timeout` for the next frame
    async fn receive(&mut self, timeout: Duration) -> Result<Option<CanFrame>, CanError>;
}
