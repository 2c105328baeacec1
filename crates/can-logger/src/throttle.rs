//! Warning rate limiting

use std::time::{Duration, Instant};

/// Cooldown gate for repeated warnings
///
/// Queue-full drops can fire per frame under sustained overload; this
/// limits the log to one warning per cooldown window and reports how many
/// events accumulated since the last one.
#[derive(Debug)]
pub struct WarnThrottle {
    interval: Duration,
    last_emitted: Option<Instant>,
    pending: u64,
}

impl WarnThrottle {
    /// Create a throttle with the given cooldown window
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emitted: None,
            pending: 0,
        }
    }

    /// Record one event; `Some(count)` when a warning should be emitted
    ///
    /// The count covers every event registered since the last emission.
    pub fn register(&mut self) -> Option<u64> {
        self.pending += 1;

        let due = match self.last_emitted {
            Some(at) => at.elapsed() >= self.interval,
            None => true,
        };
        if !due {
            return None;
        }

        self.last_emitted = Some(Instant::now());
        Some(std::mem::take(&mut self.pending))
    }
}
