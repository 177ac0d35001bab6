//! Frame timer driven by event loop deadlines.

use snapdrag_core::FrameTimer;
use std::time::{Duration, Instant};

/// Repeating interval expressed as the next wake-up deadline.
///
/// The event loop sleeps until [`next_deadline`](Self::next_deadline) and
/// then asks how many intervals have elapsed.
#[derive(Debug, Clone, Default)]
pub struct DeadlineTimer {
    interval: Option<Duration>,
    next: Option<Instant>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Number of intervals elapsed by `now`; advances the deadline past `now`.
    pub fn due(&mut self, now: Instant) -> u32 {
        let (Some(interval), Some(mut next)) = (self.interval, self.next) else {
            return 0;
        };
        let mut count = 0;
        while next <= now {
            next += interval;
            count += 1;
        }
        self.next = Some(next);
        count
    }
}

impl FrameTimer for DeadlineTimer {
    fn start(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.next = Some(Instant::now() + interval);
    }

    fn cancel(&mut self) {
        self.interval = None;
        self.next = None;
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}
