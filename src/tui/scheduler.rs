use std::time::{Duration, Instant};

/// Debounce for one autosave channel.
///
/// `mark` records an unsaved mutation. With a zero delay the save is due at
/// once; otherwise it is due `delay` after the first unsaved mutation, so a
/// burst of keystrokes is written at most once per delay.
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl SaveScheduler {
    pub fn new(delay: Duration) -> Self {
        SaveScheduler {
            delay,
            pending_since: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn mark(&mut self, now: Instant) {
        self.pending_since.get_or_insert(now);
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        self.pending_since
            .is_some_and(|since| now.saturating_duration_since(since) >= self.delay)
    }

    /// Time until the pending save is due, for the event loop's poll timeout
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending_since
            .map(|since| self.delay.saturating_sub(now.saturating_duration_since(since)))
    }

    /// Clear the pending flag if the save is due (or `force`), returning
    /// whether the caller should write now.
    pub fn take(&mut self, now: Instant, force: bool) -> bool {
        if self.is_pending() && (force || self.due(now)) {
            self.pending_since = None;
            true
        } else {
            false
        }
    }
}
