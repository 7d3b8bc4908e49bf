//! Frame-coalesced work queue.
//!
//! Pointer moves arrive faster than the page is redrawn. Each key (one per
//! controller) holds at most one pending payload; while it is pending, later
//! payloads for that key are dropped rather than queued. `flush` hands the
//! pending work to the caller once per frame, in the order it was scheduled.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

/// Single-slot-per-key throttle.
#[derive(Debug, Clone)]
pub struct FrameScheduler<K, T> {
    pending: Vec<(K, T)>,
    dropped: usize,
}

impl<K, T> Default for FrameScheduler<K, T> {
    fn default() -> Self {
        Self { pending: Vec::new(), dropped: 0 }
    }
}

impl<K: PartialEq, T> FrameScheduler<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` for `key`. Returns `false` when the key already has
    /// pending work and the payload was dropped.
    pub fn schedule(&mut self, key: K, payload: T) -> bool {
        if self.is_pending(&key) {
            self.dropped += 1;
            return false;
        }
        self.pending.push((key, payload));
        true
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.iter().any(|(k, _)| k == key)
    }

    /// Discard pending work for `key`, e.g. when its gesture was cancelled.
    pub fn cancel(&mut self, key: &K) {
        self.pending.retain(|(k, _)| k != key);
    }

    /// Take everything pending, leaving every slot free.
    pub fn flush(&mut self) -> Vec<(K, T)> {
        std::mem::take(&mut self.pending)
    }

    /// Number of payloads dropped since creation.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
