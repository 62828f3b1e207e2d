#![forbid(unsafe_code)]

//! Trailing-edge debounce for leaf-change notifications.
//!
//! Every committed mutation calls [`ChangeNotifier::notify`], which pushes the
//! deadline out by the configured window. [`ChangeNotifier::poll`] hands back a
//! [`PendingChange`] once the window has elapsed with no further notifies, so a
//! burst of resize steps yields one notification describing the final state.
//!
//! Each tree owns its notifier; there is no process-wide timer.

use web_time::{Duration, Instant};

use segbox_layout::NodeId;

/// A settled burst of changes, ready to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingChange {
    /// Monotonic per-notifier dispatch counter, starting at 1.
    pub sequence: u64,
    /// How many notifies were coalesced.
    pub requests: usize,
    /// Node whose change arrived last.
    pub last_source: NodeId,
}

#[derive(Debug, Clone, Copy)]
struct Burst {
    deadline: Instant,
    requests: usize,
    last_source: NodeId,
}

/// Per-tree debounced notifier.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    window: Duration,
    burst: Option<Burst>,
    sequence: u64,
}

impl ChangeNotifier {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            burst: None,
            sequence: 0,
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.burst.is_some()
    }

    /// When the pending burst will settle, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.burst.map(|burst| burst.deadline)
    }

    /// Number of dispatched notifications so far.
    #[must_use]
    pub const fn dispatched(&self) -> u64 {
        self.sequence
    }

    /// Record a change caused by `source` and restart the window.
    pub fn notify(&mut self, source: NodeId, now: Instant) {
        let deadline = now + self.window;
        let requests = self.burst.map_or(0, |burst| burst.requests) + 1;
        self.burst = Some(Burst {
            deadline,
            requests,
            last_source: source,
        });
        tracing::trace!(source = %source, requests, "leaf notification scheduled");
    }

    /// The settled burst, once `now` has reached its deadline.
    pub fn poll(&mut self, now: Instant) -> Option<PendingChange> {
        match self.burst {
            Some(burst) if now >= burst.deadline => self.take(),
            _ => None,
        }
    }

    /// The pending burst regardless of its deadline.
    pub fn flush(&mut self) -> Option<PendingChange> {
        self.take()
    }

    /// Drop the pending burst without dispatching it.
    pub fn cancel(&mut self) -> bool {
        self.burst.take().is_some()
    }

    fn take(&mut self) -> Option<PendingChange> {
        let burst = self.burst.take()?;
        self.sequence += 1;
        Some(PendingChange {
            sequence: self.sequence,
            requests: burst.requests,
            last_source: burst.last_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn source(raw: u64) -> NodeId {
        NodeId::new(raw).expect("non-zero")
    }

    #[test]
    fn nothing_pending_polls_none() {
        let mut notifier = ChangeNotifier::new(WINDOW);
        assert_eq!(notifier.poll(Instant::now()), None);
        assert_eq!(notifier.flush(), None);
    }

    #[test]
    fn burst_coalesces_into_one_change() {
        let mut notifier = ChangeNotifier::new(WINDOW);
        let t0 = Instant::now();
        for step in 0..5u64 {
            notifier.notify(source(step + 1), t0 + Duration::from_millis(step * 20));
        }
        // Last notify at +80ms; deadline is +180ms.
        assert_eq!(notifier.poll(t0 + Duration::from_millis(150)), None);
        let change = notifier
            .poll(t0 + Duration::from_millis(180))
            .expect("settled");
        assert_eq!(change.requests, 5);
        assert_eq!(change.sequence, 1);
        assert_eq!(change.last_source, source(5));
        assert!(!notifier.is_pending());
        assert_eq!(notifier.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn separate_bursts_get_increasing_sequence() {
        let mut notifier = ChangeNotifier::new(WINDOW);
        let t0 = Instant::now();
        notifier.notify(source(1), t0);
        let first = notifier.poll(t0 + WINDOW).expect("settled");
        notifier.notify(source(1), t0 + WINDOW * 2);
        let second = notifier.poll(t0 + WINDOW * 3).expect("settled");
        assert_eq!((first.sequence, second.sequence), (1, 2));
        assert_eq!(notifier.dispatched(), 2);
    }

    #[test]
    fn flush_ignores_deadline() {
        let mut notifier = ChangeNotifier::new(WINDOW);
        let t0 = Instant::now();
        notifier.notify(source(2), t0);
        assert_eq!(notifier.deadline(), Some(t0 + WINDOW));
        let change = notifier.flush().expect("pending");
        assert_eq!(change.requests, 1);
    }

    #[test]
    fn cancel_drops_burst() {
        let mut notifier = ChangeNotifier::new(WINDOW);
        notifier.notify(source(1), Instant::now());
        assert!(notifier.cancel());
        assert!(!notifier.cancel());
        assert_eq!(notifier.flush(), None);
        assert_eq!(notifier.dispatched(), 0);
    }
}
