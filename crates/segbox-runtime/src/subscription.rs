#![forbid(unsafe_code)]

//! Scoped pointer capture.
//!
//! Starting a gesture acquires a [`PointerCapture`] from the box's
//! [`CaptureLedger`]: the move and release listeners for that gesture live
//! exactly as long as the guard. The guard deregisters once, either through
//! [`PointerCapture::release`] or on drop; releasing twice is a no-op.

use std::sync::{Arc, Mutex, MutexGuard};

use segbox_layout::{GestureKind, NodeId};

/// Identifier of one capture.
pub type CaptureId = u64;

/// Counters describing capture traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub active: usize,
    pub acquired: u64,
    pub released: u64,
}

#[derive(Debug, Default)]
struct LedgerState {
    next_id: CaptureId,
    active: Vec<CaptureId>,
    acquired: u64,
    released: u64,
}

/// Registry of live captures for one box.
#[derive(Debug, Clone, Default)]
pub struct CaptureLedger {
    inner: Arc<Mutex<LedgerState>>,
}

impl CaptureLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register listeners for a gesture of `kind` on `node`.
    #[must_use]
    pub fn acquire(&self, kind: GestureKind, node: NodeId) -> PointerCapture {
        let id = {
            let mut state = lock(&self.inner);
            state.next_id += 1;
            let id = state.next_id;
            state.active.push(id);
            state.acquired += 1;
            id
        };
        tracing::trace!(capture = id, ?kind, node = %node, "pointer captured");
        PointerCapture {
            ledger: Arc::clone(&self.inner),
            id,
            kind,
            node,
            released: false,
        }
    }

    #[must_use]
    pub fn stats(&self) -> CaptureStats {
        let state = lock(&self.inner);
        CaptureStats {
            active: state.active.len(),
            acquired: state.acquired,
            released: state.released,
        }
    }

    /// Captures currently registered.
    #[must_use]
    pub fn active(&self) -> usize {
        lock(&self.inner).active.len()
    }
}

fn lock(inner: &Mutex<LedgerState>) -> MutexGuard<'_, LedgerState> {
    // Counters stay consistent even if a holder panicked.
    inner
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Guard for one gesture's pointer listeners.
#[derive(Debug)]
pub struct PointerCapture {
    ledger: Arc<Mutex<LedgerState>>,
    id: CaptureId,
    kind: GestureKind,
    node: NodeId,
    released: bool,
}

impl PointerCapture {
    #[must_use]
    pub const fn id(&self) -> CaptureId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> GestureKind {
        self.kind
    }

    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Deregister the listeners. Returns `false` if already released.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        let mut state = lock(&self.ledger);
        if let Some(pos) = state.active.iter().position(|id| *id == self.id) {
            let _ = state.active.swap_remove(pos);
            state.released += 1;
        }
        drop(state);
        tracing::trace!(capture = self.id, "pointer released");
        true
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_idempotent() {
        let ledger = CaptureLedger::new();
        let mut capture = ledger.acquire(GestureKind::Segment, NodeId::MIN);
        assert_eq!(ledger.active(), 1);
        assert!(capture.release());
        assert!(!capture.release());
        assert!(capture.is_released());
        drop(capture);
        assert_eq!(
            ledger.stats(),
            CaptureStats {
                active: 0,
                acquired: 1,
                released: 1,
            }
        );
    }

    #[test]
    fn drop_releases() {
        let ledger = CaptureLedger::new();
        {
            let _capture = ledger.acquire(GestureKind::Resize, NodeId::MIN);
            assert_eq!(ledger.active(), 1);
        }
        assert_eq!(ledger.active(), 0);
        assert_eq!(ledger.stats().released, 1);
    }

    #[test]
    fn ids_are_distinct() {
        let ledger = CaptureLedger::new();
        let a = ledger.acquire(GestureKind::Segment, NodeId::MIN);
        let b = ledger.acquire(GestureKind::Segment, NodeId::MIN);
        assert_ne!(a.id(), b.id());
        assert_eq!(ledger.active(), 2);
        drop(a);
        assert_eq!(ledger.active(), 1);
        assert_eq!(b.kind(), GestureKind::Segment);
    }

    #[test]
    fn cloned_ledger_sees_same_captures() {
        let ledger = CaptureLedger::new();
        let view = ledger.clone();
        let _capture = ledger.acquire(GestureKind::Segment, NodeId::MIN);
        assert_eq!(view.active(), 1);
    }
}
