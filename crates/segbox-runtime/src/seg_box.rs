#![forbid(unsafe_code)]

//! The pointer-driven partition box.
//!
//! [`SegBox`] owns one partition tree together with everything needed to
//! drive it from a raw pointer stream:
//!
//! - both gesture machines, with at most one gesture active at a time,
//! - the capture ledger that scopes per-gesture listeners,
//! - a debounced notifier that reports leaves after changes settle,
//! - a storage backend for the persisted layout,
//! - a [`NodeBounds`] provider answering "where is this node on screen".
//!
//! Time is passed in explicitly (`now`) so hosts and tests control the
//! debounce clock.

use std::fmt;

use tracing::{debug, info, warn};
use web_time::Instant;

use segbox_core::event::{PointerEvent, PointerEventKind};
use segbox_core::geometry::Rect;
use segbox_layout::{
    Affordance, GestureEffect, GestureError, GestureKind, GestureTransition, GridBounds, GridHint,
    HydrationReport, LayoutSnapshot, LeafDescriptor, NodeBounds, NodeId, PartitionTree,
    ResizeGesture, SegmentGesture, SegmentPreview,
};

use crate::config::SegBoxConfig;
use crate::notifier::{ChangeNotifier, PendingChange};
use crate::storage::{MemoryStorage, StorageBackend};
use crate::subscription::{CaptureLedger, CaptureStats, PointerCapture};

/// Leaves reported after a burst of changes settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNotification {
    /// Dispatch counter, starting at 1.
    pub sequence: u64,
    /// Changes coalesced into this notification.
    pub requests: usize,
    /// Every leaf, in reading order.
    pub leaves: Vec<LeafDescriptor>,
}

/// Handle returned by [`SegBox::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type LeafListener = Box<dyn FnMut(&LeafNotification) + Send>;

/// A partition tree driven by pointer gestures.
pub struct SegBox<B: NodeBounds = GridBounds> {
    config: SegBoxConfig,
    tree: PartitionTree,
    bounds: B,
    segment: SegmentGesture,
    resize: ResizeGesture,
    ledger: CaptureLedger,
    capture: Option<PointerCapture>,
    notifier: ChangeNotifier,
    storage: Box<dyn StorageBackend>,
    listeners: Vec<(ListenerId, LeafListener)>,
    next_listener: u64,
    hydration: HydrationReport,
}

impl<B: NodeBounds> fmt::Debug for SegBox<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegBox")
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("segment", &self.segment)
            .field("resize", &self.resize)
            .field("capture", &self.capture)
            .field("notifier", &self.notifier)
            .field("storage", &self.storage.name())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl SegBox<GridBounds> {
    /// Box filling `area`, with in-memory storage.
    pub fn new(config: SegBoxConfig, area: Rect) -> Result<Self, GestureError> {
        let bounds = GridBounds::new(area, config.gutter);
        Self::with_bounds(config, bounds, Box::new(MemoryStorage::new()))
    }

    /// Update the root area (host resized).
    pub fn set_area(&mut self, area: Rect) {
        self.bounds.area = area;
    }
}

impl<B: NodeBounds> SegBox<B> {
    /// Box with a custom bounds provider and storage backend.
    ///
    /// When persistence is enabled the stored layout is restored; unreadable
    /// or malformed layouts are treated as absent.
    pub fn with_bounds(
        config: SegBoxConfig,
        bounds: B,
        storage: Box<dyn StorageBackend>,
    ) -> Result<Self, GestureError> {
        let config = config.validated();
        let segment = SegmentGesture::new(config.min_size)?;
        let resize = ResizeGesture::new(config.min_size)?;
        let (tree, hydration) = restore(&config, storage.as_ref());
        Ok(Self {
            notifier: ChangeNotifier::new(config.debounce),
            config,
            tree,
            bounds,
            segment,
            resize,
            ledger: CaptureLedger::new(),
            capture: None,
            storage,
            listeners: Vec::new(),
            next_listener: 0,
            hydration,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SegBoxConfig {
        &self.config
    }

    #[must_use]
    pub fn tree(&self) -> &PartitionTree {
        &self.tree
    }

    #[must_use]
    pub fn bounds(&self) -> &B {
        &self.bounds
    }

    pub fn bounds_mut(&mut self) -> &mut B {
        &mut self.bounds
    }

    #[must_use]
    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// What restoring the persisted layout had to skip.
    #[must_use]
    pub fn hydration_report(&self) -> &HydrationReport {
        &self.hydration
    }

    #[must_use]
    pub fn capture_stats(&self) -> CaptureStats {
        self.ledger.stats()
    }

    /// Kind of the gesture in progress, if any.
    #[must_use]
    pub fn active_gesture(&self) -> Option<GestureKind> {
        self.capture.as_ref().map(PointerCapture::kind)
    }

    #[must_use]
    pub fn is_split(&self, node: NodeId) -> bool {
        self.tree.node(node).is_some_and(|n| n.is_split())
    }

    #[must_use]
    pub fn merge_pending(&self, node: NodeId) -> bool {
        self.tree.node(node).is_some_and(|n| n.merge_pending())
    }

    /// Grid template for a split node.
    #[must_use]
    pub fn grid_hint(&self, node: NodeId) -> Option<GridHint> {
        GridHint::for_node(self.tree.node(node)?, self.config.gutter)
    }

    /// Proposal of the segment gesture in progress.
    #[must_use]
    pub fn preview(&self) -> Option<SegmentPreview> {
        self.segment.preview()
    }

    /// Grid template the proposal would produce if committed now.
    #[must_use]
    pub fn preview_hint(&self) -> Option<GridHint> {
        let preview = self.preview()?;
        Some(GridHint::for_split(
            preview.axis,
            preview.offset?,
            self.config.gutter,
        ))
    }

    #[must_use]
    pub fn leaves(&self) -> Vec<LeafDescriptor> {
        self.tree.leaves()
    }

    /// Register a listener for settled leaf changes.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&LeafNotification) + Send + 'static,
    ) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    /// Press on an affordance: a leaf's handle starts a segment gesture, a
    /// split's divider starts a resize.
    ///
    /// While another gesture holds the pointer the press is a no-op.
    pub fn pointer_down(
        &mut self,
        affordance: Affordance,
        event: &PointerEvent,
        now: Instant,
    ) -> Result<GestureTransition, GestureError> {
        let _ = self.tick(now);
        let node = affordance.node();
        let kind = self.active_gesture().unwrap_or(affordance.kind());
        let transition = match kind {
            GestureKind::Segment => self.segment.start(&self.tree, &self.bounds, node, event)?,
            GestureKind::Resize => self.resize.start(&self.tree, node)?,
        };
        if self.capture.is_none() {
            self.capture = Some(self.ledger.acquire(kind, node));
            debug!(node = %node, ?kind, transition_id = transition.transition_id, "gesture started");
        }
        Ok(transition)
    }

    /// Route a move, release or cancel to the active gesture.
    ///
    /// Returns `None` when no gesture holds the pointer.
    pub fn pointer(&mut self, event: &PointerEvent, now: Instant) -> Option<GestureTransition> {
        let _ = self.tick(now);
        let kind = self.active_gesture()?;
        let transition = match (event.kind, kind) {
            (PointerEventKind::Down, _) => return None,
            (PointerEventKind::Move, GestureKind::Segment) => {
                self.segment.update(&mut self.tree, &self.bounds, event)
            }
            (PointerEventKind::Move, GestureKind::Resize) => {
                self.resize.update(&mut self.tree, &self.bounds, event)
            }
            (PointerEventKind::Up | PointerEventKind::Cancel, GestureKind::Segment) => {
                self.segment.end(&mut self.tree)
            }
            (PointerEventKind::Up | PointerEventKind::Cancel, GestureKind::Resize) => {
                self.resize.end(&mut self.tree, &self.bounds)
            }
        };
        if event.is_terminal() {
            self.release_capture();
        }
        self.apply(&transition, now);
        Some(transition)
    }

    /// Abort the active gesture without committing anything.
    pub fn force_cancel(&mut self) -> Option<GestureTransition> {
        let transition = match self.active_gesture()? {
            GestureKind::Segment => self.segment.force_cancel(&mut self.tree),
            GestureKind::Resize => self.resize.force_cancel(),
        };
        self.release_capture();
        if let Some(transition) = &transition {
            debug!(transition_id = transition.transition_id, "gesture force-cancelled");
        }
        transition
    }

    /// Dispatch the pending notification once its window has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<LeafNotification> {
        let change = self.notifier.poll(now)?;
        Some(self.dispatch(change))
    }

    /// Dispatch the pending notification immediately.
    pub fn flush(&mut self) -> Option<LeafNotification> {
        let change = self.notifier.flush()?;
        Some(self.dispatch(change))
    }

    /// Whether a notification is waiting for its window to elapse.
    #[must_use]
    pub fn notification_pending(&self) -> bool {
        self.notifier.is_pending()
    }

    /// Cancel any gesture and flush pending notifications.
    pub fn shutdown(mut self) -> Option<LeafNotification> {
        let _ = self.force_cancel();
        self.flush()
    }

    fn release_capture(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            let _ = capture.release();
        }
    }

    fn apply(&mut self, transition: &GestureTransition, now: Instant) {
        match transition.effect {
            GestureEffect::Committed { node, axis, offset } => {
                if transition.kind == GestureKind::Segment {
                    match self.tree.split(node, axis, offset) {
                        Ok(_) => info!(node = %node, ?axis, x = offset.x, y = offset.y, "split committed"),
                        Err(err) => {
                            warn!(node = %node, error = %err, "committed split could not be applied");
                            return;
                        }
                    }
                }
                self.notifier.notify(node, now);
            }
            GestureEffect::Resized { node, .. } => self.notifier.notify(node, now),
            GestureEffect::Discarded {
                node,
                collapsed: true,
                ..
            } => {
                info!(node = %node, "undersized split collapsed");
                self.notifier.notify(node, now);
            }
            GestureEffect::Merged { parent, source } => {
                info!(parent = %parent, source = %source, "split merged");
                self.notifier.notify(parent, now);
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, change: PendingChange) -> LeafNotification {
        if self.config.save {
            self.persist();
        }
        let notification = LeafNotification {
            sequence: change.sequence,
            requests: change.requests,
            leaves: self.tree.leaves(),
        };
        debug!(
            sequence = notification.sequence,
            requests = notification.requests,
            leaves = notification.leaves.len(),
            "leaves changed"
        );
        for (_, listener) in &mut self.listeners {
            listener(&notification);
        }
        notification
    }

    fn persist(&self) {
        let key = self.config.storage_key();
        let json = match self.tree.to_layout().to_json_string() {
            Ok(json) => json,
            Err(err) => {
                warn!(key = %key, error = %err, "layout could not be serialized");
                return;
            }
        };
        if let Err(err) = self.storage.store(&key, &json) {
            warn!(key = %key, backend = self.storage.name(), error = %err, "layout not persisted");
        }
    }
}

fn restore(config: &SegBoxConfig, storage: &dyn StorageBackend) -> (PartitionTree, HydrationReport) {
    let fresh = || (PartitionTree::new(config.root.clone()), HydrationReport::default());
    if !config.save {
        return fresh();
    }
    let key = config.storage_key();
    let stored = match storage.load(&key) {
        Ok(Some(stored)) => stored,
        Ok(None) => return fresh(),
        Err(err) => {
            warn!(key = %key, backend = storage.name(), error = %err, "stored layout unreadable");
            return fresh();
        }
    };
    match LayoutSnapshot::from_json_str(&stored) {
        Ok(layout) => {
            let (tree, report) = PartitionTree::from_layout(config.root.clone(), &layout);
            if !report.is_clean() {
                warn!(key = %key, fallbacks = report.fallbacks.len(), "stored layout partially restored");
            }
            (tree, report)
        }
        Err(err) => {
            warn!(key = %key, error = %err, "stored layout malformed; starting fresh");
            fresh()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segbox_core::geometry::Point;
    use segbox_layout::SplitAxis;
    use std::sync::Arc;
    use web_time::Duration;

    fn boxed() -> SegBox {
        SegBox::new(SegBoxConfig::default(), Rect::from_size(200.0, 200.0)).expect("valid config")
    }

    #[test]
    fn starts_as_single_leaf() {
        let seg = boxed();
        assert_eq!(seg.leaves().len(), 1);
        assert!(!seg.is_split(seg.tree().root()));
        assert_eq!(seg.active_gesture(), None);
        assert!(seg.hydration_report().is_clean());
    }

    #[test]
    fn pointer_without_capture_is_ignored() {
        let mut seg = boxed();
        assert!(seg.pointer(&PointerEvent::moved(5.0, 5.0), Instant::now()).is_none());
        assert!(seg.pointer(&PointerEvent::up(5.0, 5.0), Instant::now()).is_none());
    }

    #[test]
    fn second_press_during_gesture_is_noop() {
        let mut seg = boxed();
        let root = seg.tree().root();
        let now = Instant::now();
        let _ = seg
            .pointer_down(Affordance::Handle(root), &PointerEvent::down(50.0, 50.0), now)
            .expect("start");
        let again = seg
            .pointer_down(Affordance::Divider(root), &PointerEvent::down(60.0, 60.0), now)
            .expect("noop");
        assert!(matches!(again.effect, GestureEffect::Noop { .. }));
        assert_eq!(seg.capture_stats().active, 1);
        assert_eq!(seg.active_gesture(), Some(GestureKind::Segment));
    }

    #[test]
    fn preview_hint_tracks_proposal() {
        let mut seg = boxed();
        let root = seg.tree().root();
        let now = Instant::now();
        let _ = seg
            .pointer_down(Affordance::Handle(root), &PointerEvent::down(50.0, 50.0), now)
            .expect("start");
        assert!(seg.preview_hint().is_none());
        let _ = seg.pointer(&PointerEvent::moved(120.0, 55.0), now);
        let hint = seg.preview_hint().expect("proposal");
        assert_eq!(hint.axis, SplitAxis::Horizontal);
        assert_eq!(hint.template(), "120px auto 1fr");
    }

    #[test]
    fn listeners_receive_and_can_unsubscribe() {
        let mut seg = boxed();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = seg.subscribe(move |n| {
            sink.lock().expect("lock").push(n.leaves.len());
        });
        let root = seg.tree().root();
        let t0 = Instant::now();
        let _ = seg
            .pointer_down(Affordance::Handle(root), &PointerEvent::down(50.0, 50.0), t0)
            .expect("start");
        let _ = seg.pointer(&PointerEvent::moved(100.0, 50.0), t0);
        let _ = seg.pointer(&PointerEvent::up(100.0, 50.0), t0);
        assert!(seg.notification_pending());
        let n = seg.tick(t0 + Duration::from_millis(100)).expect("settled");
        assert_eq!(n.leaves.len(), 2);
        assert_eq!(*seen.lock().expect("lock"), vec![2]);

        assert!(seg.unsubscribe(id));
        assert!(!seg.unsubscribe(id));
    }

    #[test]
    fn grid_hint_for_committed_split() {
        let mut seg = boxed();
        let root = seg.tree().root();
        let now = Instant::now();
        let _ = seg
            .pointer_down(Affordance::Handle(root), &PointerEvent::down(50.0, 150.0), now)
            .expect("start");
        let _ = seg.pointer(&PointerEvent::moved(55.0, 80.0), now);
        let end = seg.pointer(&PointerEvent::up(55.0, 80.0), now).expect("captured");
        assert!(matches!(end.effect, GestureEffect::Committed { .. }));
        let hint = seg.grid_hint(root).expect("split");
        assert_eq!(hint.template_property(), "grid-template-rows");
        assert_eq!(hint.template(), "80px auto 1fr");
        assert_eq!(seg.tree().root_node().offset(), Some(Point::new(55.0, 80.0)));
    }

    #[test]
    fn shutdown_flushes_pending_change() {
        let mut seg = boxed();
        let root = seg.tree().root();
        let now = Instant::now();
        let _ = seg
            .pointer_down(Affordance::Handle(root), &PointerEvent::down(150.0, 50.0), now)
            .expect("start");
        let _ = seg.pointer(&PointerEvent::moved(90.0, 50.0), now);
        let _ = seg.pointer(&PointerEvent::up(90.0, 50.0), now);
        let flushed = seg.shutdown().expect("pending change");
        assert_eq!(flushed.requests, 1);
    }
}
