#![forbid(unsafe_code)]

//! Structured log events emitted by the SegBox driver.
//!
//! Run:
//!   cargo test -p segbox-runtime --test tracing_events

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use segbox_core::{PointerEvent, Rect};
use segbox_layout::Affordance;
use segbox_runtime::{SegBox, SegBoxConfig, StorageBackend, StorageError, StorageResult};
use tracing_subscriber::layer::SubscriberExt;
use web_time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records every event.
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_captured_events(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

/// Backend whose writes always fail.
struct ReadOnlyStorage;

impl StorageBackend for ReadOnlyStorage {
    fn name(&self) -> &str {
        "read-only"
    }

    fn load(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn store(&self, key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::InvalidKey(key.to_owned()))
    }

    fn remove(&self, _key: &str) -> StorageResult<bool> {
        Ok(false)
    }
}

fn drag_split(seg: &mut SegBox, now: Instant) {
    let root = seg.tree().root();
    seg.pointer_down(Affordance::Handle(root), &PointerEvent::down(50.0, 50.0), now)
        .expect("start");
    let _ = seg.pointer(&PointerEvent::moved(100.0, 50.0), now);
    let _ = seg.pointer(&PointerEvent::up(100.0, 50.0), now);
}

#[test]
fn committed_split_logs_info_and_notification_logs_debug() {
    let events = with_captured_events(|| {
        let mut seg = SegBox::new(SegBoxConfig::default(), Rect::from_size(200.0, 200.0))
            .expect("config");
        let t0 = Instant::now();
        drag_split(&mut seg, t0);
        let _ = seg.tick(t0 + Duration::from_millis(100));
    });

    let commit = events
        .iter()
        .find(|e| e.message == "split committed")
        .expect("commit event");
    assert_eq!(commit.level, tracing::Level::INFO);
    assert_eq!(commit.fields.get("x").map(String::as_str), Some("100.0"));

    let changed = events
        .iter()
        .find(|e| e.message == "leaves changed")
        .expect("notification event");
    assert_eq!(changed.level, tracing::Level::DEBUG);
    assert_eq!(changed.fields.get("leaves").map(String::as_str), Some("2"));
}

#[test]
fn storage_failure_is_logged_and_absorbed() {
    let events = with_captured_events(|| {
        let mut seg = SegBox::with_bounds(
            SegBoxConfig::default().with_save(true),
            segbox_layout::GridBounds::new(Rect::from_size(200.0, 200.0), 8.0),
            Box::new(ReadOnlyStorage),
        )
        .expect("config");
        let t0 = Instant::now();
        drag_split(&mut seg, t0);
        let notification = seg.flush().expect("pending change");
        assert_eq!(notification.leaves.len(), 2);
    });

    let warning = events
        .iter()
        .find(|e| e.message == "layout not persisted")
        .expect("storage warning");
    assert_eq!(warning.level, tracing::Level::WARN);
    assert_eq!(
        warning.fields.get("backend").map(String::as_str),
        Some("read-only")
    );
}

#[test]
fn malformed_layout_warns_on_startup() {
    let storage = segbox_runtime::MemoryStorage::new();
    storage
        .store("segbox#0.layout", "{not json")
        .expect("memory store");
    let events = with_captured_events(|| {
        let seg = SegBox::with_bounds(
            SegBoxConfig::default().with_save(true),
            segbox_layout::GridBounds::new(Rect::from_size(200.0, 200.0), 8.0),
            Box::new(storage),
        )
        .expect("config");
        assert_eq!(seg.leaves().len(), 1);
    });
    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::WARN && e.message.contains("malformed"))
    );
}
