#![forbid(unsafe_code)]

//! Runtime: the pointer-driven [`SegBox`] and its supporting services.
//!
//! # Role in SegBox
//! `segbox-runtime` connects a host's pointer stream to the gesture machines
//! in `segbox-layout`. It scopes listeners per gesture, debounces leaf-change
//! notifications, and persists the layout when configured to.
//!
//! # How it fits in the system
//! Hosts construct a [`SegBox`] from a [`SegBoxConfig`], feed it
//! [`PointerEvent`](segbox_core::PointerEvent)s, and call [`SegBox::tick`] on
//! their own clock. Rendering queries (`is_split`, `grid_hint`, `preview`)
//! read the current tree.

pub mod config;
pub mod notifier;
pub mod seg_box;
pub mod storage;
pub mod subscription;

pub use config::{ConfigError, DEFAULT_DEBOUNCE_MS, DEFAULT_GUTTER, SegBoxConfig};
pub use notifier::{ChangeNotifier, PendingChange};
pub use seg_box::{LeafNotification, ListenerId, SegBox};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError, StorageResult};
pub use subscription::{CaptureId, CaptureLedger, CaptureStats, PointerCapture};
pub use web_time::{Duration, Instant};
