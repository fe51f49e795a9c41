//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for plugging observers of
//! runtime events (task flow, listener table changes) into an emitter.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are reported as `EventKind::SubscriberPanicked`)
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only** and publishes
//!   `EventKind::SubscriberOverflow`.
//! - Events are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use queue_emitter::{Event, EventKind, Subscribe};
//!
//! struct QueueDepth;
//!
//! #[async_trait]
//! impl Subscribe for QueueDepth {
//!     async fn on_event(&self, ev: &Event) {
//!         if let (EventKind::TaskQueued, Some(depth)) = (ev.kind, ev.queued) {
//!             // export a gauge, etc.
//!             let _ = depth;
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "queue-depth" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Runtime event subscriber.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, never from `emit`.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in overflow/panic events.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber (min 1).
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
