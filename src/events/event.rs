//! # Runtime events emitted by the scheduler and the emitter facade.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Scheduler events**: task flow through the bounded queue (queued, starting, finished, idle)
//! - **Registration events**: listener table changes (added, removed, cleared, over limit)
//! - **Subscriber events**: problems delivering events to subscribers (overflow, panic)
//!
//! The [`Event`] struct carries metadata such as the event name, task id,
//! queue depth and listener name.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use queue_emitter::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskQueued)
//!     .with_event("order-created")
//!     .with_task_id(7)
//!     .with_queued(3);
//!
//! assert_eq!(ev.kind, EventKind::TaskQueued);
//! assert_eq!(ev.event.as_deref(), Some("order-created"));
//! assert_eq!(ev.queued, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Scheduler events ===
    /// Task submitted while all slots were busy; it waits in the pending queue.
    ///
    /// Sets:
    /// - `task_id`: scheduler-assigned id
    /// - `event`, `listener`: origin of the task
    /// - `queued`: queue length after the push
    TaskQueued,

    /// Task acquired a slot and its body is about to run.
    ///
    /// Sets:
    /// - `task_id`, `event`, `listener`
    /// - `running`: running count including this task
    TaskStarting,

    /// Task body completed. The outcome is deliberately absent: it is only
    /// observable through the task's [`TaskHandle`](crate::TaskHandle).
    ///
    /// Sets:
    /// - `task_id`, `event`, `listener`
    TaskFinished,

    /// The scheduler has no queued and no running tasks.
    SchedulerIdle,

    // === Registration events ===
    /// A listener was registered.
    ///
    /// Sets:
    /// - `event`, `listener`
    /// - `count`: listener count for the event after registration
    ListenerAdded,

    /// A listener registration was removed by reference.
    ///
    /// Sets:
    /// - `event`, `listener`
    ListenerRemoved,

    /// Listeners were removed in bulk.
    ///
    /// Sets:
    /// - `event`: only when a single event was cleared
    ListenersCleared,

    /// An event's listener list grew past the configured limit.
    /// Published once per event name.
    ///
    /// Sets:
    /// - `event`
    /// - `count`: listener count that crossed the limit
    /// - `reason`: human-readable hint
    MaxListenersExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Emitter event name, if applicable.
    pub event: Option<Arc<str>>,
    /// Listener name, if applicable.
    pub listener: Option<Arc<str>>,
    /// Scheduler-assigned task id.
    pub task_id: Option<u64>,
    /// Pending queue length.
    pub queued: Option<usize>,
    /// Running task count.
    pub running: Option<usize>,
    /// Listener count for `event`.
    pub count: Option<usize>,
    /// Subscriber name (overflow/panic events).
    pub subscriber: Option<&'static str>,
    /// Human-readable reason (overflow details, panic info, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            event: None,
            listener: None,
            task_id: None,
            queued: None,
            running: None,
            count: None,
            subscriber: None,
            reason: None,
        }
    }

    /// Attaches an emitter event name.
    #[inline]
    pub fn with_event(mut self, event: impl Into<Arc<str>>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Attaches a listener name.
    #[inline]
    pub fn with_listener(mut self, listener: impl Into<Arc<str>>) -> Self {
        self.listener = Some(listener.into());
        self
    }

    /// Attaches a scheduler task id.
    #[inline]
    pub fn with_task_id(mut self, id: u64) -> Self {
        self.task_id = Some(id);
        self
    }

    /// Attaches the pending queue length.
    #[inline]
    pub fn with_queued(mut self, n: usize) -> Self {
        self.queued = Some(n);
        self
    }

    /// Attaches the running task count.
    #[inline]
    pub fn with_running(mut self, n: usize) -> Self {
        self.running = Some(n);
        self
    }

    /// Attaches a listener count.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow).with_reason(reason);
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }

    /// `true` for overflow notices, which are never re-published on overflow.
    #[inline]
    pub(crate) fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::SchedulerIdle);
        let b = Event::new(EventKind::SchedulerIdle);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_subscriber_constructors() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.subscriber, Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("full"));

        let ev = Event::subscriber_panicked("audit", "boom".into());
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.reason.as_deref(), Some("boom"));
    }
}
