//! # QueueEmitter: event emitter with queued listener execution.
//!
//! [`QueueEmitter`] exposes a conventional emitter surface (`on`, `once`,
//! `off`, `prepend_listener`, `emit`, ...) but never runs a listener body
//! inside `emit`. Each registered listener is replaced by a wrapper that
//! submits the body to a bounded FIFO [`Scheduler`].
//!
//! ## Flow
//! ```text
//! on(event, L) ──► ListenerBridge::wrap ──► record (event, L) → W ──► Dispatcher::add(W)
//!
//! emit(event, p) ──► Dispatcher::prepare_emit ──► [W1, W2, ...]   (lock released)
//!                        └─► W1(p) ──► Scheduler::submit(L1.call(p)) ──► TaskHandle
//!                        └─► W2(p) ──► Scheduler::submit(L2.call(p)) ──► TaskHandle
//!
//! off(event, L) ──► ListenerBridge::resolve_for_removal ──► W ──► Dispatcher::remove(W)
//! ```
//!
//! ## Rules
//! - `emit` never blocks on listener work and never sees listener errors.
//! - With `concurrency == 1` listener bodies complete in submission order.
//! - Emitting an event nobody listens to never touches the scheduler.
//! - Removing an unknown listener is a no-op.
//! - `is_empty()` is a poll-friendly drain probe; `wait_idle()` is the awaitable variant.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::core::bridge::{ListenerBridge, RawListener};
use crate::core::builder::EmitterBuilder;
use crate::core::config::Config;
use crate::core::forwarder::Forwarder;
use crate::events::{Bus, Event, EventKind};
use crate::listeners::ListenerRef;
use crate::pubsub::{Dispatcher, Registration};
use crate::scheduler::{Scheduler, TaskHandle};

struct Inner<T> {
    dispatcher: Arc<Mutex<Dispatcher<T, TaskHandle>>>,
    bridge: ListenerBridge<T>,
    scheduler: Arc<Scheduler>,
    bus: Bus,
    forwarder: Mutex<Option<Forwarder>>,
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        if let Some(fwd) = self.forwarder.get_mut().as_ref() {
            fwd.abort();
        }
    }
}

/// Event emitter whose listeners run on a bounded-concurrency task queue.
///
/// Cloning is cheap and yields a handle to the same emitter.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use queue_emitter::{Config, ListenerFn, ListenerRef, QueueEmitter, TaskError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let emitter: QueueEmitter<u32> = QueueEmitter::new(Config::default());
///     let seen = Arc::new(Mutex::new(Vec::new()));
///
///     let sink = Arc::clone(&seen);
///     let listener: ListenerRef<u32> = ListenerFn::arc("collect", move |n: u32| {
///         let sink = Arc::clone(&sink);
///         async move {
///             sink.lock().push(n);
///             Ok::<_, TaskError>(())
///         }
///     });
///
///     emitter.on("number", Arc::clone(&listener));
///     assert!(emitter.emit("number", 1));
///     assert!(emitter.emit("number", 2));
///
///     emitter.wait_idle().await;
///     assert_eq!(*seen.lock(), vec![1, 2]);
///
///     emitter.off("number", &listener);
///     assert!(!emitter.emit("number", 3));
/// }
/// ```
pub struct QueueEmitter<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for QueueEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> QueueEmitter<T> {
    /// Creates an emitter without subscribers.
    ///
    /// Does not require a runtime; listener work only runs inside one.
    pub fn new(cfg: Config) -> Self {
        EmitterBuilder::new(cfg).build()
    }

    /// Returns a builder for an emitter with subscribers.
    pub fn builder(cfg: Config) -> EmitterBuilder<T> {
        EmitterBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: &Config,
        bus: Bus,
        scheduler: Arc<Scheduler>,
        forwarder: Option<Forwarder>,
    ) -> Self {
        let dispatcher = Arc::new(Mutex::new(Dispatcher::new(cfg.max_listeners)));
        let bridge = ListenerBridge::new(Arc::clone(&scheduler), Arc::downgrade(&dispatcher));
        Self {
            inner: Arc::new(Inner {
                dispatcher,
                bridge,
                scheduler,
                bus,
                forwarder: Mutex::new(forwarder),
            }),
        }
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Appends `listener` to the list of `event`.
    pub fn on(&self, event: &str, listener: ListenerRef<T>) -> &Self {
        self.register(event, listener, Registration::ON)
    }

    /// Alias for [`on`](Self::on).
    pub fn add_listener(&self, event: &str, listener: ListenerRef<T>) -> &Self {
        self.on(event, listener)
    }

    /// Appends `listener` for the next emission of `event` only.
    pub fn once(&self, event: &str, listener: ListenerRef<T>) -> &Self {
        self.register(event, listener, Registration::ONCE)
    }

    /// Inserts `listener` at the front of the list of `event`.
    pub fn prepend_listener(&self, event: &str, listener: ListenerRef<T>) -> &Self {
        self.register(event, listener, Registration::PREPEND)
    }

    /// Inserts `listener` at the front, for the next emission only.
    pub fn prepend_once_listener(&self, event: &str, listener: ListenerRef<T>) -> &Self {
        self.register(event, listener, Registration::PREPEND_ONCE)
    }

    fn register(&self, event: &str, listener: ListenerRef<T>, how: Registration) -> &Self {
        let name: Arc<str> = Arc::from(listener.name());
        let wrapper = if how.once {
            self.inner.bridge.wrap_once(event, listener)
        } else {
            self.inner.bridge.wrap(event, listener)
        };

        let (exceeded, count) = {
            let mut dispatcher = self.inner.dispatcher.lock();
            let exceeded = dispatcher.add(event, wrapper, how);
            (exceeded, dispatcher.listener_count(event))
        };

        self.publish(|| {
            Event::new(EventKind::ListenerAdded)
                .with_event(event)
                .with_listener(name)
                .with_count(count)
        });
        if let Some(hit) = exceeded {
            self.inner.bus.publish(
                Event::new(EventKind::MaxListenersExceeded)
                    .with_event(Arc::clone(&hit.event))
                    .with_count(hit.count)
                    .with_reason(format!(
                        "{} listeners added for {:?}, limit is {}; use set_max_listeners() to raise it",
                        hit.count, hit.event, hit.limit
                    )),
            );
        }
        self
    }

    // ---------------------------
    // Removal
    // ---------------------------

    /// Removes one registration of `listener` for `event` (the earliest one).
    ///
    /// Unknown listeners are ignored.
    pub fn off(&self, event: &str, listener: &ListenerRef<T>) -> &Self {
        if let Some(wrapper) = self.inner.bridge.resolve_for_removal(event, listener) {
            let removed = self.inner.dispatcher.lock().remove(event, &wrapper);
            if removed {
                self.publish(|| {
                    Event::new(EventKind::ListenerRemoved)
                        .with_event(event)
                        .with_listener(listener.name())
                });
            }
        }
        self
    }

    /// Alias for [`off`](Self::off).
    pub fn remove_listener(&self, event: &str, listener: &ListenerRef<T>) -> &Self {
        self.off(event, listener)
    }

    /// Removes every listener of every event.
    ///
    /// Work already submitted keeps running.
    pub fn remove_all_listeners(&self) -> &Self {
        self.inner.bridge.clear_all();
        let removed = self.inner.dispatcher.lock().remove_all();
        if removed > 0 {
            self.publish(|| Event::new(EventKind::ListenersCleared).with_count(removed));
        }
        self
    }

    /// Removes every listener of `event`.
    pub fn remove_event_listeners(&self, event: &str) -> &Self {
        self.inner.bridge.clear_event(event);
        let removed = self.inner.dispatcher.lock().remove_event(event);
        if removed > 0 {
            self.publish(|| {
                Event::new(EventKind::ListenersCleared)
                    .with_event(event)
                    .with_count(removed)
            });
        }
        self
    }

    // ---------------------------
    // Emission
    // ---------------------------

    /// Queues one invocation per registered listener of `event`.
    ///
    /// Returns `true` if the event had listeners.
    pub fn emit(&self, event: &str, payload: T) -> bool {
        !self.dispatch(event, payload).is_empty()
    }

    /// Like [`emit`](Self::emit), but returns the completion handle of every
    /// queued invocation, in submission order.
    ///
    /// An invocation that would start outside a Tokio runtime is dropped; its
    /// handle resolves to [`TaskError::Canceled`](crate::TaskError::Canceled).
    pub fn dispatch(&self, event: &str, payload: T) -> Vec<TaskHandle> {
        let wrappers = self.inner.dispatcher.lock().prepare_emit(event);
        wrappers.into_iter().map(|w| w(payload.clone())).collect()
    }

    // ---------------------------
    // Introspection
    // ---------------------------

    /// Number of registrations for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.dispatcher.lock().listener_count(event)
    }

    /// Original listeners registered for `event`, in registration order.
    pub fn listeners(&self, event: &str) -> Vec<ListenerRef<T>> {
        self.inner.bridge.listeners(event)
    }

    /// Wrappers held for `event`, in invocation order.
    ///
    /// Calling one submits the wrapped listener directly. A once-wrapper called
    /// this way consumes its registration, so a later `emit` skips it.
    pub fn raw_listeners(&self, event: &str) -> Vec<RawListener<T>> {
        self.inner.dispatcher.lock().raw_listeners(event)
    }

    /// Events with at least one listener.
    pub fn event_names(&self) -> Vec<Arc<str>> {
        self.inner.dispatcher.lock().event_names()
    }

    /// Per-event listener limit (0 = unlimited).
    pub fn max_listeners(&self) -> usize {
        self.inner.dispatcher.lock().max_listeners()
    }

    /// Changes the per-event listener limit (0 = unlimited).
    pub fn set_max_listeners(&self, n: usize) -> &Self {
        self.inner.dispatcher.lock().set_max_listeners(n);
        self
    }

    // ---------------------------
    // Drain
    // ---------------------------

    /// `true` iff no listener invocation is queued or running.
    pub fn is_empty(&self) -> bool {
        self.inner.bridge.drain_status()
    }

    /// Waits until no listener invocation is queued or running.
    pub async fn wait_idle(&self) {
        self.inner.scheduler.wait_idle().await;
    }

    /// Invocations waiting for a slot.
    pub fn queued_count(&self) -> usize {
        self.inner.scheduler.queued_count()
    }

    /// Invocations currently running.
    pub fn running_count(&self) -> usize {
        self.inner.scheduler.running_count()
    }

    /// Concurrency bound fixed at construction.
    pub fn concurrency(&self) -> usize {
        self.inner.scheduler.concurrency()
    }

    // ---------------------------
    // Events
    // ---------------------------

    /// Receiver for runtime events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    /// Stops delivering runtime events to subscribers and waits until they
    /// processed everything already delivered. Listener work is unaffected.
    pub async fn shutdown(&self) {
        let forwarder = self.inner.forwarder.lock().take();
        if let Some(fwd) = forwarder {
            fwd.stop().await;
        }
    }

    fn publish(&self, build: impl FnOnce() -> Event) {
        if self.inner.bus.has_receivers() {
            self.inner.bus.publish(build());
        }
    }
}

impl<T: Clone + Send + 'static> Default for QueueEmitter<T> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<T> std::fmt::Debug for QueueEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueEmitter")
            .field("scheduler", &self.inner.scheduler)
            .field("listeners", &*self.inner.dispatcher.lock())
            .finish()
    }
}
