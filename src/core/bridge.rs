//! # Listener bridge: original listener ⇄ queue-aware wrapper.
//!
//! The dispatcher only ever sees wrappers. The bridge builds them and keeps a
//! per-event record table so that removal by the caller's original
//! [`ListenerRef`] can find the wrapper the dispatcher actually holds.
//!
//! ## Identity policy
//! One record per registration call. Registering the same listener twice for
//! one event yields two records (and two dispatcher entries); each removal by
//! reference drops exactly one of them, the earliest-registered first.
//!
//! ## Rules
//! - Records live in an instance-owned table (never process-wide).
//! - A once-wrapper deletes its own record (by record id) and its own
//!   dispatcher entry synchronously, **before** submitting work, on its first
//!   invocation. Calling it directly (via `raw_listeners`) consumes the
//!   registration exactly like an emit does.
//! - Wrappers hold only `Weak` references to the table and the dispatcher, so
//!   records holding wrappers never keep either alive.
//! - Unknown removals resolve to `None` and change nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::listeners::{ListenerRef, same_listener};
use crate::pubsub::{Callback, Dispatcher};
use crate::scheduler::{Scheduler, TaskHandle, TaskOrigin};

/// Wrapper callback handed to the dispatcher in place of a listener.
pub type RawListener<T> = Callback<T, TaskHandle>;

struct Record<T> {
    id: u64,
    listener: ListenerRef<T>,
    wrapper: RawListener<T>,
}

struct RecordTable<T> {
    by_event: HashMap<Arc<str>, Vec<Record<T>>>,
}

impl<T> RecordTable<T> {
    fn push(&mut self, event: &str, record: Record<T>) {
        match self.by_event.get_mut(event) {
            Some(records) => records.push(record),
            None => {
                self.by_event.insert(Arc::from(event), vec![record]);
            }
        }
    }

    fn remove_where(
        &mut self,
        event: &str,
        pred: impl Fn(&Record<T>) -> bool,
    ) -> Option<Record<T>> {
        let records = self.by_event.get_mut(event)?;
        let pos = records.iter().position(pred)?;
        let record = records.remove(pos);
        if records.is_empty() {
            self.by_event.remove(event);
        }
        Some(record)
    }
}

/// Owns the record table and builds wrappers that submit to the scheduler.
pub(crate) struct ListenerBridge<T> {
    records: Arc<Mutex<RecordTable<T>>>,
    dispatcher: Weak<Mutex<Dispatcher<T, TaskHandle>>>,
    scheduler: Arc<Scheduler>,
    next_id: AtomicU64,
}

impl<T: Send + 'static> ListenerBridge<T> {
    pub(crate) fn new(
        scheduler: Arc<Scheduler>,
        dispatcher: Weak<Mutex<Dispatcher<T, TaskHandle>>>,
    ) -> Self {
        Self {
            records: Arc::new(Mutex::new(RecordTable {
                by_event: HashMap::new(),
            })),
            dispatcher,
            scheduler,
            next_id: AtomicU64::new(1),
        }
    }

    /// Builds and records a wrapper for a persistent registration.
    pub(crate) fn wrap(&self, event: &str, listener: ListenerRef<T>) -> RawListener<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let origin = TaskOrigin::listener(event, listener.name());
        let scheduler = Arc::clone(&self.scheduler);
        let target = Arc::clone(&listener);

        let wrapper: RawListener<T> = Arc::new(move |payload: T| {
            let target = Arc::clone(&target);
            scheduler.submit(origin.clone(), move || target.call(payload))
        });

        self.records.lock().push(
            event,
            Record {
                id,
                listener,
                wrapper: Arc::clone(&wrapper),
            },
        );
        wrapper
    }

    /// Builds and records a wrapper for a once registration.
    pub(crate) fn wrap_once(&self, event: &str, listener: ListenerRef<T>) -> RawListener<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let origin = TaskOrigin::listener(event, listener.name());
        let scheduler = Arc::clone(&self.scheduler);
        let target = Arc::clone(&listener);
        let table: Weak<Mutex<RecordTable<T>>> = Arc::downgrade(&self.records);
        let dispatcher = Weak::clone(&self.dispatcher);
        let key: Arc<str> = Arc::from(event);

        let wrapper: RawListener<T> = Arc::new(move |payload: T| {
            let record = match table.upgrade() {
                Some(table) => {
                    let mut records = table.lock();
                    records.remove_where(&key, |r| r.id == id)
                }
                None => None,
            };
            // No-op when an emit already took the entry out.
            if let (Some(record), Some(dispatcher)) = (record, dispatcher.upgrade()) {
                dispatcher.lock().remove(&key, &record.wrapper);
            }
            let target = Arc::clone(&target);
            scheduler.submit(origin.clone(), move || target.call(payload))
        });

        self.records.lock().push(
            event,
            Record {
                id,
                listener,
                wrapper: Arc::clone(&wrapper),
            },
        );
        wrapper
    }

    /// Removes the earliest record of `listener` for `event` and returns its wrapper.
    pub(crate) fn resolve_for_removal(
        &self,
        event: &str,
        listener: &ListenerRef<T>,
    ) -> Option<RawListener<T>> {
        self.records
            .lock()
            .remove_where(event, |r| same_listener(&r.listener, listener))
            .map(|r| r.wrapper)
    }

    /// Drops every record.
    pub(crate) fn clear_all(&self) {
        self.records.lock().by_event.clear();
    }

    /// Drops every record of one event.
    pub(crate) fn clear_event(&self, event: &str) {
        self.records.lock().by_event.remove(event);
    }

    /// Original listeners registered for `event`, in registration order.
    pub(crate) fn listeners(&self, event: &str) -> Vec<ListenerRef<T>> {
        self.records.lock().by_event.get(event).map_or_else(Vec::new, |records| {
            records.iter().map(|r| Arc::clone(&r.listener)).collect()
        })
    }

    /// `true` when every dispatched invocation has finished running.
    pub(crate) fn drain_status(&self) -> bool {
        self.scheduler.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::events::Bus;
    use crate::listeners::ListenerFn;

    fn bridge() -> ListenerBridge<u32> {
        ListenerBridge::new(Scheduler::new(1, Bus::new(1)), Weak::new())
    }

    type SharedDispatcher = Arc<Mutex<Dispatcher<u32, TaskHandle>>>;

    fn bridge_with_dispatcher() -> (ListenerBridge<u32>, SharedDispatcher) {
        let dispatcher = Arc::new(Mutex::new(Dispatcher::default()));
        let b = ListenerBridge::new(Scheduler::new(1, Bus::new(1)), Arc::downgrade(&dispatcher));
        (b, dispatcher)
    }

    fn noop(name: &'static str) -> ListenerRef<u32> {
        ListenerFn::arc(name, |_: u32| async { Ok::<_, TaskError>(()) })
    }

    fn is_same(a: &RawListener<u32>, b: &RawListener<u32>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
    }

    #[test]
    fn test_resolve_returns_recorded_wrapper() {
        let b = bridge();
        let l = noop("l");
        let w = b.wrap("ev", Arc::clone(&l));

        let resolved = b.resolve_for_removal("ev", &l).unwrap();
        assert!(is_same(&w, &resolved));
        assert!(b.resolve_for_removal("ev", &l).is_none());
    }

    #[test]
    fn test_duplicates_resolve_in_registration_order() {
        let b = bridge();
        let l = noop("l");
        let first = b.wrap("ev", Arc::clone(&l));
        let second = b.wrap_once("ev", Arc::clone(&l));
        assert_eq!(b.listeners("ev").len(), 2);

        assert!(is_same(&b.resolve_for_removal("ev", &l).unwrap(), &first));
        assert!(is_same(&b.resolve_for_removal("ev", &l).unwrap(), &second));
        assert!(b.listeners("ev").is_empty());
    }

    #[test]
    fn test_unknown_listener_resolves_to_none() {
        let b = bridge();
        let known = noop("known");
        let stranger = noop("stranger");
        b.wrap("ev", Arc::clone(&known));

        assert!(b.resolve_for_removal("ev", &stranger).is_none());
        assert!(b.resolve_for_removal("other", &known).is_none());
        assert_eq!(b.listeners("ev").len(), 1);
    }

    #[test]
    fn test_records_are_scoped_by_event() {
        let b = bridge();
        let l = noop("l");
        b.wrap("a", Arc::clone(&l));
        b.wrap("b", Arc::clone(&l));

        b.clear_event("a");
        assert!(b.listeners("a").is_empty());
        assert_eq!(b.listeners("b").len(), 1);

        b.clear_all();
        assert!(b.listeners("b").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_wrapper_drops_only_its_own_record() {
        let b = bridge();
        let l = noop("l");
        let persistent = b.wrap("ev", Arc::clone(&l));
        let once = b.wrap_once("ev", Arc::clone(&l));

        once(1).await.unwrap();
        assert_eq!(b.listeners("ev").len(), 1);
        assert!(is_same(&b.resolve_for_removal("ev", &l).unwrap(), &persistent));
        assert!(b.drain_status());
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_once_call_removes_dispatcher_entry() {
        let (b, dispatcher) = bridge_with_dispatcher();
        let l = noop("l");
        let once = b.wrap_once("ev", Arc::clone(&l));
        let persistent = b.wrap("ev", Arc::clone(&l));
        {
            let mut d = dispatcher.lock();
            d.add("ev", Arc::clone(&once), crate::pubsub::Registration::ONCE);
            d.add("ev", Arc::clone(&persistent), crate::pubsub::Registration::ON);
        }

        once(1).await.unwrap();

        let remaining = dispatcher.lock().raw_listeners("ev");
        assert_eq!(remaining.len(), 1);
        assert!(is_same(&remaining[0], &persistent));
        assert_eq!(b.listeners("ev").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_call_after_emit_leaves_others_alone() {
        let (b, dispatcher) = bridge_with_dispatcher();
        let l = noop("l");
        let once = b.wrap_once("ev", Arc::clone(&l));
        dispatcher
            .lock()
            .add("ev", Arc::clone(&once), crate::pubsub::Registration::ONCE);
        let persistent = b.wrap("ev", Arc::clone(&l));
        dispatcher
            .lock()
            .add("ev", Arc::clone(&persistent), crate::pubsub::Registration::ON);

        let snapshot = dispatcher.lock().prepare_emit("ev");
        for w in snapshot {
            w(1).await.unwrap();
        }

        assert_eq!(dispatcher.lock().listener_count("ev"), 1);
        assert_eq!(b.listeners("ev").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrapper_submits_to_scheduler() {
        let b = bridge();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let l: ListenerRef<u32> = ListenerFn::arc("sink", move |n: u32| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().push(n);
                Ok::<_, TaskError>(())
            }
        });

        let w = b.wrap("ev", l);
        let handle = w(42);
        assert!(!b.drain_status());
        handle.await.unwrap();
        assert_eq!(*seen.lock(), vec![42]);
    }
}
