//! # Conventional single-threaded event dispatcher.
//!
//! [`Dispatcher`] keeps an ordered callback list per event name and invokes
//! the list synchronously on emit. It knows nothing about scheduling: the
//! emitter facade feeds it queue-aware wrappers and guards it with a lock.
//!
//! ## Rules
//! - Callbacks run in list order; `prepend` registrations go to the front.
//! - A `once` entry is removed from its list **before** it is invoked.
//! - The list is snapshotted before invocation: callbacks added or removed
//!   during an emit take effect on the next emit.
//! - `remove` drops the most recently added entry with the same callback.
//! - Empty lists are dropped, so `event_names` only reports live events.
//! - A list growing past `max_listeners` (0 = unlimited) is reported once per
//!   event name; registration still succeeds.

use std::sync::Arc;

use indexmap::IndexMap;

/// Default per-event listener limit before a warning is reported.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Callback stored by the dispatcher.
pub type Callback<T, R> = Arc<dyn Fn(T) -> R + Send + Sync>;

/// How a callback is inserted into its event list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registration {
    /// Remove the entry after its first invocation.
    pub once: bool,
    /// Insert at the front instead of the back.
    pub prepend: bool,
}

impl Registration {
    /// Persistent, appended.
    pub const ON: Self = Self {
        once: false,
        prepend: false,
    };
    /// One-shot, appended.
    pub const ONCE: Self = Self {
        once: true,
        prepend: false,
    };
    /// Persistent, prepended.
    pub const PREPEND: Self = Self {
        once: false,
        prepend: true,
    };
    /// One-shot, prepended.
    pub const PREPEND_ONCE: Self = Self {
        once: true,
        prepend: true,
    };
}

/// Returned by [`Dispatcher::add`] the first time an event crosses the limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerLimitExceeded {
    /// Event whose list crossed the limit.
    pub event: Arc<str>,
    /// Current list length.
    pub count: usize,
    /// Configured limit.
    pub limit: usize,
}

struct Entry<T, R> {
    callback: Callback<T, R>,
    once: bool,
}

struct EventList<T, R> {
    entries: Vec<Entry<T, R>>,
    warned: bool,
}

/// Ordered per-event callback lists.
pub struct Dispatcher<T, R> {
    events: IndexMap<Arc<str>, EventList<T, R>>,
    max_listeners: usize,
}

impl<T, R> Dispatcher<T, R> {
    /// Creates an empty dispatcher with the given listener limit (0 = unlimited).
    pub fn new(max_listeners: usize) -> Self {
        Self {
            events: IndexMap::new(),
            max_listeners,
        }
    }

    /// Registers `callback` for `event`.
    pub fn add(
        &mut self,
        event: &str,
        callback: Callback<T, R>,
        how: Registration,
    ) -> Option<ListenerLimitExceeded> {
        let limit = self.max_listeners;
        let index = match self.events.get_index_of(event) {
            Some(index) => index,
            None => {
                let list = EventList {
                    entries: Vec::new(),
                    warned: false,
                };
                self.events.insert_full(Arc::from(event), list).0
            }
        };
        let (key, list) = self.events.get_index_mut(index)?;

        let entry = Entry {
            callback,
            once: how.once,
        };
        if how.prepend {
            list.entries.insert(0, entry);
        } else {
            list.entries.push(entry);
        }

        let count = list.entries.len();
        if limit > 0 && count > limit && !list.warned {
            list.warned = true;
            return Some(ListenerLimitExceeded {
                event: Arc::clone(key),
                count,
                limit,
            });
        }
        None
    }

    /// Removes the most recently added entry holding `callback`.
    ///
    /// Returns `false` (and changes nothing) when no such entry exists.
    pub fn remove(&mut self, event: &str, callback: &Callback<T, R>) -> bool {
        let Some(list) = self.events.get_mut(event) else {
            return false;
        };
        let Some(pos) = list
            .entries
            .iter()
            .rposition(|e| std::ptr::addr_eq(Arc::as_ptr(&e.callback), Arc::as_ptr(callback)))
        else {
            return false;
        };

        list.entries.remove(pos);
        if list.entries.is_empty() {
            self.events.shift_remove(event);
        }
        true
    }

    /// Drops every entry for `event`. Returns how many were removed.
    pub fn remove_event(&mut self, event: &str) -> usize {
        self.events
            .shift_remove(event)
            .map_or(0, |list| list.entries.len())
    }

    /// Drops every entry for every event. Returns how many were removed.
    pub fn remove_all(&mut self) -> usize {
        let removed = self.events.values().map(|l| l.entries.len()).sum();
        self.events.clear();
        removed
    }

    /// Snapshots the callbacks to invoke for one emission of `event`.
    ///
    /// Once-entries are removed from the list as part of the snapshot.
    pub fn prepare_emit(&mut self, event: &str) -> Vec<Callback<T, R>> {
        let Some(list) = self.events.get_mut(event) else {
            return Vec::new();
        };

        let snapshot = list
            .entries
            .iter()
            .map(|e| Arc::clone(&e.callback))
            .collect();

        list.entries.retain(|e| !e.once);
        if list.entries.is_empty() {
            self.events.shift_remove(event);
        }
        snapshot
    }

    /// Number of entries registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, |l| l.entries.len())
    }

    /// Registered callbacks for `event`, in invocation order.
    pub fn raw_listeners(&self, event: &str) -> Vec<Callback<T, R>> {
        self.events.get(event).map_or_else(Vec::new, |l| {
            l.entries.iter().map(|e| Arc::clone(&e.callback)).collect()
        })
    }

    /// Events that currently have at least one entry, in first-registration order.
    pub fn event_names(&self) -> Vec<Arc<str>> {
        self.events.keys().cloned().collect()
    }

    /// Current per-event listener limit (0 = unlimited).
    #[inline]
    pub fn max_listeners(&self) -> usize {
        self.max_listeners
    }

    /// Changes the per-event listener limit (0 = unlimited).
    #[inline]
    pub fn set_max_listeners(&mut self, n: usize) {
        self.max_listeners = n;
    }
}

impl<T: Clone, R> Dispatcher<T, R> {
    /// Invokes every callback registered for `event` and collects their results.
    ///
    /// An empty result means nobody was listening.
    pub fn emit(&mut self, event: &str, payload: T) -> Vec<R> {
        self.prepare_emit(event)
            .into_iter()
            .map(|cb| cb(payload.clone()))
            .collect()
    }
}

impl<T, R> Default for Dispatcher<T, R> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LISTENERS)
    }
}

impl<T, R> std::fmt::Debug for Dispatcher<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, list) in &self.events {
            map.entry(name, &list.entries.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(label: &'static str) -> Callback<u32, String> {
        Arc::new(move |n: u32| format!("{label}{n}"))
    }

    #[test]
    fn test_emit_in_registration_order() {
        let mut d = Dispatcher::default();
        d.add("ev", tag("a"), Registration::ON);
        d.add("ev", tag("b"), Registration::ON);
        d.add("ev", tag("c"), Registration::PREPEND);

        assert_eq!(d.emit("ev", 1), vec!["c1", "a1", "b1"]);
        assert_eq!(d.emit("ev", 2), vec!["c2", "a2", "b2"]);
    }

    #[test]
    fn test_emit_without_listeners() {
        let mut d: Dispatcher<u32, String> = Dispatcher::default();
        assert!(d.emit("nobody", 1).is_empty());
    }

    #[test]
    fn test_once_removed_before_invocation() {
        let mut d = Dispatcher::default();
        d.add("ev", tag("keep"), Registration::ON);
        d.add("ev", tag("once"), Registration::ONCE);
        d.add("ev", tag("first"), Registration::PREPEND_ONCE);

        assert_eq!(d.emit("ev", 1), vec!["first1", "keep1", "once1"]);
        assert_eq!(d.listener_count("ev"), 1);
        assert_eq!(d.emit("ev", 2), vec!["keep2"]);
    }

    #[test]
    fn test_once_only_list_is_dropped() {
        let mut d = Dispatcher::default();
        d.add("ev", tag("once"), Registration::ONCE);
        assert_eq!(d.emit("ev", 1).len(), 1);
        assert!(d.event_names().is_empty());
    }

    #[test]
    fn test_remove_takes_last_matching_entry() {
        let mut d = Dispatcher::default();
        let shared = tag("s");
        let other = tag("o");
        d.add("ev", Arc::clone(&shared), Registration::ON);
        d.add("ev", Arc::clone(&other), Registration::ON);
        d.add("ev", Arc::clone(&shared), Registration::ONCE);

        assert!(d.remove("ev", &shared));
        // the once entry (last) went away, the persistent one stays
        assert_eq!(d.emit("ev", 1), vec!["s1", "o1"]);
        assert_eq!(d.emit("ev", 2), vec!["s2", "o2"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut d = Dispatcher::default();
        d.add("ev", tag("a"), Registration::ON);

        assert!(!d.remove("ev", &tag("a")));
        assert!(!d.remove("missing", &tag("a")));
        assert_eq!(d.listener_count("ev"), 1);
    }

    #[test]
    fn test_bulk_removal() {
        let mut d = Dispatcher::default();
        d.add("a", tag("a"), Registration::ON);
        d.add("b", tag("b"), Registration::ON);
        d.add("b", tag("b"), Registration::ON);

        assert_eq!(d.remove_event("b"), 2);
        assert_eq!(d.remove_event("b"), 0);
        assert_eq!(d.remove_all(), 1);
        assert_eq!(d.remove_all(), 0);
        assert!(d.event_names().is_empty());
    }

    #[test]
    fn test_event_names_keep_first_registration_order() {
        let mut d = Dispatcher::default();
        let b = tag("b");
        d.add("b", Arc::clone(&b), Registration::ON);
        d.add("a", tag("a"), Registration::ON);
        d.add("c", tag("c"), Registration::ON);
        d.remove("b", &b);
        d.add("b", b, Registration::ON);

        let names: Vec<String> = d.event_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_limit_reported_once_per_event() {
        let mut d = Dispatcher::new(2);
        assert!(d.add("ev", tag("1"), Registration::ON).is_none());
        assert!(d.add("ev", tag("2"), Registration::ON).is_none());

        let hit = d.add("ev", tag("3"), Registration::ON).unwrap();
        assert_eq!(hit.count, 3);
        assert_eq!(hit.limit, 2);
        assert_eq!(&*hit.event, "ev");

        assert!(d.add("ev", tag("4"), Registration::ON).is_none());
        assert_eq!(d.listener_count("ev"), 4);
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let mut d = Dispatcher::new(0);
        for _ in 0..100 {
            assert!(d.add("ev", tag("x"), Registration::ON).is_none());
        }
        d.set_max_listeners(50);
        assert_eq!(d.max_listeners(), 50);
    }
}
