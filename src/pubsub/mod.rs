//! # Publish/subscribe primitive.
//!
//! [`Dispatcher`] is the plain, synchronous emitter the queue-aware facade is
//! built on: per-event ordered lists, once-entries, prepending, listener
//! limits. It never schedules anything itself.

mod dispatcher;

pub use dispatcher::{
    Callback, DEFAULT_MAX_LISTENERS, Dispatcher, ListenerLimitExceeded, Registration,
};
