//! # Emitter configuration.
//!
//! Provides [`Config`], the settings a [`QueueEmitter`](crate::QueueEmitter)
//! is built from. Everything here is fixed for the lifetime of the instance
//! except the listener limit, which has a setter on the emitter.
//!
//! ## Sentinel values
//! - `concurrency = 0` → treated as `1`
//! - `max_listeners = 0` → unlimited (no warning is ever published)
//! - `bus_capacity = 0` → clamped to `1`

use crate::pubsub::DEFAULT_MAX_LISTENERS;

/// Configuration for a [`QueueEmitter`](crate::QueueEmitter).
///
/// ## Field semantics
/// - `concurrency`: listener bodies running at once (`0` = `1`)
/// - `max_listeners`: per-event listener count before `MaxListenersExceeded` is published (`0` = unlimited)
/// - `bus_capacity`: event bus ring buffer size (min 1)
///
/// ## Example
/// ```
/// use queue_emitter::Config;
///
/// let cfg = Config { concurrency: 0, ..Config::default() };
/// assert_eq!(cfg.concurrency_clamped(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of listener bodies executing concurrently.
    ///
    /// With `1`, listeners complete strictly in emission order.
    pub concurrency: usize,

    /// Per-event listener limit before a warning event is published.
    ///
    /// Registration beyond the limit still succeeds.
    pub max_listeners: usize,

    /// Capacity of the runtime event bus.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events skip
    /// older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a concurrency bound of at least 1.
    #[inline]
    pub fn concurrency_clamped(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `concurrency = 1` (strict FIFO)
    /// - `max_listeners = 10`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            concurrency: 1,
            max_listeners: DEFAULT_MAX_LISTENERS,
            bus_capacity: 1024,
        }
    }
}
