//! # queue-emitter
//!
//! **queue-emitter** is an event emitter whose listeners run on a
//! bounded-concurrency FIFO task queue.
//!
//! `emit` never executes listener bodies inline: every registered listener is
//! replaced by a wrapper that submits the body to a [`Scheduler`]. With
//! `concurrency == 1` listener work completes strictly in emission order;
//! with a higher bound, up to `concurrency` bodies run at once and start in
//! submission order.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Listener A  │   │  Listener B  │   │  Listener C  │
//!     │ (ListenerFn) │   │ (ListenerFn) │   │ (user impl)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ on / once        ▼ prepend          ▼ on
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  QueueEmitter (facade)                                            │
//! │  - ListenerBridge (original listener → wrapper records)           │
//! │  - Dispatcher (per-event ordered wrapper lists)                   │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ emit(event, payload) ──► wrappers ──► submit
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler (bounded concurrency, FIFO pending queue)              │
//! │  - TaskHandle per submission                                      │
//! │  - publishes TaskQueued / TaskStarting / TaskFinished / Idle      │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                 (capacity: Config::bus_capacity)                  │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │       forwarder        │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                          (per-sub queues)
//!                        ┌─────────┼─────────┐
//!                        ▼         ▼         ▼
//!                     worker1   worker2   workerN
//! ```
//!
//! ### Lifecycle of one emission
//! ```text
//! emit("order", p)
//!   ├─► Dispatcher::prepare_emit  (snapshot, once-entries removed)
//!   ├─► for each wrapper W:
//!   │       ├─ once? ─► drop own bridge record
//!   │       └─ Scheduler::submit(listener.call(p))
//!   │              ├─ slot free ─► TaskStarting, spawn
//!   │              └─ all busy  ─► TaskQueued, wait in FIFO
//!   └─► return true (had listeners)
//!
//! task completes (Ok / Err / panic)
//!   ├─► TaskFinished, next pending job starts
//!   ├─► queue empty and nothing running ─► SchedulerIdle
//!   └─► TaskHandle resolves with the outcome
//! ```
//!
//! ## Features
//! | Area              | Description                                                       | Key types / traits                         |
//! |-------------------|-------------------------------------------------------------------|--------------------------------------------|
//! | **Emitter**       | Register, remove and emit; listener work is queued.               | [`QueueEmitter`], [`EmitterBuilder`]       |
//! | **Listeners**     | Async handlers, identified by their `Arc`.                        | [`Listener`], [`ListenerFn`], [`ListenerRef`] |
//! | **Scheduling**    | Bounded FIFO execution with per-task completion handles.          | [`Scheduler`], [`TaskHandle`]              |
//! | **Pub/sub**       | Plain synchronous dispatcher the facade is built on.              | [`Dispatcher`], [`Registration`]           |
//! | **Subscriber API**| Observe scheduler and registry events.                            | [`Subscribe`], [`Event`], [`EventKind`]    |
//! | **Errors**        | Listener outcomes.                                                | [`TaskError`]                              |
//! | **Configuration** | Concurrency, listener limit, bus capacity.                        | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use queue_emitter::{Config, ListenerFn, ListenerRef, QueueEmitter, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn queue_emitter::Subscribe>> = {
//!         use queue_emitter::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn queue_emitter::Subscribe>> = Vec::new();
//!
//!     let emitter: QueueEmitter<String> = QueueEmitter::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     let greet: ListenerRef<String> = ListenerFn::arc("greet", |name: String| async move {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!         println!("hello, {name}");
//!         Ok::<_, TaskError>(())
//!     });
//!
//!     emitter.on("greet", greet);
//!     emitter.emit("greet", "ferris".to_string());
//!
//!     // Listener work runs in the background; wait for the queue to drain.
//!     emitter.wait_idle().await;
//!     assert!(emitter.is_empty());
//!     emitter.shutdown().await;
//! }
//! ```
mod core;
mod error;
mod events;
mod listeners;
mod pubsub;
mod scheduler;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Config, EmitterBuilder, QueueEmitter, RawListener};
pub use error::TaskError;
pub use events::{Bus, Event, EventKind};
pub use listeners::{BoxListenerFuture, Listener, ListenerFn, ListenerRef, same_listener};
pub use pubsub::{Callback, DEFAULT_MAX_LISTENERS, Dispatcher, ListenerLimitExceeded, Registration};
pub use scheduler::{Scheduler, TaskHandle, TaskOrigin};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
