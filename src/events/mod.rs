//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish runtime events from the scheduler, the emitter facade and the
//! subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Scheduler` (queued/starting/finished/idle), `QueueEmitter`
//!   (listener table changes), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the forwarder spawned by `EmitterBuilder::build`, which fans
//!   events out to a `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
