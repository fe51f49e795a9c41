//! # Runtime event subscribers.
//!
//! ## Architecture
//! ```text
//! Scheduler / QueueEmitter ── publish(Event) ──► Bus ──► forwarder ──► SubscriberSet
//!                                                                          │
//!                                                             ┌────────────┼──────────┐
//!                                                             ▼            ▼          ▼
//!                                                        LogWriter      Metrics    Custom
//! ```
//!
//! Subscribers are passed to [`EmitterBuilder::with_subscribers`](crate::EmitterBuilder::with_subscribers).

mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
mod log;

pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
