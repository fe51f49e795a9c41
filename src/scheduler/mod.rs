//! # Bounded task scheduler.
//!
//! - [`Scheduler`] runs at most `concurrency` tasks at once, FIFO start order
//! - [`TaskHandle`] per-task completion future
//! - [`TaskOrigin`] labels attached to scheduler events

mod bounded;
mod handle;

pub use bounded::{Scheduler, TaskOrigin};
pub use handle::TaskHandle;
