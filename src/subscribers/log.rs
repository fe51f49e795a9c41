//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [listener-added] event="order" listener="audit" count=1
//! [starting] task=1 event="order" listener="audit" running=1
//! [queued] task=2 event="order" listener="mailer" queued=1
//! [finished] task=1 event="order" listener="audit"
//! [idle]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn or_dash(v: &Option<std::sync::Arc<str>>) -> &str {
    v.as_deref().unwrap_or("-")
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task_id.unwrap_or_default();
        match e.kind {
            EventKind::TaskQueued => println!(
                "[queued] task={task} event={:?} listener={:?} queued={}",
                or_dash(&e.event),
                or_dash(&e.listener),
                e.queued.unwrap_or_default()
            ),
            EventKind::TaskStarting => println!(
                "[starting] task={task} event={:?} listener={:?} running={}",
                or_dash(&e.event),
                or_dash(&e.listener),
                e.running.unwrap_or_default()
            ),
            EventKind::TaskFinished => println!(
                "[finished] task={task} event={:?} listener={:?}",
                or_dash(&e.event),
                or_dash(&e.listener)
            ),
            EventKind::SchedulerIdle => println!("[idle]"),
            EventKind::ListenerAdded => println!(
                "[listener-added] event={:?} listener={:?} count={}",
                or_dash(&e.event),
                or_dash(&e.listener),
                e.count.unwrap_or_default()
            ),
            EventKind::ListenerRemoved => println!(
                "[listener-removed] event={:?} listener={:?}",
                or_dash(&e.event),
                or_dash(&e.listener)
            ),
            EventKind::ListenersCleared => {
                println!("[listeners-cleared] event={:?}", or_dash(&e.event))
            }
            EventKind::MaxListenersExceeded => println!(
                "[max-listeners-exceeded] event={:?} count={} {}",
                or_dash(&e.event),
                e.count.unwrap_or_default(),
                or_dash(&e.reason)
            ),
            EventKind::SubscriberOverflow => println!(
                "[subscriber-overflow] subscriber={:?} reason={:?}",
                e.subscriber.unwrap_or("unknown"),
                or_dash(&e.reason)
            ),
            EventKind::SubscriberPanicked => println!(
                "[subscriber-panicked] subscriber={} info={}",
                e.subscriber.unwrap_or("unknown"),
                or_dash(&e.reason)
            ),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
