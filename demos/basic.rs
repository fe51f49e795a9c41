//! # Example: basic
//!
//! Registers a slow and a fast listener on two events, emits a burst, and
//! shows that with two slots listener work starts in emission order but can
//! finish out of it.
//!
//! Shows how to:
//! - Build listeners with [`ListenerFn`].
//! - Register with `on` / `once` and remove with `off`.
//! - Drain the queue with [`QueueEmitter::wait_idle`].
//! - Observe runtime events with a custom [`Subscribe`] implementation.
//!
//! ## Flow
//! ```text
//! emit("first", 3) ──► slow(3)  ─┐
//! emit("second", 1) ─► fast(1)  ─┼─► Scheduler (2 slots, FIFO)
//! emit("first", 2) ──► slow(2)  ─┘
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::{sync::Arc, time::Duration};

use queue_emitter::{
    Config, Event, EventKind, ListenerFn, ListenerRef, QueueEmitter, Subscribe, TaskError,
};

/// Prints when a listener body starts and finishes.
struct ConsoleSubscriber;

#[async_trait::async_trait]
impl Subscribe for ConsoleSubscriber {
    async fn on_event(&self, ev: &Event) {
        let listener = ev.listener.as_deref().unwrap_or("<unknown>");
        match ev.kind {
            EventKind::TaskStarting => println!(
                "[sub] starting: task={} listener={listener}",
                ev.task_id.unwrap_or_default()
            ),
            EventKind::TaskFinished => println!(
                "[sub] finished: task={} listener={listener}",
                ev.task_id.unwrap_or_default()
            ),
            EventKind::SchedulerIdle => println!("[sub] idle"),
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

fn sleeper(name: &'static str, ms: u64) -> ListenerRef<u32> {
    ListenerFn::arc(name, move |n: u32| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        println!("[{name}] handled {n} after {ms}ms");
        Ok::<(), TaskError>(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let emitter: QueueEmitter<u32> = QueueEmitter::builder(Config {
        concurrency: 2,
        ..Config::default()
    })
    .with_subscribers(vec![Arc::new(ConsoleSubscriber) as Arc<dyn Subscribe>])
    .build();

    let slow = sleeper("slow", 30);
    let fast = sleeper("fast", 10);

    emitter.on("first", Arc::clone(&slow));
    emitter.on("second", Arc::clone(&fast));
    emitter.once("second", sleeper("welcome", 1));

    for (event, n) in [("first", 3), ("second", 1), ("first", 2), ("first", 4), ("second", 5)] {
        emitter.emit(event, n);
    }
    println!(
        "[main] running={} queued={}",
        emitter.running_count(),
        emitter.queued_count()
    );

    emitter.wait_idle().await;

    emitter.off("first", &slow);
    println!("[main] 'first' still has listeners: {}", emitter.emit("first", 6));

    emitter.shutdown().await;
    Ok(())
}
