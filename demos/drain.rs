//! # Example: drain
//!
//! Emits a burst of jobs on a single slot, some of which fail, and drains the
//! queue by polling [`QueueEmitter::is_empty`]. Runtime events are printed by
//! the built-in [`LogWriter`].
//!
//! ## Run
//! ```bash
//! cargo run --example drain --features logging
//! ```

use std::{sync::Arc, time::Duration};

use queue_emitter::{
    Config, ListenerFn, ListenerRef, LogWriter, QueueEmitter, Subscribe, TaskError,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let emitter: QueueEmitter<u32> = QueueEmitter::builder(Config::default())
        .with_subscribers(vec![Arc::new(LogWriter::new()) as Arc<dyn Subscribe>])
        .build();

    let worker: ListenerRef<u32> = ListenerFn::arc("worker", |job: u32| async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if job % 3 == 0 {
            return Err(TaskError::fail(format!("job {job} rejected")));
        }
        Ok(())
    });
    emitter.on("job", worker);

    let mut handles = Vec::new();
    for job in 1..=6 {
        handles.extend(emitter.dispatch("job", job));
    }

    while !emitter.is_empty() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    for handle in handles {
        let id = handle.id();
        match handle.await {
            Ok(()) => println!("[main] task {id} ok"),
            Err(e) => println!("[main] task {id} {}", e.as_message()),
        }
    }

    emitter.shutdown().await;
    Ok(())
}
