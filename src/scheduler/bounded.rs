//! # Bounded FIFO task scheduler.
//!
//! Runs at most `concurrency` tasks at a time on the ambient Tokio runtime and
//! starts waiting tasks strictly in submission order.
//!
//! ## Flow
//! ```text
//! submit(job)
//!   ├─ running < concurrency ─► running += 1 ─► spawn(job)
//!   └─ otherwise             ─► pending.push_back(job)
//!
//! job finished (Ok / Err / panic)
//!   ├─ running -= 1
//!   ├─ pending non-empty ─► pop_front ─► running += 1 ─► spawn(next)
//!   └─ nothing left      ─► publish SchedulerIdle, wake wait_idle()
//! ```
//!
//! ## Rules
//! - Start order is FIFO; completion order is FIFO only when `concurrency == 1`.
//! - `pending` non-empty implies `running == concurrency`.
//! - Outcomes are opaque here: they travel through the task's [`TaskHandle`] only.
//! - A failing or panicking task never prevents queued tasks from starting.
//! - `pending` is unbounded; `submit` never blocks and never fails.

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{Notify, oneshot};

use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::listeners::BoxListenerFuture;

use super::handle::TaskHandle;

/// Where a task came from; only used to label runtime events.
#[derive(Clone, Debug, Default)]
pub struct TaskOrigin {
    /// Emitter event name.
    pub event: Option<Arc<str>>,
    /// Listener name.
    pub listener: Option<Arc<str>>,
}

impl TaskOrigin {
    /// Origin for a listener invocation.
    pub fn listener(event: impl Into<Arc<str>>, listener: impl Into<Arc<str>>) -> Self {
        Self {
            event: Some(event.into()),
            listener: Some(listener.into()),
        }
    }

    fn label(&self, ev: Event) -> Event {
        let ev = match &self.event {
            Some(name) => ev.with_event(Arc::clone(name)),
            None => ev,
        };
        match &self.listener {
            Some(name) => ev.with_listener(Arc::clone(name)),
            None => ev,
        }
    }
}

/// A submitted, not yet finished task.
struct Job {
    id: u64,
    origin: TaskOrigin,
    run: Box<dyn FnOnce() -> BoxListenerFuture + Send>,
    done: oneshot::Sender<Result<(), TaskError>>,
}

/// Mutable scheduler state, guarded by one lock.
struct State {
    running: usize,
    pending: VecDeque<Job>,
}

/// Bounded-concurrency FIFO scheduler.
///
/// # Example
/// ```
/// use queue_emitter::{Bus, Scheduler, TaskOrigin};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let sched = Scheduler::new(2, Bus::new(16));
///     let handle = sched.submit(TaskOrigin::default(), || {
///         Box::pin(async { Ok::<_, queue_emitter::TaskError>(()) })
///     });
///     assert!(handle.await.is_ok());
///     sched.wait_idle().await;
///     assert!(sched.is_idle());
/// }
/// ```
pub struct Scheduler {
    concurrency: usize,
    state: Mutex<State>,
    idle: Notify,
    next_id: AtomicU64,
    bus: Bus,
}

impl Scheduler {
    /// Creates a scheduler. A `concurrency` of `0` is treated as `1`.
    pub fn new(concurrency: usize, bus: Bus) -> Arc<Self> {
        Arc::new(Self {
            concurrency: concurrency.max(1),
            state: Mutex::new(State {
                running: 0,
                pending: VecDeque::new(),
            }),
            idle: Notify::new(),
            next_id: AtomicU64::new(1),
            bus,
        })
    }

    /// Maximum number of tasks running at once.
    #[inline]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Submits a task and returns its completion handle.
    ///
    /// `run` is invoked lazily, when the task acquires a slot.
    ///
    /// A task that would start immediately but is submitted outside a Tokio
    /// runtime is dropped without taking the slot; its handle resolves to
    /// [`TaskError::Canceled`].
    pub fn submit<F>(self: &Arc<Self>, origin: TaskOrigin, run: F) -> TaskHandle
    where
        F: FnOnce() -> BoxListenerFuture + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (done, rx) = oneshot::channel();
        let job = Job {
            id,
            origin,
            run: Box::new(run),
            done,
        };

        let mut state = self.state.lock();
        if state.running < self.concurrency {
            if Handle::try_current().is_err() {
                drop(state);
                drop(job);
                return TaskHandle::new(id, rx);
            }
            state.running += 1;
            let running = state.running;
            drop(state);
            self.start(job, running);
        } else if self.bus.has_receivers() {
            let ev = job
                .origin
                .label(Event::new(EventKind::TaskQueued).with_task_id(id));
            state.pending.push_back(job);
            let queued = state.pending.len();
            drop(state);
            self.bus.publish(ev.with_queued(queued));
        } else {
            state.pending.push_back(job);
        }

        TaskHandle::new(id, rx)
    }

    /// Number of tasks waiting for a slot.
    pub fn queued_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Number of tasks currently executing.
    pub fn running_count(&self) -> usize {
        self.state.lock().running
    }

    /// `true` iff nothing is queued and nothing is running.
    pub fn is_idle(&self) -> bool {
        let state = self.state.lock();
        state.running == 0 && state.pending.is_empty()
    }

    /// Waits until the scheduler becomes idle.
    ///
    /// Returns immediately when already idle. Work submitted after this
    /// returns is not covered.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }

    /// Spawns `job`; the caller already reserved its slot.
    fn start(self: &Arc<Self>, job: Job, running: usize) {
        let Job {
            id,
            origin,
            run,
            done,
        } = job;

        if self.bus.has_receivers() {
            self.bus.publish(
                origin.label(
                    Event::new(EventKind::TaskStarting)
                        .with_task_id(id)
                        .with_running(running),
                ),
            );
        }

        let me = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(async move { run().await })
                .catch_unwind()
                .await
            {
                Ok(res) => res,
                Err(panic) => Err(TaskError::from_panic(panic.as_ref())),
            };
            me.finish(id, &origin);
            let _ = done.send(outcome);
        });
    }

    /// Releases a slot and hands it to the head of the queue, if any.
    fn finish(self: &Arc<Self>, id: u64, origin: &TaskOrigin) {
        let (next, running, idle) = {
            let mut state = self.state.lock();
            state.running = state.running.saturating_sub(1);
            let next = state.pending.pop_front();
            if next.is_some() {
                state.running += 1;
            }
            let idle = state.running == 0 && state.pending.is_empty();
            (next, state.running, idle)
        };

        if self.bus.has_receivers() {
            self.bus.publish(
                origin.label(Event::new(EventKind::TaskFinished).with_task_id(id)),
            );
        }

        if let Some(job) = next {
            self.start(job, running);
        }

        if idle {
            self.bus.publish(Event::new(EventKind::SchedulerIdle));
            self.idle.notify_waiters();
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Scheduler")
            .field("concurrency", &self.concurrency)
            .field("running", &state.running)
            .field("queued", &state.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sleeper(
        log: &Arc<Mutex<Vec<u32>>>,
        ms: u64,
        value: u32,
    ) -> impl FnOnce() -> BoxListenerFuture + Send + 'static {
        let log = Arc::clone(log);
        move || {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                log.lock().push(value);
                Ok::<_, TaskError>(())
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_concurrency_is_one() {
        let sched = Scheduler::new(0, Bus::new(1));
        assert_eq!(sched.concurrency(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_counts_follow_bound() {
        let sched = Scheduler::new(2, Bus::new(1));
        let log = Arc::new(Mutex::new(Vec::new()));

        assert!(sched.is_idle());
        let handles: Vec<_> = (0..5)
            .map(|i| sched.submit(TaskOrigin::default(), sleeper(&log, 10, i)))
            .collect();

        assert_eq!(sched.running_count(), 2);
        assert_eq!(sched.queued_count(), 3);
        assert!(!sched.is_idle());

        for h in handles {
            h.await.unwrap();
        }
        sched.wait_idle().await;
        assert!(sched.is_idle());
        assert_eq!(sched.running_count(), 0);
        assert_eq!(*log.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_order_is_fifo() {
        let sched = Scheduler::new(1, Bus::new(1));
        let log = Arc::new(Mutex::new(Vec::new()));

        let _a = sched.submit(TaskOrigin::default(), sleeper(&log, 50, 1));
        let _b = sched.submit(TaskOrigin::default(), sleeper(&log, 5, 2));
        let _c = sched.submit(TaskOrigin::default(), sleeper(&log, 1, 3));

        sched.wait_idle().await;
        assert_eq!(*log.lock(), vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_and_panic_are_isolated() {
        let sched = Scheduler::new(1, Bus::new(1));
        let log = Arc::new(Mutex::new(Vec::new()));

        let failing = sched.submit(TaskOrigin::default(), || {
            Box::pin(async { Err::<(), _>(TaskError::fail("boom")) })
        });
        let panicking = sched.submit(TaskOrigin::default(), || {
            Box::pin(async {
                if true {
                    panic!("kaboom");
                }
                Ok::<_, TaskError>(())
            })
        });
        let fine = sched.submit(TaskOrigin::default(), sleeper(&log, 1, 7));

        assert_eq!(failing.await, Err(TaskError::fail("boom")));
        assert_eq!(
            panicking.await,
            Err(TaskError::Panicked {
                info: "kaboom".into()
            })
        );
        assert!(fine.await.is_ok());
        assert_eq!(*log.lock(), vec![7]);
        assert!(sched.is_idle());
    }

    #[test]
    fn test_submit_outside_runtime_keeps_slot_free() {
        let sched = Scheduler::new(1, Bus::new(1));
        let orphan = sched.submit(TaskOrigin::default(), || {
            Box::pin(async { Ok::<_, TaskError>(()) })
        });
        assert!(sched.is_idle());
        assert_eq!(sched.running_count(), 0);

        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        assert_eq!(rt.block_on(orphan), Err(TaskError::Canceled));

        let outcome = rt.block_on(async {
            sched
                .submit(TaskOrigin::default(), || {
                    Box::pin(async { Ok::<_, TaskError>(()) })
                })
                .await
        });
        assert_eq!(outcome, Ok(()));
        assert!(sched.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_still_runs() {
        let sched = Scheduler::new(1, Bus::new(1));
        let log = Arc::new(Mutex::new(Vec::new()));

        drop(sched.submit(TaskOrigin::default(), sleeper(&log, 10, 9)));
        sched.wait_idle().await;
        assert_eq!(*log.lock(), vec![9]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_lifecycle_events() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let sched = Scheduler::new(1, bus);
        let log = Arc::new(Mutex::new(Vec::new()));

        let _a = sched.submit(TaskOrigin::listener("tick", "a"), sleeper(&log, 5, 1));
        let _b = sched.submit(TaskOrigin::listener("tick", "b"), sleeper(&log, 5, 2));
        sched.wait_idle().await;

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::TaskStarting,
                EventKind::TaskQueued,
                EventKind::TaskFinished,
                EventKind::TaskStarting,
                EventKind::TaskFinished,
                EventKind::SchedulerIdle,
            ]
        );
    }
}
