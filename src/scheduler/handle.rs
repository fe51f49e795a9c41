//! # Per-task completion handle.
//!
//! [`TaskHandle`] resolves to the outcome of exactly one scheduled task.
//! Dropping it does **not** cancel the task; the scheduler still runs it to
//! completion and simply discards the outcome.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::TaskError;

/// Future resolving to the outcome of one scheduled task.
///
/// Resolves to [`TaskError::Canceled`] if the runtime dropped the task before
/// it could report.
#[derive(Debug)]
#[must_use = "dropping a TaskHandle discards the task outcome (the task still runs)"]
pub struct TaskHandle {
    id: u64,
    rx: oneshot::Receiver<Result<(), TaskError>>,
}

impl TaskHandle {
    pub(crate) fn new(id: u64, rx: oneshot::Receiver<Result<(), TaskError>>) -> Self {
        Self { id, rx }
    }

    /// Scheduler-assigned task id (matches `Event::task_id`).
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Future for TaskHandle {
    type Output = Result<(), TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_closed)) => Poll::Ready(Err(TaskError::Canceled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_with_sent_outcome() {
        let (tx, rx) = oneshot::channel();
        let handle = TaskHandle::new(3, rx);
        assert_eq!(handle.id(), 3);

        tx.send(Err(TaskError::fail("nope"))).unwrap();
        assert_eq!(handle.await, Err(TaskError::fail("nope")));
    }

    #[tokio::test]
    async fn test_dropped_sender_means_canceled() {
        let (tx, rx) = oneshot::channel::<Result<(), TaskError>>();
        drop(tx);
        assert_eq!(TaskHandle::new(0, rx).await, Err(TaskError::Canceled));
    }
}
