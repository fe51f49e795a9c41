//! # Bus → subscriber forwarder.
//!
//! Spawned by [`EmitterBuilder::build`](crate::EmitterBuilder::build) only when
//! subscribers are configured. Moves every bus event into the
//! [`SubscriberSet`] until cancelled, then flushes what is still buffered and
//! waits for subscriber workers to finish.

use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::Bus;
use crate::subscribers::SubscriberSet;

/// Handle to the running forwarder task.
pub(crate) struct Forwarder {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl Forwarder {
    /// Subscribes to `bus` and spawns the forwarding loop.
    pub(crate) fn spawn(bus: &Bus, set: SubscriberSet) -> Self {
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();
        let stop = token.clone();

        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(Arc::new(ev)),
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => continue,
                    }
                }
            }

            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(Arc::new(ev)),
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        });

        Self { token, join }
    }

    /// Stops forwarding and waits until subscribers processed everything queued.
    pub(crate) async fn stop(self) {
        self.token.cancel();
        let _ = self.join.await;
    }

    /// Stops forwarding without waiting.
    pub(crate) fn abort(&self) {
        self.token.cancel();
    }
}
