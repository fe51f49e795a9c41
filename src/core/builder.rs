use std::marker::PhantomData;
use std::sync::Arc;

use crate::{
    core::{Config, QueueEmitter},
    events::Bus,
    scheduler::Scheduler,
    subscribers::{Subscribe, SubscriberSet},
};
use super::forwarder::Forwarder;

/// Builder for constructing a [`QueueEmitter`] with optional subscribers.
pub struct EmitterBuilder<T> {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    _payload: PhantomData<fn() -> T>,
}

impl<T: Clone + Send + 'static> EmitterBuilder<T> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            _payload: PhantomData,
        }
    }

    /// Sets runtime event subscribers.
    ///
    /// Subscribers receive scheduler and registry events through dedicated
    /// workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the emitter.
    ///
    /// # Panics
    /// Panics when subscribers are configured and no Tokio runtime is running.
    pub fn build(self) -> QueueEmitter<T> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let scheduler = Scheduler::new(self.cfg.concurrency_clamped(), bus.clone());

        let forwarder = if self.subscribers.is_empty() {
            None
        } else {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            Some(Forwarder::spawn(&bus, set))
        };

        QueueEmitter::from_parts(&self.cfg, bus, scheduler, forwarder)
    }
}
