use std::sync::Arc;

use crate::engine::Engine;
use crate::error::{LifecycleError, RegistrationError};
use crate::notifier::Notifier;
use crate::ring::{channel, SpscProducer};
use crate::types::{Event, TraderId};
use crate::worker::Worker;

/// Owns an `Engine` and a `Notifier`, connected by a single internally
/// created SPSC ring, and the two background workers that drive them.
pub struct Exchange {
    engine: Arc<Engine>,
    notifier: Arc<Notifier>,
    engine_worker: Option<Worker>,
    notifier_worker: Option<Worker>,
    started: bool,
    stopped: bool,
}

impl Exchange {
    /// `events_ring_capacity` sizes the engine→notifier ring; overflow is
    /// handled by a spin-yielding retry rather than sizing it to "never
    /// fill".
    pub fn new(events_ring_capacity: usize) -> Self {
        let (events_tx, events_rx) = channel::<Event>(events_ring_capacity);
        Self {
            engine: Arc::new(Engine::new(events_tx)),
            notifier: Arc::new(Notifier::new(events_rx)),
            engine_worker: None,
            notifier_worker: None,
            started: false,
            stopped: false,
        }
    }

    /// A cloneable handle to the Engine, for `TradingTool`s to submit
    /// orders through.
    pub fn engine(&self) -> Arc<Engine> {
        self.engine.clone()
    }

    /// Register a client's inbound ring under `trader`. Must be called
    /// before `start()` — the registry is read without synchronization
    /// once workers are running.
    pub fn register_client(
        &self,
        trader: TraderId,
        events: SpscProducer<Event>,
    ) -> Result<(), RegistrationError> {
        if self.started {
            return Err(RegistrationError::AlreadyStarted);
        }
        self.notifier.register(trader, events);
        Ok(())
    }

    /// Unregister a previously-registered client. Same before-`start()`
    /// restriction as `register_client`.
    pub fn unregister_client(&self, trader: TraderId) -> Result<(), RegistrationError> {
        if self.started {
            return Err(RegistrationError::AlreadyStarted);
        }
        self.notifier.unregister(trader);
        Ok(())
    }

    /// Start the Engine worker, then the Notifier worker.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        if self.started {
            return Err(LifecycleError::AlreadyStarted);
        }
        self.engine_worker = Some(Worker::start(self.engine.clone()));
        self.notifier_worker = Some(Worker::start(self.notifier.clone()));
        self.started = true;
        Ok(())
    }

    /// Stop the Notifier first (it only spin-yields, so setting its flag
    /// is enough), then the Engine (whose `on_stop` also stops the
    /// submission MPMC to unblock its blocking `pop`). Not safe to call
    /// `start()` again afterwards.
    pub fn stop(&mut self) -> Result<(), LifecycleError> {
        if !self.started {
            return Err(LifecycleError::NotStarted);
        }
        if self.stopped {
            return Err(LifecycleError::AlreadyStopped);
        }
        if let Some(mut worker) = self.notifier_worker.take() {
            worker.stop(&*self.notifier);
        }
        if let Some(mut worker) = self.engine_worker.take() {
            worker.stop(&*self.engine);
        }
        self.stopped = true;
        Ok(())
    }
}
