use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::engine::Engine;
use crate::ring::SpscConsumer;
use crate::types::{Event, InputOrder, Instrument, Side, TraderId};
use crate::worker::Runnable;

/// User-supplied trading logic, invoked by the `TradingTool`'s own worker
/// thread. `init` runs once after the worker starts; `algo` runs once per
/// inbound event, in arrival order.
pub trait Strategy: Send + Sync + 'static {
    fn init(&self, _tool: &TradingTool<Self>)
    where
        Self: Sized,
    {
    }

    fn algo(&self, tool: &TradingTool<Self>, event: Event)
    where
        Self: Sized;
}

/// One client's local state: an inbound event ring, a handle back to the
/// Engine to submit orders through, and user-supplied trading logic. Not
/// `Clone`: a `TradingTool` owns the consumer half of its inbound ring,
/// matching the registered producer half held by the Notifier.
pub struct TradingTool<S: Strategy> {
    id: TraderId,
    inbound: SpscConsumer<Event>,
    engine: Arc<Engine>,
    strategy: S,
}

impl<S: Strategy> TradingTool<S> {
    pub fn new(id: TraderId, inbound: SpscConsumer<Event>, engine: Arc<Engine>, strategy: S) -> Self {
        Self {
            id,
            inbound,
            engine,
            strategy,
        }
    }

    pub fn id(&self) -> TraderId {
        self.id
    }

    /// Submit an order as this client. Non-blocking.
    pub fn submit(&self, instrument: Instrument, side: Side, qty: u16) {
        self.engine.submit(InputOrder::new(instrument, side, self.id, qty));
    }
}

impl<S: Strategy> Runnable for TradingTool<S> {
    fn on_start(&self) {
        self.strategy.init(self);
    }

    fn run_once(&self, stop: &AtomicBool) {
        match self.inbound.pop() {
            Some(event) => self.strategy.algo(self, event),
            None => {
                if !stop.load(Ordering::Acquire) {
                    std::thread::yield_now();
                }
            }
        }
    }
}
