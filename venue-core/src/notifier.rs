use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::ring::{SpscConsumer, SpscProducer};
use crate::types::{Event, EventKind, TraderId};
use crate::worker::Runnable;

struct Client {
    events: SpscProducer<Event>,
    warned_ring_full: AtomicBool,
}

/// Fans engine events out to per-client rings.
///
/// Clients register and unregister only via `Exchange`, and always before
/// the Engine can have produced an event addressed to them (registration
/// happens before a `TradingTool` submits anything) — so `Notifier` never
/// has to buffer an event for a trader it hasn't heard of yet.
pub struct Notifier {
    incoming: SpscConsumer<Event>,
    clients: RwLock<HashMap<TraderId, Client>>,
}

impl Notifier {
    pub fn new(incoming: SpscConsumer<Event>) -> Self {
        Self {
            incoming,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Register a client's inbound ring under `trader`. Overwrites any
    /// previous registration for the same id.
    pub fn register(&self, trader: TraderId, events: SpscProducer<Event>) {
        let client = Client {
            events,
            warned_ring_full: AtomicBool::new(false),
        };
        self.clients
            .write()
            .expect("notifier clients lock poisoned")
            .insert(trader, client);
    }

    pub fn unregister(&self, trader: TraderId) {
        self.clients
            .write()
            .expect("notifier clients lock poisoned")
            .remove(&trader);
    }

    fn route(&self, event: Event) {
        // Tick carries no single trader; the original venue discards it at
        // this boundary rather than fanning it out to every client.
        if event.kind == EventKind::Tick {
            return;
        }

        let clients = self.clients.read().expect("notifier clients lock poisoned");
        let Some(client) = clients.get(&event.trader) else {
            tracing::error!(trader = event.trader, "notifier: event for unregistered trader");
            panic!("notifier: event for unregistered trader {}", event.trader);
        };

        if client.events.push(event).is_err() {
            if !client.warned_ring_full.swap(true, Ordering::Relaxed) {
                tracing::warn!(
                    trader = event.trader,
                    "notifier: client ring is full, falling back to force_push"
                );
            }
            client.events.force_push(event);
        }
    }
}

impl Runnable for Notifier {
    fn run_once(&self, stop: &std::sync::atomic::AtomicBool) {
        match self.incoming.pop() {
            Some(event) => self.route(event),
            None => {
                // The ring is empty: the real queue-depth signal here is the
                // stop flag, not a blocking primitive, so spin-yield rather
                // than busy-spin.
                if !stop.load(Ordering::Acquire) {
                    std::thread::yield_now();
                }
            }
        }
    }
}
