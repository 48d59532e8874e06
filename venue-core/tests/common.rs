use std::sync::Arc;

use venue_core::prelude::*;

/// Build an `Engine` with its own events ring, matching the wiring
/// `Exchange::new` does internally, for tests that only care about
/// matching and don't need a running Notifier.
pub fn engine_with_ring(capacity: usize) -> (Arc<Engine>, SpscConsumer<Event>) {
    let (tx, rx) = channel::<Event>(capacity);
    (Arc::new(Engine::new(tx)), rx)
}

/// Drain every currently available event off a consumer ring.
pub fn drain(rx: &SpscConsumer<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = rx.pop() {
        events.push(event);
    }
    events
}
