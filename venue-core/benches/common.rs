use venue_core::prelude::*;

/// Build a fresh `Engine` with its own events ring, wired the same way
/// `Exchange::new` wires one, sized generously so the benchmark loop never
/// has to pay for a `force_push` fallback.
pub fn bench_engine(ring_capacity: usize) -> (Engine, SpscConsumer<Event>) {
    let (tx, rx) = channel::<Event>(ring_capacity);
    (Engine::new(tx), rx)
}
