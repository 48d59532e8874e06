mod common;

use common::*;
use rand::Rng;
use venue_core::prelude::*;

const INSTRUMENT: Instrument = b'Z';

/// A large randomized run of submissions against one book: every side,
/// quantity, and trader is drawn at random, aggressively crossing and
/// re-crossing the book over and over. No assertion on individual events —
/// this is a soak test for panics and the book's own invariants, the same
/// shape as the donor's `test_massive_order_matching`.
#[test]
fn massive_random_submission_never_violates_book_invariants() {
    let (engine, events) = engine_with_ring(1 << 16);
    let mut rng = rand::rng();

    for _ in 0..100_000u32 {
        let side = if rng.random_bool(0.5) { Side::Buy } else { Side::Sell };
        let trader = rng.random_range(1..=1_000u16);
        let qty = rng.random_range(1..=500u16);
        engine.place_order(INSTRUMENT, side, trader, qty);

        let snapshot = engine.book_snapshot(INSTRUMENT).expect("book created on first submission");
        if snapshot.orders.is_empty() {
            assert_eq!(snapshot.actual_side, Side::None);
            assert_eq!(snapshot.outstanding_qty, 0);
            assert_eq!(snapshot.opened_orders_qty, 0);
        } else {
            assert!(snapshot.outstanding_qty <= snapshot.opened_orders_qty);
            assert!(snapshot.head_remaining().unwrap() > 0);
        }
    }

    drain(&events);
}

/// The same random mix, but submitted through the Engine's MPMC (`submit`)
/// from several producer threads while one thread drains and matches —
/// exercising the concurrent path the single-threaded soak test above
/// doesn't, without asserting anything beyond "it doesn't panic or hang".
#[test]
fn massive_random_submission_from_multiple_producers() {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    let (tx, rx) = channel::<Event>(1 << 16);
    let engine = Arc::new(Engine::new(tx));

    let producers: Vec<_> = (0..4u16)
        .map(|p| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                let mut rng = rand::rng();
                for _ in 0..10_000u32 {
                    let side = if rng.random_bool(0.5) { Side::Buy } else { Side::Sell };
                    let trader = rng.random_range(1..=1_000u16);
                    let qty = rng.random_range(1..=500u16);
                    engine.submit(InputOrder::new(INSTRUMENT, side, trader, qty));
                }
                p
            })
        })
        .collect();

    let stop = AtomicBool::new(false);
    for _ in 0..40_000u32 {
        Runnable::run_once(&*engine, &stop);
    }
    for producer in producers {
        producer.join().unwrap();
    }

    drain(&rx);
}
