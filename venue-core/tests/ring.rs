use venue_core::prelude::*;

#[test]
fn push_pop_preserves_order() {
    let (tx, rx) = channel::<u32>(4);
    tx.push(1).unwrap();
    tx.push(2).unwrap();
    tx.push(3).unwrap();

    assert_eq!(rx.pop(), Some(1));
    assert_eq!(rx.pop(), Some(2));
    assert_eq!(rx.pop(), Some(3));
    assert_eq!(rx.pop(), None);
}

#[test]
fn push_fails_when_full_and_returns_the_value() {
    let (tx, _rx) = channel::<u32>(2);
    tx.push(10).unwrap();
    tx.push(20).unwrap();
    assert_eq!(tx.push(30), Err(30));
}

#[test]
fn pop_on_empty_ring_is_none() {
    let (_tx, rx) = channel::<u32>(4);
    assert_eq!(rx.pop(), None);
    assert!(rx.is_empty());
}

#[test]
fn wraps_around_capacity_repeatedly() {
    let (tx, rx) = channel::<u32>(3);
    for round in 0..10u32 {
        for i in 0..3 {
            tx.push(round * 3 + i).unwrap();
        }
        for i in 0..3 {
            assert_eq!(rx.pop(), Some(round * 3 + i));
        }
    }
}

/// Scenario E: capacity 3, push 7 with no intervening pop on the
/// producer's side. The first 3 succeed via `push`; the rest need
/// `force_push`, which only makes progress once a consumer starts
/// draining, so the two run on separate threads. Every item still
/// arrives in order once popped.
#[test]
fn force_push_delivers_everything_in_order_past_capacity() {
    let (tx, rx) = channel::<u32>(3);

    let producer = std::thread::spawn(move || {
        for i in 1..=7u32 {
            if tx.push(i).is_err() {
                tx.force_push(i);
            }
        }
    });

    let mut popped = Vec::new();
    while popped.len() < 7 {
        if let Some(v) = rx.pop() {
            popped.push(v);
        } else {
            std::thread::yield_now();
        }
    }
    producer.join().unwrap();
    assert_eq!(popped, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn force_push_from_another_thread_eventually_lands() {
    let (tx, rx) = channel::<u32>(1);
    tx.push(0).unwrap();

    let handle = std::thread::spawn(move || {
        tx.force_push(1);
    });

    // Drain the ring so the forced push has room to land.
    loop {
        if rx.pop().is_some() {
            break;
        }
        std::thread::yield_now();
    }
    handle.join().unwrap();
    assert_eq!(rx.pop(), Some(1));
}
