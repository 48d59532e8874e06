use venue_core::prelude::*;

const INSTRUMENT: Instrument = b'P';

fn price(v: u64) -> Price {
    Price::from(v)
}

/// A resting order at a price the incoming order doesn't cross stays
/// resting; no `Exec` is produced and the no-cross invariant holds.
#[test]
fn non_crossing_order_rests_without_matching() {
    let mut book = PricedBook::new();

    let placed = book.submit(INSTRUMENT, Side::Sell, price(105), 1, 10);
    assert_eq!(placed, vec![Event::placed(INSTRUMENT, 1, 10, Side::Sell)]);

    let placed = book.submit(INSTRUMENT, Side::Buy, price(100), 2, 10);
    assert_eq!(placed, vec![Event::placed(INSTRUMENT, 2, 10, Side::Buy)]);

    assert_eq!(book.best_price(Side::Sell), Some(price(105)));
    assert_eq!(book.best_price(Side::Buy), Some(price(100)));
    assert!(book.is_uncrossed());
}

/// An order priced to cross the best opposite level fully consumes it and
/// reports one `Exec` for the maker and one for the taker, exactly as the
/// base (unpriced) book does for an exact cross.
#[test]
fn exact_cross_fully_fills_both_sides() {
    let mut book = PricedBook::new();

    book.submit(INSTRUMENT, Side::Buy, price(100), 1, 200);
    let events = book.submit(INSTRUMENT, Side::Sell, price(100), 2, 200);

    assert_eq!(
        events,
        vec![
            Event::exec(INSTRUMENT, 1, 200, Side::Buy),
            Event::exec(INSTRUMENT, 2, 200, Side::Sell),
        ]
    );
    assert_eq!(book.best_price(Side::Buy), None);
    assert_eq!(book.best_price(Side::Sell), None);
}

/// Crossing walks best-to-worst and drains each level FIFO before moving
/// to the next, only resting whatever the aggressor didn't find a
/// counterparty for — at the aggressor's own limit price, not a blend.
#[test]
fn crossing_walks_multiple_levels_best_to_worst_then_rests_residual() {
    let mut book = PricedBook::new();

    book.submit(INSTRUMENT, Side::Sell, price(100), 1, 50);
    book.submit(INSTRUMENT, Side::Sell, price(100), 2, 50); // same level, FIFO after 1
    book.submit(INSTRUMENT, Side::Sell, price(101), 3, 100); // worse level

    let events = book.submit(INSTRUMENT, Side::Buy, price(101), 4, 200);

    assert_eq!(
        events,
        vec![
            Event::exec(INSTRUMENT, 1, 50, Side::Sell),
            Event::exec(INSTRUMENT, 2, 50, Side::Sell),
            Event::exec(INSTRUMENT, 3, 100, Side::Sell),
            Event::exec(INSTRUMENT, 4, 200, Side::Buy),
        ]
    );
    assert_eq!(book.best_price(Side::Sell), None);
    assert_eq!(book.best_price(Side::Buy), None);
}

/// When the aggressor is smaller than the level's head order, the head
/// order is only partially filled (no `Exec` for it, per the base book's
/// same rule) while the fully-filled aggressor still gets its own `Exec`.
#[test]
fn aggressor_fully_filled_by_partially_filling_the_head() {
    let mut book = PricedBook::new();

    book.submit(INSTRUMENT, Side::Sell, price(100), 1, 300);
    let events = book.submit(INSTRUMENT, Side::Buy, price(100), 2, 120);

    assert_eq!(events, vec![Event::exec(INSTRUMENT, 2, 120, Side::Buy)]);
    assert_eq!(book.best_price(Side::Sell), Some(price(100)));
    assert_eq!(book.best_price(Side::Buy), None);
}

/// When the aggressor's own quantity outlives every crossable level, the
/// residual rests on its own side and `OrderPlaced.qty` is the aggressor's
/// full original quantity, not just the unfilled remainder.
#[test]
fn aggressor_residual_rests_with_original_qty_not_remainder() {
    let mut book = PricedBook::new();

    book.submit(INSTRUMENT, Side::Sell, price(100), 1, 50);
    let events = book.submit(INSTRUMENT, Side::Buy, price(100), 2, 200);

    assert_eq!(
        events,
        vec![
            Event::exec(INSTRUMENT, 1, 50, Side::Sell),
            Event::placed(INSTRUMENT, 2, 200, Side::Buy),
        ]
    );
    assert_eq!(book.best_price(Side::Buy), Some(price(100)));
}

/// Two resting orders at the same price share one level and are drained
/// FIFO by a single crossing aggressor, rather than each order opening its
/// own price level.
#[test]
fn same_price_orders_aggregate_into_one_level_fifo() {
    let mut book = PricedBook::new();

    book.submit(INSTRUMENT, Side::Sell, price(100), 1, 50);
    book.submit(INSTRUMENT, Side::Sell, price(100), 2, 50);

    let events = book.submit(INSTRUMENT, Side::Buy, price(100), 3, 60);

    assert_eq!(
        events,
        vec![
            Event::exec(INSTRUMENT, 1, 50, Side::Sell),
            Event::exec(INSTRUMENT, 3, 60, Side::Buy),
        ]
    );
    // Order 2 is still resting, now partially filled (60 - 50 = 10 taken
    // from it), at the same price level order 1 occupied.
    assert_eq!(book.best_price(Side::Sell), Some(price(100)));
}

/// No price cross may persist across submissions.
#[test]
fn book_never_ends_up_crossed() {
    let mut book = PricedBook::new();

    book.submit(INSTRUMENT, Side::Buy, price(99), 1, 10);
    book.submit(INSTRUMENT, Side::Sell, price(101), 2, 10);
    assert!(book.is_uncrossed());

    // A buy that would cross the resting ask fully consumes it instead of
    // leaving a crossed book.
    book.submit(INSTRUMENT, Side::Buy, price(101), 3, 10);
    assert!(book.is_uncrossed());
    assert_eq!(book.best_price(Side::Sell), None);
}
