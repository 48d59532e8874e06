use std::cell::UnsafeCell;
use std::collections::VecDeque;

use crossbeam::epoch;
use crossbeam_skiplist::SkipList;

use crate::types::{Event, InternalOrder, Instrument, Side, TraderId};

/// 256-bit price. Wide enough for any fixed-point scaling a venue might
/// choose without this module having an opinion on decimals.
pub type Price = crypto_bigint::U256;

/// Bid-side key: descending price, so `front()` on the bid list is always
/// the highest price. One key per price — every order at that price shares
/// the same `Level`'s FIFO queue, time priority coming from queue order
/// rather than from the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidKey {
    price: Price,
}

impl Ord for BidKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.price.cmp(&self.price)
    }
}

impl PartialOrd for BidKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ask-side key: ascending price, so `front()` on the ask list is always
/// the lowest price. Same one-key-per-price rule as `BidKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AskKey {
    price: Price,
}

impl Ord for AskKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.price.cmp(&other.price)
    }
}

impl PartialOrd for AskKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// One price level: a FIFO queue of resting orders plus the same derived
/// remaining-quantity bookkeeping as the base `Book`.
#[derive(Debug, Default)]
pub struct Level {
    pub orders: VecDeque<InternalOrder>,
    pub outstanding_qty: u32,
    pub opened_orders_qty: u32,
}

impl Level {
    fn head_remaining(&self) -> Option<u32> {
        self.orders
            .front()
            .map(|head| head.qty as u32 + self.outstanding_qty - self.opened_orders_qty)
    }

    /// Rest an order at this level. `original_qty` is the order's full
    /// submitted quantity (what `opened_orders_qty` and the `OrderPlaced`
    /// event report); `resting_qty` is what's actually unfilled right now
    /// (what `outstanding_qty` gains) — they differ exactly when this is
    /// the residual of a partially-crossed aggressor.
    fn rest(&mut self, trader: TraderId, original_qty: u16, resting_qty: u32) {
        self.orders.push_back(InternalOrder::new(trader, original_qty));
        self.outstanding_qty += resting_qty;
        self.opened_orders_qty += original_qty as u32;
    }
}

/// Side-specific wiring for the priced book: which skip list is "own" vs
/// "opposite", how to build an own-side key, and what counts as crossing.
/// Implemented by the zero-sized `Buy`/`Sell` markers and used only as a
/// generic parameter — never as a trait object — so `cross`/`rest_own_side`
/// monomorphize into straight-line code per side.
pub trait SideOps {
    type OwnKey: Ord + Copy;
    type OppKey: Ord + Copy;

    fn side() -> Side;
    fn opposite_side() -> Side;
    fn make_own_key(price: Price) -> Self::OwnKey;
    fn opp_key_price(key: &Self::OppKey) -> Price;
    /// Does an incoming order at `incoming_price` cross the opposite
    /// book's best price `opposite_best`?
    fn crosses(incoming_price: Price, opposite_best: Price) -> bool;
    fn own_list(book: &PricedBook) -> &SkipList<Self::OwnKey, UnsafeCell<Level>>;
    fn opp_list(book: &PricedBook) -> &SkipList<Self::OppKey, UnsafeCell<Level>>;
}

/// Marker for buy-side generic instantiations.
pub struct Buy;
/// Marker for sell-side generic instantiations.
pub struct Sell;

impl SideOps for Buy {
    type OwnKey = BidKey;
    type OppKey = AskKey;

    fn side() -> Side {
        Side::Buy
    }
    fn opposite_side() -> Side {
        Side::Sell
    }
    fn make_own_key(price: Price) -> BidKey {
        BidKey { price }
    }
    fn opp_key_price(key: &AskKey) -> Price {
        key.price
    }
    fn crosses(incoming_price: Price, opposite_best: Price) -> bool {
        incoming_price >= opposite_best
    }
    fn own_list(book: &PricedBook) -> &SkipList<BidKey, UnsafeCell<Level>> {
        &book.bids
    }
    fn opp_list(book: &PricedBook) -> &SkipList<AskKey, UnsafeCell<Level>> {
        &book.asks
    }
}

impl SideOps for Sell {
    type OwnKey = AskKey;
    type OppKey = BidKey;

    fn side() -> Side {
        Side::Sell
    }
    fn opposite_side() -> Side {
        Side::Buy
    }
    fn make_own_key(price: Price) -> AskKey {
        AskKey { price }
    }
    fn opp_key_price(key: &BidKey) -> Price {
        key.price
    }
    fn crosses(incoming_price: Price, opposite_best: Price) -> bool {
        incoming_price <= opposite_best
    }
    fn own_list(book: &PricedBook) -> &SkipList<AskKey, UnsafeCell<Level>> {
        &book.asks
    }
    fn opp_list(book: &PricedBook) -> &SkipList<BidKey, UnsafeCell<Level>> {
        &book.bids
    }
}

/// A priced, two-sided order book for one instrument: price-indexed levels
/// in place of the base module's single active side, for instruments that
/// need a resting book on both sides at once.
///
/// One `crossbeam_skiplist::SkipList` per side, each keyed so `front()` is
/// always that side's best price. Each key owns a FIFO `Level` (the same
/// outstanding/opened arithmetic as the base `Book`) rather than one order
/// per key, since this venue does not cancel or amend resting orders.
///
/// Only the owning `Engine` thread may call the mutating methods
/// (`submit`, `insert`, `match_incoming`) — the same single-writer
/// licensing as the base `Book`, here applied per-level via `UnsafeCell`
/// instead of to a whole `HashMap` at once, since the skip list itself
/// supports concurrent structural changes even though this venue never
/// exercises that.
pub struct PricedBook {
    bids: SkipList<BidKey, UnsafeCell<Level>>,
    asks: SkipList<AskKey, UnsafeCell<Level>>,
}

impl Default for PricedBook {
    fn default() -> Self {
        Self::new()
    }
}

impl PricedBook {
    pub fn new() -> Self {
        let collector = epoch::default_collector().clone();
        Self {
            bids: SkipList::new(collector.clone()),
            asks: SkipList::new(collector),
        }
    }

    pub fn best_price(&self, side: Side) -> Option<Price> {
        let guard = &epoch::pin();
        match side {
            Side::Buy => self.bids.front(guard).map(|e| e.key().price),
            Side::Sell => self.asks.front(guard).map(|e| e.key().price),
            Side::None => None,
        }
    }

    /// The no-price-cross invariant: `best_bid < best_ask`
    /// (or one side is empty). Exposed for tests, not used on the hot path.
    pub fn is_uncrossed(&self) -> bool {
        match (self.best_price(Side::Buy), self.best_price(Side::Sell)) {
            (Some(bid), Some(ask)) => bid < ask,
            _ => true,
        }
    }

    /// One full submission against the priced book: cross the opposite
    /// side first, then rest whatever quantity survives. Returns the
    /// `Exec`/`OrderPlaced` events in
    /// emission order; the caller (an `Engine` variant, or a test driving
    /// the book directly) is responsible for any `Tick` that follows.
    pub fn submit(
        &mut self,
        instrument: Instrument,
        side: Side,
        price: Price,
        trader: TraderId,
        qty: u16,
    ) -> Vec<Event> {
        match side {
            Side::Buy => self.submit_with::<Buy>(instrument, price, trader, qty),
            Side::Sell => self.submit_with::<Sell>(instrument, price, trader, qty),
            Side::None => Vec::new(),
        }
    }

    fn submit_with<S: SideOps>(
        &mut self,
        instrument: Instrument,
        price: Price,
        trader: TraderId,
        qty: u16,
    ) -> Vec<Event> {
        let (mut events, remaining) = self.cross::<S>(instrument, price, trader, qty);
        if remaining != 0 {
            events.push(self.rest_own_side::<S>(instrument, price, trader, qty, remaining));
        }
        events
    }

    /// Rest `resting_qty` (of an order whose full size was `original_qty`)
    /// on `S`'s own side at `price`, creating the level if needed. Returns
    /// the `OrderPlaced` event, whose `qty` is always the *original*
    /// submitted quantity, never the unfilled remainder.
    fn rest_own_side<S: SideOps>(
        &mut self,
        instrument: Instrument,
        price: Price,
        trader: TraderId,
        original_qty: u16,
        resting_qty: u32,
    ) -> Event {
        let guard = &epoch::pin();
        let key = S::make_own_key(price);
        let entry = S::own_list(self).get_or_insert(key, UnsafeCell::new(Level::default()), guard);
        // SAFETY: single-writer invariant documented on the struct.
        unsafe { &mut *entry.value().get() }.rest(trader, original_qty, resting_qty);
        Event::placed(instrument, trader, original_qty as u32, S::side())
    }

    /// Insert a fresh resting order with no prior crossing, for callers
    /// that only ever rest (e.g. building a book fixture in a test).
    pub fn insert(
        &mut self,
        instrument: Instrument,
        side: Side,
        price: Price,
        trader: TraderId,
        qty: u16,
    ) -> Event {
        match side {
            Side::Buy => self.rest_own_side::<Buy>(instrument, price, trader, qty, qty as u32),
            Side::Sell => self.rest_own_side::<Sell>(instrument, price, trader, qty, qty as u32),
            Side::None => Event::placed(instrument, trader, qty as u32, Side::None),
        }
    }

    /// Cross an incoming order of `qty` at `price` against the resting
    /// opposite side, walking best-to-worst and FIFO within each level.
    /// Returns the `Exec` events generated, in fill order, and the
    /// quantity that did not find a counterparty (to be rested by the
    /// caller).
    pub fn match_incoming(
        &self,
        instrument: Instrument,
        side: Side,
        price: Price,
        trader: TraderId,
        qty: u16,
    ) -> (Vec<Event>, u32) {
        match side {
            Side::Buy => self.cross::<Buy>(instrument, price, trader, qty),
            Side::Sell => self.cross::<Sell>(instrument, price, trader, qty),
            Side::None => (Vec::new(), qty as u32),
        }
    }

    fn cross<S: SideOps>(
        &self,
        instrument: Instrument,
        price: Price,
        trader: TraderId,
        qty: u16,
    ) -> (Vec<Event>, u32) {
        let guard = &epoch::pin();
        let mut remaining = qty as u32;
        let mut events = Vec::new();
        let mut entry = S::opp_list(self).front(guard);

        while remaining != 0 {
            let Some(e) = entry else { break };
            if !S::crosses(price, S::opp_key_price(e.key())) {
                break;
            }
            // SAFETY: single-writer invariant documented on the struct.
            let level = unsafe { &mut *e.value().get() };
            drain_level(level, &mut remaining, instrument, S::opposite_side(), &mut events);
            let next = e.next();
            if level.orders.is_empty() {
                e.remove();
            }
            entry = next;
        }

        if remaining == 0 {
            events.push(Event::exec(instrument, trader, qty as u32, S::side()));
        }
        (events, remaining)
    }
}

/// FIFO-drain one level against `remaining`, pushing an `Exec` event for
/// every resting order it fully fills (partial fills of the level's head
/// emit nothing, per the base book's same rule).
fn drain_level(
    level: &mut Level,
    remaining: &mut u32,
    instrument: Instrument,
    maker_side: Side,
    events: &mut Vec<Event>,
) {
    while *remaining != 0 {
        let Some(top) = level.orders.front().copied() else {
            break;
        };
        let top_remaining = level.head_remaining().unwrap();
        if top_remaining > *remaining {
            level.outstanding_qty -= *remaining;
            *remaining = 0;
        } else {
            *remaining -= top_remaining;
            level.orders.pop_front();
            level.outstanding_qty -= top_remaining;
            level.opened_orders_qty -= top.qty as u32;
            events.push(Event::exec(instrument, top.trader, top.qty as u32, maker_side));
        }
    }
}
