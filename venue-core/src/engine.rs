use std::cell::UnsafeCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::book::Book;
use crate::mpmc::MpmcQueue;
use crate::ring::SpscProducer;
use crate::types::{Event, InputOrder, InternalOrder, Instrument, Side, TraderId};
use crate::worker::Runnable;

/// A point-in-time, read-only copy of a `Book`'s fields, returned by
/// `Engine::book_snapshot` for test assertions.
#[derive(Debug, Clone)]
pub struct BookSnapshot {
    pub actual_side: Side,
    pub outstanding_qty: u32,
    pub opened_orders_qty: u32,
    pub orders: Vec<InternalOrder>,
}

impl BookSnapshot {
    /// Derived remaining quantity of the head (oldest resting) order, the
    /// same formula `Book::head_remaining` uses internally.
    pub fn head_remaining(&self) -> Option<u32> {
        self.orders
            .first()
            .map(|head| head.qty as u32 + self.outstanding_qty - self.opened_orders_qty)
    }
}

/// Matches submissions against per-instrument books and publishes the
/// resulting events.
///
/// Only the Engine's own worker thread (or, in tests, direct calls while
/// the worker hasn't been started) ever mutates `books`; that single-writer
/// invariant is what licenses the `UnsafeCell` instead of a lock.
pub struct Engine {
    submissions: MpmcQueue<InputOrder>,
    events: SpscProducer<Event>,
    books: UnsafeCell<HashMap<Instrument, Book>>,
    warned_ring_full: AtomicBool,
}

// SAFETY: `books` is only ever accessed while the single-writer invariant
// above holds (see the struct doc).
unsafe impl Sync for Engine {}

impl Engine {
    pub fn new(events: SpscProducer<Event>) -> Self {
        Self {
            submissions: MpmcQueue::new(),
            events,
            books: UnsafeCell::new(HashMap::new()),
            warned_ring_full: AtomicBool::new(false),
        }
    }

    /// Enqueue a submission. Non-blocking; the Engine worker consumes it
    /// asynchronously.
    pub fn submit(&self, order: InputOrder) {
        self.submissions.push(order);
    }

    /// Read-only snapshot of one instrument's book, for tests that assert
    /// on the base book's invariants directly rather than only through the
    /// emitted event stream.
    ///
    /// Safe to call whenever nothing else is concurrently mutating this
    /// book — i.e. between `place_order` calls on a stopped engine, exactly
    /// how the matching-scenario tests already use the Engine.
    pub fn book_snapshot(&self, instrument: Instrument) -> Option<BookSnapshot> {
        // SAFETY: single-writer invariant documented on the struct; callers
        // observe this only between synchronous `place_order` calls.
        let books = unsafe { &*self.books.get() };
        books.get(&instrument).map(|book| BookSnapshot {
            actual_side: book.actual_side,
            outstanding_qty: book.outstanding_qty,
            opened_orders_qty: book.opened_orders_qty,
            orders: book.orders.iter().copied().collect(),
        })
    }

    fn emit(&self, event: Event) {
        if self.events.push(event).is_err() {
            if !self.warned_ring_full.swap(true, Ordering::Relaxed) {
                tracing::warn!("engine: events ring is full, falling back to force_push");
            }
            self.events.force_push(event);
        }
    }

    /// Synchronous matching for one submission. `qty == 0`
    /// or `side == Side::None` is a no-op: submissions are trusted
    /// in-process input, not validated further here.
    pub fn place_order(&self, instrument: Instrument, side: Side, trader: TraderId, qty: u16) {
        if qty == 0 || side == Side::None {
            return;
        }

        // SAFETY: single-writer invariant documented on the struct.
        let books = unsafe { &mut *self.books.get() };
        let book = books.entry(instrument).or_default();

        if book.orders.is_empty() || side == book.actual_side {
            book.actual_side = side;
            book.orders.push_back(InternalOrder::new(trader, qty));
            book.outstanding_qty += qty as u32;
            book.opened_orders_qty += qty as u32;
            self.emit(Event::placed(instrument, trader, qty as u32, side));
        } else {
            let mut remaining = qty as u32;
            while !book.orders.is_empty() && remaining != 0 {
                let top = *book.orders.front().unwrap();
                let top_remaining = top.qty as u32 + book.outstanding_qty - book.opened_orders_qty;
                if top_remaining > remaining {
                    book.outstanding_qty -= remaining;
                    remaining = 0;
                } else {
                    remaining -= top_remaining;
                    book.orders.pop_front();
                    book.outstanding_qty -= top_remaining;
                    book.opened_orders_qty -= top.qty as u32;
                    self.emit(Event::exec(
                        instrument,
                        top.trader,
                        top.qty as u32,
                        book.actual_side,
                    ));
                }
            }

            if remaining == 0 {
                if book.orders.is_empty() {
                    book.actual_side = Side::None;
                }
                self.emit(Event::exec(instrument, trader, qty as u32, side));
            } else {
                // Aggressor survived: the book emptied out underneath it.
                book.actual_side = side;
                book.orders.push_back(InternalOrder::new(trader, qty));
                book.outstanding_qty += remaining;
                book.opened_orders_qty += qty as u32;
                self.emit(Event::placed(instrument, trader, qty as u32, side));
            }
        }

        book.check_invariants();

        if book.orders.is_empty() {
            self.emit(Event::tick(instrument, 0, Side::None));
        } else {
            self.emit(Event::tick(instrument, book.outstanding_qty, book.actual_side));
        }
    }
}

impl Runnable for Engine {
    fn run_once(&self, _stop: &AtomicBool) {
        if let Some(order) = self.submissions.pop() {
            self.place_order(order.instrument, order.side, order.trader, order.qty);
        }
        // `pop` returning `None` only happens on shutdown (it otherwise
        // blocks), at which point the surrounding `Worker` loop observes
        // the stop flag and exits without calling `run_once` again.
    }

    fn on_stop(&self) {
        self.submissions.stop();
    }
}
