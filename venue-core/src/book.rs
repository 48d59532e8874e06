use std::collections::VecDeque;

use crate::types::{InternalOrder, Side};

/// Per-instrument matching state for the base (unpriced, FIFO) core.
///
/// Only the Engine worker ever mutates a `Book`; that single-writer
/// invariant is what licenses plain (non-atomic, non-locked) fields here.
///
/// Invariants:
/// - `orders` empty ⇔ `actual_side == Side::None` ⇔ `outstanding_qty == 0`
///   ⇔ `opened_orders_qty == 0`.
/// - If non-empty, every resting order shares side `actual_side`.
/// - `outstanding_qty <= opened_orders_qty`.
/// - The head order's remaining quantity is
///   `head.qty + outstanding_qty - opened_orders_qty`; every other resting
///   order is fully unfilled.
#[derive(Debug, Default)]
pub struct Book {
    pub actual_side: Side,
    pub orders: VecDeque<InternalOrder>,
    pub outstanding_qty: u32,
    pub opened_orders_qty: u32,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining (unfilled) quantity of the head order, derived rather than
    /// stored — see the struct doc.
    pub fn head_remaining(&self) -> Option<u32> {
        self.orders.front().map(|head| {
            head.qty as u32 + self.outstanding_qty - self.opened_orders_qty
        })
    }

    /// Checks this book's invariants (see the struct doc). Body is all
    /// `debug_assert!`, so this costs nothing in a release build; the
    /// `Engine` calls it after every submission.
    pub fn check_invariants(&self) {
        if self.orders.is_empty() {
            debug_assert_eq!(self.actual_side, Side::None);
            debug_assert_eq!(self.outstanding_qty, 0);
            debug_assert_eq!(self.opened_orders_qty, 0);
            return;
        }
        debug_assert_ne!(self.actual_side, Side::None);
        debug_assert!(self.outstanding_qty <= self.opened_orders_qty);
        for order in &self.orders {
            debug_assert!(order.qty > 0);
        }
        let head_remaining = self.head_remaining().unwrap();
        debug_assert!(head_remaining > 0);
        debug_assert!(head_remaining <= self.orders.front().unwrap().qty as u32);
    }
}
