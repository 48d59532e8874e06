/// Instrument is the type used to key a per-instrument order book.
///
/// Kept as a single byte (an ASCII symbol, e.g. `b'A'`) to match the
/// venue's data model; this is not a general-purpose asset identifier.
pub type Instrument = u8;

/// TraderId identifies a client connected to the exchange.
pub type TraderId = u16;

/// Side indicates the direction of an order, or the absence of one.
///
/// `None` is a legitimate member of this domain (an empty book has no
/// active side, and a malformed submission can carry no side at all) so it
/// is folded into the enum rather than modeled as `Option<Side>` — every
/// place that reads a `Side` off the wire or off a book already has to
/// handle it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The order wants to buy.
    Buy,
    /// The order wants to sell.
    Sell,
    /// No side: an empty book, or an invalid submission.
    #[default]
    None,
}

/// InputOrder is a client-submitted intent to trade.
///
/// Immutable once enqueued on the submission queue; consumed and dropped
/// by the Engine worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputOrder {
    pub instrument: Instrument,
    pub trader: TraderId,
    pub qty: u16,
    pub side: Side,
}

impl InputOrder {
    pub fn new(instrument: Instrument, side: Side, trader: TraderId, qty: u16) -> Self {
        Self {
            instrument,
            trader,
            qty,
            side,
        }
    }
}

/// InternalOrder is a resting order inside a `Book`.
///
/// Remaining quantity is deliberately not stored here: it's derived from
/// the owning book's `outstanding_qty`/`opened_orders_qty` (see
/// `book::Book`). Partial fills never touch this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalOrder {
    pub trader: TraderId,
    pub qty: u16,
}

impl InternalOrder {
    pub fn new(trader: TraderId, qty: u16) -> Self {
        Self { trader, qty }
    }
}

/// EventKind distinguishes the three event variants the engine emits.
///
/// The discriminant values match the wire encoding this event kind is
/// serialized with (`0=Placed, 1=Exec, 2=Tick`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventKind {
    #[default]
    OrderPlaced = 0,
    Exec = 1,
    Tick = 2,
}

/// Event is the in-process notification struct published by the Engine and
/// routed by the Notifier.
///
/// `qty` is `u32` (not `u16`) to accommodate `Tick`'s aggregate outstanding
/// quantity; per-order quantities always fit in `u16`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub instrument: Instrument,
    pub trader: TraderId,
    pub qty: u32,
    pub side: Side,
}

impl Event {
    pub fn placed(instrument: Instrument, trader: TraderId, qty: u32, side: Side) -> Self {
        Self {
            kind: EventKind::OrderPlaced,
            instrument,
            trader,
            qty,
            side,
        }
    }

    pub fn exec(instrument: Instrument, trader: TraderId, qty: u32, side: Side) -> Self {
        Self {
            kind: EventKind::Exec,
            instrument,
            trader,
            qty,
            side,
        }
    }

    pub fn tick(instrument: Instrument, qty: u32, side: Side) -> Self {
        Self {
            kind: EventKind::Tick,
            instrument,
            trader: 0,
            qty,
            side,
        }
    }
}
