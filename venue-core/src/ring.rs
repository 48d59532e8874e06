use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Bounded single-producer/single-consumer ring buffer. Two monotonically
/// increasing counters, `head` (producer-owned) and `tail` (consumer-owned);
/// slot index is the counter modulo capacity. No allocation on the hot path
/// — the backing storage is allocated once at construction and never
/// resized.
///
/// Memory ordering follows the classic SPSC protocol: the producer reads
/// `tail` with `Acquire` before deciding whether there's room, writes the
/// slot, then publishes with a `Release` store to `head`; the consumer reads
/// `head` with `Acquire`, reads the slot, then publishes with a `Release`
/// store to `tail`.
struct RingInner<T> {
    capacity: usize,
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
    head: AtomicU64,
    tail: AtomicU64,
}

// SAFETY: access to `buffer` slots is serialized by the head/tail protocol
// below — the producer only ever writes slots between `tail..head`'s
// complement and the consumer only ever reads slots in `[tail, head)`, so
// the two sides never touch the same slot concurrently.
unsafe impl<T: Send> Send for RingInner<T> {}
unsafe impl<T: Send> Sync for RingInner<T> {}

fn new_ring<T>(capacity: usize) -> Arc<RingInner<T>> {
    assert!(capacity > 0, "ring capacity must be positive");
    let mut buffer = Vec::with_capacity(capacity);
    buffer.resize_with(capacity, || UnsafeCell::new(MaybeUninit::uninit()));
    Arc::new(RingInner {
        capacity,
        buffer: buffer.into_boxed_slice(),
        head: AtomicU64::new(0),
        tail: AtomicU64::new(0),
    })
}

/// Construct a ring of the given capacity and split it into its producer
/// and consumer halves.
pub fn channel<T>(capacity: usize) -> (SpscProducer<T>, SpscConsumer<T>) {
    let inner = new_ring(capacity);
    (
        SpscProducer {
            inner: inner.clone(),
        },
        SpscConsumer { inner },
    )
}

/// The write half of an SPSC ring. There must be exactly one of these per
/// ring; it is not `Clone` on purpose.
pub struct SpscProducer<T> {
    inner: Arc<RingInner<T>>,
}

/// The read half of an SPSC ring. There must be exactly one of these per
/// ring; it is not `Clone` on purpose.
pub struct SpscConsumer<T> {
    inner: Arc<RingInner<T>>,
}

impl<T> SpscProducer<T> {
    /// Attempt to push one item. On failure (ring full) the value is
    /// handed back so the caller can retry or fall back to `force_push`.
    pub fn push(&self, value: T) -> Result<(), T> {
        let inner = &*self.inner;
        let head = inner.head.load(Ordering::Relaxed);
        let tail = inner.tail.load(Ordering::Acquire);
        if (head - tail) as usize == inner.capacity {
            return Err(value);
        }

        let idx = (head as usize) % inner.capacity;
        // SAFETY: slot `idx` is beyond the consumer's current tail, so only
        // the producer touches it until `head` is published below.
        unsafe {
            (*inner.buffer[idx].get()).write(value);
        }
        inner.head.store(head + 1, Ordering::Release);
        Ok(())
    }

    /// Push, spin-yielding until there is room. Used where the caller must
    /// not drop the event (the engine→notifier and notifier→client
    /// boundaries).
    pub fn force_push(&self, mut value: T) {
        loop {
            match self.push(value) {
                Ok(()) => return,
                Err(rejected) => {
                    value = rejected;
                    std::thread::yield_now();
                }
            }
        }
    }
}

impl<T> SpscConsumer<T> {
    /// Attempt to pop one item. Returns `None` if the ring is empty.
    pub fn pop(&self) -> Option<T> {
        let inner = &*self.inner;
        let tail = inner.tail.load(Ordering::Relaxed);
        let head = inner.head.load(Ordering::Acquire);
        if tail == head {
            return None;
        }

        let idx = (tail as usize) % inner.capacity;
        // SAFETY: slot `idx` was published by the producer's `Release`
        // store to `head`, observed above via `Acquire`.
        let value = unsafe { (*inner.buffer[idx].get()).assume_init_read() };
        inner.tail.store(tail + 1, Ordering::Release);
        Some(value)
    }

    pub fn is_empty(&self) -> bool {
        let inner = &*self.inner;
        inner.tail.load(Ordering::Relaxed) == inner.head.load(Ordering::Acquire)
    }
}

impl<T> Drop for RingInner<T> {
    fn drop(&mut self) {
        let head = *self.head.get_mut();
        let mut tail = *self.tail.get_mut();
        while tail != head {
            let idx = (tail as usize) % self.capacity;
            // SAFETY: everything in `[tail, head)` was written and never
            // popped, so it's still initialized and owed a drop.
            unsafe {
                std::ptr::drop_in_place(self.buffer[idx].get_mut().as_mut_ptr());
            }
            tail += 1;
        }
    }
}
