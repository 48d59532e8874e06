use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

struct State<T> {
    queue: VecDeque<T>,
    shutdown: bool,
}

/// A blocking FIFO shared by any number of producer and consumer threads.
/// Unbounded, used only on the low-rate submission path.
pub struct MpmcQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
}

impl<T> Default for MpmcQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MpmcQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                shutdown: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Enqueue `value` and wake one waiting consumer.
    pub fn push(&self, value: T) {
        let mut state = self.state.lock().expect("mpmc mutex poisoned");
        state.queue.push_back(value);
        self.not_empty.notify_one();
    }

    /// Block until an item is available or the queue is stopped.
    ///
    /// Once `stop()` has been called, `pop` returns `None` without
    /// consuming anything, even if items are still queued — shutdown is
    /// checked before the queue, not after.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock().expect("mpmc mutex poisoned");
        loop {
            if state.shutdown {
                return None;
            }
            if let Some(value) = state.queue.pop_front() {
                return Some(value);
            }
            state = self
                .not_empty
                .wait(state)
                .expect("mpmc mutex poisoned while waiting");
        }
    }

    /// Mark the queue as shut down and wake every blocked `pop`.
    pub fn stop(&self) {
        let mut state = self.state.lock().expect("mpmc mutex poisoned");
        state.shutdown = true;
        self.not_empty.notify_all();
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().expect("mpmc mutex poisoned").queue.is_empty()
    }
}
