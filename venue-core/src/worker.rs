use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

/// What a background worker actually does. `Engine`, `Notifier`, and
/// `TradingTool` each implement this instead of managing their own thread.
pub trait Runnable: Send + Sync + 'static {
    /// Called once on the worker thread before the loop starts.
    fn on_start(&self) {}

    /// One iteration of the loop. Implementations that have nothing to do
    /// should yield the thread themselves (the worker does not impose a
    /// sleep between calls).
    fn run_once(&self, stop: &AtomicBool);

    /// Called from `Worker::stop`, on the stopping thread, to unblock a
    /// `run_once` that may be parked waiting for input (e.g. an MPMC
    /// `pop`). Default is a no-op, appropriate for spinners.
    fn on_stop(&self) {}
}

/// Owns the stop flag and thread handle for one `Runnable`.
///
/// Spawns a thread that loops `Runnable::run_once` until a shared stop flag
/// is observed, then joins it. State machine: `Idle -> Running` on
/// `start()`, `Running -> Stopping` the instant `on_stop` unblocks the
/// loop's input and the stop flag is set, `Stopping -> Joined` when the
/// thread returns.
pub struct Worker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn `target` on its own thread. The `Arc` lets the caller keep
    /// using `target` directly (e.g. for synchronous calls in tests) while
    /// the worker thread also holds a handle to it.
    pub fn start<R: Runnable>(target: Arc<R>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = stop.clone();
        let handle = std::thread::spawn(move || {
            target.on_start();
            while !stop_for_thread.load(Ordering::Acquire) {
                target.run_once(&stop_for_thread);
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the stop flag, give `target` a chance to unblock its own
    /// input, and join the thread. Idempotent: calling `stop` again after
    /// the thread has already been joined is a no-op.
    pub fn stop<R: Runnable>(&mut self, target: &R) {
        self.stop.store(true, Ordering::Release);
        target.on_stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// Deliberately no `Drop` impl: unlike the stop flag, unblocking a worker's
// input (an MPMC `pop`, in the Engine's case) requires calling
// `Runnable::on_stop`, which a destructor has no `&R` to call. Callers must
// invoke `Worker::stop` explicitly, matching the "not safe to restart after
// stop, not implicitly stopped" lifecycle the external API documents.
