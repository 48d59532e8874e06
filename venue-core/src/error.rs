/// Returned by `Exchange::start`/`Exchange::stop` when called out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// `start()` was called on an exchange that is already running.
    AlreadyStarted,
    /// `stop()` was called on an exchange that was never started.
    NotStarted,
    /// `stop()` was called on an exchange that has already been stopped.
    AlreadyStopped,
}

/// Returned by `Exchange::register_client`/`unregister_client` when called
/// after `start()`. The client registry is read without synchronization
/// once the Notifier's worker is running, so registering later would be a
/// data race rather than a late-but-safe update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    /// The exchange has already started; the registry can no longer be
    /// touched.
    AlreadyStarted,
}
