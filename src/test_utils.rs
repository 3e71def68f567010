//! Shared helpers for the crate's test suites.
//!
//! Provides a minimal polling harness so settlement behavior can be tested
//! without pulling in a full runtime: a busy-yield [`block_on`], a no-op
//! waker, a wake-counting waker, and single-step polling.

use crate::test_logging::{TestLogLevel, TestLogger};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll, Wake, Waker};

/// The process-wide test logger, configured from `TEST_LOG_LEVEL`.
static GLOBAL_LOGGER: OnceLock<TestLogger> = OnceLock::new();

/// Initializes (once) and returns the process-wide test logger.
pub fn init_test_logging() -> &'static TestLogger {
    GLOBAL_LOGGER.get_or_init(TestLogger::from_env)
}

/// Returns the process-wide test logger, initializing it at the default
/// level if needed.
pub fn test_logger() -> &'static TestLogger {
    GLOBAL_LOGGER.get_or_init(|| TestLogger::new(TestLogLevel::Info))
}

#[derive(Debug)]
struct NoopWake;

impl Wake for NoopWake {
    fn wake(self: Arc<Self>) {}
}

/// A waker that does nothing when woken.
#[must_use]
pub fn noop_waker() -> Waker {
    Waker::from(Arc::new(NoopWake))
}

struct CountingWake(Arc<AtomicUsize>);

impl Wake for CountingWake {
    fn wake(self: Arc<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// A waker that increments `counter` on every wake.
#[must_use]
pub fn counting_waker(counter: Arc<AtomicUsize>) -> Waker {
    Waker::from(Arc::new(CountingWake(counter)))
}

/// Polls `future` once with a no-op waker.
pub fn poll_once<F: Future + Unpin>(future: &mut F) -> Poll<F::Output> {
    let waker = noop_waker();
    let mut ctx = Context::from_waker(&waker);
    Pin::new(future).poll(&mut ctx)
}

/// Drives a future to completion by repeated polling.
///
/// Suitable for the cooperative, settle-once futures in this crate: every
/// pending state here is resolved by another thread or by work already
/// queued, so yielding between polls is sufficient.
pub fn block_on<F: Future>(future: F) -> F::Output {
    let waker = noop_waker();
    let mut ctx = Context::from_waker(&waker);
    let mut pinned = Box::pin(future);
    loop {
        match pinned.as_mut().poll(&mut ctx) {
            Poll::Ready(value) => return value,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_on_ready_future() {
        let value = block_on(std::future::ready(42));
        assert_eq!(value, 42);
    }

    #[test]
    fn poll_once_reports_pending() {
        let mut pending = std::future::pending::<()>();
        assert!(poll_once(&mut pending).is_pending());
    }

    #[test]
    fn counting_waker_counts() {
        let counter = Arc::new(AtomicUsize::new(0));
        let waker = counting_waker(Arc::clone(&counter));
        waker.wake_by_ref();
        waker.wake();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn global_logger_is_a_singleton() {
        let first = init_test_logging();
        let second = test_logger();
        assert!(std::ptr::eq(first, second));
    }
}
