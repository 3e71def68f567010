//! Write-once settlement cell backing executor-constructed futures.
//!
//! The cell is the rendezvous between a [`Settler`] (the producing half,
//! handed to an executor closure) and a [`SettledCell`] (the consuming
//! half, a future that resolves to the recorded [`Completion`]).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      SETTLEMENT CELL                           │
//! │                                                                │
//! │   Settler                               SettledCell            │
//! │     │                                       │                  │
//! │     │── ok(v) ────────────────────────────► │ ── Settled(Ok)   │
//! │     │── err(e) ───────────────────────────► │ ── Settled(Err)  │
//! │     │── fault(r) ─────────────────────────► │ ── Faulted(r)    │
//! │     │                                       │                  │
//! │   (drop) ─────────────────────────────────► │ ── Faulted       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # At-most-once settlement
//!
//! The settling methods consume the [`Settler`], so a second settlement is
//! unrepresentable. Dropping the settler without settling records a fault
//! — an executor that walks away never leaves the future hanging.

use crate::fault::Fault;
use crate::future::Completion;
use crate::outcome::Outcome;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

/// Fault message recorded when a settler is dropped unsettled.
pub(crate) const SETTLER_DROPPED: &str = "settler dropped without settling";

/// Internal state shared by the two cell halves.
#[derive(Debug)]
struct CellInner<T, E> {
    /// The recorded completion, if settled.
    completion: Option<Completion<T, E>>,
    /// Whether the receiver has already yielded the completion.
    taken: bool,
    /// Whether the completion came from an unsettled settler drop.
    ///
    /// Lets the executor path replace the generic drop fault with the real
    /// panic payload when the executor unwound.
    abandoned: bool,
    /// The waker to notify on settlement.
    waker: Option<Waker>,
    /// Monotonic waiter identity for the registered waker.
    ///
    /// Lets us clear a waiter only if the same poll site that registered it
    /// is being dropped.
    waker_id: Option<u64>,
    /// Next waiter identity to assign.
    next_waiter_id: u64,
}

impl<T, E> CellInner<T, E> {
    fn new() -> Self {
        Self {
            completion: None,
            taken: false,
            abandoned: false,
            waker: None,
            waker_id: None,
            next_waiter_id: 0,
        }
    }

    fn clear_waker(&mut self) {
        self.waker = None;
        self.waker_id = None;
    }

    fn take_waker(&mut self) -> Option<Waker> {
        self.waker_id = None;
        self.waker.take()
    }
}

/// Creates a settlement cell, returning the settler and receiver halves.
#[must_use]
pub(crate) fn settlement<T, E>() -> (Settler<T, E>, SettledCell<T, E>) {
    let inner = Arc::new(Mutex::new(CellInner::new()));
    (
        Settler {
            inner: Arc::clone(&inner),
            settled: false,
        },
        SettledCell {
            inner,
            waiter_id: None,
        },
    )
}

/// The producing half of a settlement cell.
///
/// Exposes the three settlement capabilities: success-settle
/// ([`Settler::ok`]), failure-settle ([`Settler::err`]), and
/// fault-propagation ([`Settler::fault`]). Each consumes the settler, so
/// settlement happens at most once per cell.
#[derive(Debug)]
pub struct Settler<T, E> {
    inner: Arc<Mutex<CellInner<T, E>>>,
    /// Whether a completion has been recorded (suppresses the drop fault).
    settled: bool,
}

impl<T, E> Settler<T, E> {
    /// Settles the future in the success channel with `Ok(value)`.
    pub fn ok(self, value: T) {
        self.complete(Completion::Settled(Outcome::Ok(value)));
    }

    /// Settles the future in the failure channel with `Err(error)`.
    pub fn err(self, error: E) {
        self.complete(Completion::Settled(Outcome::Err(error)));
    }

    /// Completes the future in the fault channel, bypassing the settled
    /// channels entirely.
    pub fn fault(self, reason: impl Into<Fault>) {
        self.complete(Completion::Faulted(reason.into()));
    }

    fn complete(mut self, completion: Completion<T, E>) {
        let waker = {
            let mut inner = self.inner.lock();
            inner.completion = Some(completion);
            // Take waker under lock, wake outside to avoid re-entrancy
            // with inline-polling executors.
            inner.take_waker()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
        self.settled = true;
    }
}

impl<T, E> Drop for Settler<T, E> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let waker = {
            let mut inner = self.inner.lock();
            inner.completion = Some(Completion::Faulted(Fault::new(SETTLER_DROPPED)));
            inner.abandoned = true;
            inner.take_waker()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// The consuming half of a settlement cell: a future resolving to the
/// recorded [`Completion`].
#[must_use = "futures do nothing unless polled"]
pub(crate) struct SettledCell<T, E> {
    inner: Arc<Mutex<CellInner<T, E>>>,
    waiter_id: Option<u64>,
}

impl<T, E> SettledCell<T, E> {
    /// Replaces an unsettled-drop fault with `fault`.
    ///
    /// Used by the executor construction path: when the executor panics
    /// after its settler was dropped by the unwind, the real panic payload
    /// is more useful than the generic drop message. A genuine settlement
    /// is never overridden.
    pub(crate) fn override_abandoned(&self, fault: Fault) {
        let waker = {
            let mut inner = self.inner.lock();
            if !inner.abandoned {
                return;
            }
            inner.abandoned = false;
            inner.completion = Some(Completion::Faulted(fault));
            inner.take_waker()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T, E> Future for SettledCell<T, E> {
    type Output = Completion<T, E>;

    fn poll(self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut inner = this.inner.lock();

        if let Some(completion) = inner.completion.take() {
            inner.taken = true;
            inner.clear_waker();
            this.waiter_id = None;
            return Poll::Ready(completion);
        }

        assert!(!inner.taken, "settlement cell polled after completion");

        // Register waker (skip clone if unchanged and still owned by this
        // waiter).
        match (&inner.waker, inner.waker_id, this.waiter_id) {
            (Some(existing), Some(registered), Some(mine))
                if registered == mine && existing.will_wake(ctx.waker()) => {}
            _ => {
                let waiter_id = inner.next_waiter_id;
                inner.next_waiter_id = inner.next_waiter_id.wrapping_add(1);
                inner.waker = Some(ctx.waker().clone());
                inner.waker_id = Some(waiter_id);
                this.waiter_id = Some(waiter_id);
            }
        }
        Poll::Pending
    }
}

impl<T, E> Drop for SettledCell<T, E> {
    fn drop(&mut self) {
        // If dropped while Pending, clear the registered waker so the
        // settler does not retain stale executor state.
        let mut inner = self.inner.lock();
        if self
            .waiter_id
            .is_some_and(|waiter_id| inner.waker_id == Some(waiter_id))
        {
            inner.clear_waker();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{block_on, counting_waker, noop_waker};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn settle_ok_resolves_success_channel() {
        let (settler, cell) = settlement::<i32, &str>();
        settler.ok(42);
        let completion = block_on(cell);
        assert_eq!(completion, Completion::Settled(Outcome::Ok(42)));
    }

    #[test]
    fn settle_err_resolves_failure_channel() {
        let (settler, cell) = settlement::<i32, &str>();
        settler.err("bad");
        let completion = block_on(cell);
        assert_eq!(completion, Completion::Settled(Outcome::Err("bad")));
    }

    #[test]
    fn settle_fault_resolves_fault_channel() {
        let (settler, cell) = settlement::<i32, &str>();
        settler.fault("out of band");
        let completion = block_on(cell);
        assert_eq!(completion, Completion::Faulted(Fault::new("out of band")));
    }

    #[test]
    fn settler_drop_faults_the_cell() {
        let (settler, cell) = settlement::<i32, &str>();
        drop(settler);
        let completion = block_on(cell);
        assert_eq!(completion, Completion::Faulted(Fault::new(SETTLER_DROPPED)));
    }

    #[test]
    fn settlement_wakes_pending_receiver_once() {
        let (settler, mut cell) = settlement::<i32, &str>();

        let wake_count = Arc::new(AtomicUsize::new(0));
        let waker = counting_waker(Arc::clone(&wake_count));
        let mut ctx = Context::from_waker(&waker);

        let first = Pin::new(&mut cell).poll(&mut ctx);
        assert!(matches!(first, Poll::Pending));

        settler.ok(7);
        assert_eq!(wake_count.load(Ordering::SeqCst), 1);

        let second = Pin::new(&mut cell).poll(&mut ctx);
        assert!(matches!(
            second,
            Poll::Ready(Completion::Settled(Outcome::Ok(7)))
        ));
    }

    #[test]
    fn repoll_with_same_waker_keeps_waiter_identity() {
        let (_settler, mut cell) = settlement::<i32, &str>();
        let waker = noop_waker();
        let mut ctx = Context::from_waker(&waker);

        assert!(matches!(Pin::new(&mut cell).poll(&mut ctx), Poll::Pending));
        let first_id = cell.inner.lock().waker_id;
        assert!(matches!(Pin::new(&mut cell).poll(&mut ctx), Poll::Pending));
        let second_id = cell.inner.lock().waker_id;
        assert_eq!(first_id, second_id);
    }

    #[test]
    fn receiver_drop_clears_registered_waker() {
        let (settler, mut cell) = settlement::<i32, &str>();
        let waker = noop_waker();
        let mut ctx = Context::from_waker(&waker);

        assert!(matches!(Pin::new(&mut cell).poll(&mut ctx), Poll::Pending));
        let inner = Arc::clone(&cell.inner);
        assert!(inner.lock().waker.is_some());

        drop(cell);
        assert!(inner.lock().waker.is_none(), "waker retained after drop");

        // Settling into the void must not panic.
        settler.ok(1);
    }

    #[test]
    #[should_panic(expected = "polled after completion")]
    fn polling_after_completion_panics() {
        let (settler, mut cell) = settlement::<i32, &str>();
        settler.ok(1);

        let waker = noop_waker();
        let mut ctx = Context::from_waker(&waker);
        let first = Pin::new(&mut cell).poll(&mut ctx);
        assert!(matches!(first, Poll::Ready(_)));
        let _ = Pin::new(&mut cell).poll(&mut ctx);
    }

    #[test]
    fn override_abandoned_replaces_drop_fault() {
        let (settler, cell) = settlement::<i32, &str>();
        drop(settler);
        cell.override_abandoned(Fault::new("real reason"));
        let completion = block_on(cell);
        assert_eq!(completion, Completion::Faulted(Fault::new("real reason")));
    }

    #[test]
    fn override_abandoned_never_touches_genuine_settlement() {
        let (settler, cell) = settlement::<i32, &str>();
        settler.ok(5);
        cell.override_abandoned(Fault::new("too late"));
        let completion = block_on(cell);
        assert_eq!(completion, Completion::Settled(Outcome::Ok(5)));
    }
}
