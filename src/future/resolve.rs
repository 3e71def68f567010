//! The value-resolution algorithm.
//!
//! Continuations handed to [`AsyncOutcome`] combinators can answer in
//! several shapes. The [`Resolve`] trait is the explicit capability check
//! that normalizes each shape into the correct settlement channel of the
//! derived future:
//!
//! | Shape | Settled channels | Fault channel |
//! |---|---|---|
//! | [`Outcome<T, E>`] | `Ok`→success, `Err`→failure | never |
//! | [`AsyncOutcome<T, E>`] | spliced through | spliced through |
//! | [`Foreign<F>`] (generic future) | completion→success | panic→**fault** |
//!
//! The `Foreign` row is deliberately asymmetric with
//! [`AsyncOutcome::from_future`]: adapting external work at the boundary
//! reinterprets an abnormal completion as a *typed* failure, while a
//! foreign future returned from inside a continuation chain is already
//! under the container's discipline, so its abnormal completion is an
//! unexpected fault of the chain. Do not unify the two paths.

use crate::fault::Fault;
use crate::future::{AsyncOutcome, Completion};
use crate::outcome::Outcome;
use pin_project::pin_project;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A continuation return value that can be normalized into an
/// asynchronous settlement.
///
/// Plain success payloads have no impl on purpose: under static typing a
/// plain value is expressed as `Outcome::Ok(value)` (or routed through
/// [`AsyncOutcome::map`]), which settles the success channel.
pub trait Resolve<T, E>: Send + 'static {
    /// Normalizes `self` into an [`AsyncOutcome`].
    fn into_async(self) -> AsyncOutcome<T, E>;
}

impl<T, E> Resolve<T, E> for Outcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_async(self) -> AsyncOutcome<T, E> {
        AsyncOutcome::from(self)
    }
}

impl<T, E> Resolve<T, E> for AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_async(self) -> AsyncOutcome<T, E> {
        self
    }
}

/// Marker wrapper for a generic foreign future returned from a
/// continuation.
///
/// The wrapped future's normal completion settles the success channel; an
/// abnormal completion (a panic during poll) is routed to the **fault**
/// channel, not the typed failure channel. See the module documentation
/// for why this is asymmetric with [`AsyncOutcome::from_future`].
#[derive(Debug)]
pub struct Foreign<F>(pub F);

impl<F, T, E> Resolve<T, E> for Foreign<F>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_async(self) -> AsyncOutcome<T, E> {
        AsyncOutcome::from_completion(async move {
            match CatchUnwind::new(self.0).await {
                Ok(value) => Completion::Settled(Outcome::Ok(value)),
                Err(fault) => Completion::Faulted(fault),
            }
        })
    }
}

/// Future adapter that captures a panic during poll as a [`Fault`].
///
/// A panicking poll is terminal: the fault is yielded as the output and
/// the inner future is never polled again.
#[pin_project]
#[must_use = "futures do nothing unless polled"]
pub struct CatchUnwind<F> {
    #[pin]
    inner: F,
}

impl<F> CatchUnwind<F> {
    /// Wraps `inner`, diverting its panics into the output channel.
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: Future> Future for CatchUnwind<F> {
    type Output = Result<F::Output, Fault>;

    fn poll(self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let inner = this.inner;
        match std::panic::catch_unwind(AssertUnwindSafe(|| inner.poll(ctx))) {
            Ok(Poll::Ready(value)) => Poll::Ready(Ok(value)),
            Ok(Poll::Pending) => Poll::Pending,
            Err(payload) => Poll::Ready(Err(Fault::from_panic(payload))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::block_on;

    async fn panicking(message: &'static str) -> i32 {
        panic!("{message}");
    }

    #[test]
    fn outcome_routes_to_settled_channels() {
        let settled = block_on(Outcome::<i32, &str>::Ok(3).into_async());
        assert_eq!(settled, Completion::Settled(Outcome::Ok(3)));

        let settled = block_on(Outcome::<i32, &str>::Err("e").into_async());
        assert_eq!(settled, Completion::Settled(Outcome::Err("e")));
    }

    #[test]
    fn async_outcome_splices_all_channels() {
        let ok = block_on(AsyncOutcome::<i32, &str>::ok(1).into_async());
        assert_eq!(ok, Completion::Settled(Outcome::Ok(1)));

        let faulted = block_on(AsyncOutcome::<i32, &str>::faulted(Fault::new("f")).into_async());
        assert_eq!(faulted, Completion::Faulted(Fault::new("f")));
    }

    #[test]
    fn foreign_completion_settles_success() {
        let resolved: AsyncOutcome<i32, &str> = Foreign(async { 41 + 1 }).into_async();
        assert_eq!(block_on(resolved), Completion::Settled(Outcome::Ok(42)));
    }

    #[test]
    fn foreign_rejection_is_a_fault_not_a_typed_error() {
        let resolved: AsyncOutcome<i32, &str> = Foreign(panicking("nope")).into_async();
        match block_on(resolved) {
            Completion::Faulted(fault) => assert_eq!(fault.message(), "nope"),
            Completion::Settled(settled) => {
                panic!("foreign rejection must fault, settled as {settled:?}")
            }
        }
    }

    #[test]
    fn catch_unwind_passes_values_through() {
        let result = block_on(CatchUnwind::new(async { "fine" }));
        assert_eq!(result, Ok("fine"));
    }

    #[test]
    fn catch_unwind_captures_the_panic_payload() {
        let result = block_on(CatchUnwind::new(panicking("kaboom")));
        assert_eq!(result, Err(Fault::new("kaboom")));
    }
}
