//! The asynchronous settlement bridge.
//!
//! An [`AsyncOutcome<T, E>`] is a future whose eventual completion is
//! partitioned into two channels:
//!
//! - **Settled**: the future completes normally, carrying an
//!   [`Outcome<T, E>`] (either case).
//! - **Faulted**: the future completes abnormally, carrying a [`Fault`] —
//!   reserved for panics inside continuations, abnormal completion of
//!   foreign futures returned from continuations, or explicit out-of-band
//!   propagation through a [`Settler`].
//!
//! An `AsyncOutcome` never faults with a value that should have been a
//! typed `E`; the fault channel is strictly out-of-band.
//!
//! # Composition model
//!
//! Each `AsyncOutcome` owns a boxed internal future of
//! [`Completion<T, E>`]. Combinators consume the wrapper and construct a
//! new wrapper around a derived internal future; continuations therefore
//! run at poll time, driven by the host executor — never synchronously
//! inside the call that registers them — and a derived future cannot
//! complete before the source it depends on.
//!
//! Continuation return values are normalized through the
//! [`Resolve`](crate::Resolve) trait (the value-resolution algorithm); a
//! continuation that panics routes its payload to the fault channel, never
//! to the typed failure channel.
//!
//! # Example
//!
//! ```
//! use outcome::{AsyncOutcome, Outcome};
//!
//! let doubled = AsyncOutcome::<i32, String>::ok(21).map(|v| v * 2);
//! let completion = futures_lite::future::block_on(doubled);
//! assert_eq!(completion.unwrap_settled(), Outcome::Ok(42));
//! ```

use crate::fault::Fault;
use crate::outcome::Outcome;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

pub mod cell;
pub mod resolve;

pub use cell::Settler;
pub use resolve::{CatchUnwind, Foreign, Resolve};

/// The completion value of an [`AsyncOutcome`].
#[must_use = "this `Completion` may carry a fault that should be handled"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T, E> {
    /// Normal completion, carrying an [`Outcome`] of either case.
    Settled(Outcome<T, E>),
    /// Abnormal completion, outside the typed-error channel.
    Faulted(Fault),
}

impl<T, E> Completion<T, E> {
    /// Returns `true` if the future completed normally.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Settled(_))
    }

    /// Returns `true` if the future completed abnormally.
    #[must_use]
    pub const fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }

    /// The settled outcome, if any.
    #[must_use]
    pub fn settled(self) -> Option<Outcome<T, E>> {
        match self {
            Self::Settled(outcome) => Some(outcome),
            Self::Faulted(_) => None,
        }
    }

    /// The fault, if any.
    #[must_use]
    pub fn fault(self) -> Option<Fault> {
        match self {
            Self::Settled(_) => None,
            Self::Faulted(fault) => Some(fault),
        }
    }

    /// Returns the settled outcome, re-raising a fault through the host
    /// panic mechanism.
    ///
    /// An unhandled fault thereby surfaces exactly as an ordinary
    /// unhandled panic would.
    ///
    /// # Panics
    ///
    /// Resumes the fault's unwind on the faulted case.
    pub fn unwrap_settled(self) -> Outcome<T, E> {
        match self {
            Self::Settled(outcome) => outcome,
            Self::Faulted(fault) => fault.resume(),
        }
    }
}

/// A future whose normal completion always carries an [`Outcome`].
///
/// See the [module documentation](self) for the channel model and
/// resolution rules.
#[must_use = "futures do nothing unless polled"]
pub struct AsyncOutcome<T, E> {
    inner: Pin<Box<dyn Future<Output = Completion<T, E>> + Send>>,
}

impl<T, E> std::fmt::Debug for AsyncOutcome<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncOutcome").finish_non_exhaustive()
    }
}

impl<T, E> Future for AsyncOutcome<T, E> {
    type Output = Completion<T, E>;

    fn poll(mut self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(ctx)
    }
}

/// Runs a continuation, capturing a panic as a [`Fault`].
fn guard<R>(f: impl FnOnce() -> R) -> Result<R, Fault> {
    std::panic::catch_unwind(AssertUnwindSafe(f)).map_err(Fault::from_panic)
}

impl<T, E> AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Wraps an internal completion future.
    pub(crate) fn from_completion(
        future: impl Future<Output = Completion<T, E>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(future),
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Settles the success channel immediately with `Ok(value)`.
    pub fn ok(value: T) -> Self {
        Self::from_completion(std::future::ready(Completion::Settled(Outcome::Ok(value))))
    }

    /// Settles the failure channel immediately with `Err(error)`.
    pub fn err(error: E) -> Self {
        Self::from_completion(std::future::ready(Completion::Settled(Outcome::Err(
            error,
        ))))
    }

    /// Completes the fault channel immediately.
    pub fn faulted(fault: impl Into<Fault>) -> Self {
        Self::from_completion(std::future::ready(Completion::Faulted(fault.into())))
    }

    /// Constructs a future from an executor holding the three settlement
    /// capabilities.
    ///
    /// The executor runs synchronously during construction. The
    /// [`Settler`]'s consuming methods make settlement at-most-once;
    /// dropping the settler unsettled faults the future, and a panic that
    /// unwinds out of the executor is routed to the fault channel (unless
    /// the executor had already settled).
    pub fn new(executor: impl FnOnce(Settler<T, E>)) -> Self {
        let (settler, receiver) = cell::settlement();
        if let Err(payload) =
            std::panic::catch_unwind(AssertUnwindSafe(move || executor(settler)))
        {
            receiver.override_abandoned(Fault::from_panic(payload));
        }
        Self::from_completion(receiver)
    }

    // ========================================================================
    // Generalized continuation combinator
    // ========================================================================

    /// The generalized continuation combinator: handles both channels.
    ///
    /// `on_settled` receives the settled [`Outcome`]; `on_fault` receives
    /// the fault. Each handler's return value is normalized through
    /// [`Resolve`]; a handler that panics routes its payload to the
    /// derived future's fault channel.
    pub fn handle<U, F2, RS, RF>(
        self,
        on_settled: impl FnOnce(Outcome<T, E>) -> RS + Send + 'static,
        on_fault: impl FnOnce(Fault) -> RF + Send + 'static,
    ) -> AsyncOutcome<U, F2>
    where
        U: Send + 'static,
        F2: Send + 'static,
        RS: Resolve<U, F2>,
        RF: Resolve<U, F2>,
    {
        AsyncOutcome::from_completion(async move {
            match self.await {
                Completion::Settled(outcome) => match guard(move || on_settled(outcome)) {
                    Ok(resolved) => resolved.into_async().await,
                    Err(fault) => Completion::Faulted(fault),
                },
                Completion::Faulted(fault) => match guard(move || on_fault(fault)) {
                    Ok(resolved) => resolved.into_async().await,
                    Err(fault) => Completion::Faulted(fault),
                },
            }
        })
    }

    /// Continues on the settled channel; a fault passes through unchanged.
    pub fn then<U, F2, R>(
        self,
        on_settled: impl FnOnce(Outcome<T, E>) -> R + Send + 'static,
    ) -> AsyncOutcome<U, F2>
    where
        U: Send + 'static,
        F2: Send + 'static,
        R: Resolve<U, F2>,
    {
        AsyncOutcome::from_completion(async move {
            match self.await {
                Completion::Settled(outcome) => match guard(move || on_settled(outcome)) {
                    Ok(resolved) => resolved.into_async().await,
                    Err(fault) => Completion::Faulted(fault),
                },
                Completion::Faulted(fault) => Completion::Faulted(fault),
            }
        })
    }

    /// Continues on the fault channel; a settled outcome — either case —
    /// passes through untouched.
    pub fn catch<R>(self, on_fault: impl FnOnce(Fault) -> R + Send + 'static) -> Self
    where
        R: Resolve<T, E>,
    {
        AsyncOutcome::from_completion(async move {
            match self.await {
                Completion::Settled(outcome) => Completion::Settled(outcome),
                Completion::Faulted(fault) => match guard(move || on_fault(fault)) {
                    Ok(resolved) => resolved.into_async().await,
                    Err(fault) => Completion::Faulted(fault),
                },
            }
        })
    }

    // ========================================================================
    // Specialized combinators (short-circuit per the synchronous contract)
    // ========================================================================

    /// Maps the settled success value; failures and faults pass through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U + Send + 'static) -> AsyncOutcome<U, E>
    where
        U: Send + 'static,
    {
        self.then(move |outcome| outcome.map(f))
    }

    /// Maps the settled error; successes and faults pass through.
    pub fn map_err<F2>(self, f: impl FnOnce(E) -> F2 + Send + 'static) -> AsyncOutcome<T, F2>
    where
        F2: Send + 'static,
    {
        self.then(move |outcome| outcome.map_err(f))
    }

    /// Collapses both settled cases into a success value.
    pub fn map_or_else<U>(
        self,
        on_err: impl FnOnce(E) -> U + Send + 'static,
        f: impl FnOnce(T) -> U + Send + 'static,
    ) -> AsyncOutcome<U, E>
    where
        U: Send + 'static,
    {
        self.then(move |outcome| Outcome::<U, E>::Ok(outcome.map_or_else(on_err, f)))
    }

    /// Chains a continuation on the settled success value.
    ///
    /// A settled failure short-circuits past the continuation; a fault
    /// passes through. The continuation's return value is normalized
    /// through [`Resolve`], and a panicking continuation faults the
    /// derived future.
    pub fn and_then<U, R>(self, f: impl FnOnce(T) -> R + Send + 'static) -> AsyncOutcome<U, E>
    where
        U: Send + 'static,
        R: Resolve<U, E>,
    {
        AsyncOutcome::from_completion(async move {
            match self.await {
                Completion::Settled(Outcome::Ok(value)) => match guard(move || f(value)) {
                    Ok(resolved) => resolved.into_async().await,
                    Err(fault) => Completion::Faulted(fault),
                },
                Completion::Settled(Outcome::Err(error)) => {
                    Completion::Settled(Outcome::Err(error))
                }
                Completion::Faulted(fault) => Completion::Faulted(fault),
            }
        })
    }

    /// Chains a recovery continuation on the settled error.
    ///
    /// A settled success short-circuits past the continuation; a fault
    /// passes through.
    pub fn or_else<F2, R>(self, f: impl FnOnce(E) -> R + Send + 'static) -> AsyncOutcome<T, F2>
    where
        F2: Send + 'static,
        R: Resolve<T, F2>,
    {
        AsyncOutcome::from_completion(async move {
            match self.await {
                Completion::Settled(Outcome::Ok(value)) => Completion::Settled(Outcome::Ok(value)),
                Completion::Settled(Outcome::Err(error)) => match guard(move || f(error)) {
                    Ok(resolved) => resolved.into_async().await,
                    Err(fault) => Completion::Faulted(fault),
                },
                Completion::Faulted(fault) => Completion::Faulted(fault),
            }
        })
    }

    /// Runs a side effect on the settled success value.
    pub fn inspect(self, f: impl FnOnce(&T) + Send + 'static) -> Self {
        self.then(move |outcome| outcome.inspect(f))
    }

    /// Runs a side effect on the settled error.
    pub fn inspect_err(self, f: impl FnOnce(&E) + Send + 'static) -> Self {
        self.then(move |outcome| outcome.inspect_err(f))
    }
}

impl<T> AsyncOutcome<T, Fault>
where
    T: Send + 'static,
{
    /// Adapts an existing foreign computation at the boundary.
    ///
    /// The future's normal completion settles the success channel; its
    /// abnormal completion (a panic during poll) settles the **failure**
    /// channel as a typed [`Fault`] — adapting external work reinterprets
    /// its rejection as an expected, inspectable error. Contrast with
    /// [`Foreign`], where a foreign future returned from inside a
    /// continuation chain faults instead.
    pub fn from_future(future: impl Future<Output = T> + Send + 'static) -> Self {
        Self::from_completion(async move {
            match CatchUnwind::new(future).await {
                Ok(value) => Completion::Settled(Outcome::Ok(value)),
                Err(fault) => Completion::Settled(Outcome::Err(fault)),
            }
        })
    }
}

impl<T, E> AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static + From<Fault>,
{
    /// Adapts a fallible foreign computation at the boundary.
    ///
    /// `Ok`/`Err` map to the settled channels; a panic during poll is
    /// reified as `E::from(fault)` — the same boundary-adaptation rule as
    /// [`AsyncOutcome::from_future`].
    pub fn from_try_future(future: impl Future<Output = Result<T, E>> + Send + 'static) -> Self {
        Self::from_completion(async move {
            match CatchUnwind::new(future).await {
                Ok(Ok(value)) => Completion::Settled(Outcome::Ok(value)),
                Ok(Err(error)) => Completion::Settled(Outcome::Err(error)),
                Err(fault) => Completion::Settled(Outcome::Err(E::from(fault))),
            }
        })
    }
}

impl<T, E> From<Outcome<T, E>> for AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn from(outcome: Outcome<T, E>) -> Self {
        Self::from_completion(std::future::ready(Completion::Settled(outcome)))
    }
}
