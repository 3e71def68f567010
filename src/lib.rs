//! Explicit success/failure containers with an asynchronous settlement
//! bridge.
//!
//! This crate provides one reusable value type and its laws — not an error
//! taxonomy, and not an application-level error policy:
//!
//! - [`Outcome<T, E>`]: a two-case tagged union (success with `T`, failure
//!   with `E`) with a full combinator contract — transform, chain, inspect,
//!   extract, iterate — where every short-circuiting combinator guarantees
//!   the continuation never runs on the non-applicable branch.
//! - [`AsyncOutcome<T, E>`]: a future whose normal completion always
//!   carries an `Outcome`, with an out-of-band **fault** channel for
//!   unexpected failures (panics, abnormal foreign-future completion) and
//!   a combinator surface mirroring the synchronous contract.
//! - [`Fault`]: the reified unexpected-failure payload, kept strictly
//!   distinct from typed errors.
//!
//! # The two error channels
//!
//! A *typed failure* `E` is expected, recoverable, and inspectable without
//! raising. An *unexpected fault* is a panic or a foreign future's abnormal
//! completion — it travels the fault channel of [`AsyncOutcome`] (or the
//! host panic mechanism in the synchronous API) and is never silently
//! promoted into the typed channel. Two deliberate boundary adapters
//! capture instead of propagating: [`Outcome::catch`] for synchronous
//! calls and [`AsyncOutcome::from_future`] for foreign futures.
//!
//! Note the asymmetry, preserved on purpose: a foreign future adapted via
//! [`AsyncOutcome::from_future`] reinterprets its rejection as a typed
//! failure, while a foreign future returned *from inside a continuation*
//! (wrapped in [`Foreign`]) routes its rejection to the fault channel. The
//! first adapts external I/O; the second reacts to in-chain failures.
//!
//! # Example
//!
//! ```
//! use outcome::{AsyncOutcome, Outcome};
//!
//! let pipeline = AsyncOutcome::<u32, String>::ok(2)
//!     .and_then(|v| {
//!         if v > 0 {
//!             Outcome::Ok(v + 1)
//!         } else {
//!             Outcome::Err("must be positive".to_string())
//!         }
//!     })
//!     .map(|v| v * 10);
//!
//! let completion = futures_lite::future::block_on(pipeline);
//! assert_eq!(completion.unwrap_settled(), Outcome::Ok(30));
//! ```
//!
//! # Module map
//!
//! - [`outcome`]: the container and its combinator contract, the
//!   whole-collection combinators ([`and_all`], [`or_any`]), and iteration.
//! - [`future`]: the asynchronous bridge — settlement cell, value
//!   resolution, combinators.
//! - [`fault`]: the unexpected-failure payload.
//! - [`laws`]: the machine-readable law sheet this crate commits to.
//! - [`test_logging`], [`test_utils`]: test instrumentation used by the
//!   crate's own suites and available to downstream tests.

pub mod fault;
pub mod future;
pub mod laws;
pub mod outcome;
pub mod test_logging;
pub mod test_utils;

pub use fault::Fault;
pub use future::{AsyncOutcome, CatchUnwind, Completion, Foreign, Resolve, Settler};
pub use outcome::{and_all, or_any, Outcome};

/// Convenience re-exports for common usage patterns.
///
/// ```
/// use outcome::prelude::*;
///
/// let value: Outcome<i32, String> = Outcome::Ok(1);
/// assert!(value.is_ok());
/// ```
pub mod prelude {
    pub use crate::fault::Fault;
    pub use crate::future::{AsyncOutcome, Completion, Foreign, Resolve, Settler};
    pub use crate::outcome::{and_all, or_any, Outcome};
}
