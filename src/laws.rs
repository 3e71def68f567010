//! The law sheet for the Outcome algebra and its asynchronous bridge.
//!
//! This module is the formal catalog of every algebraic law the crate
//! commits to preserving. Combinator rewrites and future extensions must
//! not violate these laws.
//!
//! # Algebraic Perspective
//!
//! - **`map`** makes `Outcome<_, E>` a functor over the success channel.
//! - **`and_then`** is Kleisli composition: sequence fallible steps,
//!   short-circuit failures.
//! - **`flatten`** is the monad join, collapsing one level of nesting.
//! - **`and_all` / `or_any`** fold a sequence with failure-biased /
//!   success-biased selection; the empty fold yields the void success
//!   marker.
//! - The **resolution algorithm** of the asynchronous bridge partitions
//!   every continuation result into exactly one of three channels:
//!   settle-success, settle-failure, or fault.
//!
//! # Law Classification
//!
//! - **Unconditional**: holds for all inputs and all combinator chains.
//! - **Boundary**: holds at the explicit adaptation boundary
//!   (`Outcome::catch`, `AsyncOutcome::from_future`) and deliberately NOT
//!   inside continuation chains. The boundary/chain asymmetry is a design
//!   commitment, not an accident — do not "fix" it.
//! - **Structural**: guaranteed by construction (linear settlers, owned
//!   inner futures), so no runtime check exists or is needed.
//!
//! # Law Sheet
//!
//! ## Variant laws (Unconditional)
//!
//! | Law | Statement |
//! |-----|-----------|
//! | VARIANT-EXCL | exactly one of `is_ok`, `is_err` holds |
//! | PRED-GUARD | `is_ok_and`/`is_err_and` never run the predicate cross-branch |
//!
//! ## Functor laws (Unconditional)
//!
//! | Law | Statement |
//! |-----|-----------|
//! | MAP-ID | `o.map(id) = o` |
//! | MAP-COMP | `o.map(f).map(g) = o.map(g ∘ f)` |
//! | MAP-SHORT | `Err(e).map(f) = Err(e)`, `f` never invoked |
//! | MAPERR-SHORT | `Ok(v).map_err(f) = Ok(v)`, `f` never invoked |
//!
//! ## Kleisli laws (Unconditional)
//!
//! | Law | Statement |
//! |-----|-----------|
//! | BIND-LEFT-ID | `Ok(v).and_then(f) = f(v)` |
//! | BIND-RIGHT-ID | `o.and_then(Ok) = o` |
//! | BIND-ASSOC | `o.and_then(f).and_then(g) = o.and_then(\|v\| f(v).and_then(g))` |
//! | BIND-SHORT | `Err(e).and_then(f) = Err(e)`, `f` never invoked |
//! | ORELSE-SHORT | `Ok(v).or_else(f) = Ok(v)`, `f` never invoked |
//!
//! ## Join laws (Unconditional)
//!
//! | Law | Statement |
//! |-----|-----------|
//! | FLATTEN-OK-OK | `flatten(Ok(Ok(x))) = Ok(x)` |
//! | FLATTEN-OK-ERR | `flatten(Ok(Err(e))) = Err(e)` |
//! | FLATTEN-ERR | `flatten(Err(e)) = Err(e)` regardless of contents |
//!
//! ## Fold laws (Unconditional)
//!
//! | Law | Statement |
//! |-----|-----------|
//! | ALL-FIRST-FAIL | `and_all` returns the first failure |
//! | ALL-LAST-OK | `and_all` of all-successes returns the last element |
//! | ALL-EMPTY | `and_all([]) = Ok(default)` — the void marker |
//! | ANY-FIRST-OK | `or_any` returns the first success |
//! | ANY-LAST-FAIL | `or_any` of all-failures returns the last element |
//! | ANY-EMPTY | `or_any([]) = Ok(default)` — the void marker |
//!
//! ## Capture laws (Boundary)
//!
//! | Law | Statement |
//! |-----|-----------|
//! | CATCH-NORMAL | `catch(f) = Ok(f())` when `f` returns |
//! | CATCH-PANIC | `catch(f) = Err(fault)` when `f` panics |
//! | FROM-FUTURE-TYPED | `from_future` reifies abnormal completion as typed `Err(fault)` |
//!
//! ## Iteration laws (Unconditional)
//!
//! | Law | Statement |
//! |-----|-----------|
//! | ITER-SINGLE | `Ok(v).iter()` yields exactly `v` |
//! | ITER-EMPTY | `Err(e)` iterates as the empty sequence |
//! | ITER-UNWRAP | `iter_flat` unwraps exactly one container level |
//! | ITER-RESTART | a fresh `iter()` call yields a fresh sequence |
//!
//! ## Resolution laws (Unconditional unless marked)
//!
//! | Law | Statement | Classification |
//! |-----|-----------|----------------|
//! | RESOLVE-OUTCOME | a returned `Outcome` routes `Ok`→success, `Err`→failure | Unconditional |
//! | RESOLVE-SPLICE | a returned `AsyncOutcome` splices all three channels | Unconditional |
//! | FOREIGN-FAULT | a returned `Foreign` future's rejection routes to **fault** | Unconditional |
//! | HANDLER-PANIC-FAULT | a panicking continuation routes to fault, never `Err` | Unconditional |
//! | FAULT-PASSTHROUGH | settled-channel combinators propagate faults unchanged | Unconditional |
//! | SETTLED-PASSTHROUGH | `catch` leaves settled outcomes untouched | Unconditional |
//! | SETTLE-ONCE | settlement happens at most once per future | Structural |
//! | CAUSAL-ORDER | a derived future cannot complete before its source | Structural |
//!
//! FOREIGN-FAULT and FROM-FUTURE-TYPED together pin the boundary/chain
//! asymmetry: the same abnormal completion becomes a typed failure when
//! adapting external work, and a fault when it happens inside a chain.

/// Every committed algebraic law, identified by name.
///
/// This enum serves as a machine-readable catalog of the law sheet.
/// Each variant maps to a row in the law tables above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Law {
    // --- Variant ---
    /// Exactly one of `is_ok`, `is_err` holds.
    VariantExclusive,
    /// Guarded predicates never run cross-branch.
    PredicateGuard,

    // --- Functor ---
    /// `o.map(id) = o`.
    MapIdentity,
    /// `o.map(f).map(g) = o.map(g ∘ f)`.
    MapComposition,
    /// `Err(e).map(f) = Err(e)` without invoking `f`.
    MapShortCircuit,
    /// `Ok(v).map_err(f) = Ok(v)` without invoking `f`.
    MapErrShortCircuit,

    // --- Kleisli ---
    /// `Ok(v).and_then(f) = f(v)`.
    BindLeftIdentity,
    /// `o.and_then(Ok) = o`.
    BindRightIdentity,
    /// `o.and_then(f).and_then(g) = o.and_then(|v| f(v).and_then(g))`.
    BindAssociativity,
    /// `Err(e).and_then(f) = Err(e)` without invoking `f`.
    BindShortCircuit,
    /// `Ok(v).or_else(f) = Ok(v)` without invoking `f`.
    OrElseShortCircuit,

    // --- Join ---
    /// `flatten(Ok(Ok(x))) = Ok(x)`.
    FlattenOkOk,
    /// `flatten(Ok(Err(e))) = Err(e)`.
    FlattenOkErr,
    /// `flatten(Err(e)) = Err(e)` regardless of contents.
    FlattenErrPassthrough,

    // --- Folds ---
    /// `and_all` returns the first failure.
    AndAllFirstFailure,
    /// `and_all` of all-successes returns the last element.
    AndAllLastSuccess,
    /// `and_all([])` is the void success marker.
    AndAllEmptyUnit,
    /// `or_any` returns the first success.
    OrAnyFirstSuccess,
    /// `or_any` of all-failures returns the last element.
    OrAnyLastFailure,
    /// `or_any([])` is the void success marker.
    OrAnyEmptyUnit,

    // --- Capture boundaries ---
    /// `catch(f) = Ok(f())` on normal return.
    CatchNormal,
    /// `catch(f) = Err(fault)` on panic.
    CatchPanic,
    /// `from_future` reifies abnormal completion as a typed failure.
    FromFutureRejectionTyped,

    // --- Iteration ---
    /// `Ok(v).iter()` yields exactly `v`.
    IterateSingle,
    /// `Err(e)` iterates as the empty sequence.
    IterateEmptyOnFailure,
    /// `iter_flat` unwraps exactly one container level.
    IterateOneLevelUnwrap,
    /// A fresh `iter()` call yields a fresh sequence.
    IterateRestartable,

    // --- Resolution ---
    /// A returned `Outcome` routes to the settled channels.
    ResolveOutcomeRouting,
    /// A returned `AsyncOutcome` splices all three channels.
    ResolveSplice,
    /// A returned `Foreign` future's rejection routes to fault.
    ForeignRejectionFault,
    /// A panicking continuation routes to fault, never to `Err`.
    HandlerPanicFault,
    /// Settled-channel combinators propagate faults unchanged.
    FaultPassThrough,
    /// `catch` leaves settled outcomes untouched.
    SettledPassThrough,
    /// Settlement happens at most once per future.
    SettleOnce,
    /// A derived future cannot complete before its source.
    CausalOrder,
}

/// Classification of how a law is guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LawClassification {
    /// Holds for all inputs and all combinator chains.
    Unconditional,
    /// Holds at the explicit adaptation boundary only; deliberately does
    /// not hold inside continuation chains.
    Boundary,
    /// Guaranteed by construction (linearity, ownership); there is no
    /// runtime path that could violate it.
    Structural,
}

/// A single entry in the law sheet: name, classification, and description.
#[derive(Debug, Clone)]
pub struct LawEntry {
    /// The law identifier.
    pub law: Law,
    /// How the law is guaranteed.
    pub classification: LawClassification,
    /// Human-readable statement of the law.
    pub statement: &'static str,
}

/// The complete law sheet.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn law_sheet() -> Vec<LawEntry> {
    use LawClassification::{Boundary, Structural, Unconditional};
    vec![
        // Variant
        LawEntry {
            law: Law::VariantExclusive,
            classification: Unconditional,
            statement: "Exactly one of is_ok, is_err holds for every value",
        },
        LawEntry {
            law: Law::PredicateGuard,
            classification: Unconditional,
            statement: "is_ok_and / is_err_and never run the predicate cross-branch",
        },
        // Functor
        LawEntry {
            law: Law::MapIdentity,
            classification: Unconditional,
            statement: "o.map(identity) = o",
        },
        LawEntry {
            law: Law::MapComposition,
            classification: Unconditional,
            statement: "o.map(f).map(g) = o.map(g after f)",
        },
        LawEntry {
            law: Law::MapShortCircuit,
            classification: Unconditional,
            statement: "Err(e).map(f) = Err(e) and f is never invoked",
        },
        LawEntry {
            law: Law::MapErrShortCircuit,
            classification: Unconditional,
            statement: "Ok(v).map_err(f) = Ok(v) and f is never invoked",
        },
        // Kleisli
        LawEntry {
            law: Law::BindLeftIdentity,
            classification: Unconditional,
            statement: "Ok(v).and_then(f) = f(v)",
        },
        LawEntry {
            law: Law::BindRightIdentity,
            classification: Unconditional,
            statement: "o.and_then(Outcome::Ok) = o",
        },
        LawEntry {
            law: Law::BindAssociativity,
            classification: Unconditional,
            statement: "o.and_then(f).and_then(g) = o.and_then(|v| f(v).and_then(g))",
        },
        LawEntry {
            law: Law::BindShortCircuit,
            classification: Unconditional,
            statement: "Err(e).and_then(f) = Err(e) and f is never invoked",
        },
        LawEntry {
            law: Law::OrElseShortCircuit,
            classification: Unconditional,
            statement: "Ok(v).or_else(f) = Ok(v) and f is never invoked",
        },
        // Join
        LawEntry {
            law: Law::FlattenOkOk,
            classification: Unconditional,
            statement: "flatten(Ok(Ok(x))) = Ok(x)",
        },
        LawEntry {
            law: Law::FlattenOkErr,
            classification: Unconditional,
            statement: "flatten(Ok(Err(e))) = Err(e)",
        },
        LawEntry {
            law: Law::FlattenErrPassthrough,
            classification: Unconditional,
            statement: "flatten(Err(e)) = Err(e) regardless of nested contents",
        },
        // Folds
        LawEntry {
            law: Law::AndAllFirstFailure,
            classification: Unconditional,
            statement: "and_all returns the first failure encountered",
        },
        LawEntry {
            law: Law::AndAllLastSuccess,
            classification: Unconditional,
            statement: "and_all of all-successes returns the last element",
        },
        LawEntry {
            law: Law::AndAllEmptyUnit,
            classification: Unconditional,
            statement: "and_all([]) = Ok(default) — the void success marker",
        },
        LawEntry {
            law: Law::OrAnyFirstSuccess,
            classification: Unconditional,
            statement: "or_any returns the first success encountered",
        },
        LawEntry {
            law: Law::OrAnyLastFailure,
            classification: Unconditional,
            statement: "or_any of all-failures returns the last element",
        },
        LawEntry {
            law: Law::OrAnyEmptyUnit,
            classification: Unconditional,
            statement: "or_any([]) = Ok(default) — the void success marker",
        },
        // Capture boundaries
        LawEntry {
            law: Law::CatchNormal,
            classification: Boundary,
            statement: "Outcome::catch(f) = Ok(f()) when f returns normally",
        },
        LawEntry {
            law: Law::CatchPanic,
            classification: Boundary,
            statement: "Outcome::catch(f) = Err(fault) when f panics",
        },
        LawEntry {
            law: Law::FromFutureRejectionTyped,
            classification: Boundary,
            statement: "from_future settles Err(fault) on abnormal completion — not a fault",
        },
        // Iteration
        LawEntry {
            law: Law::IterateSingle,
            classification: Unconditional,
            statement: "Ok(v).iter() yields exactly the single element v",
        },
        LawEntry {
            law: Law::IterateEmptyOnFailure,
            classification: Unconditional,
            statement: "Err(e) iterates as the empty sequence",
        },
        LawEntry {
            law: Law::IterateOneLevelUnwrap,
            classification: Unconditional,
            statement: "iter_flat unwraps exactly one container level",
        },
        LawEntry {
            law: Law::IterateRestartable,
            classification: Unconditional,
            statement: "a fresh iter() call produces a fresh sequence from the same state",
        },
        // Resolution
        LawEntry {
            law: Law::ResolveOutcomeRouting,
            classification: Unconditional,
            statement: "a returned Outcome routes Ok to success and Err to failure",
        },
        LawEntry {
            law: Law::ResolveSplice,
            classification: Unconditional,
            statement: "a returned AsyncOutcome splices settled and fault channels through",
        },
        LawEntry {
            law: Law::ForeignRejectionFault,
            classification: Unconditional,
            statement: "a returned Foreign future's rejection routes to fault, not Err",
        },
        LawEntry {
            law: Law::HandlerPanicFault,
            classification: Unconditional,
            statement: "a panicking continuation routes to fault, never to Err",
        },
        LawEntry {
            law: Law::FaultPassThrough,
            classification: Unconditional,
            statement: "map/and_then/or_else/map_err propagate faults unchanged",
        },
        LawEntry {
            law: Law::SettledPassThrough,
            classification: Unconditional,
            statement: "catch leaves a settled outcome untouched when no fault occurred",
        },
        LawEntry {
            law: Law::SettleOnce,
            classification: Structural,
            statement: "settling methods consume the settler; double settlement is unrepresentable",
        },
        LawEntry {
            law: Law::CausalOrder,
            classification: Structural,
            statement: "a derived future polls its source to completion before completing",
        },
    ]
}

/// Returns only the unconditional laws from the sheet.
#[must_use]
pub fn unconditional_laws() -> Vec<LawEntry> {
    law_sheet()
        .into_iter()
        .filter(|e| e.classification == LawClassification::Unconditional)
        .collect()
}

/// Returns only the boundary and structural laws from the sheet.
#[must_use]
pub fn conditional_laws() -> Vec<LawEntry> {
    law_sheet()
        .into_iter()
        .filter(|e| e.classification != LawClassification::Unconditional)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
