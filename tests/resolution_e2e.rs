//! End-to-end suite for the asynchronous bridge and its value-resolution
//! algorithm.
//!
//! Validates the settlement-channel invariants through the public API:
//! - Continuation return values route to the correct channel (Outcome,
//!   nested AsyncOutcome, Foreign future)
//! - A panicking continuation faults the chain, never the typed channel
//! - The boundary/chain asymmetry: `from_future` reifies rejection as a
//!   typed failure, while a continuation-returned foreign future faults
//! - Faults pass through settled-channel combinators unchanged and are
//!   recoverable only via `catch`/`handle`
//! - Executor construction: three capabilities, at-most-once settlement,
//!   drop and panic behavior

mod common;

use futures_lite::future::block_on;
use outcome::{AsyncOutcome, Completion, Fault, Foreign, Outcome};
use outcome::{assert_with_log, test_complete, test_phase};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

fn init_test(name: &str) {
    common::init_test_logging();
    test_phase!(name);
}

async fn rejecting(message: &'static str) -> i32 {
    panic!("{message}");
}

// ============================================================================
// Resolution routing (spec'd continuation behaviors)
// ============================================================================

#[test]
fn and_then_increments_a_settled_success() {
    init_test("and_then_increments_a_settled_success");

    let chained = AsyncOutcome::<i32, String>::ok(2).and_then(|v| Outcome::Ok(v + 1));
    let completion = block_on(chained);
    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(3));
    assert_with_log!(
        completion == expected,
        "Success(2) andThen(+1)",
        expected,
        completion
    );

    test_complete!("and_then_increments_a_settled_success");
}

#[test]
fn and_then_returning_error_settles_failure() {
    init_test("and_then_returning_error_settles_failure");

    let chained =
        AsyncOutcome::<i32, String>::ok(2).and_then(|_| Outcome::Err("bad".to_string()));
    let completion = block_on(chained);
    let expected: Completion<i32, String> = Completion::Settled(Outcome::Err("bad".to_string()));
    assert_with_log!(
        completion == expected,
        "andThen returning error",
        expected,
        completion
    );

    test_complete!("and_then_returning_error_settles_failure");
}

#[test]
fn and_then_throwing_transitions_to_fault_not_failure() {
    init_test("and_then_throwing_transitions_to_fault_not_failure");

    let chained = AsyncOutcome::<i32, String>::ok(2)
        .and_then(|_| -> Outcome<i32, String> { panic!("x") });
    let completion = block_on(chained);

    assert_with_log!(
        completion.is_faulted(),
        "thrown continuation faults",
        true,
        completion.is_faulted()
    );
    let fault = completion.fault().expect("fault present");
    assert_with_log!(
        fault.message() == "x",
        "fault carries the raised value",
        "x",
        fault.message()
    );

    test_complete!("and_then_throwing_transitions_to_fault_not_failure");
}

#[test]
fn and_then_splices_a_derived_async_outcome() {
    init_test("and_then_splices_a_derived_async_outcome");

    let chained = AsyncOutcome::<i32, String>::ok(4)
        .and_then(|v| AsyncOutcome::<i32, String>::new(move |settler| settler.ok(v * v)));
    let completion = block_on(chained);
    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(16));
    assert_with_log!(completion == expected, "nested splice", expected, completion);

    test_complete!("and_then_splices_a_derived_async_outcome");
}

// ============================================================================
// The boundary/chain asymmetry
// ============================================================================

#[test]
fn from_future_rejection_settles_typed_failure() {
    init_test("from_future_rejection_settles_typed_failure");

    let adapted = AsyncOutcome::<i32, Fault>::from_future(rejecting("nope"));
    let completion = block_on(adapted);
    let expected = Completion::Settled(Outcome::Err(Fault::new("nope")));
    assert_with_log!(
        completion == expected,
        "boundary adaptation reifies rejection as typed Err",
        expected,
        completion
    );

    test_complete!("from_future_rejection_settles_typed_failure");
}

#[test]
fn chained_foreign_rejection_faults_instead() {
    init_test("chained_foreign_rejection_faults_instead");

    // Same rejecting future, but returned from inside the chain: faults.
    let chained = AsyncOutcome::<i32, Fault>::ok(1).and_then(|_| Foreign(rejecting("nope")));
    let completion = block_on(chained);

    assert_with_log!(
        completion.is_faulted(),
        "in-chain foreign rejection faults",
        true,
        completion.is_faulted()
    );
    let fault = completion.fault().expect("fault present");
    assert_with_log!(
        fault.message() == "nope",
        "fault carries the rejection value",
        "nope",
        fault.message()
    );

    test_complete!("chained_foreign_rejection_faults_instead");
}

#[test]
fn chained_foreign_completion_settles_success() {
    init_test("chained_foreign_completion_settles_success");

    let chained = AsyncOutcome::<i32, String>::ok(20).and_then(|v| Foreign(async move { v + 22 }));
    let completion = block_on(chained);
    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(42));
    assert_with_log!(
        completion == expected,
        "foreign completion settles success",
        expected,
        completion
    );

    test_complete!("chained_foreign_completion_settles_success");
}

// ============================================================================
// Short-circuit and pass-through rules
// ============================================================================

#[test]
fn settled_failure_short_circuits_the_continuation() {
    init_test("settled_failure_short_circuits_the_continuation");

    let invoked = Arc::new(AtomicBool::new(false));
    let observed = Arc::clone(&invoked);
    let chained = AsyncOutcome::<i32, String>::err("early".to_string()).and_then(move |v| {
        observed.store(true, Ordering::SeqCst);
        Outcome::Ok(v)
    });
    let completion = block_on(chained);

    let expected: Completion<i32, String> =
        Completion::Settled(Outcome::Err("early".to_string()));
    assert_with_log!(completion == expected, "failure propagates", expected, completion);
    assert_with_log!(
        !invoked.load(Ordering::SeqCst),
        "continuation never invoked",
        false,
        invoked.load(Ordering::SeqCst)
    );

    test_complete!("settled_failure_short_circuits_the_continuation");
}

#[test]
fn fault_passes_through_a_whole_combinator_chain() {
    init_test("fault_passes_through_a_whole_combinator_chain");

    let invoked = Arc::new(AtomicUsize::new(0));
    let for_map = Arc::clone(&invoked);
    let for_chain = Arc::clone(&invoked);
    let for_recover = Arc::clone(&invoked);

    let chained = AsyncOutcome::<i32, String>::faulted("original")
        .map(move |v| {
            for_map.fetch_add(1, Ordering::SeqCst);
            v
        })
        .and_then(move |v| {
            for_chain.fetch_add(1, Ordering::SeqCst);
            Outcome::Ok(v)
        })
        .or_else(move |e: String| {
            for_recover.fetch_add(1, Ordering::SeqCst);
            Outcome::<i32, String>::Err(e)
        });
    let completion = block_on(chained);

    assert_with_log!(
        completion == Completion::Faulted(Fault::new("original")),
        "fault unchanged through chain",
        Completion::<i32, String>::Faulted(Fault::new("original")),
        completion
    );
    assert_with_log!(
        invoked.load(Ordering::SeqCst) == 0,
        "no settled-channel handler ran",
        0usize,
        invoked.load(Ordering::SeqCst)
    );

    test_complete!("fault_passes_through_a_whole_combinator_chain");
}

#[test]
fn catch_recovers_only_the_fault_channel() {
    init_test("catch_recovers_only_the_fault_channel");

    // Faulted: catch observes and recovers.
    let recovered = AsyncOutcome::<i32, String>::faulted("oob")
        .catch(|fault| Outcome::Ok(fault.message().len() as i32));
    let completion = block_on(recovered);
    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(3));
    assert_with_log!(completion == expected, "fault recovered", expected, completion);

    // Settled failure: catch leaves it untouched.
    let untouched = AsyncOutcome::<i32, String>::err("typed".to_string())
        .catch(|_| -> Outcome<i32, String> { panic!("catch ran on a settled outcome") });
    let completion = block_on(untouched);
    let expected: Completion<i32, String> =
        Completion::Settled(Outcome::Err("typed".to_string()));
    assert_with_log!(completion == expected, "settled untouched", expected, completion);

    test_complete!("catch_recovers_only_the_fault_channel");
}

#[test]
fn generalized_handle_covers_both_channels() {
    init_test("generalized_handle_covers_both_channels");

    let settled = AsyncOutcome::<i32, String>::ok(1).handle(
        |outcome| outcome.map(|v| v * 100),
        |_fault| Outcome::<i32, String>::Ok(-1),
    );
    let completion = block_on(settled);
    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(100));
    assert_with_log!(completion == expected, "settled branch", expected, completion);

    let faulted = AsyncOutcome::<i32, String>::faulted("f").handle(
        |outcome| outcome,
        |_fault| Outcome::<i32, String>::Ok(-1),
    );
    let completion = block_on(faulted);
    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(-1));
    assert_with_log!(completion == expected, "fault branch", expected, completion);

    test_complete!("generalized_handle_covers_both_channels");
}

// ============================================================================
// Executor construction
// ============================================================================

#[test]
fn executor_exposes_three_settlement_capabilities() {
    init_test("executor_exposes_three_settlement_capabilities");

    let ok = block_on(AsyncOutcome::<i32, String>::new(|s| s.ok(1)));
    assert_with_log!(
        ok == Completion::Settled(Outcome::Ok(1)),
        "success-settle",
        Completion::<i32, String>::Settled(Outcome::Ok(1)),
        ok
    );

    let err = block_on(AsyncOutcome::<i32, String>::new(|s| s.err("e".to_string())));
    assert_with_log!(
        err == Completion::Settled(Outcome::Err("e".to_string())),
        "failure-settle",
        Completion::<i32, String>::Settled(Outcome::Err("e".to_string())),
        err
    );

    let faulted = block_on(AsyncOutcome::<i32, String>::new(|s| s.fault("reason")));
    assert_with_log!(
        faulted == Completion::Faulted(Fault::new("reason")),
        "fault-propagate",
        Completion::<i32, String>::Faulted(Fault::new("reason")),
        faulted
    );

    test_complete!("executor_exposes_three_settlement_capabilities");
}

#[test]
fn dropping_the_settler_faults_the_future() {
    init_test("dropping_the_settler_faults_the_future");

    let abandoned = AsyncOutcome::<i32, String>::new(|settler| drop(settler));
    let completion = block_on(abandoned);
    assert_with_log!(
        completion.is_faulted(),
        "abandoned settlement faults",
        true,
        completion.is_faulted()
    );

    test_complete!("dropping_the_settler_faults_the_future");
}

#[test]
fn executor_panic_faults_with_the_panic_payload() {
    init_test("executor_panic_faults_with_the_panic_payload");

    let faulted = AsyncOutcome::<i32, String>::new(|_settler| panic!("constructor failed"));
    let completion = block_on(faulted);
    let fault = completion.fault().expect("fault present");
    assert_with_log!(
        fault.message() == "constructor failed",
        "panic payload preserved",
        "constructor failed",
        fault.message()
    );

    test_complete!("executor_panic_faults_with_the_panic_payload");
}

#[test]
fn settlement_can_happen_after_construction_returns() {
    init_test("settlement_can_happen_after_construction_returns");

    let (sender, receiver) = std::sync::mpsc::channel();
    let pending = AsyncOutcome::<i32, String>::new(move |settler| {
        sender.send(settler).expect("parked settler");
    });

    // Settle from another thread while the main thread blocks on the
    // future.
    let settler = receiver.recv().expect("settler handed out");
    let worker = std::thread::spawn(move || settler.ok(99));

    let completion = block_on(pending);
    worker.join().expect("settling thread");

    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(99));
    assert_with_log!(completion == expected, "late settlement", expected, completion);

    test_complete!("settlement_can_happen_after_construction_returns");
}

// ============================================================================
// Derived chains
// ============================================================================

#[test]
fn a_full_pipeline_preserves_causal_order() {
    init_test("a_full_pipeline_preserves_causal_order");

    let order = Arc::new(std::sync::Mutex::new(Vec::new()));
    let first = Arc::clone(&order);
    let second = Arc::clone(&order);

    let pipeline = AsyncOutcome::<i32, String>::ok(1)
        .map(move |v| {
            first.lock().expect("order lock").push("map");
            v + 1
        })
        .and_then(move |v| {
            second.lock().expect("order lock").push("and_then");
            Outcome::Ok(v * 10)
        });
    let completion = block_on(pipeline);

    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(20));
    assert_with_log!(completion == expected, "pipeline value", expected, completion);
    let observed = order.lock().expect("order lock").clone();
    assert_with_log!(
        observed == vec!["map", "and_then"],
        "continuations ran in chain order",
        vec!["map", "and_then"],
        observed
    );

    test_complete!("a_full_pipeline_preserves_causal_order");
}

#[test]
fn map_or_else_collapses_both_settled_cases() {
    init_test("map_or_else_collapses_both_settled_cases");

    let from_ok =
        block_on(AsyncOutcome::<i32, String>::ok(2).map_or_else(|e| e.len() as i32, |v| v * 2));
    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(4));
    assert_with_log!(from_ok == expected, "success collapse", expected, from_ok);

    let from_err = block_on(
        AsyncOutcome::<i32, String>::err("abc".to_string())
            .map_or_else(|e| e.len() as i32, |v| v * 2),
    );
    let expected: Completion<i32, String> = Completion::Settled(Outcome::Ok(3));
    assert_with_log!(from_err == expected, "failure collapse", expected, from_err);

    test_complete!("map_or_else_collapses_both_settled_cases");
}

#[test]
fn unhandled_fault_surfaces_as_a_panic() {
    init_test("unhandled_fault_surfaces_as_a_panic");

    let completion = block_on(AsyncOutcome::<i32, String>::faulted("unhandled"));
    let payload = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let _ = completion.unwrap_settled();
    }))
    .expect_err("fault must resume as a panic");
    let resurfaced = Fault::from_panic(payload);
    assert_with_log!(
        resurfaced.message() == "unhandled",
        "fault resurfaces with its payload",
        "unhandled",
        resurfaced.message()
    );

    test_complete!("unhandled_fault_surfaces_as_a_panic");
}
