//! Shared helpers for the integration suites.

use outcome::test_utils;

/// Initializes the process-wide test logger from `TEST_LOG_LEVEL`.
pub fn init_test_logging() {
    let _ = test_utils::init_test_logging();
}
