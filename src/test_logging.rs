//! Test logging infrastructure for the outcome crate's suites.
//!
//! Captures typed settlement and resolution events with timestamps so a
//! failing test can report exactly which channel a value travelled and
//! which continuation ran.
//!
//! # Overview
//!
//! - [`TestLogLevel`]: configurable verbosity levels
//! - [`TestEvent`]: typed events for settlement, handlers, and resolution
//! - [`TestLogger`]: captures and reports events with timestamps
//!
//! # Example
//!
//! ```
//! use outcome::test_logging::{TestEvent, TestLogLevel, TestLogger};
//!
//! let logger = TestLogger::new(TestLogLevel::Debug);
//! logger.log(TestEvent::Settled { channel: "ok" });
//! assert_eq!(logger.event_count(), 1);
//! ```

use std::fmt::Write as _;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// ============================================================================
// TestLogLevel
// ============================================================================

/// Logging verbosity level for tests.
///
/// Levels are ordered from least to most verbose:
/// `Error < Warn < Info < Debug < Trace`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TestLogLevel {
    /// Only errors and failures.
    Error,
    /// Warnings and above.
    Warn,
    /// General test progress.
    #[default]
    Info,
    /// Settlement and handler detail.
    Debug,
    /// All events including polls and resolution routing.
    Trace,
}

impl TestLogLevel {
    /// Returns a human-readable name for the level.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    /// Returns the level from the `TEST_LOG_LEVEL` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("TEST_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for TestLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for TestLogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

// ============================================================================
// TestEvent
// ============================================================================

/// A typed event captured by the test logger.
///
/// Events cover the lifecycle this crate cares about: settlement of a
/// future, handler invocation, resolution routing, and polling.
#[derive(Debug, Clone)]
pub enum TestEvent {
    /// A future settled normally.
    Settled {
        /// Which settled channel: "ok" or "err".
        channel: &'static str,
    },

    /// A future completed in the fault channel.
    Faulted {
        /// The fault message.
        message: String,
    },

    /// A settler was dropped without settling.
    SettlerDropped,

    /// A continuation handler ran to completion.
    HandlerRun {
        /// The combinator that invoked the handler.
        combinator: &'static str,
        /// The branch it applied to ("ok", "err", "fault").
        branch: &'static str,
    },

    /// A continuation handler panicked.
    HandlerPanicked {
        /// The combinator that invoked the handler.
        combinator: &'static str,
        /// The captured panic message.
        message: String,
    },

    /// A continuation return value was routed by the resolution algorithm.
    ResolutionRoute {
        /// The shape that was resolved ("outcome", "async", "foreign").
        shape: &'static str,
        /// The channel the value was routed to.
        channel: &'static str,
    },

    /// A future was polled.
    Poll {
        /// Result of the poll ("ready", "pending").
        result: &'static str,
    },

    /// Custom event for test-specific logging.
    Custom {
        /// Category for filtering.
        category: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// Error event.
    Error {
        /// Error category.
        category: &'static str,
        /// Error message.
        message: String,
    },

    /// Warning event.
    Warn {
        /// Warning category.
        category: &'static str,
        /// Warning message.
        message: String,
    },
}

impl TestEvent {
    /// Returns the minimum log level required to display this event.
    #[must_use]
    pub fn level(&self) -> TestLogLevel {
        match self {
            Self::Error { .. } => TestLogLevel::Error,
            Self::Warn { .. } => TestLogLevel::Warn,
            Self::Settled { .. } | Self::Faulted { .. } | Self::SettlerDropped => {
                TestLogLevel::Info
            }
            Self::HandlerRun { .. } | Self::HandlerPanicked { .. } | Self::Custom { .. } => {
                TestLogLevel::Debug
            }
            Self::ResolutionRoute { .. } | Self::Poll { .. } => TestLogLevel::Trace,
        }
    }

    /// Returns a short category name for the event.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Settled { .. } | Self::Faulted { .. } | Self::SettlerDropped => "settle",
            Self::HandlerRun { .. } | Self::HandlerPanicked { .. } => "handler",
            Self::ResolutionRoute { .. } => "resolve",
            Self::Poll { .. } => "poll",
            Self::Custom { category, .. }
            | Self::Error { category, .. }
            | Self::Warn { category, .. } => category,
        }
    }
}

impl std::fmt::Display for TestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settled { channel } => write!(f, "settled: channel={channel}"),
            Self::Faulted { message } => write!(f, "faulted: {message}"),
            Self::SettlerDropped => write!(f, "settler dropped without settling"),
            Self::HandlerRun { combinator, branch } => {
                write!(f, "handler run: combinator={combinator} branch={branch}")
            }
            Self::HandlerPanicked {
                combinator,
                message,
            } => {
                write!(
                    f,
                    "handler panicked: combinator={combinator} message={message}"
                )
            }
            Self::ResolutionRoute { shape, channel } => {
                write!(f, "resolution: shape={shape} -> channel={channel}")
            }
            Self::Poll { result } => write!(f, "poll: {result}"),
            Self::Custom { category, message } => write!(f, "[{category}] {message}"),
            Self::Error { category, message } => write!(f, "ERROR [{category}] {message}"),
            Self::Warn { category, message } => write!(f, "WARN [{category}] {message}"),
        }
    }
}

// ============================================================================
// TestLogger
// ============================================================================

/// A timestamped event record.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Time since logger creation.
    pub elapsed: Duration,
    /// The event that occurred.
    pub event: TestEvent,
}

/// Test logger that captures typed events with timestamps.
///
/// # Example
///
/// ```
/// use outcome::test_logging::{TestEvent, TestLogLevel, TestLogger};
///
/// let logger = TestLogger::new(TestLogLevel::Debug);
/// logger.log(TestEvent::Settled { channel: "ok" });
/// logger.log(TestEvent::HandlerRun { combinator: "map", branch: "ok" });
/// println!("{}", logger.report());
/// logger.assert_no_errors();
/// ```
#[derive(Debug)]
pub struct TestLogger {
    /// Minimum level to capture.
    level: TestLogLevel,
    /// Captured events.
    events: Mutex<Vec<LogRecord>>,
    /// Start time for elapsed calculation.
    start_time: Instant,
    /// Whether to print events immediately.
    verbose: bool,
}

impl TestLogger {
    /// Creates a new logger with the specified level.
    #[must_use]
    pub fn new(level: TestLogLevel) -> Self {
        Self {
            level,
            events: Mutex::new(Vec::new()),
            start_time: Instant::now(),
            verbose: level >= TestLogLevel::Trace,
        }
    }

    /// Creates a logger using the `TEST_LOG_LEVEL` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(TestLogLevel::from_env())
    }

    /// Sets whether to print events immediately.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the configured log level.
    #[must_use]
    pub fn level(&self) -> TestLogLevel {
        self.level
    }

    /// Returns whether the logger should capture events at the given level.
    #[must_use]
    pub fn should_log(&self, level: TestLogLevel) -> bool {
        level <= self.level
    }

    /// Logs an event if it meets the configured level.
    pub fn log(&self, event: TestEvent) {
        let event_level = event.level();
        if !self.should_log(event_level) {
            return;
        }

        let elapsed = self.start_time.elapsed();

        if self.verbose {
            eprintln!(
                "[{:>10.3}ms] [{:>5}] {}",
                elapsed.as_secs_f64() * 1000.0,
                event_level.name(),
                &event
            );
        }

        let record = LogRecord { elapsed, event };
        self.events.lock().expect("lock poisoned").push(record);
    }

    /// Logs a custom event.
    pub fn custom(&self, category: &'static str, message: impl Into<String>) {
        self.log(TestEvent::Custom {
            category,
            message: message.into(),
        });
    }

    /// Logs an error event.
    pub fn error(&self, category: &'static str, message: impl Into<String>) {
        self.log(TestEvent::Error {
            category,
            message: message.into(),
        });
    }

    /// Logs a warning event.
    pub fn warn(&self, category: &'static str, message: impl Into<String>) {
        self.log(TestEvent::Warn {
            category,
            message: message.into(),
        });
    }

    /// Returns the number of captured events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.lock().expect("lock poisoned").len()
    }

    /// Returns a snapshot of all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<LogRecord> {
        self.events.lock().expect("lock poisoned").clone()
    }

    /// Generates a detailed report of all captured events.
    #[must_use]
    #[allow(clippy::significant_drop_tightening)]
    pub fn report(&self) -> String {
        let events = self.events.lock().expect("lock poisoned");
        let mut report = String::new();

        let _ = writeln!(report, "=== Test Event Log ({} events) ===", events.len());
        let _ = writeln!(report);

        for record in events.iter() {
            let _ = writeln!(
                report,
                "[{:>10.3}ms] [{:>5}] {:>8} | {}",
                record.elapsed.as_secs_f64() * 1000.0,
                record.event.level().name(),
                record.event.category(),
                record.event
            );
        }

        let _ = writeln!(report);
        let _ = writeln!(report, "=== Statistics ===");

        let settlements = events
            .iter()
            .filter(|r| matches!(r.event, TestEvent::Settled { .. }))
            .count();
        let faults = events
            .iter()
            .filter(|r| matches!(r.event, TestEvent::Faulted { .. }))
            .count();
        let handler_runs = events
            .iter()
            .filter(|r| matches!(r.event, TestEvent::HandlerRun { .. }))
            .count();
        let handler_panics = events
            .iter()
            .filter(|r| matches!(r.event, TestEvent::HandlerPanicked { .. }))
            .count();
        let polls = events
            .iter()
            .filter(|r| matches!(r.event, TestEvent::Poll { .. }))
            .count();
        let errors = events
            .iter()
            .filter(|r| matches!(r.event, TestEvent::Error { .. }))
            .count();
        let warnings = events
            .iter()
            .filter(|r| matches!(r.event, TestEvent::Warn { .. }))
            .count();

        let _ = writeln!(report, "Settlements: {settlements}");
        let _ = writeln!(report, "Faults: {faults}");
        let _ = writeln!(report, "Handler runs: {handler_runs}");
        let _ = writeln!(report, "Handler panics: {handler_panics}");
        let _ = writeln!(report, "Polls: {polls}");
        let _ = writeln!(report, "Errors: {errors}");
        let _ = writeln!(report, "Warnings: {warnings}");

        if let Some(last) = events.last() {
            let _ = writeln!(report, "Total duration: {:?}", last.elapsed);
        }

        report
    }

    /// Asserts that no errors were logged.
    ///
    /// # Panics
    ///
    /// Panics if any error events were logged.
    pub fn assert_no_errors(&self) {
        let error_messages: Vec<String> = {
            let events = self.events.lock().expect("lock poisoned");
            events
                .iter()
                .filter(|r| matches!(r.event, TestEvent::Error { .. }))
                .map(|r| format!("  - {}", r.event))
                .collect()
        };

        assert!(
            error_messages.is_empty(),
            "Test logged {} errors:\n{}\n\nFull log:\n{}",
            error_messages.len(),
            error_messages.join("\n"),
            self.report()
        );
    }

    /// Asserts that no handler panics were observed.
    ///
    /// # Panics
    ///
    /// Panics if any [`TestEvent::HandlerPanicked`] events were logged.
    pub fn assert_no_handler_panics(&self) {
        let panics: Vec<String> = {
            let events = self.events.lock().expect("lock poisoned");
            events
                .iter()
                .filter(|r| matches!(r.event, TestEvent::HandlerPanicked { .. }))
                .map(|r| format!("  - {}", r.event))
                .collect()
        };

        assert!(
            panics.is_empty(),
            "Test observed {} handler panics:\n{}\n\nFull log:\n{}",
            panics.len(),
            panics.join("\n"),
            self.report()
        );
    }

    /// Clears all captured events.
    pub fn clear(&self) {
        self.events.lock().expect("lock poisoned").clear();
    }
}

impl Default for TestLogger {
    fn default() -> Self {
        Self::new(TestLogLevel::Info)
    }
}

// ============================================================================
// Macros
// ============================================================================

/// Log a custom event to a test logger.
///
/// # Example
///
/// ```ignore
/// test_log!(logger, "setup", "Constructing pipeline of {} stages", n);
/// ```
#[macro_export]
macro_rules! test_log {
    ($logger:expr, $cat:literal, $($arg:tt)*) => {
        $logger.log($crate::test_logging::TestEvent::Custom {
            category: $cat,
            message: format!($($arg)*),
        });
    };
}

/// Log an error event to a test logger.
#[macro_export]
macro_rules! test_error {
    ($logger:expr, $cat:literal, $($arg:tt)*) => {
        $logger.log($crate::test_logging::TestEvent::Error {
            category: $cat,
            message: format!($($arg)*),
        });
    };
}

/// Log a warning event to a test logger.
#[macro_export]
macro_rules! test_warn {
    ($logger:expr, $cat:literal, $($arg:tt)*) => {
        $logger.log($crate::test_logging::TestEvent::Warn {
            category: $cat,
            message: format!($($arg)*),
        });
    };
}

/// Assert a condition, printing the full log on failure.
#[macro_export]
macro_rules! assert_log {
    ($logger:expr, $cond:expr) => {
        if !$cond {
            eprintln!("{}", $logger.report());
            panic!("assertion failed: {}", stringify!($cond));
        }
    };
    ($logger:expr, $cond:expr, $($arg:tt)*) => {
        if !$cond {
            eprintln!("{}", $logger.report());
            panic!($($arg)*);
        }
    };
}

/// Assert equality, printing the full log on failure.
#[macro_export]
macro_rules! assert_eq_log {
    ($logger:expr, $left:expr, $right:expr) => {
        if $left != $right {
            eprintln!("{}", $logger.report());
            panic!(
                "assertion failed: `(left == right)`\n  left: {:?}\n right: {:?}",
                $left, $right
            );
        }
    };
}

/// Mark the start of a named test phase.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        eprintln!("=== phase: {} ===", $name);
    };
}

/// Mark a named test as complete.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        eprintln!("=== complete: {} ===", $name);
    };
}

/// Assert a condition with an expected/actual pair in the failure message.
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $label:expr, $expected:expr, $actual:expr) => {
        assert!(
            $cond,
            "{}: expected {:?}, got {:?}",
            $label, $expected, $actual
        );
    };
}

// ============================================================================
// Tests
// ============================================================================
