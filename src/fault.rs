//! Fault payloads: the reified form of an unexpected failure.
//!
//! A [`Fault`] is what an *unexpected* failure looks like once it has been
//! captured: a panic that unwound out of user code, a foreign future that
//! completed abnormally, or an explicitly propagated out-of-band reason.
//! It is deliberately distinct from a typed error `E` carried in
//! [`Outcome::Err`](crate::Outcome::Err) — a fault is the out-of-band
//! channel, never a substitute for the typed one.
//!
//! Panic payloads are rendered to a string on capture. Rust panic payloads
//! are almost always `&'static str` or `String`; anything else is recorded
//! with a placeholder so the fault stays `Clone` and comparable.
//!
//! # Example
//!
//! ```
//! use outcome::Fault;
//!
//! let caught = std::panic::catch_unwind(|| panic!("boom"));
//! let fault = Fault::from_panic(caught.unwrap_err());
//! assert_eq!(fault.message(), "boom");
//! ```

use std::any::Any;

/// Placeholder message recorded when a panic payload is not a string.
const OPAQUE_PAYLOAD: &str = "<non-string panic payload>";

/// An unexpected-failure payload.
///
/// Construction paths:
///
/// - [`Fault::new`] — an explicit reason (used by
///   [`Settler::fault`](crate::Settler::fault) and tests).
/// - [`Fault::from_panic`] — capture of an unwound panic payload.
///
/// A fault can be re-raised through the host panic mechanism with
/// [`Fault::resume`]; an unhandled fault then surfaces exactly as an
/// ordinary unhandled panic would.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{message}")]
pub struct Fault {
    message: String,
}

impl Fault {
    /// Creates a fault with an explicit reason.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Captures an unwound panic payload.
    ///
    /// Downcasts `&str` and `String` payloads to their message; any other
    /// payload type is recorded as an opaque placeholder.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<&'static str>() {
            Ok(s) => (*s).to_string(),
            Err(payload) => match payload.downcast::<String>() {
                Ok(s) => *s,
                Err(_) => OPAQUE_PAYLOAD.to_string(),
            },
        };
        Self { message }
    }

    /// The captured message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Re-raises the fault through the host panic mechanism.
    ///
    /// The payload is the fault message as a `String`, so a downstream
    /// `catch_unwind` + [`Fault::from_panic`] round-trips it.
    pub fn resume(self) -> ! {
        std::panic::resume_unwind(Box::new(self.message))
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn from_panic_str_payload() {
        let payload = catch_unwind(|| panic!("boom")).unwrap_err();
        let fault = Fault::from_panic(payload);
        assert_eq!(fault.message(), "boom");
    }

    #[test]
    fn from_panic_string_payload() {
        let code = 7;
        let payload = catch_unwind(move || panic!("failed with code {code}")).unwrap_err();
        let fault = Fault::from_panic(payload);
        assert_eq!(fault.message(), "failed with code 7");
    }

    #[test]
    fn from_panic_opaque_payload() {
        let payload = catch_unwind(|| std::panic::panic_any(42_u32)).unwrap_err();
        let fault = Fault::from_panic(payload);
        assert_eq!(fault.message(), OPAQUE_PAYLOAD);
    }

    #[test]
    fn resume_round_trips_message() {
        let fault = Fault::new("out of band");
        let payload = catch_unwind(AssertUnwindSafe(|| fault.resume())).unwrap_err();
        let recaptured = Fault::from_panic(payload);
        assert_eq!(recaptured.message(), "out of band");
    }

    #[test]
    fn display_is_message() {
        let fault = Fault::new("settler dropped");
        assert_eq!(fault.to_string(), "settler dropped");
    }

    #[test]
    fn from_str_and_string() {
        assert_eq!(Fault::from("a").message(), "a");
        assert_eq!(Fault::from(String::from("b")).message(), "b");
    }

    #[test]
    fn clone_eq_hash() {
        use std::collections::HashSet;
        let a = Fault::new("x");
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Fault::new("y"));
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }
}
