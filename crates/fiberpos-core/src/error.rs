//! Error handling for FiberPos
//!
//! Two kinds of failure are surfaced to callers:
//! - Invalid arguments (a setter received a value violating an invariant)
//! - Improper calls (an operation invoked in a state violating its precondition)
//!
//! Internal consistency failures are defects and panic instead of being
//! returned. A target outside the reachable domain is not an error at all;
//! it is reported through the return value of the resolving function.

use thiserror::Error;

/// Main error type for FiberPos
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A value violates an invariant of the property it was assigned to
    #[error("Invalid argument '{what}': {reason}")]
    InvalidArgument {
        /// The property or parameter that received the value.
        what: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An operation was invoked in a state that violates its precondition
    #[error("Improper call to {operation}: {reason}")]
    ImproperCall {
        /// The operation that was called.
        operation: String,
        /// The violated precondition.
        reason: String,
    },
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Create an improper call error
    pub fn improper_call(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ImproperCall {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }

    /// Check if this is an improper call error
    pub fn is_improper_call(&self) -> bool {
        matches!(self, Error::ImproperCall { .. })
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with `InvalidArgument` unless `value` is finite.
pub fn ensure_finite(what: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_argument(what, format!("{} is not a finite number", value)))
    }
}
