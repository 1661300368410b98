// SPDX-License-Identifier: MPL-2.0
use std::fmt;

/// Errors surfaced by the coordination core.
///
/// Asynchronous fetch failures and unknown aspect ratios are *not* errors:
/// they are absent values the engine falls back from (square aspect,
/// cross-dissolve). Stale async results are silently dropped, not reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operation was invoked outside its valid source state.
    ///
    /// Protocol violations are programmer errors: they are logged, reported
    /// to the caller and never mutate the state machine they were aimed at.
    Protocol {
        /// Name of the operation that was misused.
        operation: &'static str,
        /// Human-readable description of the state it found.
        state: &'static str,
    },
    /// The paging model rejected a mutation (out-of-bounds cursor,
    /// duplicate identifier).
    Paging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Protocol { operation, state } => {
                write!(f, "protocol violation: {} called while {}", operation, state)
            }
            Error::Paging(msg) => write!(f, "paging error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_protocol_violation() {
        let err = Error::Protocol {
            operation: "start",
            state: "idle",
        };
        assert_eq!(
            format!("{}", err),
            "protocol violation: start called while idle"
        );
    }

    #[test]
    fn display_formats_paging_error() {
        let err = Error::Paging("duplicate identifier".to_string());
        assert_eq!(format!("{}", err), "paging error: duplicate identifier");
    }

    #[test]
    fn errors_compare_by_value() {
        let a = Error::Paging("x".into());
        let b = Error::Paging("x".into());
        assert_eq!(a, b);
    }
}
