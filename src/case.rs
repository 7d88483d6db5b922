//!
//! The case-facing API: what a test author writes against.
//!
//! A case is an ordinary function taking the runtime handle. Its first action
//! must be to announce itself with [`Runtime::start_case`]; everything after
//! that is the test proper.
//!
//! ```rust
//! use tested::case::{self, CaseResult, Runtime};
//!
//! fn addition(rt: &mut dyn Runtime) -> CaseResult {
//!     rt.start_case("Addition")?;
//!     case::fail_if(2 + 2 != 4, "Addition does not work")
//! }
//!
//! fn multiplication(rt: &mut dyn Runtime) -> CaseResult {
//!     rt.start_case("Multiplication")?;
//!     case::is(2 * 2 == 4, "Multiplication does not work")
//! }
//!
//! // Slot index is the ordinal; `case::stub` marks an unfilled slot.
//! pub const CASES: &[case::CaseFn] = &[addition, case::stub, multiplication];
//! ```

use std::fmt::Debug;

pub use crate::signal::{CaseResult, Message, Signal};

/// Position of a case slot within its module. Also the declaration-order key.
pub type Ordinal = i8;

/// Largest number of slots a single module may declare.
pub const MAX_SLOTS: usize = Ordinal::MAX as usize + 1;

/// Pointer to a case body.
pub type CaseFn = fn(&mut dyn Runtime) -> CaseResult;

/// The handle a case body receives.
///
/// There are three implementations inside the crate: the discovery probe, the
/// export probe and the dispatcher. A case cannot tell which one it is talking
/// to, and must not keep the handle past its own return.
pub trait Runtime {
    /// Announces the case with an optional human-readable description.
    ///
    /// Names should be string literals; the framework keeps the reference and
    /// never copies it.
    fn start(&mut self, name: &'static str, description: Option<&'static str>) -> CaseResult;

    /// Announces the case. Must be the first thing a case body does.
    fn start_case(&mut self, name: &'static str) -> CaseResult {
        self.start(name, None)
    }
}

/// Default body for an unfilled slot.
pub fn stub(_: &mut dyn Runtime) -> CaseResult {
    Err(Signal::Stub)
}

// ============================================================================
// FLOW CONTROL - assertions usable with `?`
// ============================================================================

pub fn skip() -> CaseResult {
    Err(Signal::Skipped)
}

pub fn fail(message: &str) -> CaseResult {
    Err(Signal::Failed(Message::new(message)))
}

pub fn fail_if(condition: bool, message: &str) -> CaseResult {
    if condition {
        return fail(message);
    }
    Ok(())
}

pub fn is(condition: bool, message: &str) -> CaseResult {
    fail_if(!condition, message)
}

pub fn not(condition: bool, message: &str) -> CaseResult {
    fail_if(condition, message)
}

/// Fails unless `actual == expected`. An empty message is replaced by a
/// description of both values.
pub fn eq<A, E>(actual: A, expected: E, message: &str) -> CaseResult
where
    A: PartialEq<E> + Debug,
    E: Debug,
{
    if actual == expected {
        return Ok(());
    }
    if message.is_empty() {
        return fail(&format!("expected {:?}, got {:?}", expected, actual));
    }
    fail(message)
}

/// Declares the process untrustworthy. Aborts the whole run.
pub fn process_corrupted(message: &str) -> CaseResult {
    Err(Signal::ProcessCorrupted(Message::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertions_map_to_signals() {
        assert_eq!(fail_if(false, "x"), Ok(()));
        assert_eq!(fail_if(true, "x"), Err(Signal::Failed("x".into())));
        assert_eq!(is(true, "x"), Ok(()));
        assert_eq!(not(true, "x"), Err(Signal::Failed("x".into())));
        assert_eq!(skip(), Err(Signal::Skipped));
        assert!(matches!(
            process_corrupted("heap smashed"),
            Err(Signal::ProcessCorrupted(_))
        ));
    }

    #[test]
    fn eq_describes_values_when_message_is_empty() {
        assert_eq!(eq(4, 4, ""), Ok(()));
        assert_eq!(
            eq(4, 5, ""),
            Err(Signal::Failed("expected 5, got 4".into()))
        );
        assert_eq!(eq(4, 5, "nope"), Err(Signal::Failed("nope".into())));
    }

    #[test]
    fn stub_reports_an_empty_slot() {
        struct Silent;
        impl Runtime for Silent {
            fn start(&mut self, _: &'static str, _: Option<&'static str>) -> CaseResult {
                Ok(())
            }
        }
        assert_eq!(stub(&mut Silent), Err(Signal::Stub));
    }
}
