//! Structural self-checks for layered graphs.
//!
//! Graph implementations validate adjacency symmetry, edge endpoints and edge
//! counts here. Productions run [`DebugInvariants::validate_invariants`] after
//! a rewrite when [`ApplyOptions::check_invariants`] is set, and
//! [`DebugInvariants::debug_assert_invariants`] otherwise.
//!
//! [`ApplyOptions::check_invariants`]: crate::grammar::ApplyOptions::check_invariants

use crate::grammar_error::GrammarError;

/// Trait for validating graph invariants.
pub trait DebugInvariants {
    /// Panic on a broken invariant in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first violation as
    /// [`GrammarError::InvariantViolation`].
    fn validate_invariants(&self) -> Result<(), GrammarError>;
}

/// Run a fallible graph check after a mutation and panic on error when
/// invariant checking is enabled (`debug_assertions`, `strict-invariants` or
/// `check-invariants`).
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[graph invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
