//! Error types for selector synthesis

use thiserror::Error;

/// Finder error enumeration
#[derive(Debug, Error, Clone)]
pub enum FinderError {
    /// Target node is not an element
    #[error("Can't generate CSS selector for non-element node")]
    NotAnElement,

    /// Wall-clock deadline exceeded with no unique selector and no usable fallback
    #[error("Timeout: can't find a unique selector after {elapsed_ms}ms (limit {timeout_ms}ms)")]
    Timeout { elapsed_ms: u64, timeout_ms: u64 },

    /// Candidate-check budget exhausted with no unique selector and no usable fallback
    #[error("Budget exhausted: no unique selector after {checks} path checks")]
    BudgetExhausted { checks: usize },

    /// Search ran to completion without producing a unique selector
    #[error("Selector was not found")]
    NotFound,

    /// A synthesized selector matched zero nodes (fragment synthesis invariant violation)
    #[error("Can't select any node with this selector: {0}")]
    NoMatch(String),

    /// Operation cancelled via the cancellation signal
    #[error("Selector search was cancelled")]
    Cancelled,

    /// Backend query failure
    #[error("Backend error: {0}")]
    Backend(String),
}

impl FinderError {
    /// Check if the error was triggered by the search budget (time or check
    /// count). Embedders use this to decide whether retrying with a larger
    /// budget can succeed.
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(
            self,
            FinderError::Timeout { .. } | FinderError::BudgetExhausted { .. }
        )
    }

    /// Check if the error indicates an engine bug rather than a runtime
    /// condition; these are worth reporting, not retrying.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, FinderError::NoMatch(_))
    }
}
