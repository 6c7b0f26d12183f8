//! Finder configuration with default-filled optional fields
//!
//! Options are resolved once per invocation and threaded read-only through
//! search, resolution, and optimization.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::heuristics;

/// Default timeout for the selector search.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);
/// Default minimum number of ancestor levels before yielding initial candidates.
pub const DEFAULT_SEED_MIN_LENGTH: usize = 3;
/// Default minimum path length for a path to be considered for optimization.
pub const DEFAULT_OPTIMIZED_MIN_LENGTH: usize = 2;

/// Predicate over a single name (id, class, or tag).
pub type NamePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate over an attribute name/value pair.
pub type AttrPredicate = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Cooperative-yield policy applied at safe points of the search.
///
/// Yielding never changes the result, only the wall-clock interleaving with
/// other tasks sharing the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YieldPolicy {
    /// Yield to the runtime scheduler at every safe point (default).
    Cooperative,
    /// Never yield; run the search without suspension points.
    Disabled,
}

impl YieldPolicy {
    /// Suspend at a safe point according to the policy.
    pub async fn pause(self) {
        if let YieldPolicy::Cooperative = self {
            tokio::task::yield_now().await;
        }
    }
}

/// Configuration options for the finder, generic over the backend node handle.
#[derive(Clone)]
pub struct FinderOptions<N> {
    /// Root scope for the search. `None` queries the whole document.
    pub root: Option<N>,
    /// Determines if an id name may be used in a selector.
    pub id_name: NamePredicate,
    /// Determines if a class name may be used in a selector.
    pub class_name: NamePredicate,
    /// Determines if a tag name may be used in a selector.
    pub tag_name: NamePredicate,
    /// Determines if an attribute name/value pair may be used in a selector.
    pub attr: AttrPredicate,
    /// Wall-clock limit for the whole operation.
    pub timeout: Duration,
    /// Minimum number of ancestor levels before the search yields candidates.
    pub seed_min_length: usize,
    /// Minimum path length eligible for optimization.
    pub optimized_min_length: usize,
    /// Maximum number of candidate paths checked; `None` is unbounded.
    pub max_path_checks: Option<usize>,
    /// Cooperative-yield policy.
    pub yield_policy: YieldPolicy,
    /// Optional cancellation signal, checked at every suspension point.
    pub cancel: Option<CancellationToken>,
}

impl<N> Default for FinderOptions<N> {
    fn default() -> Self {
        Self {
            root: None,
            id_name: Arc::new(heuristics::id_name),
            class_name: Arc::new(heuristics::class_name),
            tag_name: Arc::new(heuristics::tag_name),
            attr: Arc::new(heuristics::attr),
            timeout: DEFAULT_TIMEOUT,
            seed_min_length: DEFAULT_SEED_MIN_LENGTH,
            optimized_min_length: DEFAULT_OPTIMIZED_MIN_LENGTH,
            max_path_checks: None,
            yield_policy: YieldPolicy::Cooperative,
            cancel: None,
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for FinderOptions<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinderOptions")
            .field("root", &self.root)
            .field("timeout", &self.timeout)
            .field("seed_min_length", &self.seed_min_length)
            .field("optimized_min_length", &self.optimized_min_length)
            .field("max_path_checks", &self.max_path_checks)
            .field("yield_policy", &self.yield_policy)
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options: FinderOptions<u32> = FinderOptions::default();
        assert!(options.root.is_none());
        assert_eq!(options.timeout, Duration::from_millis(1000));
        assert_eq!(options.seed_min_length, 3);
        assert_eq!(options.optimized_min_length, 2);
        assert!(options.max_path_checks.is_none());
        assert_eq!(options.yield_policy, YieldPolicy::Cooperative);
        assert!(options.cancel.is_none());
    }

    #[test]
    fn test_default_predicates_wired() {
        let options: FinderOptions<u32> = FinderOptions::default();
        assert!((options.id_name)("sidebar"));
        assert!(!(options.class_name)("css-175oi2r"));
        assert!((options.tag_name)("div"));
        assert!((options.attr)("role", "button"));
    }
}
