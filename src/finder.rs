//! Orchestration: drive search, resolution, fallback, and optimization
//! under one shared deadline/cancellation context.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::errors::FinderError;
use crate::optimize::optimize;
use crate::options::FinderOptions;
use crate::ports::Dom;
use crate::resolve::{fallback, selector, unique_match};
use crate::search::Search;
use crate::synth::HTML_TAG;
use crate::types::{path_penalty, sort_by_penalty, Path};

/// Find a selector string that uniquely identifies `input` within the
/// configured scope.
///
/// Candidates are pulled cheapest-first from the search; the first one that
/// resolves uniquely is shortened by the optimizer and the minimum-penalty
/// surviving variant is rendered. Exceeding the deadline or the check budget
/// falls back to a deterministic positional path.
pub async fn find_selector<D: Dom>(
    dom: &D,
    input: &D::Node,
    options: FinderOptions<D::Node>,
) -> Result<String, FinderError> {
    if !dom.is_element(input) {
        return Err(FinderError::NotAnElement);
    }
    if dom.tag_name(input) == HTML_TAG {
        return Ok(HTML_TAG.to_string());
    }

    let started = Instant::now();
    let scope = dom.resolve_scope(options.root.as_ref());

    let mut found: Option<Path> = None;
    let mut checks = 0usize;
    let mut search = Search::new(dom, input, &options, &scope);
    while let Some(candidate) = search.next() {
        options.yield_policy.pause().await;
        if let Some(cancel) = &options.cancel {
            if cancel.is_cancelled() {
                return Err(FinderError::Cancelled);
            }
        }

        let elapsed = started.elapsed();
        let over_deadline = elapsed > options.timeout;
        let over_budget = options
            .max_path_checks
            .map_or(false, |max| checks >= max);
        if over_deadline || over_budget {
            warn!(
                checks,
                elapsed_ms = elapsed.as_millis() as u64,
                "search budget exhausted, trying positional fallback"
            );
            let Some(path) = fallback(dom, input, &scope).await? else {
                return Err(if over_deadline {
                    FinderError::Timeout {
                        elapsed_ms: elapsed.as_millis() as u64,
                        timeout_ms: options.timeout.as_millis() as u64,
                    }
                } else {
                    FinderError::BudgetExhausted { checks }
                });
            };
            return Ok(selector(&path));
        }

        checks += 1;
        if unique_match(dom, &candidate, &scope).await?.is_some() {
            debug!(checks, selector = %selector(&candidate), "unique candidate accepted");
            found = Some(candidate);
            break;
        }
    }

    let Some(found) = found else {
        return Err(FinderError::NotFound);
    };

    let mut variants: Vec<Path> = Vec::new();
    optimize(dom, &found, input, &options, &scope, started, &mut variants).await?;

    let best = if variants.is_empty() {
        found
    } else {
        sort_by_penalty(&mut variants);
        variants.swap_remove(0)
    };
    let css = selector(&best);
    info!(selector = %css, penalty = path_penalty(&best), checks, "selector found");
    Ok(css)
}
