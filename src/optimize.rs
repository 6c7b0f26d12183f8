//! Path optimization: drop redundant interior fragments
//!
//! Interior knots (never the target's own, never the outermost) are removed
//! one at a time; every shorter path that still resolves uniquely to the
//! original target is collected and recursively shortened further. Hitting
//! the shared deadline abandons the remaining attempts silently; the
//! unoptimized path stays valid.

use std::time::Instant;

use async_recursion::async_recursion;

use crate::errors::FinderError;
use crate::options::FinderOptions;
use crate::ports::Dom;
use crate::resolve::unique_match;
use crate::types::{Knot, Path, QueryScope};

/// Collect every uniquely-resolving shortened variant of `path` into `out`.
#[async_recursion]
pub async fn optimize<D: Dom>(
    dom: &D,
    path: &[Knot],
    input: &D::Node,
    options: &FinderOptions<D::Node>,
    scope: &QueryScope<D::Node>,
    started: Instant,
    out: &mut Vec<Path>,
) -> Result<(), FinderError> {
    if path.len() <= 2 || path.len() <= options.optimized_min_length {
        return Ok(());
    }
    for i in 1..path.len() - 1 {
        if started.elapsed() > options.timeout {
            return Ok(());
        }
        let mut shorter = path.to_vec();
        shorter.remove(i);

        if unique_match(dom, &shorter, scope).await?.as_ref() == Some(input) {
            out.push(shorter.clone());
            options.yield_policy.pause().await;
            if let Some(cancel) = &options.cancel {
                if cancel.is_cancelled() {
                    return Err(FinderError::Cancelled);
                }
            }
            optimize(dom, &shorter, input, options, scope, started, out).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memdom::MemoryDom;
    use crate::resolve::selector;
    use crate::types::sort_by_penalty;
    use std::time::Duration;

    fn knot(text: &str, penalty: u32, level: usize) -> Knot {
        Knot {
            text: text.into(),
            penalty,
            level,
        }
    }

    fn sample_dom() -> (MemoryDom, crate::memdom::NodeId) {
        let mut dom = MemoryDom::new();
        let html = dom.append(dom.document(), "html");
        let body = dom.append(html, "body");
        let main = dom.append(body, "main");
        dom.set_attr(main, "id", "content");
        let section = dom.append(main, "section");
        let para = dom.append(section, "p");
        dom.set_attr(para, "class", "intro");
        (dom, para)
    }

    #[tokio::test]
    async fn test_optimize_drops_redundant_interior_knot() {
        let (dom, para) = sample_dom();
        let path = vec![
            knot(".intro", 1, 0),
            knot("section", 5, 1),
            knot("#content", 0, 2),
        ];
        let options = FinderOptions::default();
        let scope = QueryScope::Document;
        let mut variants = Vec::new();
        optimize(
            &dom,
            &path,
            &para,
            &options,
            &scope,
            Instant::now(),
            &mut variants,
        )
        .await
        .unwrap();

        assert_eq!(variants.len(), 1);
        assert_eq!(selector(&variants[0]), "#content .intro");
        sort_by_penalty(&mut variants);
        assert!(crate::types::path_penalty(&variants[0]) < crate::types::path_penalty(&path));
    }

    #[tokio::test]
    async fn test_optimize_skips_short_paths() {
        let (dom, para) = sample_dom();
        let path = vec![knot(".intro", 1, 0), knot("#content", 0, 2)];
        let options = FinderOptions::default();
        let scope = QueryScope::Document;
        let mut variants = Vec::new();
        optimize(
            &dom,
            &path,
            &para,
            &options,
            &scope,
            Instant::now(),
            &mut variants,
        )
        .await
        .unwrap();
        assert!(variants.is_empty());
    }

    #[tokio::test]
    async fn test_optimize_respects_min_length() {
        let (dom, para) = sample_dom();
        let path = vec![
            knot(".intro", 1, 0),
            knot("section", 5, 1),
            knot("#content", 0, 2),
        ];
        let options = FinderOptions {
            optimized_min_length: 3,
            ..Default::default()
        };
        let scope = QueryScope::Document;
        let mut variants = Vec::new();
        optimize(
            &dom,
            &path,
            &para,
            &options,
            &scope,
            Instant::now(),
            &mut variants,
        )
        .await
        .unwrap();
        assert!(variants.is_empty());
    }

    #[tokio::test]
    async fn test_optimize_stops_on_deadline() {
        let (dom, para) = sample_dom();
        let path = vec![
            knot(".intro", 1, 0),
            knot("section", 5, 1),
            knot("#content", 0, 2),
        ];
        let options = FinderOptions {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        let scope = QueryScope::Document;
        let mut variants = Vec::new();
        let started = Instant::now() - Duration::from_millis(10);
        optimize(&dom, &path, &para, &options, &scope, started, &mut variants)
            .await
            .unwrap();
        assert!(variants.is_empty());
    }
}
