//! Lazy cheapest-first candidate enumeration
//!
//! `Search` walks ancestors from the target node toward the scope root
//! (exclusive), synthesizes the knot list for each level, and drains the
//! cartesian product of one knot per level through a pull-based iterator.
//! Candidates are buffered and sorted by penalty; the buffer is flushed once
//! the walk reaches `seed_min_length` levels and again at the scope root, so
//! early candidates always carry a consistent minimum context depth.

use std::collections::VecDeque;

use crate::options::FinderOptions;
use crate::ports::{is_scope_root, Dom};
use crate::synth::level_knots;
use crate::types::{sort_by_penalty, Knot, Path, QueryScope};

/// Pull-based candidate path iterator. Finite, non-restartable, and safe to
/// abandon before exhaustion.
pub struct Search<'a, D: Dom> {
    dom: &'a D,
    options: &'a FinderOptions<D::Node>,
    scope: &'a QueryScope<D::Node>,
    stack: Vec<Vec<Knot>>,
    pending: Vec<Path>,
    ready: VecDeque<Path>,
    current: Option<D::Node>,
    depth: usize,
    exhausted: bool,
}

impl<'a, D: Dom> Search<'a, D> {
    /// Start a search at `input`, walking toward the root of `scope`.
    pub fn new(
        dom: &'a D,
        input: &D::Node,
        options: &'a FinderOptions<D::Node>,
        scope: &'a QueryScope<D::Node>,
    ) -> Self {
        Self {
            dom,
            options,
            scope,
            stack: Vec::new(),
            pending: Vec::new(),
            ready: VecDeque::new(),
            current: Some(input.clone()),
            depth: 0,
            exhausted: false,
        }
    }

    /// Sort the pending buffer by penalty and move it to the yield queue.
    fn flush(&mut self) {
        sort_by_penalty(&mut self.pending);
        self.ready.extend(self.pending.drain(..));
    }

    /// Walk one ancestor level, or flush the final buffer at the scope root.
    fn advance(&mut self) {
        match self.current.take() {
            Some(node) if !is_scope_root(self.dom, self.scope, &node) => {
                let mut level = level_knots(self.dom, &node, self.options);
                for knot in &mut level {
                    knot.level = self.depth;
                }
                self.stack.push(level);
                self.current = self.dom.parent(&node);
                self.depth += 1;

                self.pending.extend(combinations(&self.stack));
                if self.depth >= self.options.seed_min_length {
                    self.flush();
                }
            }
            _ => {
                self.exhausted = true;
                self.flush();
            }
        }
    }
}

impl<D: Dom> Iterator for Search<'_, D> {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        loop {
            if let Some(path) = self.ready.pop_front() {
                return Some(path);
            }
            if self.exhausted {
                return None;
            }
            self.advance();
        }
    }
}

/// Every path formed by picking exactly one knot from each stacked level,
/// target level first. A stack containing an empty level produces no paths
/// at all.
pub(crate) fn combinations(stack: &[Vec<Knot>]) -> Vec<Path> {
    let mut out = Vec::new();
    let mut path = Vec::with_capacity(stack.len());
    combine(stack, &mut path, &mut out);
    out
}

fn combine(stack: &[Vec<Knot>], path: &mut Vec<Knot>, out: &mut Vec<Path>) {
    match stack.split_first() {
        Some((level, rest)) => {
            for knot in level {
                path.push(knot.clone());
                combine(rest, path, out);
                path.pop();
            }
        }
        None => out.push(path.clone()),
    }
}
