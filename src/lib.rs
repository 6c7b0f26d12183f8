//! Unique CSS selector synthesis
//!
//! This crate computes a short, robust, human-readable selector that
//! uniquely identifies one node in a DOM-like tree:
//! - Fragment synthesis with fixed penalty weights (id < class < attribute
//!   < tag < positional)
//! - Lazy cheapest-first candidate search over ancestor paths
//! - Uniqueness resolution against a pluggable tree/query backend
//! - Deterministic positional fallback under a search budget
//! - Path optimization that drops redundant intermediate fragments
//!
//! The tree backend is abstracted behind [`ports::Dom`]; [`memdom`] ships an
//! in-memory reference implementation so the engine runs without a browser.
//!
//! ```
//! use selector_forge::{find_selector, FinderOptions, MemoryDom};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), selector_forge::FinderError> {
//! let mut dom = MemoryDom::new();
//! let html = dom.append(dom.document(), "html");
//! let body = dom.append(html, "body");
//! let nav = dom.append(body, "nav");
//! dom.set_attr(nav, "id", "site-menu");
//!
//! let css = find_selector(&dom, &nav, FinderOptions::default()).await?;
//! assert_eq!(css, "#site-menu");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod finder;
pub mod heuristics;
pub mod memdom;
pub mod optimize;
pub mod options;
pub mod ports;
pub mod resolve;
pub mod search;
pub mod synth;
pub mod types;

pub use errors::FinderError;
pub use finder::find_selector;
pub use memdom::{css_escape, MemoryDom, NodeId};
pub use options::{AttrPredicate, FinderOptions, NamePredicate, YieldPolicy};
pub use ports::Dom;
pub use types::{path_penalty, Knot, Path, QueryScope};
