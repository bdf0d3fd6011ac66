//! # Diagnostics
//!
//! Checks for callers and tests that want to verify a document after
//! parsing or rewriting.
//!
//! - **`invariants`**: span containment, sibling order, link consistency and
//!   reference-map ownership
//! - **`dump`**: a deterministic outline of the tree for snapshot tests

pub mod dump;
pub mod invariants;

pub use dump::dump;
pub use invariants::check_invariants;
