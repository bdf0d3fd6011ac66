//! # Inline Parsing
//!
//! Delimiter-stack inline parsing over the joined content lines of one block.
//!
//! ## Architecture
//!
//! Inline parsing runs after block parsing, once every reference definition
//! in the document is known. A block's content lines (paragraph lines, the
//! heading text, one table cell) are joined with `\n` into an
//! [`InlineSource`] that maps every byte back to its absolute position, so
//! inline spans stay exact even when container prefixes sit between lines.
//!
//! ## Modules
//!
//! - **`types`**: `InlineNode`, `InlineSource`, `ContentLine`
//! - **`kinds`**: Inline-specific types with owned delimiters
//! - **`parser`**: `parse_inlines()` entry point with `parse_*` helpers
//!
//! ## Raw Zone Precedence
//!
//! Code spans, autolinks and raw HTML are consumed whole when they match, so
//! delimiters inside them never take part in emphasis or link matching.

pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::{InlineContext, parse_inlines};
pub use types::{ContentLine, InlineNode, InlineSource};
