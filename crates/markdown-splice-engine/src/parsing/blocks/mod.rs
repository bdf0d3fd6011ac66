//! # Block Parsing
//!
//! Line-oriented block construction with a stack of open containers.
//!
//! ## Per-line phases
//!
//! 1. **Continuation**: walk the open blocks from the root inwards; each one
//!    consumes its prefix (`>`, list item indentation) or stops the walk
//! 2. **Raw leaves**: a line fully inside fenced code, indented code or an
//!    HTML block is taken verbatim
//! 3. **Block starts**: quotes, headings, fences, HTML, tables, setext
//!    underlines, thematic breaks and list items, in precedence order
//! 4. **Text**: the rest of the line continues a paragraph (lazily, when only
//!    the paragraph survived), a table, or starts a new paragraph
//!
//! ## Modules
//!
//! - **`kinds`**: one type per construct, owning its delimiters
//! - **`open`**: `try_open` dispatch for leaf and list openers
//! - **`builder`**: `BlockBuilder`, the container stack writing into the arena
//!
//! ## Key Invariants
//!
//! - A block starts at its first significant character and ends after the
//!   line ending of its last line
//! - A container covers every line whose prefix it consumed
//! - Blank lines between blocks belong to no child
//! - Fenced code blocks are raw zones: no block or inline parsing inside

pub mod builder;
pub mod kinds;
pub mod open;

pub use builder::{BlockBuilder, BuiltBlocks, PendingInlines};
pub use open::{BlockOpen, OpenContext, try_open};
