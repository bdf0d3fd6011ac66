//! # markdown-splice engine
//!
//! Parses CommonMark (with GitHub tables and strikethrough) into an arena
//! tree whose nodes know their exact byte span in the source, rewrites that
//! tree while keeping the source buffer and every span consistent, and
//! renders the result to HTML.
//!
//! ```rust
//! use markdown_splice_engine::*;
//!
//! struct DropQuotes;
//!
//! impl Rewriter for DropQuotes {
//!     fn visit_block_quote(&mut self, _node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
//!         Ok(Rewrite::Remove)
//!     }
//! }
//!
//! let mut doc = parse_document("a\n\n> quoted\n\nb\n", &ParseSettings::default());
//! rewrite(&mut doc, &mut DropQuotes).unwrap();
//! assert_eq!(doc.source(), Some("a\n\n\nb\n"));
//! assert_eq!(render_html(&doc, &RenderSettings::default()), "<p>a</p>\n<p>b</p>\n");
//! ```

pub mod diagnostics;
pub mod editing;
pub mod parsing;
pub mod render;
pub mod settings;
pub mod text;
pub mod tree;

// Re-export key types for easier usage
pub use diagnostics::{check_invariants, dump};
pub use editing::{
    BlockFragment, BlockRewrite, BlockVisit, InlineFragment, InlineRewrite, InlineVisit, Rewrite,
    RewriteError, Rewriter, make_block, make_inline, rewrite, visit,
};
pub use parsing::parse_document;
pub use render::render_html;
pub use settings::{Newline, ParseSettings, RenderSettings, Settings};
pub use tree::{Block, BlockId, BlockTag, Document, Inline, InlineId, InlineTag, Reference};
