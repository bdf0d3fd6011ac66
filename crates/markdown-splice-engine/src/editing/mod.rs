/*!
 * # Editing
 *
 * Source-synchronized rewriting of a parsed [`Document`](crate::tree::Document).
 *
 * The document owns one editable `String` buffer and every node caches its
 * byte span in it. Each structural edit splices the buffer once and then
 * walks only the nodes whose spans it can affect:
 *
 * - later siblings of the edited node and of every ancestor shift by the
 *   length delta, together with their whole subtrees
 * - ancestors grow or shrink by the delta
 * - everything before the edit is untouched
 *
 * Spans sharing only a boundary with an edit are adjacent, never
 * overlapping (see [`classify`]).
 *
 * ## Usage
 *
 * ```rust
 * use markdown_splice_engine::editing::*;
 * use markdown_splice_engine::{ParseSettings, parse_document};
 *
 * struct Shout;
 *
 * impl Rewriter for Shout {
 *     fn visit_emphasis(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
 *         let inner = node.text().trim_matches('*').to_uppercase();
 *         Ok(Rewrite::Replace(make_inline(&format!("**{inner}**"))?))
 *     }
 * }
 *
 * let mut doc = parse_document("say *hi*\n", &ParseSettings::default());
 * rewrite(&mut doc, &mut Shout).unwrap();
 * assert_eq!(doc.source(), Some("say **HI**\n"));
 * ```
 *
 * Hooks see the document as it stands after every earlier edit in the
 * pass. A replacement is walked like any other node, so a rewriter that
 * keeps producing content it rewrites again never terminates.
 */

pub mod error;
pub mod fixup;
pub mod fragment;
pub mod placement;
pub mod rewrite;
pub mod splice;
pub mod visitor;

pub use error::RewriteError;
pub use fixup::resolve_references;
pub use fragment::{
    BlockFragment, InlineFragment, make_block, make_block_with, make_inline, make_inline_with,
};
pub use placement::{Placement, classify};
pub use rewrite::{
    BlockRewrite, BlockVisit, Identity, InlineRewrite, InlineVisit, Rewrite, Rewriter, Visit,
};
pub use splice::{remove_block, remove_inline, replace_block, replace_inline};
pub use visitor::{rewrite, visit};
