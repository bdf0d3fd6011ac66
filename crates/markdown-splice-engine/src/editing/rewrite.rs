use crate::tree::{Block, BlockId, BlockTag, Document, Inline, InlineId, InlineTag};

use super::error::RewriteError;
use super::fragment::{BlockFragment, InlineFragment};

/// What a rewriter wants done with the node it was shown.
#[derive(Debug)]
pub enum Rewrite<F> {
    Keep,
    Remove,
    Replace(F),
}

pub type BlockRewrite = Rewrite<BlockFragment>;
pub type InlineRewrite = Rewrite<InlineFragment>;

/// Context handed to every hook: the document as it stands and the node.
///
/// The document reflects every edit applied earlier in the pass.
pub struct Visit<'a, N> {
    pub doc: &'a Document,
    pub id: N,
}

impl<'a> Visit<'a, BlockId> {
    pub fn node(&self) -> &'a Block {
        self.doc.block(self.id)
    }

    /// The source text of the node.
    pub fn text(&self) -> &'a str {
        self.doc.block_text(self.id).unwrap_or_default()
    }
}

impl<'a> Visit<'a, InlineId> {
    pub fn node(&self) -> &'a Inline {
        self.doc.inline(self.id)
    }

    pub fn text(&self) -> &'a str {
        self.doc.inline_text(self.id).unwrap_or_default()
    }
}

pub type BlockVisit<'a> = Visit<'a, BlockId>;
pub type InlineVisit<'a> = Visit<'a, InlineId>;

/// Per-node hooks for [`visit`](super::visit).
///
/// Every hook defaults to keeping the node, so a rewriter overrides only the
/// tags it cares about. `on_block` and `on_inline` dispatch on the tag and
/// can be overridden to see every node.
#[allow(unused_variables)]
pub trait Rewriter {
    fn on_block(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        match node.node().tag() {
            BlockTag::Document => self.visit_document(node),
            BlockTag::BlockQuote => self.visit_block_quote(node),
            BlockTag::List => self.visit_list(node),
            BlockTag::ListItem => self.visit_list_item(node),
            BlockTag::FencedCode => self.visit_fenced_code(node),
            BlockTag::IndentedCode => self.visit_indented_code(node),
            BlockTag::HtmlBlock => self.visit_html_block(node),
            BlockTag::Paragraph => self.visit_paragraph(node),
            BlockTag::AtxHeading => self.visit_atx_heading(node),
            BlockTag::SetextHeading => self.visit_setext_heading(node),
            BlockTag::ThematicBreak => self.visit_thematic_break(node),
            BlockTag::ReferenceDefinition => self.visit_reference_definition(node),
            BlockTag::Table => self.visit_table(node),
            BlockTag::TableRow => self.visit_table_row(node),
            BlockTag::TableCell => self.visit_table_cell(node),
        }
    }

    fn on_inline(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        match node.node().tag() {
            InlineTag::Text => self.visit_text(node),
            InlineTag::SoftBreak => self.visit_soft_break(node),
            InlineTag::LineBreak => self.visit_line_break(node),
            InlineTag::Code => self.visit_code(node),
            InlineTag::RawHtml => self.visit_raw_html(node),
            InlineTag::Emphasis => self.visit_emphasis(node),
            InlineTag::Strong => self.visit_strong(node),
            InlineTag::Strikethrough => self.visit_strikethrough(node),
            InlineTag::Link => self.visit_link(node),
            InlineTag::Image => self.visit_image(node),
        }
    }

    /// The root is shown to rewriters but cannot be removed or replaced.
    fn visit_document(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_block_quote(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_list(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_list_item(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_fenced_code(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_indented_code(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_html_block(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_paragraph(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_atx_heading(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_setext_heading(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_thematic_break(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_reference_definition(
        &mut self,
        node: BlockVisit<'_>,
    ) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_table(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_table_row(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_table_cell(&mut self, node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }

    fn visit_text(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_soft_break(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_line_break(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_code(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_raw_html(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_emphasis(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_strong(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_strikethrough(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_link(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
    fn visit_image(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        Ok(Rewrite::Keep)
    }
}

/// A rewriter that keeps every node.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Rewriter for Identity {}
