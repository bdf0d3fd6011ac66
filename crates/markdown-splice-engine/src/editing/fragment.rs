use crate::parsing::parse_document_with;
use crate::settings::ParseSettings;
use crate::tree::{Block, BlockId, Document, Inline, InlineId};

use super::error::RewriteError;

/// A single block parsed from standalone source, ready to replace a block.
///
/// Positions are relative to the fragment text until the block is adopted
/// by a document.
#[derive(Debug, Clone)]
pub struct BlockFragment {
    pub(crate) doc: Document,
    pub(crate) node: BlockId,
}

/// A single inline parsed from standalone source, ready to replace an inline.
#[derive(Debug, Clone)]
pub struct InlineFragment {
    pub(crate) doc: Document,
    pub(crate) node: InlineId,
}

impl BlockFragment {
    pub fn block(&self) -> &Block {
        self.doc.block(self.node)
    }

    /// The source text the block will occupy once adopted.
    pub fn text(&self) -> &str {
        self.doc.block_text(self.node).unwrap_or_default()
    }

    /// The standalone document the fragment was parsed into.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn node(&self) -> BlockId {
        self.node
    }
}

impl InlineFragment {
    pub fn inline(&self) -> &Inline {
        self.doc.inline(self.node)
    }

    pub fn text(&self) -> &str {
        self.doc.inline_text(self.node).unwrap_or_default()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn node(&self) -> InlineId {
        self.node
    }
}

/// Parses `text` into exactly one block.
pub fn make_block(text: &str) -> Result<BlockFragment, RewriteError> {
    make_block_with(text, &ParseSettings::default())
}

/// Parses `text` into exactly one inline.
pub fn make_inline(text: &str) -> Result<InlineFragment, RewriteError> {
    make_inline_with(text, &ParseSettings::default())
}

pub fn make_block_with(text: &str, settings: &ParseSettings) -> Result<BlockFragment, RewriteError> {
    let doc = parse_document_with(text, &settings.for_fragment(), true);
    let node = single_block(&doc)?;
    Ok(BlockFragment { doc, node })
}

pub fn make_inline_with(
    text: &str,
    settings: &ParseSettings,
) -> Result<InlineFragment, RewriteError> {
    let doc = parse_document_with(text, &settings.for_fragment(), true);
    let block = single_block(&doc)?;
    let inlines: Vec<InlineId> = doc.inlines(block).collect();
    match inlines.as_slice() {
        [node] => {
            let node = *node;
            Ok(InlineFragment { doc, node })
        }
        _ => Err(RewriteError::AmbiguousFragment {
            expected: "inline",
            found: inlines.len(),
        }),
    }
}

fn single_block(doc: &Document) -> Result<BlockId, RewriteError> {
    let blocks: Vec<BlockId> = doc.children(doc.root()).collect();
    match blocks.as_slice() {
        [block] => Ok(*block),
        _ => Err(RewriteError::AmbiguousFragment {
            expected: "block",
            found: blocks.len(),
        }),
    }
}
