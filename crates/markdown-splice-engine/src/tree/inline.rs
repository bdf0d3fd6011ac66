use serde::Serialize;

use super::block::BlockId;
use crate::text::{Span, TextSlice};

/// Index of an inline in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InlineId(pub(crate) u32);

impl InlineId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InlineTag {
    Text,
    SoftBreak,
    LineBreak,
    Code,
    RawHtml,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
}

impl InlineTag {
    /// Tags whose content is child inlines rather than a literal.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            InlineTag::Emphasis
                | InlineTag::Strong
                | InlineTag::Strikethrough
                | InlineTag::Link
                | InlineTag::Image
        )
    }
}

/// The owner of an inline: the block whose content run it heads or belongs
/// to, or the inline it is nested in. Exactly one of the two always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineParent {
    Block(BlockId),
    Inline(InlineId),
}

/// A content node. Fields are written by the parser and the rewrite engine only.
#[derive(Debug, Clone)]
pub struct Inline {
    pub(crate) tag: InlineTag,
    pub(crate) literal: TextSlice,
    pub(crate) target_url: Option<String>,
    pub(crate) reference_label: Option<String>,
    pub(crate) parent: Option<InlineParent>,
    pub(crate) first_child: Option<InlineId>,
    pub(crate) next_sibling: Option<InlineId>,
    pub(crate) prev_sibling: Option<InlineId>,
    pub(crate) source_position: usize,
    pub(crate) source_length: usize,
}

impl Inline {
    pub(crate) fn new(tag: InlineTag, span: Span) -> Self {
        Self {
            tag,
            literal: TextSlice::default(),
            target_url: None,
            reference_label: None,
            parent: None,
            first_child: None,
            next_sibling: None,
            prev_sibling: None,
            source_position: span.start,
            source_length: span.len(),
        }
    }

    pub fn tag(&self) -> InlineTag {
        self.tag
    }

    /// Literal text of text, code and raw HTML inlines; the title of links and images.
    pub fn literal(&self) -> &str {
        self.literal.as_str()
    }

    pub fn literal_slice(&self) -> &TextSlice {
        &self.literal
    }

    pub fn title(&self) -> Option<&str> {
        match self.tag {
            InlineTag::Link | InlineTag::Image if !self.literal.is_empty() => {
                Some(self.literal.as_str())
            }
            _ => None,
        }
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Normalized label of a reference link, resolved by the fixup pass.
    pub fn reference_label(&self) -> Option<&str> {
        self.reference_label.as_deref()
    }

    pub fn parent(&self) -> Option<InlineParent> {
        self.parent
    }

    pub fn parent_block(&self) -> Option<BlockId> {
        match self.parent {
            Some(InlineParent::Block(id)) => Some(id),
            _ => None,
        }
    }

    pub fn parent_inline(&self) -> Option<InlineId> {
        match self.parent {
            Some(InlineParent::Inline(id)) => Some(id),
            _ => None,
        }
    }

    pub fn first_child(&self) -> Option<InlineId> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<InlineId> {
        self.next_sibling
    }

    pub fn previous_sibling(&self) -> Option<InlineId> {
        self.prev_sibling
    }

    pub fn source_position(&self) -> usize {
        self.source_position
    }

    pub fn source_length(&self) -> usize {
        self.source_length
    }

    pub fn source_span(&self) -> Span {
        Span::at(self.source_position, self.source_length)
    }
}
