use serde::Serialize;

use super::inline::InlineId;
use super::references::Reference;
use crate::text::{Span, TextSlice};

/// Index of a block in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) u32);

impl BlockId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockTag {
    Document,
    Paragraph,
    AtxHeading,
    SetextHeading,
    List,
    ListItem,
    BlockQuote,
    FencedCode,
    IndentedCode,
    HtmlBlock,
    ThematicBreak,
    ReferenceDefinition,
    Table,
    TableRow,
    TableCell,
}

impl BlockTag {
    /// Blocks whose content is a run of inlines rather than child blocks.
    pub fn holds_inlines(self) -> bool {
        matches!(
            self,
            BlockTag::Paragraph | BlockTag::AtxHeading | BlockTag::SetextHeading | BlockTag::TableCell
        )
    }

    /// Whether a block of this tag may directly contain `child`.
    pub(crate) fn can_contain(self, child: BlockTag) -> bool {
        match self {
            BlockTag::Document | BlockTag::BlockQuote | BlockTag::ListItem => !matches!(
                child,
                BlockTag::Document | BlockTag::ListItem | BlockTag::TableRow | BlockTag::TableCell
            ),
            BlockTag::List => child == BlockTag::ListItem,
            BlockTag::Table => child == BlockTag::TableRow,
            BlockTag::TableRow => child == BlockTag::TableCell,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListKind {
    Bullet { marker: char },
    Ordered { start: u64, delimiter: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListData {
    pub kind: ListKind,
    pub tight: bool,
    /// Columns of indentation before the marker.
    pub marker_offset: usize,
    /// Columns from the marker to the item content.
    pub padding: usize,
}

impl ListData {
    pub fn is_ordered(&self) -> bool {
        matches!(self.kind, ListKind::Ordered { .. })
    }

    /// Whether an item with `other` may continue a list started with `self`.
    pub(crate) fn continues(&self, other: &ListData) -> bool {
        match (self.kind, other.kind) {
            (ListKind::Bullet { marker: a }, ListKind::Bullet { marker: b }) => a == b,
            (ListKind::Ordered { delimiter: a, .. }, ListKind::Ordered { delimiter: b, .. }) => {
                a == b
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// A structural node. Fields are written by the parser and the rewrite engine only.
#[derive(Debug, Clone)]
pub struct Block {
    pub(crate) tag: BlockTag,
    pub(crate) parent: Option<BlockId>,
    pub(crate) first_child: Option<BlockId>,
    pub(crate) last_child: Option<BlockId>,
    pub(crate) next_sibling: Option<BlockId>,
    pub(crate) prev_sibling: Option<BlockId>,
    pub(crate) inline_content: Option<InlineId>,
    pub(crate) source_position: usize,
    pub(crate) source_length: usize,
    pub(crate) heading_level: u8,
    pub(crate) list_data: Option<ListData>,
    pub(crate) info: Option<TextSlice>,
    pub(crate) literal: Option<TextSlice>,
    pub(crate) alignments: Vec<Alignment>,
    pub(crate) reference_labels: Vec<String>,
    pub(crate) definitions: Vec<(String, Reference)>,
}

impl Block {
    pub(crate) fn new(tag: BlockTag, source_position: usize) -> Self {
        Self {
            tag,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
            inline_content: None,
            source_position,
            source_length: 0,
            heading_level: 0,
            list_data: None,
            info: None,
            literal: None,
            alignments: Vec::new(),
            reference_labels: Vec::new(),
            definitions: Vec::new(),
        }
    }

    pub fn tag(&self) -> BlockTag {
        self.tag
    }

    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<BlockId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<BlockId> {
        self.last_child
    }

    pub fn next_sibling(&self) -> Option<BlockId> {
        self.next_sibling
    }

    pub fn previous_sibling(&self) -> Option<BlockId> {
        self.prev_sibling
    }

    /// First inline of a paragraph, heading or table cell.
    pub fn inline_content(&self) -> Option<InlineId> {
        self.inline_content
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

    /// 1-6 for headings, 0 otherwise.
    pub fn heading_level(&self) -> u8 {
        self.heading_level
    }

    pub fn list_data(&self) -> Option<&ListData> {
        self.list_data.as_ref()
    }

    /// Info string of a fenced code block.
    pub fn info(&self) -> Option<&str> {
        self.info.as_ref().map(TextSlice::as_str)
    }

    /// Literal content of code and HTML blocks.
    pub fn literal(&self) -> Option<&str> {
        self.literal.as_ref().map(TextSlice::as_str)
    }

    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    /// Normalized labels this reference-definition block currently backs in
    /// the reference map. A label defined earlier in the document is not
    /// listed here even when the block defines it too.
    pub fn reference_labels(&self) -> &[String] {
        &self.reference_labels
    }

    /// Every definition the block holds, in source order, duplicates included.
    pub fn definitions(&self) -> &[(String, Reference)] {
        &self.definitions
    }
}
