use std::sync::Arc;

use crate::parsing::escape::unescape;
use crate::parsing::inline::{ContentLine, InlineSource};
use crate::settings::ParseSettings;
use crate::text::{Cursor, LineRef, Span, TextSlice};
use crate::tree::{Alignment, Block, BlockId, BlockTag, Document, ListData, Reference, normalize_label};

use super::kinds::{BlockQuote, CodeFence, FenceOpen, HtmlKind, ReferenceDefinition, Table};
use super::open::{BlockOpen, OpenContext, try_open};

/// The open leaf block and the content collected for it so far.
#[derive(Debug)]
enum LeafState {
    None,
    Paragraph {
        id: BlockId,
        lines: Vec<ContentLine>,
    },
    Fence {
        id: BlockId,
        open: FenceOpen,
        /// Columns of indentation before the opening fence.
        indent: usize,
        literal: String,
    },
    IndentedCode {
        id: BlockId,
        lines: Vec<CodeLine>,
    },
    Html {
        id: BlockId,
        kind: HtmlKind,
        literal: String,
    },
}

impl LeafState {
    fn id(&self) -> Option<BlockId> {
        match self {
            LeafState::None => None,
            LeafState::Paragraph { id, .. }
            | LeafState::Fence { id, .. }
            | LeafState::IndentedCode { id, .. }
            | LeafState::Html { id, .. } => Some(*id),
        }
    }

    /// Leaves whose lines are taken verbatim, without looking for block starts.
    fn is_raw(&self) -> bool {
        matches!(
            self,
            LeafState::Fence { .. } | LeafState::IndentedCode { .. } | LeafState::Html { .. }
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct CodeLine {
    span: Span,
    line_end: usize,
    blank: bool,
}

/// Content lines waiting for inline parsing. Inlines are parsed once every
/// reference definition in the document is known.
#[derive(Debug, Clone)]
pub struct PendingInlines {
    pub block: BlockId,
    pub lines: Vec<ContentLine>,
}

/// Result of block construction.
pub struct BuiltBlocks {
    pub doc: Document,
    pub shared: Arc<str>,
    pub pending: Vec<PendingInlines>,
}

enum Continuation {
    Matched,
    Failed,
    /// The line closed a block and needs no further processing.
    LineDone,
}

/// Builds the block tree line by line with a stack of open blocks.
///
/// Every line first walks the stack to see which open blocks it continues,
/// then looks for new block starts, then adds its remaining text to the
/// innermost open block. Blocks are written into the document arena as soon
/// as they open; spans grow as lines are added.
pub struct BlockBuilder<'a> {
    text: &'a str,
    shared: Arc<str>,
    doc: Document,
    /// Open blocks from the root (index 0) to the innermost.
    open: Vec<BlockId>,
    leaf: LeafState,
    pending: Vec<PendingInlines>,
    quote_on_line: Vec<BlockId>,
    opened_on_line: Vec<BlockId>,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(text: &'a str, settings: &ParseSettings) -> Self {
        let source = settings.track_source_position.then(|| text.to_string());
        let mut doc = Document::new(source, settings.clone());
        let root = doc.root();
        doc.block_mut(root).source_length = text.len();
        Self {
            text,
            shared: Arc::from(text),
            doc,
            open: vec![root],
            leaf: LeafState::None,
            pending: Vec::new(),
            quote_on_line: Vec::new(),
            opened_on_line: Vec::new(),
        }
    }

    pub fn push(&mut self, line: &LineRef<'_>) {
        let line_end = line.span.end;
        let mut cur = Cursor::new(line.content(), line.span.start);
        self.quote_on_line.clear();
        self.opened_on_line.clear();

        let mut matched = 1;
        while matched < self.open.len() {
            match self.continue_block(self.open[matched], &mut cur, line_end) {
                Continuation::Matched => matched += 1,
                Continuation::Failed => break,
                Continuation::LineDone => return,
            }
        }

        let all_matched = matched == self.open.len();
        if all_matched && self.leaf.is_raw() {
            self.add_raw_line(&cur, line_end);
            return;
        }

        let mut closed = all_matched;
        let mut container = self.open[matched - 1];
        let mut consumed = false;
        let mut close_tip = false;

        loop {
            let tip_is_paragraph = matches!(self.leaf, LeafState::Paragraph { .. });
            let container_tag = self.doc.block(container).tag;
            let indent = cur.indent();

            if indent >= 4 {
                if !tip_is_paragraph && container_tag != BlockTag::Table && !cur.is_blank() {
                    cur.advance_columns(4);
                    self.close_unmatched(matched, &mut closed);
                    let id = self.add_child(BlockTag::IndentedCode, cur.pos());
                    self.leaf = LeafState::IndentedCode {
                        id,
                        lines: Vec::new(),
                    };
                }
                break;
            }

            if let Some(marker) = BlockQuote::consume_prefix(&mut cur) {
                self.close_unmatched(matched, &mut closed);
                let id = self.add_child(BlockTag::BlockQuote, marker);
                self.quote_on_line.push(id);
                container = id;
                continue;
            }

            let mut probe = cur.clone();
            probe.skip_whitespace();
            let rest = probe.rest();
            let at = probe.pos();

            if container_tag == BlockTag::Paragraph && self.doc.settings.github_tables {
                if let Some(alignments) = self.table_delimiter(container, rest) {
                    self.open_table(container, alignments);
                    consumed = true;
                    break;
                }
            }

            let ctx = OpenContext {
                container_is_paragraph: container_tag == BlockTag::Paragraph,
                tip_is_paragraph,
            };
            let Some(open) = try_open(rest, ctx) else {
                break;
            };
            match open {
                BlockOpen::AtxHeading { level, content } => {
                    self.close_unmatched(matched, &mut closed);
                    let id = self.add_child(BlockTag::AtxHeading, at);
                    self.doc.block_mut(id).heading_level = level;
                    let span = Span::new(at + content.start, at + content.end);
                    if !span.is_empty() {
                        self.pending.push(PendingInlines {
                            block: id,
                            lines: vec![ContentLine { span, line_end }],
                        });
                    }
                    consumed = true;
                    close_tip = true;
                    break;
                }
                BlockOpen::FencedCode(open) => {
                    self.close_unmatched(matched, &mut closed);
                    let id = self.add_child(BlockTag::FencedCode, at);
                    let raw_info = &rest[open.info_start..open.info_end];
                    if !raw_info.is_empty() {
                        let span = Span::new(at + open.info_start, at + open.info_end);
                        let info = unescape(raw_info);
                        self.doc.block_mut(id).info =
                            Some(TextSlice::view_or_owned(&self.shared, span, &info));
                    }
                    self.leaf = LeafState::Fence {
                        id,
                        open,
                        indent,
                        literal: String::new(),
                    };
                    consumed = true;
                    break;
                }
                BlockOpen::HtmlBlock(kind) => {
                    self.close_unmatched(matched, &mut closed);
                    let id = self.add_child(BlockTag::HtmlBlock, at);
                    self.leaf = LeafState::Html {
                        id,
                        kind,
                        literal: String::new(),
                    };
                    break;
                }
                BlockOpen::SetextUnderline { level } => {
                    let Some((id, lines)) = self.take_paragraph() else {
                        break;
                    };
                    let remaining = self.split_definitions(id, lines);
                    if remaining.is_empty() {
                        // The paragraph was only definitions; the underline is ordinary text.
                        self.open.pop();
                        container = self.top();
                        continue;
                    }
                    let block = self.doc.block_mut(id);
                    block.tag = BlockTag::SetextHeading;
                    block.heading_level = level;
                    self.pending.push(PendingInlines {
                        block: id,
                        lines: remaining,
                    });
                    consumed = true;
                    close_tip = true;
                    break;
                }
                BlockOpen::ThematicBreak => {
                    self.close_unmatched(matched, &mut closed);
                    self.add_child(BlockTag::ThematicBreak, at);
                    consumed = true;
                    close_tip = true;
                    break;
                }
                BlockOpen::ListItem { kind, width } => {
                    let mut after = probe.clone();
                    after.bump_n(width);
                    let spaces = after.indent();
                    let blank = after.is_blank();
                    let padding = if blank || spaces >= 5 {
                        width + 1
                    } else {
                        width + spaces
                    };
                    if spaces >= 5 && !blank {
                        after.advance_columns(1);
                    } else {
                        after.skip_whitespace();
                    }
                    let data = ListData {
                        kind,
                        tight: true,
                        marker_offset: indent,
                        padding,
                    };

                    self.close_unmatched(matched, &mut closed);
                    let top = self.doc.block(self.top());
                    let continues = top.tag == BlockTag::List
                        && top.list_data.is_some_and(|d| d.continues(&data));
                    if !continues {
                        let list = self.add_child(BlockTag::List, at);
                        self.doc.block_mut(list).list_data = Some(data);
                    }
                    let item = self.add_child(BlockTag::ListItem, at);
                    self.doc.block_mut(item).list_data = Some(data);
                    cur = after;
                    container = item;
                }
            }
        }

        if consumed {
            self.extend_open(line_end);
            if close_tip {
                self.finalize_top();
            }
            return;
        }

        let blank = cur.is_blank();
        if !closed && !blank && matches!(self.leaf, LeafState::Paragraph { .. }) {
            // Lazy continuation: the paragraph goes on although some of its
            // containers did not match.
            self.add_paragraph_line(&mut cur, line_end);
            self.extend_open(line_end);
            return;
        }

        self.close_unmatched(matched, &mut closed);
        if blank {
            self.extend_blank_line(line_end);
            return;
        }

        match self.leaf {
            LeafState::Paragraph { .. } => self.add_paragraph_line(&mut cur, line_end),
            LeafState::Fence { .. } | LeafState::IndentedCode { .. } | LeafState::Html { .. } => {
                self.add_raw_line(&cur, line_end);
                return;
            }
            LeafState::None => {
                let top = self.top();
                if self.doc.block(top).tag == BlockTag::Table {
                    cur.skip_whitespace();
                    self.add_table_row(top, cur.pos(), cur.rest(), line_end);
                } else {
                    cur.skip_whitespace();
                    let id = self.add_child(BlockTag::Paragraph, cur.pos());
                    self.leaf = LeafState::Paragraph {
                        id,
                        lines: Vec::new(),
                    };
                    self.add_paragraph_line(&mut cur, line_end);
                }
            }
        }
        self.extend_open(line_end);
    }

    /// Closes every open block and returns the tree with its pending inline content.
    pub fn finish(mut self) -> BuiltBlocks {
        while self.open.len() > 1 {
            self.finalize_top();
        }
        BuiltBlocks {
            doc: self.doc,
            shared: self.shared,
            pending: self.pending,
        }
    }

    fn top(&self) -> BlockId {
        self.open[self.open.len() - 1]
    }

    fn take_paragraph(&mut self) -> Option<(BlockId, Vec<ContentLine>)> {
        if !matches!(self.leaf, LeafState::Paragraph { .. }) {
            return None;
        }
        match std::mem::replace(&mut self.leaf, LeafState::None) {
            LeafState::Paragraph { id, lines } => Some((id, lines)),
            _ => None,
        }
    }

    fn continue_block(&mut self, id: BlockId, cur: &mut Cursor<'_>, line_end: usize) -> Continuation {
        let blank = cur.is_blank();
        let block = self.doc.block(id);
        let tag = block.tag;
        let first_child = block.first_child;
        let list_data = block.list_data;
        match tag {
            BlockTag::BlockQuote => match BlockQuote::consume_prefix(cur) {
                Some(_) => {
                    self.quote_on_line.push(id);
                    Continuation::Matched
                }
                None => Continuation::Failed,
            },
            BlockTag::ListItem => {
                if blank {
                    if first_child.is_none() {
                        return Continuation::Failed;
                    }
                    cur.skip_whitespace();
                    return Continuation::Matched;
                }
                let width = list_data.map_or(0, |d| d.marker_offset + d.padding);
                if cur.indent() >= width {
                    cur.advance_columns(width);
                    Continuation::Matched
                } else {
                    Continuation::Failed
                }
            }
            BlockTag::FencedCode => {
                let LeafState::Fence { open, indent, .. } = self.leaf else {
                    return Continuation::Failed;
                };
                let mut probe = cur.clone();
                probe.skip_whitespace();
                if cur.indent() < 4 && CodeFence::closes(&open, probe.rest()) {
                    self.extend_open(line_end);
                    self.finalize_top();
                    return Continuation::LineDone;
                }
                cur.advance_columns(indent);
                Continuation::Matched
            }
            BlockTag::IndentedCode => {
                if blank || cur.indent() >= 4 {
                    cur.advance_columns(4);
                    Continuation::Matched
                } else {
                    Continuation::Failed
                }
            }
            BlockTag::HtmlBlock => match self.leaf {
                LeafState::Html { kind, .. } if blank && kind.ends_at_blank() => {
                    Continuation::Failed
                }
                _ => Continuation::Matched,
            },
            BlockTag::Paragraph | BlockTag::Table if blank => Continuation::Failed,
            _ => Continuation::Matched,
        }
    }

    /// Opens `tag` at `pos` under the innermost block able to hold it.
    fn add_child(&mut self, tag: BlockTag, pos: usize) -> BlockId {
        while self.open.len() > 1 && !self.doc.block(self.top()).tag.can_contain(tag) {
            self.finalize_top();
        }
        let parent = self.top();
        let id = self.doc.alloc_block(Block::new(tag, pos));
        self.doc.append_child(parent, id);
        self.open.push(id);
        self.opened_on_line.push(id);
        id
    }

    fn close_unmatched(&mut self, matched: usize, closed: &mut bool) {
        if *closed {
            return;
        }
        while self.open.len() > matched {
            self.finalize_top();
        }
        *closed = true;
    }

    fn extend(&mut self, id: BlockId, end: usize) {
        let block = self.doc.block_mut(id);
        if end > block.source_position {
            block.source_length = block.source_length.max(end - block.source_position);
        }
    }

    fn extend_open(&mut self, end: usize) {
        for idx in 1..self.open.len() {
            self.extend(self.open[idx], end);
        }
    }

    /// A blank line belongs to a block only when it carried that block's
    /// prefix (`>`) or opened it.
    fn extend_blank_line(&mut self, end: usize) {
        let deepest = self
            .open
            .iter()
            .rposition(|id| self.quote_on_line.contains(id) || self.opened_on_line.contains(id));
        if let Some(deepest) = deepest {
            for idx in 1..=deepest {
                self.extend(self.open[idx], end);
            }
        }
    }

    fn add_paragraph_line(&mut self, cur: &mut Cursor<'_>, line_end: usize) {
        cur.skip_whitespace();
        let span = Span::new(cur.pos(), cur.base + cur.s.len());
        if let LeafState::Paragraph { lines, .. } = &mut self.leaf {
            lines.push(ContentLine { span, line_end });
        }
    }

    fn add_raw_line(&mut self, cur: &Cursor<'_>, line_end: usize) {
        let rest = cur.rest();
        let mut extend = true;
        let mut ends = false;
        match &mut self.leaf {
            LeafState::Fence { literal, .. } => {
                literal.push_str(rest);
                literal.push('\n');
            }
            LeafState::IndentedCode { lines, .. } => {
                let blank = cur.is_blank();
                lines.push(CodeLine {
                    span: Span::new(cur.pos(), cur.base + cur.s.len()),
                    line_end,
                    blank,
                });
                // Trailing blank lines are not part of the block.
                extend = !blank;
            }
            LeafState::Html { kind, literal, .. } => {
                literal.push_str(rest);
                literal.push('\n');
                ends = kind.ends_on(rest);
            }
            LeafState::Paragraph { .. } | LeafState::None => return,
        }
        if extend {
            self.extend_open(line_end);
        }
        if ends {
            self.finalize_top();
        }
    }

    /// Alignments when `rest` is a delimiter row turning the one-line
    /// paragraph `paragraph` into a table header.
    fn table_delimiter(&self, paragraph: BlockId, rest: &str) -> Option<Vec<Alignment>> {
        let LeafState::Paragraph { id, lines } = &self.leaf else {
            return None;
        };
        if *id != paragraph || lines.len() != 1 {
            return None;
        }
        let header = &self.text[lines[0].span.start..lines[0].span.end];
        if !Table::has_separator(header) {
            return None;
        }
        let alignments = Table::delimiter_row(rest)?;
        (alignments.len() == Table::cells(header).len()).then_some(alignments)
    }

    fn open_table(&mut self, id: BlockId, alignments: Vec<Alignment>) {
        let Some((_, lines)) = self.take_paragraph() else {
            return;
        };
        let block = self.doc.block_mut(id);
        block.tag = BlockTag::Table;
        block.alignments = alignments;
        let header = lines[0];
        let text = self.text;
        self.add_table_row(
            id,
            header.span.start,
            &text[header.span.start..header.span.end],
            header.line_end,
        );
    }

    fn add_table_row(&mut self, table: BlockId, base: usize, line: &str, line_end: usize) {
        let mut row = Block::new(BlockTag::TableRow, base);
        row.source_length = line_end - base;
        let row = self.doc.alloc_block(row);
        self.doc.append_child(table, row);

        let columns = self.doc.block(table).alignments.len();
        for local in Table::cells(line).into_iter().take(columns) {
            let span = Span::new(base + local.start, base + local.end);
            let mut cell = Block::new(BlockTag::TableCell, span.start);
            cell.source_length = span.len();
            let cell = self.doc.alloc_block(cell);
            self.doc.append_child(row, cell);
            if !span.is_empty() {
                self.pending.push(PendingInlines {
                    block: cell,
                    lines: vec![ContentLine {
                        span,
                        line_end: span.end,
                    }],
                });
            }
        }
    }

    fn finalize_top(&mut self) {
        if self.open.len() <= 1 {
            return;
        }
        let Some(id) = self.open.pop() else {
            return;
        };
        if self.leaf.id() == Some(id) {
            let leaf = std::mem::replace(&mut self.leaf, LeafState::None);
            self.finalize_leaf(leaf);
        }
        if self.doc.block(id).tag == BlockTag::List {
            self.finalize_list(id);
        }
    }

    fn finalize_leaf(&mut self, leaf: LeafState) {
        match leaf {
            LeafState::None => {}
            LeafState::Paragraph { id, lines } => {
                let remaining = self.split_definitions(id, lines);
                if !remaining.is_empty() {
                    self.pending.push(PendingInlines {
                        block: id,
                        lines: remaining,
                    });
                }
            }
            LeafState::Fence { id, literal, .. } | LeafState::Html { id, literal, .. } => {
                self.doc.block_mut(id).literal = Some(TextSlice::owned(literal));
            }
            LeafState::IndentedCode { id, mut lines } => {
                while lines.last().is_some_and(|l| l.blank) {
                    lines.pop();
                }
                let mut literal = String::new();
                for line in &lines {
                    literal.push_str(&self.text[line.span.start..line.span.end]);
                    literal.push('\n');
                }
                let block = self.doc.block_mut(id);
                if let Some(last) = lines.last() {
                    block.source_length = last.line_end - block.source_position;
                }
                block.literal = Some(TextSlice::owned(literal));
            }
        }
    }

    /// Peels link reference definitions off the start of a closing paragraph.
    ///
    /// The definitions become one reference-definition block in front of the
    /// paragraph (or the paragraph itself when nothing else is left). Returns
    /// the lines still holding paragraph text.
    fn split_definitions(&mut self, id: BlockId, mut lines: Vec<ContentLine>) -> Vec<ContentLine> {
        let source = InlineSource::new(&self.shared, &lines);
        let text = source.text.as_str();
        let mut offset = 0;
        let mut labels = Vec::new();
        let mut definitions = Vec::new();
        while offset < text.len() {
            let Some(def) = ReferenceDefinition::parse(&text[offset..]) else {
                break;
            };
            let label = normalize_label(&def.label);
            let reference = Reference {
                url: def.url,
                title: def.title,
            };
            definitions.push((label.clone(), reference.clone()));
            if self.doc.references.insert(label.clone(), reference) {
                labels.push(label);
            } else {
                log::warn!(
                    "duplicate link reference definition [{}] ignored",
                    def.label
                );
            }
            offset += def.consumed;
        }
        if offset == 0 {
            return lines;
        }

        let consumed_lines = if offset >= text.len() {
            lines.len()
        } else {
            text[..offset].matches('\n').count()
        };
        if consumed_lines >= lines.len() {
            let block = self.doc.block_mut(id);
            block.tag = BlockTag::ReferenceDefinition;
            block.reference_labels = labels;
            block.definitions = definitions;
            return Vec::new();
        }

        let start = self.doc.block(id).source_position;
        let mut definitions_block = Block::new(BlockTag::ReferenceDefinition, start);
        definitions_block.source_length = lines[consumed_lines - 1].line_end - start;
        definitions_block.reference_labels = labels;
        definitions_block.definitions = definitions;
        let definitions_id = self.doc.alloc_block(definitions_block);
        self.doc.insert_block_before(id, definitions_id);

        let rest_start = lines[consumed_lines].span.start;
        let block = self.doc.block_mut(id);
        let end = block.source_position + block.source_length;
        block.source_position = rest_start;
        block.source_length = end - rest_start;
        lines.split_off(consumed_lines)
    }

    /// A list is loose when any two of its items, or any two children of one
    /// item, are separated by a blank line.
    fn finalize_list(&mut self, id: BlockId) {
        let items: Vec<BlockId> = self.doc.children(id).collect();
        let mut tight = true;
        for (idx, &item) in items.iter().enumerate() {
            if items
                .get(idx + 1)
                .is_some_and(|&next| self.blank_between(item, next))
            {
                tight = false;
                break;
            }
            let children: Vec<BlockId> = self.doc.children(item).collect();
            if children.windows(2).any(|w| self.blank_between(w[0], w[1])) {
                tight = false;
                break;
            }
        }
        for block in std::iter::once(id).chain(items) {
            if let Some(data) = self.doc.block_mut(block).list_data.as_mut() {
                data.tight = tight;
            }
        }
    }

    fn blank_between(&self, a: BlockId, b: BlockId) -> bool {
        let end = self.doc.block(a).source_span().end;
        let start = self.doc.block(b).source_position;
        start > end && self.text[end..start].contains(['\n', '\r'])
    }
}
