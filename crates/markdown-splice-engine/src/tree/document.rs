use super::block::{Block, BlockId, BlockTag};
use super::inline::{Inline, InlineId, InlineParent};
use super::references::ReferenceMap;
use crate::settings::ParseSettings;

/// A parsed document: an arena of blocks and inlines, the editable source
/// buffer their positions refer to, and the reference map.
///
/// Nodes detached by a rewrite stay in the arena but are no longer reachable
/// from the root.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    pub(crate) inlines: Vec<Inline>,
    pub(crate) root: BlockId,
    pub(crate) source: Option<String>,
    pub(crate) references: ReferenceMap,
    pub(crate) settings: ParseSettings,
}

impl Document {
    pub(crate) fn new(source: Option<String>, settings: ParseSettings) -> Self {
        let mut root = Block::new(BlockTag::Document, 0);
        root.source_length = source.as_ref().map_or(0, String::len);
        Self {
            blocks: vec![root],
            inlines: Vec::new(),
            root: BlockId(0),
            source,
            references: ReferenceMap::default(),
            settings,
        }
    }

    pub fn root(&self) -> BlockId {
        self.root
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn inline(&self, id: InlineId) -> &Inline {
        &self.inlines[id.index()]
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }

    pub(crate) fn inline_mut(&mut self, id: InlineId) -> &mut Inline {
        &mut self.inlines[id.index()]
    }

    pub(crate) fn alloc_block(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(block);
        id
    }

    pub(crate) fn alloc_inline(&mut self, inline: Inline) -> InlineId {
        let id = InlineId(self.inlines.len() as u32);
        self.inlines.push(inline);
        id
    }

    /// Blocks and inlines held by the arena, detached ones included.
    pub fn arena_len(&self) -> (usize, usize) {
        (self.blocks.len(), self.inlines.len())
    }

    /// Drops nodes detached by earlier edits and renumbers the reachable ones
    /// in document order. Ids taken before the call are invalid afterwards.
    pub fn compact(&mut self) {
        let blocks = self.descendants(self.root);
        let inlines: Vec<InlineId> = blocks
            .iter()
            .flat_map(|&block| self.inline_descendants(block))
            .collect();

        let mut block_ids = vec![None; self.blocks.len()];
        for (new, old) in blocks.iter().enumerate() {
            block_ids[old.index()] = Some(BlockId(new as u32));
        }
        let mut inline_ids = vec![None; self.inlines.len()];
        for (new, old) in inlines.iter().enumerate() {
            inline_ids[old.index()] = Some(InlineId(new as u32));
        }
        let block_id = |id: Option<BlockId>| id.and_then(|id| block_ids[id.index()]);
        let inline_id = |id: Option<InlineId>| id.and_then(|id| inline_ids[id.index()]);

        let compacted_blocks: Vec<Block> = blocks
            .iter()
            .map(|&id| {
                let mut block = self.blocks[id.index()].clone();
                block.parent = block_id(block.parent);
                block.first_child = block_id(block.first_child);
                block.last_child = block_id(block.last_child);
                block.next_sibling = block_id(block.next_sibling);
                block.prev_sibling = block_id(block.prev_sibling);
                block.inline_content = inline_id(block.inline_content);
                block
            })
            .collect();
        let compacted_inlines: Vec<Inline> = inlines
            .iter()
            .map(|&id| {
                let mut inline = self.inlines[id.index()].clone();
                inline.parent = inline.parent.and_then(|parent| match parent {
                    InlineParent::Block(b) => block_id(Some(b)).map(InlineParent::Block),
                    InlineParent::Inline(i) => inline_id(Some(i)).map(InlineParent::Inline),
                });
                inline.first_child = inline_id(inline.first_child);
                inline.next_sibling = inline_id(inline.next_sibling);
                inline.prev_sibling = inline_id(inline.prev_sibling);
                inline
            })
            .collect();

        log::debug!(
            "compacted arena from {}/{} to {}/{} blocks/inlines",
            self.blocks.len(),
            self.inlines.len(),
            compacted_blocks.len(),
            compacted_inlines.len()
        );
        self.root = BlockId(0);
        self.blocks = compacted_blocks;
        self.inlines = compacted_inlines;
    }

    /// The source buffer, present when the document was parsed with position tracking.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn references(&self) -> &ReferenceMap {
        &self.references
    }

    /// Derives label ownership from the reachable reference definitions.
    ///
    /// The first definition of a label in document order owns it. Returns the
    /// map those owners produce and, for every reachable definition block,
    /// the labels it owns in source order.
    pub(crate) fn bind_references(&self) -> (ReferenceMap, Vec<(BlockId, Vec<String>)>) {
        let mut map = ReferenceMap::default();
        let mut owners = Vec::new();
        for id in self.descendants(self.root) {
            let block = self.block(id);
            if block.tag != BlockTag::ReferenceDefinition {
                continue;
            }
            let mut owned = Vec::new();
            for (label, reference) in &block.definitions {
                if map.insert(label.clone(), reference.clone()) {
                    owned.push(label.clone());
                }
            }
            owners.push((id, owned));
        }
        (map, owners)
    }

    pub fn settings(&self) -> &ParseSettings {
        &self.settings
    }

    /// The equivalent source text of a block: the buffer slice its span covers.
    pub fn block_text(&self, id: BlockId) -> Option<&str> {
        let span = self.block(id).source_span();
        self.source()?.get(span.start..span.end)
    }

    /// The equivalent source text of an inline.
    pub fn inline_text(&self, id: InlineId) -> Option<&str> {
        let span = self.inline(id).source_span();
        self.source()?.get(span.start..span.end)
    }

    /// Appends `child` as the last child of `parent`.
    pub(crate) fn append_child(&mut self, parent: BlockId, child: BlockId) {
        let last = self.block(parent).last_child;
        {
            let node = self.block_mut(child);
            node.parent = Some(parent);
            node.prev_sibling = last;
            node.next_sibling = None;
        }
        match last {
            Some(last) => self.block_mut(last).next_sibling = Some(child),
            None => self.block_mut(parent).first_child = Some(child),
        }
        self.block_mut(parent).last_child = Some(child);
    }

    /// Links `node` into the sibling chain immediately before `sibling`.
    pub(crate) fn insert_block_before(&mut self, sibling: BlockId, node: BlockId) {
        let parent = self.block(sibling).parent;
        let prev = self.block(sibling).prev_sibling;
        {
            let n = self.block_mut(node);
            n.parent = parent;
            n.prev_sibling = prev;
            n.next_sibling = Some(sibling);
        }
        self.block_mut(sibling).prev_sibling = Some(node);
        match prev {
            Some(prev) => self.block_mut(prev).next_sibling = Some(node),
            None => {
                if let Some(parent) = parent {
                    self.block_mut(parent).first_child = Some(node);
                }
            }
        }
    }

    /// Iterates the direct children of a block.
    pub fn children(&self, id: BlockId) -> BlockSiblings<'_> {
        BlockSiblings {
            doc: self,
            next: self.block(id).first_child,
        }
    }

    /// Iterates the top-level inlines of a block.
    pub fn inlines(&self, id: BlockId) -> InlineSiblings<'_> {
        InlineSiblings {
            doc: self,
            next: self.block(id).inline_content,
        }
    }

    /// Iterates `first` and the siblings that follow it.
    pub(crate) fn inline_siblings_from(&self, first: InlineId) -> InlineSiblings<'_> {
        InlineSiblings {
            doc: self,
            next: Some(first),
        }
    }

    /// Iterates the direct children of an inline.
    pub fn inline_children(&self, id: InlineId) -> InlineSiblings<'_> {
        InlineSiblings {
            doc: self,
            next: self.inline(id).first_child,
        }
    }

    /// All blocks under and including `id`, in document order.
    pub fn descendants(&self, id: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let mut children: Vec<BlockId> = self.children(current).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// All inlines of a block's content, nested ones included, in document order.
    pub fn inline_descendants(&self, id: BlockId) -> Vec<InlineId> {
        let mut out = Vec::new();
        let mut stack: Vec<InlineId> = self.inlines(id).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let mut children: Vec<InlineId> = self.inline_children(current).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// The block whose content an inline belongs to, following nested parents.
    pub fn owning_block(&self, id: InlineId) -> Option<BlockId> {
        let mut current = id;
        loop {
            match self.inline(current).parent? {
                InlineParent::Block(block) => return Some(block),
                InlineParent::Inline(parent) => current = parent,
            }
        }
    }

    /// True when the block is linked into the tree under the root.
    pub fn is_block_attached(&self, id: BlockId) -> bool {
        let mut current = id;
        while let Some(parent) = self.block(current).parent {
            current = parent;
        }
        current == self.root
    }

    pub fn is_inline_attached(&self, id: InlineId) -> bool {
        self.owning_block(id)
            .is_some_and(|block| self.is_block_attached(block))
    }
}

pub struct BlockSiblings<'a> {
    doc: &'a Document,
    next: Option<BlockId>,
}

impl Iterator for BlockSiblings<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<BlockId> {
        let current = self.next?;
        self.next = self.doc.block(current).next_sibling;
        Some(current)
    }
}

pub struct InlineSiblings<'a> {
    doc: &'a Document,
    next: Option<InlineId>,
}

impl Iterator for InlineSiblings<'_> {
    type Item = InlineId;

    fn next(&mut self) -> Option<InlineId> {
        let current = self.next?;
        self.next = self.doc.inline(current).next_sibling;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc_with_children(n: usize) -> (Document, Vec<BlockId>) {
        let mut doc = Document::new(Some(String::new()), ParseSettings::default());
        let root = doc.root();
        let ids = (0..n)
            .map(|i| {
                let id = doc.alloc_block(Block::new(BlockTag::Paragraph, i));
                doc.append_child(root, id);
                id
            })
            .collect();
        (doc, ids)
    }

    #[test]
    fn append_links_both_directions() {
        let (doc, ids) = doc_with_children(3);
        let root = doc.root();
        assert_eq!(doc.children(root).collect::<Vec<_>>(), ids);
        assert_eq!(doc.block(ids[1]).previous_sibling(), Some(ids[0]));
        assert_eq!(doc.block(ids[1]).next_sibling(), Some(ids[2]));
        assert_eq!(doc.block(root).last_child(), Some(ids[2]));
    }

    #[test]
    fn insert_before_first_child_updates_parent() {
        let (mut doc, ids) = doc_with_children(2);
        let new = doc.alloc_block(Block::new(BlockTag::ReferenceDefinition, 0));
        doc.insert_block_before(ids[0], new);
        let root = doc.root();
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![new, ids[0], ids[1]]);
        assert_eq!(doc.block(new).parent(), Some(root));
    }

    #[test]
    fn detached_block_is_not_attached() {
        let (mut doc, ids) = doc_with_children(1);
        assert!(doc.is_block_attached(ids[0]));
        doc.block_mut(ids[0]).parent = None;
        assert!(!doc.is_block_attached(ids[0]));
    }

    #[test]
    fn text_requires_a_buffer() {
        let doc = Document::new(None, ParseSettings::default());
        assert_eq!(doc.block_text(doc.root()), None);
    }
}
