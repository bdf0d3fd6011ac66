//! # Parsing
//!
//! Source text to arena tree. Blocks are built line by line first, then the
//! queued content of every paragraph, heading and table cell is parsed into
//! inlines against the finished reference map.

pub mod blocks;
pub mod escape;
pub mod html;
pub mod inline;

use crate::settings::ParseSettings;
use crate::text::lines_with_spans;
use crate::tree::{BlockId, Document, Inline, InlineId, InlineParent};

use blocks::{BlockBuilder, BuiltBlocks};
use inline::{InlineContext, InlineNode, InlineSource, parse_inlines};

/// Parses `text` into a document.
///
/// Every node records its absolute byte span in `text`. With
/// `track_source_position` the document also keeps `text` as its editable
/// buffer; without it the tree cannot be rewritten.
pub fn parse_document(text: &str, settings: &ParseSettings) -> Document {
    parse_document_with(text, settings, false)
}

/// Parses `text`, optionally keeping full and collapsed references with
/// unknown labels as links whose target is filled in later.
pub(crate) fn parse_document_with(
    text: &str,
    settings: &ParseSettings,
    defer_unresolved: bool,
) -> Document {
    let mut builder = BlockBuilder::new(text, settings);
    for line in lines_with_spans(text) {
        builder.push(&line);
    }
    let BuiltBlocks {
        mut doc,
        shared,
        pending,
    } = builder.finish();

    for item in pending {
        let source = InlineSource::new(&shared, &item.lines);
        let nodes = {
            let ctx = InlineContext {
                references: &doc.references,
                settings: &doc.settings,
                defer_unresolved,
            };
            parse_inlines(&source, &ctx)
        };
        attach_inlines(&mut doc, item.block, nodes);
    }
    log::trace!(
        "parsed {} bytes into {} blocks and {} inlines",
        text.len(),
        doc.blocks.len(),
        doc.inlines.len()
    );
    doc
}

/// Moves parsed inline nodes into the arena as the content run of `block`.
pub(crate) fn attach_inlines(doc: &mut Document, block: BlockId, nodes: Vec<InlineNode>) {
    let first = attach_run(doc, InlineParent::Block(block), nodes);
    doc.block_mut(block).inline_content = first;
}

fn attach_run(doc: &mut Document, parent: InlineParent, nodes: Vec<InlineNode>) -> Option<InlineId> {
    let mut first = None;
    let mut prev: Option<InlineId> = None;
    for node in nodes {
        let mut inline = Inline::new(node.tag, node.span);
        inline.literal = node.literal;
        inline.target_url = node.url;
        inline.reference_label = node.label;
        inline.parent = Some(parent);
        inline.prev_sibling = prev;
        let id = doc.alloc_inline(inline);
        match prev {
            Some(prev) => doc.inline_mut(prev).next_sibling = Some(id),
            None => first = Some(id),
        }
        let children = attach_run(doc, InlineParent::Inline(id), node.children);
        doc.inline_mut(id).first_child = children;
        prev = Some(id);
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{BlockTag, InlineTag};
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Document {
        parse_document(text, &ParseSettings::default())
    }

    fn child_tags(doc: &Document, id: BlockId) -> Vec<BlockTag> {
        doc.children(id).map(|c| doc.block(c).tag()).collect()
    }

    #[test]
    fn paragraph_and_heading() {
        let doc = parse("# Title\n\nSome *text*.\n");
        let root = doc.root();
        assert_eq!(child_tags(&doc, root), vec![BlockTag::AtxHeading, BlockTag::Paragraph]);
        let heading = doc.children(root).next().unwrap();
        assert_eq!(doc.block_text(heading), Some("# Title\n"));
        assert_eq!(doc.block(heading).heading_level(), 1);
        let para = doc.children(root).nth(1).unwrap();
        assert_eq!(doc.block_text(para), Some("Some *text*.\n"));
        let tags: Vec<InlineTag> = doc.inlines(para).map(|i| doc.inline(i).tag()).collect();
        assert_eq!(tags, vec![InlineTag::Text, InlineTag::Emphasis, InlineTag::Text]);
    }

    #[test]
    fn inline_spans_are_absolute() {
        let doc = parse("> a **b**\n");
        let quote = doc.children(doc.root()).next().unwrap();
        let para = doc.children(quote).next().unwrap();
        let strong = doc.inlines(para).nth(1).unwrap();
        assert_eq!(doc.inline(strong).tag(), InlineTag::Strong);
        assert_eq!(doc.inline_text(strong), Some("**b**"));
        assert_eq!(doc.inline(strong).parent_block(), Some(para));
        let inner = doc.inline_children(strong).next().unwrap();
        assert_eq!(doc.inline(inner).parent_inline(), Some(strong));
        assert_eq!(doc.inline_text(inner), Some("b"));
    }

    #[test]
    fn untracked_document_has_no_buffer() {
        let settings = ParseSettings {
            track_source_position: false,
            ..ParseSettings::default()
        };
        let doc = parse_document("text\n", &settings);
        assert_eq!(doc.source(), None);
        assert_eq!(doc.children(doc.root()).count(), 1);
    }

    #[test]
    fn references_resolve_across_the_document() {
        let doc = parse("[x][Ref]\n\n[ref]: /target \"T\"\n");
        let para = doc.children(doc.root()).next().unwrap();
        let link = doc.inlines(para).next().unwrap();
        assert_eq!(doc.inline(link).tag(), InlineTag::Link);
        assert_eq!(doc.inline(link).target_url(), Some("/target"));
        assert_eq!(doc.inline(link).title(), Some("T"));
        assert_eq!(doc.inline(link).reference_label(), Some("ref"));
    }
}
