use crate::tree::{BlockId, BlockTag, Document, InlineId};

use super::error::RewriteError;
use super::fixup::resolve_references;
use super::rewrite::{Rewrite, Rewriter, Visit};
use super::splice::{remove_block, remove_inline, replace_block, replace_inline};

/// Runs a rewrite pass over the tree under `root`, then the reference fixup.
///
/// Blocks are visited in preorder; each block's inline content is walked
/// right after its own hook. A replacement is visited in place of the node
/// it replaced, so its children and siblings are walked too. After a
/// removal the walk continues with the removed node's former next sibling.
pub fn visit<R: Rewriter + ?Sized>(
    doc: &mut Document,
    root: BlockId,
    rewriter: &mut R,
) -> Result<(), RewriteError> {
    let node = doc.block(root);
    if node.parent.is_some() || node.tag != BlockTag::Document {
        return Err(RewriteError::Precondition(format!(
            "{root:?} is not a document root"
        )));
    }
    if doc.source.is_none() {
        return Err(RewriteError::Precondition(
            "document has no source buffer; parse with track_source_position".into(),
        ));
    }

    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let next = doc.block(id).next_sibling;
        log::trace!(
            "visit {:?} {:?} at {}",
            doc.block(id).tag,
            id,
            doc.block(id).source_position
        );
        let current = match rewriter.on_block(Visit { doc: &*doc, id })? {
            Rewrite::Keep => id,
            Rewrite::Remove if id == root => {
                return Err(RewriteError::Precondition(
                    "the document root cannot be removed".into(),
                ));
            }
            Rewrite::Replace(_) if id == root => {
                return Err(RewriteError::Precondition(
                    "the document root cannot be replaced".into(),
                ));
            }
            Rewrite::Remove => {
                remove_block(doc, id)?;
                stack.extend(next);
                continue;
            }
            Rewrite::Replace(fragment) => replace_block(doc, id, fragment)?,
        };

        stack.extend(doc.block(current).next_sibling);
        stack.extend(doc.block(current).first_child);
        walk_inlines(doc, current, rewriter)?;
    }

    resolve_references(doc)
}

/// Runs [`visit`] from the document root.
///
/// Replaced and removed nodes stay in the document's arena, so a long-lived
/// document grows with every pass. Call [`Document::compact`] between passes
/// to reclaim them once no caller holds node ids.
pub fn rewrite<R: Rewriter + ?Sized>(doc: &mut Document, rewriter: &mut R) -> Result<(), RewriteError> {
    let root = doc.root();
    visit(doc, root, rewriter)
}

fn walk_inlines<R: Rewriter + ?Sized>(
    doc: &mut Document,
    block: BlockId,
    rewriter: &mut R,
) -> Result<(), RewriteError> {
    let mut stack: Vec<InlineId> = doc.block(block).inline_content.into_iter().collect();
    while let Some(id) = stack.pop() {
        let next = doc.inline(id).next_sibling;
        log::trace!(
            "visit {:?} {:?} at {}",
            doc.inline(id).tag,
            id,
            doc.inline(id).source_position
        );
        let current = match rewriter.on_inline(Visit { doc: &*doc, id })? {
            Rewrite::Keep => id,
            Rewrite::Remove => {
                remove_inline(doc, id)?;
                stack.extend(next);
                continue;
            }
            Rewrite::Replace(fragment) => replace_inline(doc, id, fragment)?,
        };
        stack.extend(doc.inline(current).next_sibling);
        stack.extend(doc.inline(current).first_child);
    }
    Ok(())
}
