//! Structural edits that keep the source buffer and every node span in step.
//!
//! Each edit replaces one node's span `[s, e)` in the buffer. Nodes after the
//! span move by the length delta, nodes covering it grow or shrink by the
//! delta, and nodes before it are untouched. Only the later siblings of the
//! edited node and of each of its ancestors can lie after the span, so the
//! walk visits exactly those subtrees and the ancestor chain.

use crate::text::Span;
use crate::tree::{BlockId, BlockTag, Document, InlineId, InlineParent};

use super::error::{RewriteError, violation};
use super::fragment::{BlockFragment, InlineFragment};
use super::placement::{Placement, classify};

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Block(BlockId),
    Inline(InlineId),
}

/// Removes a block and its subtree from the tree and its text from the buffer.
pub fn remove_block(doc: &mut Document, id: BlockId) -> Result<(), RewriteError> {
    check_editable(doc)?;
    if doc.block(id).parent.is_none() {
        return Err(RewriteError::Precondition(
            "cannot remove a block without a parent".into(),
        ));
    }
    let edit = doc.block(id).source_span();
    log::debug!("remove {:?} {:?} [{}..{}]", doc.block(id).tag, id, edit.start, edit.end);

    let defines = defines_references(doc, id);
    propagate(doc, Anchor::Block(id), edit, -signed(edit.len()))?;
    unlink_block(doc, id);
    splice(doc, edit, "")?;
    if defines {
        rebind_labels(doc, None);
    }
    check_buffer_length(doc)
}

/// Removes an inline and its children.
pub fn remove_inline(doc: &mut Document, id: InlineId) -> Result<(), RewriteError> {
    check_editable(doc)?;
    let edit = doc.inline(id).source_span();
    log::debug!("remove {:?} {:?} [{}..{}]", doc.inline(id).tag, id, edit.start, edit.end);

    propagate(doc, Anchor::Inline(id), edit, -signed(edit.len()))?;
    unlink_inline(doc, id);
    splice(doc, edit, "")?;
    check_buffer_length(doc)
}

/// Replaces a block with a fragment. Returns the id of the adopted block.
pub fn replace_block(
    doc: &mut Document,
    old: BlockId,
    fragment: BlockFragment,
) -> Result<BlockId, RewriteError> {
    check_editable(doc)?;
    if doc.block(old).parent.is_none() {
        return Err(RewriteError::Precondition(
            "cannot replace a block without a parent".into(),
        ));
    }
    let edit = doc.block(old).source_span();
    let new_text = fragment.text().to_string();
    log::debug!(
        "replace {:?} {:?} [{}..{}] with {:?} ({} bytes)",
        doc.block(old).tag,
        old,
        edit.start,
        edit.end,
        fragment.block().tag,
        new_text.len()
    );

    let shift = signed(edit.start) - signed(fragment.block().source_position);
    let new = adopt_block(doc, &fragment.doc, fragment.node, shift)?;
    link_block_in_place_of(doc, old, new);

    let delta = signed(new_text.len()) - signed(edit.len());
    propagate(doc, Anchor::Block(new), edit, delta)?;
    splice(doc, edit, &new_text)?;

    if defines_references(doc, old) || defines_references(doc, new) {
        rebind_labels(doc, Some(new));
    }

    if doc.block_text(new) != Some(new_text.as_str()) {
        return Err(violation(format!(
            "replacement {new:?} does not read back as its fragment text"
        )));
    }
    if doc.is_block_attached(old) {
        return Err(violation(format!("replaced block {old:?} is still reachable")));
    }
    check_buffer_length(doc)?;
    Ok(new)
}

/// Replaces an inline with a fragment. Returns the id of the adopted inline.
pub fn replace_inline(
    doc: &mut Document,
    old: InlineId,
    fragment: InlineFragment,
) -> Result<InlineId, RewriteError> {
    check_editable(doc)?;
    let Some(parent) = doc.inline(old).parent else {
        return Err(RewriteError::Precondition(
            "cannot replace an inline without a parent".into(),
        ));
    };
    let edit = doc.inline(old).source_span();
    let new_text = fragment.text().to_string();
    log::debug!(
        "replace {:?} {:?} [{}..{}] with {:?} ({} bytes)",
        doc.inline(old).tag,
        old,
        edit.start,
        edit.end,
        fragment.inline().tag,
        new_text.len()
    );

    let shift = signed(edit.start) - signed(fragment.inline().source_position);
    let new = adopt_inline(doc, &fragment.doc, fragment.node, parent, shift)?;
    link_inline_in_place_of(doc, old, new);

    let delta = signed(new_text.len()) - signed(edit.len());
    propagate(doc, Anchor::Inline(new), edit, delta)?;
    splice(doc, edit, &new_text)?;

    if doc.inline_text(new) != Some(new_text.as_str()) {
        return Err(violation(format!(
            "replacement {new:?} does not read back as its fragment text"
        )));
    }
    if doc.is_inline_attached(old) {
        return Err(violation(format!("replaced inline {old:?} is still reachable")));
    }
    check_buffer_length(doc)?;
    Ok(new)
}

fn check_editable(doc: &Document) -> Result<(), RewriteError> {
    if doc.source.is_none() {
        return Err(RewriteError::Precondition(
            "document has no source buffer; parse with track_source_position".into(),
        ));
    }
    Ok(())
}

fn signed(n: usize) -> isize {
    n as isize
}

fn offset(pos: usize, delta: isize) -> Result<usize, RewriteError> {
    pos.checked_add_signed(delta)
        .ok_or_else(|| violation(format!("position {pos} moved by {delta} falls below zero")))
}

/// Shifts the nodes after `edit` and resizes the nodes covering it, walking
/// from the edited node up to the root.
fn propagate(
    doc: &mut Document,
    start: Anchor,
    edit: Span,
    delta: isize,
) -> Result<(), RewriteError> {
    if delta == 0 {
        return Ok(());
    }
    let mut current = start;
    loop {
        current = match current {
            Anchor::Inline(id) => {
                let mut next = doc.inline(id).next_sibling;
                while let Some(sibling) = next {
                    expect_after(doc.inline(sibling).source_span(), edit, sibling)?;
                    shift_inline_subtree(doc, sibling, delta)?;
                    next = doc.inline(sibling).next_sibling;
                }
                match doc.inline(id).parent {
                    Some(InlineParent::Inline(parent)) => {
                        let node = doc.inline_mut(parent);
                        expect_covers(node.source_span(), edit, parent)?;
                        node.source_length = offset(node.source_length, delta)?;
                        Anchor::Inline(parent)
                    }
                    Some(InlineParent::Block(block)) => {
                        resize_block(doc, block, edit, delta)?;
                        Anchor::Block(block)
                    }
                    None => return Err(violation(format!("inline {id:?} has no parent"))),
                }
            }
            Anchor::Block(id) => {
                let mut next = doc.block(id).next_sibling;
                while let Some(sibling) = next {
                    expect_after(doc.block(sibling).source_span(), edit, sibling)?;
                    shift_block_subtree(doc, sibling, delta)?;
                    next = doc.block(sibling).next_sibling;
                }
                match doc.block(id).parent {
                    Some(parent) => {
                        resize_block(doc, parent, edit, delta)?;
                        Anchor::Block(parent)
                    }
                    None => return Ok(()),
                }
            }
        };
    }
}

fn resize_block(
    doc: &mut Document,
    id: BlockId,
    edit: Span,
    delta: isize,
) -> Result<(), RewriteError> {
    let node = doc.block_mut(id);
    expect_covers(node.source_span(), edit, id)?;
    node.source_length = offset(node.source_length, delta)?;
    Ok(())
}

fn expect_after(span: Span, edit: Span, node: impl std::fmt::Debug) -> Result<(), RewriteError> {
    match classify(span, edit) {
        Placement::After => Ok(()),
        placement => Err(violation(format!(
            "{node:?} at [{}..{}] follows the edit [{}..{}] but is {placement:?}",
            span.start, span.end, edit.start, edit.end
        ))),
    }
}

fn expect_covers(span: Span, edit: Span, node: impl std::fmt::Debug) -> Result<(), RewriteError> {
    if span.contains(edit) {
        Ok(())
    } else {
        Err(violation(format!(
            "{node:?} at [{}..{}] encloses the edit [{}..{}] but does not cover it",
            span.start, span.end, edit.start, edit.end
        )))
    }
}

fn shift_block_subtree(doc: &mut Document, id: BlockId, delta: isize) -> Result<(), RewriteError> {
    for block in doc.descendants(id) {
        let node = doc.block_mut(block);
        node.source_position = offset(node.source_position, delta)?;
        for inline in doc.inline_descendants(block) {
            let node = doc.inline_mut(inline);
            node.source_position = offset(node.source_position, delta)?;
        }
    }
    Ok(())
}

fn shift_inline_subtree(doc: &mut Document, id: InlineId, delta: isize) -> Result<(), RewriteError> {
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        let node = doc.inline_mut(current);
        node.source_position = offset(node.source_position, delta)?;
        stack.extend(doc.inline_children(current));
    }
    Ok(())
}

fn splice(doc: &mut Document, edit: Span, text: &str) -> Result<(), RewriteError> {
    let source = doc
        .source
        .as_mut()
        .ok_or_else(|| violation("source buffer disappeared during an edit"))?;
    if edit.end > source.len()
        || !source.is_char_boundary(edit.start)
        || !source.is_char_boundary(edit.end)
    {
        return Err(violation(format!(
            "edit [{}..{}] does not fit the {}-byte buffer",
            edit.start,
            edit.end,
            source.len()
        )));
    }
    source.replace_range(edit.start..edit.end, text);
    Ok(())
}

fn check_buffer_length(doc: &Document) -> Result<(), RewriteError> {
    let buffer = doc.source.as_ref().map_or(0, String::len);
    let root = doc.block(doc.root).source_length;
    if buffer != root {
        return Err(violation(format!(
            "root spans {root} bytes but the buffer holds {buffer}"
        )));
    }
    Ok(())
}

fn unlink_block(doc: &mut Document, id: BlockId) {
    let (parent, prev, next) = {
        let node = doc.block(id);
        (node.parent, node.prev_sibling, node.next_sibling)
    };
    match prev {
        Some(prev) => doc.block_mut(prev).next_sibling = next,
        None => {
            if let Some(parent) = parent {
                doc.block_mut(parent).first_child = next;
            }
        }
    }
    match next {
        Some(next) => doc.block_mut(next).prev_sibling = prev,
        None => {
            if let Some(parent) = parent {
                doc.block_mut(parent).last_child = prev;
            }
        }
    }
    let node = doc.block_mut(id);
    node.parent = None;
    node.prev_sibling = None;
    node.next_sibling = None;
}

fn unlink_inline(doc: &mut Document, id: InlineId) {
    let (parent, prev, next) = {
        let node = doc.inline(id);
        (node.parent, node.prev_sibling, node.next_sibling)
    };
    match prev {
        Some(prev) => doc.inline_mut(prev).next_sibling = next,
        None => match parent {
            Some(InlineParent::Block(block)) => doc.block_mut(block).inline_content = next,
            Some(InlineParent::Inline(inline)) => doc.inline_mut(inline).first_child = next,
            None => {}
        },
    }
    if let Some(next) = next {
        doc.inline_mut(next).prev_sibling = prev;
    }
    let node = doc.inline_mut(id);
    node.parent = None;
    node.prev_sibling = None;
    node.next_sibling = None;
}

fn link_block_in_place_of(doc: &mut Document, old: BlockId, new: BlockId) {
    let (parent, prev, next) = {
        let node = doc.block(old);
        (node.parent, node.prev_sibling, node.next_sibling)
    };
    {
        let node = doc.block_mut(new);
        node.parent = parent;
        node.prev_sibling = prev;
        node.next_sibling = next;
    }
    match prev {
        Some(prev) => doc.block_mut(prev).next_sibling = Some(new),
        None => {
            if let Some(parent) = parent {
                doc.block_mut(parent).first_child = Some(new);
            }
        }
    }
    match next {
        Some(next) => doc.block_mut(next).prev_sibling = Some(new),
        None => {
            if let Some(parent) = parent {
                doc.block_mut(parent).last_child = Some(new);
            }
        }
    }
    let node = doc.block_mut(old);
    node.parent = None;
    node.prev_sibling = None;
    node.next_sibling = None;
}

fn link_inline_in_place_of(doc: &mut Document, old: InlineId, new: InlineId) {
    let (parent, prev, next) = {
        let node = doc.inline(old);
        (node.parent, node.prev_sibling, node.next_sibling)
    };
    {
        let node = doc.inline_mut(new);
        node.parent = parent;
        node.prev_sibling = prev;
        node.next_sibling = next;
    }
    match prev {
        Some(prev) => doc.inline_mut(prev).next_sibling = Some(new),
        None => match parent {
            Some(InlineParent::Block(block)) => doc.block_mut(block).inline_content = Some(new),
            Some(InlineParent::Inline(inline)) => doc.inline_mut(inline).first_child = Some(new),
            None => {}
        },
    }
    if let Some(next) = next {
        doc.inline_mut(next).prev_sibling = Some(new);
    }
    let node = doc.inline_mut(old);
    node.parent = None;
    node.prev_sibling = None;
    node.next_sibling = None;
}

/// Copies a fragment block and its subtree into `doc`, moving every position by `shift`.
fn adopt_block(
    doc: &mut Document,
    fragment: &Document,
    id: BlockId,
    shift: isize,
) -> Result<BlockId, RewriteError> {
    let source = fragment.block(id);
    let mut block = source.clone();
    block.parent = None;
    block.first_child = None;
    block.last_child = None;
    block.next_sibling = None;
    block.prev_sibling = None;
    block.inline_content = None;
    block.source_position = offset(source.source_position, shift)?;
    let new = doc.alloc_block(block);

    for child in fragment.children(id) {
        let adopted = adopt_block(doc, fragment, child, shift)?;
        doc.append_child(new, adopted);
    }
    if let Some(first) = source.inline_content {
        let run = adopt_inline_run(doc, fragment, first, InlineParent::Block(new), shift)?;
        doc.block_mut(new).inline_content = Some(run);
    }
    Ok(new)
}

fn adopt_inline(
    doc: &mut Document,
    fragment: &Document,
    id: InlineId,
    parent: InlineParent,
    shift: isize,
) -> Result<InlineId, RewriteError> {
    let source = fragment.inline(id);
    let mut inline = source.clone();
    inline.parent = Some(parent);
    inline.first_child = None;
    inline.next_sibling = None;
    inline.prev_sibling = None;
    inline.source_position = offset(source.source_position, shift)?;
    let new = doc.alloc_inline(inline);

    if let Some(first) = source.first_child {
        let run = adopt_inline_run(doc, fragment, first, InlineParent::Inline(new), shift)?;
        doc.inline_mut(new).first_child = Some(run);
    }
    Ok(new)
}

fn adopt_inline_run(
    doc: &mut Document,
    fragment: &Document,
    first: InlineId,
    parent: InlineParent,
    shift: isize,
) -> Result<InlineId, RewriteError> {
    let mut head = None;
    let mut prev: Option<InlineId> = None;
    for id in fragment.inline_siblings_from(first) {
        let adopted = adopt_inline(doc, fragment, id, parent, shift)?;
        doc.inline_mut(adopted).prev_sibling = prev;
        match prev {
            Some(prev) => doc.inline_mut(prev).next_sibling = Some(adopted),
            None => head = Some(adopted),
        }
        prev = Some(adopted);
    }
    head.ok_or_else(|| violation("empty inline run in fragment"))
}

fn defines_references(doc: &Document, id: BlockId) -> bool {
    doc.descendants(id)
        .into_iter()
        .any(|block| doc.block(block).tag == BlockTag::ReferenceDefinition)
}

/// Recomputes label ownership after a reference definition left or joined
/// the tree. A removed owner hands its label to the next definition of it in
/// document order; an adopted definition takes over labels it now precedes.
fn rebind_labels(doc: &mut Document, adopted: Option<BlockId>) {
    let (references, owners) = doc.bind_references();
    for (label, _) in doc.references.iter() {
        if references.get_normalized(label).is_none() {
            log::debug!("deregister reference [{label}]");
        }
    }
    for (label, reference) in references.iter() {
        if doc.references.get_normalized(label) != Some(reference) {
            log::debug!("register reference [{label}] -> {}", reference.url);
        }
    }
    for (block, labels) in owners {
        doc.block_mut(block).reference_labels = labels;
    }
    if let Some(adopted) = adopted {
        for block in doc.descendants(adopted) {
            let node = doc.block(block);
            for (label, _) in &node.definitions {
                if !node.reference_labels.contains(label) {
                    log::warn!("reference [{label}] is already defined; keeping the earlier definition");
                }
            }
        }
    }
    doc.references = references;
}
