use crate::editing::RewriteError;
use crate::text::Span;
use crate::tree::{BlockId, Document, InlineId, InlineParent};

/// Verifies the structural and positional invariants of a document.
///
/// - the root spans the whole buffer
/// - every reachable node lies inside the buffer on character boundaries
/// - child spans lie inside their parent's span; siblings are ordered and
///   do not overlap; parent and sibling links agree in both directions
/// - every label is owned by its first reachable definition in document
///   order, the reference map holds exactly those owners' targets, and
///   every reference link's label is in it
///
/// Returns the first violation found.
pub fn check_invariants(doc: &Document) -> Result<(), RewriteError> {
    let len = match doc.source() {
        Some(source) => source.len(),
        None => doc.block(doc.root()).source_length(),
    };
    let root = doc.block(doc.root());
    if root.source_span() != Span::new(0, len) {
        return fail(format!(
            "root spans [{}..{}] but the buffer holds {len} bytes",
            root.source_span().start,
            root.source_span().end
        ));
    }

    for block in doc.descendants(doc.root()) {
        check_block(doc, block, len)?;
        let node = doc.block(block);
        if let Some(first) = node.inline_content() {
            check_inline_run(doc, first, InlineParent::Block(block), node.source_span(), len)?;
        }
    }

    let (expected, owners) = doc.bind_references();
    for (block, labels) in owners {
        let owned = doc.block(block).reference_labels();
        if owned != labels.as_slice() {
            return fail(format!(
                "{block:?} owns {owned:?} but its first definitions are {labels:?}"
            ));
        }
    }
    if let Some((label, _)) = doc
        .references()
        .iter()
        .find(|(label, reference)| expected.get_normalized(label) != Some(*reference))
    {
        return fail(format!("label [{label}] is mapped but no reachable definition backs it"));
    }
    if let Some((label, _)) = expected
        .iter()
        .find(|(label, _)| doc.references().get_normalized(label).is_none())
    {
        return fail(format!("label [{label}] is defined but missing from the reference map"));
    }
    Ok(())
}

fn fail(message: String) -> Result<(), RewriteError> {
    Err(RewriteError::InternalInvariantViolation(message))
}

fn check_span(
    doc: &Document,
    what: &dyn std::fmt::Debug,
    span: Span,
    len: usize,
) -> Result<(), RewriteError> {
    if span.end > len {
        return fail(format!(
            "{what:?} at [{}..{}] runs past the {len}-byte buffer",
            span.start, span.end
        ));
    }
    if let Some(source) = doc.source() {
        if !source.is_char_boundary(span.start) || !source.is_char_boundary(span.end) {
            return fail(format!(
                "{what:?} at [{}..{}] splits a character",
                span.start, span.end
            ));
        }
    }
    Ok(())
}

fn check_block(doc: &Document, id: BlockId, len: usize) -> Result<(), RewriteError> {
    let node = doc.block(id);
    let span = node.source_span();
    check_span(doc, &id, span, len)?;

    let mut prev: Option<BlockId> = None;
    for child in doc.children(id) {
        let child_node = doc.block(child);
        let child_span = child_node.source_span();
        if child_node.parent() != Some(id) {
            return fail(format!("{child:?} is linked under {id:?} but names another parent"));
        }
        if child_node.previous_sibling() != prev {
            return fail(format!("{child:?} has a stale previous-sibling link"));
        }
        if !span.contains(child_span) {
            return fail(format!(
                "{child:?} at [{}..{}] lies outside its parent {id:?} at [{}..{}]",
                child_span.start, child_span.end, span.start, span.end
            ));
        }
        if let Some(prev) = prev {
            let prev_span = doc.block(prev).source_span();
            if prev_span.end > child_span.start {
                return fail(format!(
                    "{prev:?} at [{}..{}] overlaps its next sibling {child:?} at [{}..{}]",
                    prev_span.start, prev_span.end, child_span.start, child_span.end
                ));
            }
        }
        prev = Some(child);
    }
    if node.last_child() != prev {
        return fail(format!("{id:?} has a stale last-child link"));
    }
    Ok(())
}

fn check_inline_run(
    doc: &Document,
    first: InlineId,
    parent: InlineParent,
    parent_span: Span,
    len: usize,
) -> Result<(), RewriteError> {
    let mut prev: Option<InlineId> = None;
    for id in doc.inline_siblings_from(first) {
        let node = doc.inline(id);
        let span = node.source_span();
        check_span(doc, &id, span, len)?;
        if node.parent() != Some(parent) {
            return fail(format!("{id:?} names the wrong parent"));
        }
        if node.previous_sibling() != prev {
            return fail(format!("{id:?} has a stale previous-sibling link"));
        }
        if !parent_span.contains(span) {
            return fail(format!(
                "{id:?} at [{}..{}] lies outside its parent at [{}..{}]",
                span.start, span.end, parent_span.start, parent_span.end
            ));
        }
        if let Some(prev) = prev {
            let prev_span = doc.inline(prev).source_span();
            if prev_span.end > span.start {
                return fail(format!("{prev:?} overlaps its next sibling {id:?}"));
            }
        }
        if let Some(label) = node.reference_label() {
            if doc.references().get_normalized(label).is_none() {
                return Err(RewriteError::DanglingReference {
                    label: label.to_string(),
                });
            }
        }
        if let Some(child) = node.first_child() {
            check_inline_run(doc, child, InlineParent::Inline(id), span, len)?;
        }
        prev = Some(id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use crate::settings::ParseSettings;
    use rstest::rstest;

    #[rstest]
    #[case::empty("")]
    #[case::nested("> - a\n>   - b *c*\n\n```\ncode\n```\n")]
    #[case::lazy("> quote\nlazy\n\nafter\n")]
    #[case::references("[x][r] and [r]\n\n[r]: /u\n[R]: /dup\n")]
    #[case::table("| a | b |\n|---|---|\n| 1 | **2** |\n")]
    fn parsed_documents_hold(#[case] text: &str) {
        let doc = parse_document(text, &ParseSettings::default());
        assert_eq!(check_invariants(&doc), Ok(()));
    }

    #[test]
    fn detects_a_stretched_child() {
        let mut doc = parse_document("a\n\nb\n", &ParseSettings::default());
        let first = doc.children(doc.root()).next().unwrap();
        doc.block_mut(first).source_length = 4;
        assert!(matches!(
            check_invariants(&doc),
            Err(RewriteError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn detects_a_label_held_by_a_later_duplicate() {
        let mut doc = parse_document("[r]: /a\n\n[r]: /b\n", &ParseSettings::default());
        let blocks: Vec<BlockId> = doc.children(doc.root()).collect();
        doc.block_mut(blocks[0]).reference_labels.clear();
        doc.block_mut(blocks[1]).reference_labels.push("r".into());
        assert!(matches!(
            check_invariants(&doc),
            Err(RewriteError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn detects_an_orphaned_label() {
        let mut doc = parse_document("[r]: /u\n", &ParseSettings::default());
        let definition = doc.children(doc.root()).next().unwrap();
        doc.block_mut(definition).reference_labels.clear();
        assert!(check_invariants(&doc).is_err());
    }
}
