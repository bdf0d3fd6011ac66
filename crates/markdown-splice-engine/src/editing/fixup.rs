use crate::text::TextSlice;
use crate::tree::{Document, InlineId};

use super::error::RewriteError;

/// Points every reachable reference link at its definition's current target.
///
/// Runs after a rewrite pass, so links adopted from fragments pick up
/// definitions from the document and links whose definition was removed fail.
pub fn resolve_references(doc: &mut Document) -> Result<(), RewriteError> {
    let cited: Vec<InlineId> = doc
        .descendants(doc.root())
        .into_iter()
        .flat_map(|block| doc.inline_descendants(block))
        .filter(|&inline| doc.inline(inline).reference_label.is_some())
        .collect();

    for id in cited {
        let Some(label) = doc.inline(id).reference_label.clone() else {
            continue;
        };
        let Some(reference) = doc.references.get_normalized(&label) else {
            return Err(RewriteError::DanglingReference { label });
        };
        let url = reference.url.clone();
        let title = reference.title.clone();
        log::trace!("resolve [{label}] -> {url}");

        let node = doc.inline_mut(id);
        node.target_url = Some(url);
        node.literal = title.map(TextSlice::owned).unwrap_or_default();
    }
    Ok(())
}
