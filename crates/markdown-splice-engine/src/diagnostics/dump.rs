use std::fmt::Write;

use crate::text::preview;
use crate::tree::{BlockId, Document, InlineId};

const PREVIEW_BYTES: usize = 24;

/// Renders the reachable tree as an indented outline, one node per line:
/// `Tag [start..end] "preview"`. Inlines are listed under their block.
///
/// Previews are omitted for documents without a source buffer.
pub fn dump(doc: &Document) -> String {
    let mut out = String::new();
    dump_block(doc, doc.root(), 0, &mut out);
    out
}

fn dump_block(doc: &Document, id: BlockId, depth: usize, out: &mut String) {
    let node = doc.block(id);
    line(out, depth, &format!("{:?}", node.tag()), node.source_span(), doc.block_text(id));
    for inline in doc.inlines(id) {
        dump_inline(doc, inline, depth + 1, out);
    }
    for child in doc.children(id) {
        dump_block(doc, child, depth + 1, out);
    }
}

fn dump_inline(doc: &Document, id: InlineId, depth: usize, out: &mut String) {
    let node = doc.inline(id);
    line(out, depth, &format!("{:?}", node.tag()), node.source_span(), doc.inline_text(id));
    for child in doc.inline_children(id) {
        dump_inline(doc, child, depth + 1, out);
    }
}

fn line(out: &mut String, depth: usize, tag: &str, span: crate::text::Span, text: Option<&str>) {
    let _ = write!(out, "{:indent$}{tag} [{}..{}]", "", span.start, span.end, indent = depth * 2);
    if let Some(text) = text {
        let _ = write!(out, " {:?}", preview(text, PREVIEW_BYTES));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use crate::settings::ParseSettings;

    #[test]
    fn outlines_blocks_and_inlines() {
        let doc = parse_document("# Hi\n\n> a *b*\n", &ParseSettings::default());
        insta::assert_snapshot!(dump(&doc), @r##"
        Document [0..14] "# Hi\n\n> a *b*\n"
          AtxHeading [0..5] "# Hi\n"
            Text [2..4] "Hi"
          BlockQuote [6..14] "> a *b*\n"
            Paragraph [8..14] "a *b*\n"
              Text [8..10] "a "
              Emphasis [10..13] "*b*"
                Text [11..12] "b"
        "##);
    }

    #[test]
    fn untracked_documents_have_no_previews() {
        let settings = ParseSettings {
            track_source_position: false,
            ..ParseSettings::default()
        };
        let doc = parse_document("x\n", &settings);
        insta::assert_snapshot!(dump(&doc), @r"
        Document [0..2]
          Paragraph [0..2]
            Text [0..1]
        ");
    }
}
