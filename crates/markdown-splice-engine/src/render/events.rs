use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Tag, TagEnd};

use crate::tree::{Alignment, BlockId, BlockTag, Document, InlineId, InlineTag, ListKind};

/// Converts the tree under the document root into a `pulldown-cmark` event stream.
///
/// Text borrows from the tree, so the events live as long as the document.
pub fn document_events(doc: &Document) -> Vec<Event<'_>> {
    let mut out = Vec::new();
    for child in doc.children(doc.root()) {
        block_events(doc, child, false, &mut out);
    }
    out
}

fn block_events<'a>(doc: &'a Document, id: BlockId, tight: bool, out: &mut Vec<Event<'a>>) {
    let node = doc.block(id);
    match node.tag() {
        BlockTag::Document => {
            for child in doc.children(id) {
                block_events(doc, child, false, out);
            }
        }
        BlockTag::Paragraph if tight => inline_run(doc, id, out),
        BlockTag::Paragraph => {
            out.push(Event::Start(Tag::Paragraph));
            inline_run(doc, id, out);
            out.push(Event::End(TagEnd::Paragraph));
        }
        BlockTag::AtxHeading | BlockTag::SetextHeading => {
            let level = heading_level(node.heading_level());
            out.push(Event::Start(Tag::Heading {
                level,
                id: None,
                classes: Vec::new(),
                attrs: Vec::new(),
            }));
            inline_run(doc, id, out);
            out.push(Event::End(TagEnd::Heading(level)));
        }
        BlockTag::BlockQuote => {
            out.push(Event::Start(Tag::BlockQuote(None)));
            for child in doc.children(id) {
                block_events(doc, child, false, out);
            }
            out.push(Event::End(TagEnd::BlockQuote(None)));
        }
        BlockTag::List => {
            let (start, ordered) = match node.list_data().map(|data| data.kind) {
                Some(ListKind::Ordered { start, .. }) => (Some(start), true),
                _ => (None, false),
            };
            out.push(Event::Start(Tag::List(start)));
            for child in doc.children(id) {
                block_events(doc, child, false, out);
            }
            out.push(Event::End(TagEnd::List(ordered)));
        }
        BlockTag::ListItem => {
            let tight = node
                .parent()
                .and_then(|list| doc.block(list).list_data())
                .is_some_and(|data| data.tight);
            out.push(Event::Start(Tag::Item));
            for child in doc.children(id) {
                block_events(doc, child, tight, out);
            }
            out.push(Event::End(TagEnd::Item));
        }
        BlockTag::FencedCode => {
            let info = node.info().unwrap_or_default();
            out.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                CowStr::Borrowed(info),
            ))));
            code_text(node.literal(), out);
            out.push(Event::End(TagEnd::CodeBlock));
        }
        BlockTag::IndentedCode => {
            out.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Indented)));
            code_text(node.literal(), out);
            out.push(Event::End(TagEnd::CodeBlock));
        }
        BlockTag::HtmlBlock => {
            out.push(Event::Start(Tag::HtmlBlock));
            if let Some(html) = node.literal() {
                out.push(Event::Html(CowStr::Borrowed(html)));
            }
            out.push(Event::End(TagEnd::HtmlBlock));
        }
        BlockTag::ThematicBreak => out.push(Event::Rule),
        BlockTag::ReferenceDefinition => {}
        BlockTag::Table => table_events(doc, id, out),
        // Rows and cells are written by their table.
        BlockTag::TableRow | BlockTag::TableCell => {}
    }
}

fn code_text<'a>(literal: Option<&'a str>, out: &mut Vec<Event<'a>>) {
    if let Some(text) = literal.filter(|text| !text.is_empty()) {
        out.push(Event::Text(CowStr::Borrowed(text)));
    }
}

/// The first row is the header. Rows are padded with empty cells to the
/// column count and cut at it.
fn table_events<'a>(doc: &'a Document, id: BlockId, out: &mut Vec<Event<'a>>) {
    let alignments: Vec<pulldown_cmark::Alignment> = doc
        .block(id)
        .alignments()
        .iter()
        .map(|alignment| match alignment {
            Alignment::None => pulldown_cmark::Alignment::None,
            Alignment::Left => pulldown_cmark::Alignment::Left,
            Alignment::Center => pulldown_cmark::Alignment::Center,
            Alignment::Right => pulldown_cmark::Alignment::Right,
        })
        .collect();
    let columns = alignments.len();
    out.push(Event::Start(Tag::Table(alignments)));

    for (index, row) in doc.children(id).enumerate() {
        let (start, end) = if index == 0 {
            (Tag::TableHead, TagEnd::TableHead)
        } else {
            (Tag::TableRow, TagEnd::TableRow)
        };
        out.push(Event::Start(start));
        let mut written = 0;
        for cell in doc.children(row).take(columns) {
            out.push(Event::Start(Tag::TableCell));
            inline_run(doc, cell, out);
            out.push(Event::End(TagEnd::TableCell));
            written += 1;
        }
        for _ in written..columns {
            out.push(Event::Start(Tag::TableCell));
            out.push(Event::End(TagEnd::TableCell));
        }
        out.push(Event::End(end));
    }
    out.push(Event::End(TagEnd::Table));
}

fn heading_level(level: u8) -> HeadingLevel {
    match level {
        0 | 1 => HeadingLevel::H1,
        2 => HeadingLevel::H2,
        3 => HeadingLevel::H3,
        4 => HeadingLevel::H4,
        5 => HeadingLevel::H5,
        _ => HeadingLevel::H6,
    }
}

fn inline_run<'a>(doc: &'a Document, block: BlockId, out: &mut Vec<Event<'a>>) {
    for inline in doc.inlines(block) {
        inline_events(doc, inline, out);
    }
}

fn inline_children<'a>(doc: &'a Document, id: InlineId, out: &mut Vec<Event<'a>>) {
    for child in doc.inline_children(id) {
        inline_events(doc, child, out);
    }
}

fn inline_events<'a>(doc: &'a Document, id: InlineId, out: &mut Vec<Event<'a>>) {
    let node = doc.inline(id);
    match node.tag() {
        InlineTag::Text => out.push(Event::Text(CowStr::Borrowed(node.literal()))),
        InlineTag::SoftBreak => out.push(Event::SoftBreak),
        InlineTag::LineBreak => out.push(Event::HardBreak),
        InlineTag::Code => out.push(Event::Code(CowStr::Borrowed(node.literal()))),
        InlineTag::RawHtml => out.push(Event::InlineHtml(CowStr::Borrowed(node.literal()))),
        InlineTag::Emphasis => {
            out.push(Event::Start(Tag::Emphasis));
            inline_children(doc, id, out);
            out.push(Event::End(TagEnd::Emphasis));
        }
        InlineTag::Strong => {
            out.push(Event::Start(Tag::Strong));
            inline_children(doc, id, out);
            out.push(Event::End(TagEnd::Strong));
        }
        InlineTag::Strikethrough => {
            out.push(Event::Start(Tag::Strikethrough));
            inline_children(doc, id, out);
            out.push(Event::End(TagEnd::Strikethrough));
        }
        InlineTag::Link => {
            out.push(Event::Start(Tag::Link {
                link_type: link_type(node.reference_label()),
                dest_url: CowStr::Borrowed(node.target_url().unwrap_or_default()),
                title: CowStr::Borrowed(node.title().unwrap_or_default()),
                id: CowStr::Borrowed(node.reference_label().unwrap_or_default()),
            }));
            inline_children(doc, id, out);
            out.push(Event::End(TagEnd::Link));
        }
        InlineTag::Image => {
            out.push(Event::Start(Tag::Image {
                link_type: link_type(node.reference_label()),
                dest_url: CowStr::Borrowed(node.target_url().unwrap_or_default()),
                title: CowStr::Borrowed(node.title().unwrap_or_default()),
                id: CowStr::Borrowed(node.reference_label().unwrap_or_default()),
            }));
            inline_children(doc, id, out);
            out.push(Event::End(TagEnd::Image));
        }
    }
}

fn link_type(label: Option<&str>) -> LinkType {
    match label {
        Some(_) => LinkType::Reference,
        None => LinkType::Inline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use crate::settings::ParseSettings;
    use pretty_assertions::assert_eq;

    fn events(text: &str) -> Vec<String> {
        let doc = parse_document(text, &ParseSettings::default());
        document_events(&doc)
            .into_iter()
            .map(|event| format!("{event:?}"))
            .collect()
    }

    #[test]
    fn tight_list_items_skip_paragraphs() {
        let tight = events("- a\n- b\n");
        assert!(!tight.iter().any(|e| e.contains("Paragraph")));
        let loose = events("- a\n\n- b\n");
        assert_eq!(loose.iter().filter(|e| e.contains("Start(Paragraph)")).count(), 2);
    }

    #[test]
    fn definitions_produce_no_events() {
        assert_eq!(events("[a]: /x\n"), Vec::<String>::new());
    }

    #[test]
    fn short_table_rows_are_padded() {
        let doc = parse_document("| a | b |\n|---|---|\n| 1 |\n", &ParseSettings::default());
        let cells = document_events(&doc)
            .iter()
            .filter(|e| matches!(e, Event::Start(Tag::TableCell)))
            .count();
        assert_eq!(cells, 4);
    }
}
