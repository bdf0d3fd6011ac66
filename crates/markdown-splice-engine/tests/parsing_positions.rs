//! Every parsed node's span reads back as its own source text.

use markdown_splice_engine::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parse(text: &str) -> Document {
    parse_document(text, &ParseSettings::default())
}

fn tags_and_text(doc: &Document, id: BlockId) -> Vec<(BlockTag, String)> {
    doc.children(id)
        .map(|child| {
            let text = doc.block_text(child).unwrap_or_default().to_string();
            (doc.block(child).tag(), text)
        })
        .collect()
}

#[rstest]
#[case::atx("# Title\n", BlockTag::AtxHeading, "# Title\n")]
#[case::setext("Title\n===\n", BlockTag::SetextHeading, "Title\n===\n")]
#[case::rule("***\n", BlockTag::ThematicBreak, "***\n")]
#[case::fence("```rust\nfn x() {}\n```\n", BlockTag::FencedCode, "```rust\nfn x() {}\n```\n")]
#[case::indented("    code\n", BlockTag::IndentedCode, "code\n")]
#[case::html("<div>\nhi\n</div>\n", BlockTag::HtmlBlock, "<div>\nhi\n</div>\n")]
#[case::definition("[a]: /b\n", BlockTag::ReferenceDefinition, "[a]: /b\n")]
#[case::no_trailing_newline("tail", BlockTag::Paragraph, "tail")]
fn single_block_spans(#[case] text: &str, #[case] tag: BlockTag, #[case] expected: &str) {
    let doc = parse(text);
    assert_eq!(
        tags_and_text(&doc, doc.root()),
        vec![(tag, expected.to_string())]
    );
    assert_eq!(check_invariants(&doc), Ok(()));
}

#[test]
fn blank_lines_belong_to_no_child() {
    let doc = parse("\n\none\n\n\ntwo\n\n");
    assert_eq!(
        tags_and_text(&doc, doc.root()),
        vec![
            (BlockTag::Paragraph, "one\n".to_string()),
            (BlockTag::Paragraph, "two\n".to_string()),
        ]
    );
    assert_eq!(doc.block(doc.root()).source_length(), 13);
}

#[test]
fn block_starts_after_container_prefixes() {
    let doc = parse(">  > inner\n");
    let outer = doc.children(doc.root()).next().unwrap();
    let inner = doc.children(outer).next().unwrap();
    let para = doc.children(inner).next().unwrap();
    assert_eq!(doc.block_text(outer), Some(">  > inner\n"));
    assert_eq!(doc.block_text(inner), Some("> inner\n"));
    assert_eq!(doc.block_text(para), Some("inner\n"));
}

#[test]
fn lists_record_kind_and_tightness() {
    let doc = parse("3. a\n4. b\n\n- c\n\n- d\n");
    let lists: Vec<BlockId> = doc.children(doc.root()).collect();
    assert_eq!(lists.len(), 2);

    let ordered = doc.block(lists[0]).list_data().unwrap();
    assert!(ordered.is_ordered());
    assert!(ordered.tight);
    assert_eq!(doc.block_text(lists[0]), Some("3. a\n4. b\n"));

    let bullet = doc.block(lists[1]).list_data().unwrap();
    assert!(!bullet.is_ordered());
    assert!(!bullet.tight);
    assert_eq!(doc.block_text(lists[1]), Some("- c\n\n- d\n"));
}

#[test]
fn definitions_split_from_the_paragraph_they_start() {
    let doc = parse("[a]: /x\n[b]: /y\ntext\n");
    assert_eq!(
        tags_and_text(&doc, doc.root()),
        vec![
            (BlockTag::ReferenceDefinition, "[a]: /x\n[b]: /y\n".to_string()),
            (BlockTag::Paragraph, "text\n".to_string()),
        ]
    );
    let definition = doc.children(doc.root()).next().unwrap();
    assert_eq!(doc.block(definition).reference_labels(), ["a", "b"]);
}

#[test]
fn tables_have_rows_and_cells() {
    let doc = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
    let table = doc.children(doc.root()).next().unwrap();
    assert_eq!(doc.block(table).tag(), BlockTag::Table);
    assert_eq!(doc.children(table).count(), 2);
    let body = doc.children(table).nth(1).unwrap();
    let cells: Vec<&str> = doc
        .children(body)
        .map(|cell| {
            let text = doc.inlines(cell).next().unwrap();
            doc.inline_text(text).unwrap()
        })
        .collect();
    assert_eq!(cells, vec!["1", "2"]);
    assert_eq!(check_invariants(&doc), Ok(()));
}

#[test]
fn multibyte_text_keeps_byte_spans() {
    let doc = parse("héllo *wörld*\n");
    let para = doc.children(doc.root()).next().unwrap();
    let emphasis = doc.inlines(para).nth(1).unwrap();
    assert_eq!(doc.inline_text(emphasis), Some("*wörld*"));
    assert_eq!(doc.inline(emphasis).source_position(), 7);
}
