//! HTML output of parsed and rewritten documents.

use markdown_splice_engine::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn html(text: &str) -> String {
    let doc = parse_document(text, &ParseSettings::default());
    render_html(&doc, &RenderSettings::default())
}

#[rstest]
#[case::paragraph("hello\n", "<p>hello</p>\n")]
#[case::heading("## Two\n", "<h2>Two</h2>\n")]
#[case::setext("One\n===\n", "<h1>One</h1>\n")]
#[case::rule("---\n", "<hr />\n")]
#[case::strong("**b**\n", "<p><strong>b</strong></p>\n")]
#[case::strike("~~s~~\n", "<p><del>s</del></p>\n")]
#[case::escaped("a &amp; \\*b\\*\n", "<p>a &amp; *b*</p>\n")]
#[case::inline_link("[x](/u \"t\")\n", "<p><a href=\"/u\" title=\"t\">x</a></p>\n")]
#[case::image("![alt](/i.png)\n", "<p><img src=\"/i.png\" alt=\"alt\" /></p>\n")]
#[case::hard_break("a  \nb\n", "<p>a<br />\nb</p>\n")]
#[case::tight_list("- a\n- b\n", "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n")]
#[case::ordered("2. a\n", "<ol start=\"2\">\n<li>a</li>\n</ol>\n")]
#[case::quote("> q\n", "<blockquote>\n<p>q</p>\n</blockquote>\n")]
#[case::fence(
    "```rust\nfn x() {}\n```\n",
    "<pre><code class=\"language-rust\">fn x() {}\n</code></pre>\n"
)]
#[case::html_block("<div>\nhi\n</div>\n", "<div>\nhi\n</div>\n")]
#[case::definition_only("[a]: /b\n", "")]
fn renders(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(html(input), expected);
}

#[test]
fn loose_list_wraps_items_in_paragraphs() {
    assert_eq!(
        html("- a\n\n- b\n"),
        "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n"
    );
}

#[test]
fn tables_render_head_and_body() {
    let out = html("| a | b |\n|:--|---|\n| 1 |\n");
    assert!(out.starts_with("<table>"));
    assert!(out.contains("<thead>"));
    assert!(out.contains("<tbody>"));
    assert_eq!(out.matches("<th").count() - out.matches("<thead").count(), 2);
    assert_eq!(out.matches("<td").count(), 2);
}

#[test]
fn crlf_newlines_apply_to_all_output() {
    let doc = parse_document("# A\n\nb\nc\n", &ParseSettings::default());
    let settings = RenderSettings {
        newline: Newline::CrLf,
    };
    assert_eq!(
        render_html(&doc, &settings),
        "<h1>A</h1>\r\n<p>b\r\nc</p>\r\n"
    );
}

struct RemoveQuotes;

impl Rewriter for RemoveQuotes {
    fn visit_block_quote(&mut self, _node: BlockVisit<'_>) -> Result<BlockRewrite, RewriteError> {
        Ok(Rewrite::Remove)
    }
}

#[rstest]
#[case::lf(Newline::Lf, "<p>foo</p>\n<p>bar</p>\n")]
#[case::crlf(Newline::CrLf, "<p>foo</p>\r\n<p>bar</p>\r\n")]
fn removed_quote_leaves_surrounding_paragraphs(#[case] newline: Newline, #[case] expected: &str) {
    let mut doc = parse_document(
        "\nfoo\n\n>**something**\n>\n> ---\n>\n> *else*\nis it?\n\nbar\n",
        &ParseSettings::default(),
    );
    rewrite(&mut doc, &mut RemoveQuotes).unwrap();
    assert_eq!(render_html(&doc, &RenderSettings { newline }), expected);
}

struct Upcase;

impl Rewriter for Upcase {
    fn visit_text(&mut self, node: InlineVisit<'_>) -> Result<InlineRewrite, RewriteError> {
        let upper = node.text().to_uppercase();
        if node.node().parent_inline().is_none() || upper == node.text() {
            return Ok(Rewrite::Keep);
        }
        Ok(Rewrite::Replace(make_inline(&upper)?))
    }
}

#[test]
fn rendering_reflects_rewrites() {
    let mut doc = parse_document("say *hello* and **bye**\n", &ParseSettings::default());
    rewrite(&mut doc, &mut Upcase).unwrap();
    assert_eq!(doc.source(), Some("say *HELLO* and **BYE**\n"));
    assert_eq!(
        render_html(&doc, &RenderSettings::default()),
        "<p>say <em>HELLO</em> and <strong>BYE</strong></p>\n"
    );
}
