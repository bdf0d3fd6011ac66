//! HTML output for a parsed or rewritten document.
//!
//! The tree is turned into `pulldown-cmark` events and written with its
//! HTML pusher; link targets come from the nodes, which the rewrite pass's
//! reference fixup keeps current.

pub mod events;
pub mod writer;

pub use events::document_events;
pub use writer::HtmlTextWriter;

use crate::settings::RenderSettings;
use crate::tree::Document;

pub fn render_html(doc: &Document, settings: &RenderSettings) -> String {
    let events = document_events(doc);
    log::trace!("rendering {} events", events.len());

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events.into_iter());

    let mut writer = HtmlTextWriter::new(settings.newline);
    writer.write_constant(&html);
    writer.ensure_line();
    writer.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use crate::settings::{Newline, ParseSettings};
    use pretty_assertions::assert_eq;

    fn html(text: &str) -> String {
        let doc = parse_document(text, &ParseSettings::default());
        render_html(&doc, &RenderSettings::default())
    }

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(
            html("# Hi\n\nSome *text* and `code`.\n"),
            "<h1>Hi</h1>\n<p>Some <em>text</em> and <code>code</code>.</p>\n"
        );
    }

    #[test]
    fn reference_links_use_the_definition() {
        assert_eq!(
            html("[x][r]\n\n[r]: /u \"T\"\n"),
            "<p><a href=\"/u\" title=\"T\">x</a></p>\n"
        );
    }

    #[test]
    fn crlf_output() {
        let doc = parse_document("a\nb\n", &ParseSettings::default());
        let settings = RenderSettings {
            newline: Newline::CrLf,
        };
        assert_eq!(render_html(&doc, &settings), "<p>a\r\nb</p>\r\n");
    }

    #[test]
    fn empty_document_renders_nothing() {
        assert_eq!(html(""), "");
    }
}
