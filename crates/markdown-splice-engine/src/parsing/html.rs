//! HTML tag grammar shared by HTML blocks and inline raw HTML.

use std::sync::OnceLock;

use regex::Regex;

const TAG_NAME: &str = r"[A-Za-z][A-Za-z0-9-]*";
const ATTRIBUTE: &str =
    r#"(?:\s+[A-Za-z_:][A-Za-z0-9_.:-]*(?:\s*=\s*(?:[^\s"'=<>`]+|'[^']*'|"[^"]*"))?)"#;

fn open_tag() -> String {
    format!(r"<{TAG_NAME}{ATTRIBUTE}*\s*/?>")
}

fn closing_tag() -> String {
    format!(r"</{TAG_NAME}\s*>")
}

static INLINE_HTML_REGEX: OnceLock<Regex> = OnceLock::new();
static COMPLETE_TAG_LINE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Raw inline HTML at the start of the input: a tag, comment, processing
/// instruction, declaration or CDATA section.
pub fn inline_html_len(s: &str) -> Option<usize> {
    let re = INLINE_HTML_REGEX.get_or_init(|| {
        let pattern = format!(
            r"^(?s:{}|{}|<!-->|<!--->|<!--.*?-->|<\?.*?\?>|<![A-Za-z][^>]*>|<!\[CDATA\[.*?\]\]>)",
            open_tag(),
            closing_tag()
        );
        Regex::new(&pattern).expect("Invalid inline HTML regex")
    });
    re.find(s).map(|m| m.end())
}

/// A line consisting of one complete open or closing tag and nothing else.
pub fn is_complete_tag_line(s: &str) -> bool {
    let re = COMPLETE_TAG_LINE_REGEX.get_or_init(|| {
        let pattern = format!(r"^(?:{}|{})[ \t]*$", open_tag(), closing_tag());
        Regex::new(&pattern).expect("Invalid HTML tag regex")
    });
    re.is_match(s)
}
