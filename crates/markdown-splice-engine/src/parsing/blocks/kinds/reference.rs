use crate::parsing::escape::unescape;
use crate::parsing::inline::kinds::{Link, parse_destination, parse_title};

/// Link reference definitions: `[label]: destination "optional title"`.
///
/// Definitions are only recognized at the start of a paragraph; the builder
/// peels them off one at a time when the paragraph closes.
pub struct ReferenceDefinition;

/// One parsed definition. `consumed` counts bytes of the joined paragraph
/// text, including the line ending of the definition's last line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDefinition {
    pub label: String,
    pub url: String,
    pub title: Option<String>,
    pub consumed: usize,
}

impl ReferenceDefinition {
    pub fn parse(text: &str) -> Option<ParsedDefinition> {
        let b = text.as_bytes();
        let mut i = 0;
        while i < 3 && b.get(i) == Some(&b' ') {
            i += 1;
        }
        let (label, after_label) = Link::parse_label(text, i)?;
        if label.trim().is_empty() || b.get(after_label) != Some(&b':') {
            return None;
        }
        i = skip_spaces_and_one_newline(b, after_label + 1);

        let (raw_url, after_dest) = parse_destination(text, i)?;
        let dest_line_end = line_end_after_spaces(b, after_dest);

        let title_start = skip_spaces_and_one_newline(b, after_dest);
        if title_start > after_dest {
            if let Some((raw_title, after_title)) = parse_title(text, title_start) {
                if let Some(end) = line_end_after_spaces(b, after_title) {
                    return Some(ParsedDefinition {
                        label: label.to_string(),
                        url: unescape(raw_url).into_owned(),
                        title: Some(unescape(raw_title).into_owned()),
                        consumed: end,
                    });
                }
            }
        }

        let end = dest_line_end?;
        Some(ParsedDefinition {
            label: label.to_string(),
            url: unescape(raw_url).into_owned(),
            title: None,
            consumed: end,
        })
    }
}

fn skip_spaces_and_one_newline(b: &[u8], mut i: usize) -> usize {
    while i < b.len() && matches!(b[i], b' ' | b'\t') {
        i += 1;
    }
    if i < b.len() && b[i] == b'\n' {
        i += 1;
        while i < b.len() && matches!(b[i], b' ' | b'\t') {
            i += 1;
        }
    }
    i
}

/// When only spaces remain on the line from `i`, the index after its line ending.
fn line_end_after_spaces(b: &[u8], mut i: usize) -> Option<usize> {
    while i < b.len() && matches!(b[i], b' ' | b'\t') {
        i += 1;
    }
    match b.get(i) {
        None => Some(i),
        Some(b'\n') => Some(i + 1),
        Some(_) => None,
    }
}
