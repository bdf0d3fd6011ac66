use crate::parsing::escape::unescape;

/// Link and image syntax: `[text](dest "title")`, `[text][label]`,
/// `[label][]` and `[label]`.
pub struct Link;

/// Destination and title of an inline link, unescaped, and the index after `)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineLinkTail {
    pub url: String,
    pub title: Option<String>,
    pub end: usize,
}

impl Link {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const IMAGE: u8 = b'!';
    pub const MAX_LABEL_LEN: usize = 999;

    /// Parses `(dest "title")` starting at `start`, which must hold `(`.
    pub fn parse_inline_tail(text: &str, start: usize) -> Option<InlineLinkTail> {
        let bytes = text.as_bytes();
        if bytes.get(start) != Some(&b'(') {
            return None;
        }
        let mut i = skip_whitespace(bytes, start + 1);
        if bytes.get(i) == Some(&b')') {
            return Some(InlineLinkTail {
                url: String::new(),
                title: None,
                end: i + 1,
            });
        }
        let (raw_url, after_dest) = parse_destination(text, i)?;
        i = skip_whitespace(bytes, after_dest);
        let mut title = None;
        if i > after_dest && matches!(bytes.get(i), Some(b'"' | b'\'' | b'(')) {
            let (raw_title, after_title) = parse_title(text, i)?;
            title = Some(unescape(raw_title).into_owned());
            i = skip_whitespace(bytes, after_title);
        }
        if bytes.get(i) != Some(&b')') {
            return None;
        }
        Some(InlineLinkTail {
            url: unescape(raw_url).into_owned(),
            title,
            end: i + 1,
        })
    }

    /// Parses `[label]` starting at `start`. Returns the raw label and the
    /// index after `]`. An empty label (`[]`) is returned as `""`.
    pub fn parse_label(text: &str, start: usize) -> Option<(&str, usize)> {
        let bytes = text.as_bytes();
        if bytes.get(start) != Some(&Self::OPEN) {
            return None;
        }
        let mut i = start + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'[' => return None,
                b']' => {
                    let label = &text[start + 1..i];
                    if label.len() > Self::MAX_LABEL_LEN {
                        return None;
                    }
                    return Some((label, i + 1));
                }
                _ => i += 1,
            }
        }
        None
    }
}

/// Skips spaces, tabs and line endings.
pub fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r') {
        i += 1;
    }
    i
}

/// Parses a link destination at `start`: `<...>` or a run of non-space
/// characters with balanced parentheses. Returns the raw destination and
/// the index after it.
pub fn parse_destination(text: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(start) == Some(&b'<') {
        let mut i = start + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if i + 1 < bytes.len() => i += 2,
                b'>' => return Some((&text[start + 1..i], i + 1)),
                b'<' | b'\n' | b'\r' => return None,
                _ => i += 1,
            }
        }
        return None;
    }
    let mut i = start;
    let mut depth = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_punctuation() {
            i += 2;
            continue;
        }
        if b.is_ascii_control() || b == b' ' {
            break;
        }
        if b == b'(' {
            depth += 1;
        } else if b == b')' {
            if depth == 0 {
                break;
            }
            depth -= 1;
        }
        i += 1;
    }
    if i == start || depth != 0 {
        return None;
    }
    Some((&text[start..i], i))
}

/// Parses a quoted or parenthesized title at `start`. Returns the raw title
/// and the index after the closing delimiter.
pub fn parse_title(text: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let close = match bytes.get(start)? {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut i = start + 1;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' && i + 1 < bytes.len() {
            i += 2;
            continue;
        }
        if b == close {
            return Some((&text[start + 1..i], i + 1));
        }
        if close == b')' && b == b'(' {
            return None;
        }
        if b == b'\n' && text[..i].ends_with("\n") {
            return None;
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("(/url)", "/url", None, 6)]
    #[case("(/url \"t\")", "/url", Some("t"), 10)]
    #[case("( <a b> 'x' )", "a b", Some("x"), 13)]
    #[case("(/a(b)c)", "/a(b)c", None, 8)]
    #[case("()", "", None, 2)]
    #[case("(\\(x)", "(x", None, 5)]
    fn inline_tails(
        #[case] input: &str,
        #[case] url: &str,
        #[case] title: Option<&str>,
        #[case] end: usize,
    ) {
        let tail = Link::parse_inline_tail(input, 0).unwrap();
        assert_eq!(tail.url, url);
        assert_eq!(tail.title.as_deref(), title);
        assert_eq!(tail.end, end);
    }

    #[rstest]
    #[case("(/url \"t\" x)")]
    #[case("(/a(b)")]
    #[case("(<a\nb>)")]
    fn rejects_bad_tails(#[case] input: &str) {
        assert_eq!(Link::parse_inline_tail(input, 0), None);
    }

    #[test]
    fn labels() {
        assert_eq!(Link::parse_label("[foo] x", 0), Some(("foo", 5)));
        assert_eq!(Link::parse_label("[]", 0), Some(("", 2)));
        assert_eq!(Link::parse_label("[a\\]b]", 0), Some(("a\\]b", 6)));
        assert_eq!(Link::parse_label("[a[b]", 0), None);
    }
}
