use super::span::Span;

/// A reference to a single line of the source with its byte span.
#[derive(Debug, Clone, Copy)]
pub struct LineRef<'a> {
    /// Byte span of this line (includes the line ending if present).
    pub span: Span,
    /// The line text, line ending included.
    pub text: &'a str,
}

impl<'a> LineRef<'a> {
    /// The line without its `\n` / `\r\n` / `\r` ending.
    pub fn content(&self) -> &'a str {
        self.text.trim_end_matches(['\n', '\r'])
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Line endings are kept so that the spans of consecutive lines tile the
/// whole input; block spans end after the newline of their last line.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = LineRef<'_>> + '_ {
    let bytes = text.as_bytes();
    let mut offset = 0usize;
    std::iter::from_fn(move || {
        if offset >= bytes.len() {
            return None;
        }
        let start = offset;
        let mut end = start;
        while end < bytes.len() && bytes[end] != b'\n' && bytes[end] != b'\r' {
            end += 1;
        }
        if end < bytes.len() {
            if bytes[end] == b'\r' && bytes.get(end + 1) == Some(&b'\n') {
                end += 2;
            } else {
                end += 1;
            }
        }
        offset = end;
        Some(LineRef {
            span: Span { start, end },
            text: &text[start..end],
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_tile_the_input() {
        let text = "a\n\nbc\r\nd";
        let lines: Vec<_> = lines_with_spans(text).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].span, Span::new(0, 2));
        assert_eq!(lines[1].span, Span::new(2, 3));
        assert_eq!(lines[2].span, Span::new(3, 7));
        assert_eq!(lines[2].content(), "bc");
        assert_eq!(lines[3].span, Span::new(7, 8));
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert_eq!(lines_with_spans("").count(), 0);
    }
}
