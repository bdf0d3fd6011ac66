use crate::text::Span;

/// `#`-prefixed headings.
pub struct AtxHeading;

impl AtxHeading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Returns the level and the byte range of the heading text within
    /// `rest`, with the optional closing `#` sequence removed.
    pub fn open(rest: &str) -> Option<(u8, Span)> {
        let b = rest.as_bytes();
        let level = b.iter().take_while(|&&c| c == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        if level < b.len() && b[level] != b' ' && b[level] != b'\t' {
            return None;
        }

        let mut start = level;
        while start < b.len() && matches!(b[start], b' ' | b'\t') {
            start += 1;
        }
        let mut end = b.len();
        while end > start && matches!(b[end - 1], b' ' | b'\t') {
            end -= 1;
        }
        let mut closing = end;
        while closing > start && b[closing - 1] == Self::MARKER {
            closing -= 1;
        }
        if closing < end {
            if closing == start {
                end = start;
            } else if matches!(b[closing - 1], b' ' | b'\t') {
                end = closing;
                while end > start && matches!(b[end - 1], b' ' | b'\t') {
                    end -= 1;
                }
            }
        }
        Some((level as u8, Span::new(start, end)))
    }
}

/// Underlined headings: a paragraph followed by a line of `=` or `-`.
pub struct SetextHeading;

impl SetextHeading {
    /// Returns the heading level for an underline line.
    pub fn underline(rest: &str) -> Option<u8> {
        let t = rest.trim_end();
        if t.is_empty() {
            return None;
        }
        if t.bytes().all(|b| b == b'=') {
            Some(1)
        } else if t.bytes().all(|b| b == b'-') {
            Some(2)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# foo", Some((1, "foo")))]
    #[case("###   bar baz  ", Some((3, "bar baz")))]
    #[case("## foo ##", Some((2, "foo")))]
    #[case("# foo#", Some((1, "foo#")))]
    #[case("### ###", Some((3, "")))]
    #[case("#", Some((1, "")))]
    #[case("#foo", None)]
    #[case("####### seven", None)]
    fn atx_headings(#[case] input: &str, #[case] expected: Option<(u8, &str)>) {
        let got = AtxHeading::open(input).map(|(level, sp)| (level, &input[sp.start..sp.end]));
        assert_eq!(got, expected);
    }

    #[rstest]
    #[case("===", Some(1))]
    #[case("---  ", Some(2))]
    #[case("- -", None)]
    #[case("=-", None)]
    fn setext_underlines(#[case] input: &str, #[case] expected: Option<u8>) {
        assert_eq!(SetextHeading::underline(input), expected);
    }
}
