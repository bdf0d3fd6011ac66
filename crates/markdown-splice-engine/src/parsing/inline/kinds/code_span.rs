/// Code span inline type with owned delimiter constant.
///
/// Code spans are "raw zones": no other inline parsing occurs inside them.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// Finds the closing run for an opening run of `run_len` backticks that
    /// ends at `from`. Returns the index of the closing run.
    pub fn find_close(bytes: &[u8], from: usize, run_len: usize) -> Option<usize> {
        let mut i = from;
        while i < bytes.len() {
            if bytes[i] == Self::TICK {
                let close_len = run_length(bytes, i, Self::TICK);
                if close_len == run_len {
                    return Some(i);
                }
                i += close_len;
                continue;
            }
            i += 1;
        }
        None
    }

    /// Normalizes code span content: line endings become spaces and one
    /// surrounding space is stripped when present on both sides.
    pub fn normalize(raw: &str) -> String {
        let content = raw.replace('\n', " ");
        if content.len() >= 2
            && content.starts_with(' ')
            && content.ends_with(' ')
            && content.bytes().any(|b| b != b' ')
        {
            content[1..content.len() - 1].to_string()
        } else {
            content
        }
    }
}

/// Length of the run of `needle` bytes starting at `start`.
pub fn run_length(bytes: &[u8], start: usize, needle: u8) -> usize {
    bytes[start..].iter().take_while(|&&b| b == needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn finds_matching_run_only() {
        let bytes = b"``a`b``";
        assert_eq!(CodeSpan::find_close(bytes, 2, 2), Some(5));
        assert_eq!(CodeSpan::find_close(b"`a``", 1, 1), None);
    }

    #[rstest]
    #[case(" a ", "a")]
    #[case("  ", "  ")]
    #[case(" `` ", "``")]
    #[case("a\nb", "a b")]
    #[case(" a", " a")]
    fn normalizes_content(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(CodeSpan::normalize(raw), expected);
    }
}
