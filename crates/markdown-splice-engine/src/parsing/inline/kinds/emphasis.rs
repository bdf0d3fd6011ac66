/// Emphasis, strong emphasis and strikethrough delimiter runs.
pub struct Emphasis;

impl Emphasis {
    pub const STAR: u8 = b'*';
    pub const UNDERSCORE: u8 = b'_';
    pub const TILDE: u8 = b'~';

    pub fn is_delimiter(b: u8, strikethrough: bool) -> bool {
        b == Self::STAR || b == Self::UNDERSCORE || (strikethrough && b == Self::TILDE)
    }

    /// Whether a run of `len` `delim` characters at `text[pos..]` can open
    /// and/or close emphasis, from the characters around it.
    pub fn flanking(text: &str, pos: usize, len: usize, delim: u8) -> (bool, bool) {
        let before = text[..pos].chars().next_back();
        let after = text[pos + len..].chars().next();

        let before_is_whitespace = before.is_none_or(char::is_whitespace);
        let after_is_whitespace = after.is_none_or(char::is_whitespace);
        let before_is_punctuation = before.is_some_and(is_punctuation);
        let after_is_punctuation = after.is_some_and(is_punctuation);

        let left_flanking = !after_is_whitespace
            && (!after_is_punctuation || before_is_whitespace || before_is_punctuation);
        let right_flanking = !before_is_whitespace
            && (!before_is_punctuation || after_is_whitespace || after_is_punctuation);

        if delim == Self::UNDERSCORE {
            let can_open = left_flanking && (!right_flanking || before_is_punctuation);
            let can_close = right_flanking && (!left_flanking || after_is_punctuation);
            (can_open, can_close)
        } else {
            (left_flanking, right_flanking)
        }
    }
}

fn is_punctuation(ch: char) -> bool {
    !ch.is_whitespace() && !ch.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*a*", 0, 1, (true, false))]
    #[case("*a*", 2, 1, (false, true))]
    #[case("a * b", 2, 1, (false, false))]
    #[case("a*b", 1, 1, (true, true))]
    #[case("a_b", 1, 1, (false, false))]
    #[case("(_a_)", 1, 1, (true, false))]
    fn flanking_rules(
        #[case] text: &str,
        #[case] pos: usize,
        #[case] len: usize,
        #[case] expected: (bool, bool),
    ) {
        let delim = text.as_bytes()[pos];
        assert_eq!(Emphasis::flanking(text, pos, len, delim), expected);
    }

    #[test]
    fn tilde_only_with_strikethrough() {
        assert!(Emphasis::is_delimiter(b'~', true));
        assert!(!Emphasis::is_delimiter(b'~', false));
        assert!(Emphasis::is_delimiter(b'_', false));
    }
}
