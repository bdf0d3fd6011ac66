/// `***`, `---` and `___` rules, optionally with spaces between the characters.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const MIN_RUN: usize = 3;

    pub fn matches(rest: &str) -> bool {
        let Some(&first) = rest.as_bytes().first() else {
            return false;
        };
        if !matches!(first, b'*' | b'-' | b'_') {
            return false;
        }
        let mut count = 0;
        for b in rest.bytes() {
            if b == first {
                count += 1;
            } else if b != b' ' && b != b'\t' {
                return false;
            }
        }
        count >= Self::MIN_RUN
    }
}
