#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn char(self) -> u8 {
        match self {
            FenceKind::Backticks => b'`',
            FenceKind::Tildes => b'~',
        }
    }
}

/// An opening fence: its kind, run length, and the byte range of the info
/// string within the line remainder it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceOpen {
    pub kind: FenceKind,
    pub len: usize,
    pub info_start: usize,
    pub info_end: usize,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Recognizes an opening fence at the start of `rest` (indentation already consumed).
    pub fn open(rest: &str) -> Option<FenceOpen> {
        let kind = if rest.starts_with(Self::BACKTICKS) {
            FenceKind::Backticks
        } else if rest.starts_with(Self::TILDES) {
            FenceKind::Tildes
        } else {
            return None;
        };
        let len = rest.bytes().take_while(|&b| b == kind.char()).count();
        let after = &rest[len..];
        let info = after.trim();
        if kind == FenceKind::Backticks && info.contains('`') {
            return None;
        }
        let info_start = len + (after.len() - after.trim_start().len());
        Some(FenceOpen {
            kind,
            len,
            info_start,
            info_end: info_start + info.len(),
        })
    }

    /// Whether `rest` (indentation already consumed) closes `open`.
    pub fn closes(open: &FenceOpen, rest: &str) -> bool {
        let run = rest.bytes().take_while(|&b| b == open.kind.char()).count();
        run >= open.len && rest[run..].trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_backtick_fence_with_info() {
        let open = CodeFence::open("```rust  ").unwrap();
        assert_eq!(open.kind, FenceKind::Backticks);
        assert_eq!(open.len, 3);
        assert_eq!(&"```rust  "[open.info_start..open.info_end], "rust");
    }

    #[test]
    fn detect_tilde_fence() {
        let open = CodeFence::open("~~~~").unwrap();
        assert_eq!(open.kind, FenceKind::Tildes);
        assert_eq!(open.len, 4);
        assert_eq!(open.info_start, open.info_end);
    }

    #[test]
    fn no_fence() {
        assert_eq!(CodeFence::open("hello"), None);
        assert_eq!(CodeFence::open("``"), None);
        assert_eq!(CodeFence::open("``` a`b"), None);
    }

    #[test]
    fn closes_with_longer_run_of_same_kind() {
        let open = CodeFence::open("```").unwrap();
        assert!(CodeFence::closes(&open, "```"));
        assert!(CodeFence::closes(&open, "`````  "));
        assert!(!CodeFence::closes(&open, "~~~"));
        assert!(!CodeFence::closes(&open, "``` x"));
    }

    #[test]
    fn shorter_run_does_not_close() {
        let open = CodeFence::open("````").unwrap();
        assert!(!CodeFence::closes(&open, "```"));
    }
}
