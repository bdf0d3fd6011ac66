/// A cursor over one source line with position and column tracking.
///
/// Tracks the absolute byte position in the source (via `base`) and the
/// visual column, so container prefixes containing tabs can be measured
/// with 4-column tab stops.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The line being parsed, without its line ending.
    pub s: &'a str,
    /// Base offset in the source (added to local index for absolute positions).
    pub base: usize,
    /// Current local index into `s`.
    pub i: usize,
    /// Visual column of `i`.
    pub column: usize,
}

const TAB_STOP: usize = 4;

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s` with the given base offset.
    pub fn new(s: &'a str, base: usize) -> Self {
        Self {
            s,
            base,
            i: 0,
            column: 0,
        }
    }

    /// Returns the current absolute byte position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    /// Returns true if at end of string.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes()[self.i..].starts_with(pat)
    }

    /// The unconsumed remainder of the line.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.s.as_bytes().get(self.i).copied()?;
        self.i += 1;
        self.column = if b == b'\t' {
            (self.column / TAB_STOP + 1) * TAB_STOP
        } else {
            self.column + 1
        };
        Some(b)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// True when only spaces and tabs remain.
    pub fn is_blank(&self) -> bool {
        self.rest().bytes().all(|b| b == b' ' || b == b'\t')
    }

    /// Columns of leading whitespace from the current position.
    pub fn indent(&self) -> usize {
        let mut column = self.column;
        for b in self.rest().bytes() {
            match b {
                b' ' => column += 1,
                b'\t' => column = (column / TAB_STOP + 1) * TAB_STOP,
                _ => break,
            }
        }
        column - self.column
    }

    /// Consumes spaces and tabs.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.bump();
        }
    }

    /// Consumes whitespace worth at most `columns` columns. A tab that would
    /// overshoot is consumed whole.
    pub fn advance_columns(&mut self, columns: usize) {
        let target = self.column + columns;
        while self.column < target && matches!(self.peek(), Some(b' ' | b'\t')) {
            self.bump();
        }
    }
}
