use crate::settings::Newline;

/// String sink that normalizes line endings as text is written.
///
/// Every `\n` becomes the configured newline. A `\r` already written right
/// before a `\n` is kept and not doubled.
#[derive(Debug, Clone)]
pub struct HtmlTextWriter {
    buffer: String,
    newline: Newline,
    last: Option<char>,
}

impl HtmlTextWriter {
    pub fn new(newline: Newline) -> Self {
        Self {
            buffer: String::new(),
            newline,
            last: None,
        }
    }

    /// Writes `text`, converting its line endings.
    pub fn write_constant(&mut self, text: &str) {
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            self.push_raw(first);
        }
        for piece in pieces {
            self.push_newline();
            self.push_raw(piece);
        }
    }

    /// Writes `text` followed by a newline.
    pub fn write_line(&mut self, text: &str) {
        self.write_constant(text);
        self.push_newline();
    }

    /// Starts a new line unless the output is empty or already at one.
    pub fn ensure_line(&mut self) {
        if self.last.is_some_and(|c| c != '\n') {
            self.push_newline();
        }
    }

    pub fn last_char(&self) -> Option<char> {
        self.last
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    fn push_raw(&mut self, text: &str) {
        if let Some(c) = text.chars().next_back() {
            self.buffer.push_str(text);
            self.last = Some(c);
        }
    }

    fn push_newline(&mut self) {
        match self.newline {
            Newline::CrLf if self.last != Some('\r') => self.buffer.push_str("\r\n"),
            _ => self.buffer.push('\n'),
        }
        self.last = Some('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::lf(Newline::Lf, "a\nb\r\n", "a\nb\r\n")]
    #[case::crlf(Newline::CrLf, "a\nb\n", "a\r\nb\r\n")]
    #[case::crlf_keeps_existing(Newline::CrLf, "a\r\nb", "a\r\nb")]
    fn converts_newlines(#[case] newline: Newline, #[case] input: &str, #[case] expected: &str) {
        let mut writer = HtmlTextWriter::new(newline);
        writer.write_constant(input);
        assert_eq!(writer.into_string(), expected);
    }

    #[test]
    fn carriage_return_is_tracked_across_writes() {
        let mut writer = HtmlTextWriter::new(Newline::CrLf);
        writer.write_constant("a\r");
        writer.write_constant("\nb");
        assert_eq!(writer.as_str(), "a\r\nb");
    }

    #[test]
    fn ensure_line_only_ends_open_lines() {
        let mut writer = HtmlTextWriter::new(Newline::Lf);
        writer.ensure_line();
        assert_eq!(writer.as_str(), "");
        writer.write_constant("x");
        writer.ensure_line();
        writer.ensure_line();
        writer.write_line("y");
        assert_eq!(writer.as_str(), "x\ny\n");
        assert_eq!(writer.last_char(), Some('\n'));
    }
}
