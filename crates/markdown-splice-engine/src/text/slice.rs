use std::fmt;
use std::sync::Arc;

use super::span::Span;

/// A view into a shared text buffer: the buffer plus a start offset and length.
///
/// Nodes parsed from the same input share one buffer, so literal content is
/// not copied per node. Text that had to be processed (escapes, entities,
/// code span normalization) gets a small buffer of its own.
#[derive(Clone, Default)]
pub struct TextSlice {
    buffer: Arc<str>,
    start: usize,
    len: usize,
}

impl TextSlice {
    /// Views `span` of `buffer`. The span must lie on char boundaries.
    pub fn new(buffer: Arc<str>, span: Span) -> Self {
        debug_assert!(buffer.is_char_boundary(span.start) && buffer.is_char_boundary(span.end));
        Self {
            buffer,
            start: span.start,
            len: span.len(),
        }
    }

    /// A slice owning its own buffer.
    pub fn owned(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let len = text.len();
        Self {
            buffer: Arc::from(text),
            start: 0,
            len,
        }
    }

    /// Views `span` of `buffer` when it already reads `text`, otherwise owns `text`.
    pub fn view_or_owned(buffer: &Arc<str>, span: Span, text: &str) -> Self {
        match buffer.get(span.start..span.end) {
            Some(viewed) if viewed == text => Self::new(Arc::clone(buffer), span),
            _ => Self::owned(text),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer[self.start..self.start + self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when both slices view the same underlying buffer.
    pub fn shares_buffer(&self, other: &TextSlice) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }
}

impl fmt::Debug for TextSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for TextSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for TextSlice {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TextSlice {}

impl PartialEq<str> for TextSlice {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TextSlice {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Truncates `text` to at most `max` bytes with a "..." suffix if needed.
///
/// Used for human-readable tree dumps. Never splits a character.
pub fn preview(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut s = text[..cut].to_string();
    s.push_str("...");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_share_one_buffer() {
        let buffer: Arc<str> = Arc::from("hello world");
        let a = TextSlice::new(Arc::clone(&buffer), Span::new(0, 5));
        let b = TextSlice::new(Arc::clone(&buffer), Span::new(6, 11));
        assert_eq!(a, "hello");
        assert_eq!(b, "world");
        assert!(a.shares_buffer(&b));
    }

    #[test]
    fn view_or_owned_falls_back_when_text_differs() {
        let buffer: Arc<str> = Arc::from("a \\* b");
        let viewed = TextSlice::view_or_owned(&buffer, Span::new(0, 2), "a ");
        let owned = TextSlice::view_or_owned(&buffer, Span::new(2, 4), "*");
        assert_eq!(viewed, "a ");
        assert_eq!(owned, "*");
        assert!(viewed.shares_buffer(&TextSlice::new(buffer, Span::new(0, 0))));
        assert_eq!(owned.len(), 1);
    }

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("hello", 10), "hello");
        assert_eq!(preview("hello", 5), "hello");
    }

    #[test]
    fn preview_truncates_long_text() {
        assert_eq!(preview("hello world", 5), "hello...");
        assert_eq!(preview("hello", 0), "...");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("héllo", 2), "h...");
    }
}
