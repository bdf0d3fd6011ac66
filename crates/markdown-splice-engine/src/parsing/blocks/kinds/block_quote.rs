use crate::text::Cursor;

/// Blockquote block type with owned delimiter constant.
///
/// All blockquote-related syntax knowledge lives here, not scattered in
/// builder code.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: u8 = b'>';

    /// Consumes one `>` prefix (with up to 3 spaces of indentation before it
    /// and one optional space after it). Returns the absolute position of the
    /// `>`, or `None` with the cursor untouched when the line has no prefix.
    pub fn consume_prefix(cur: &mut Cursor<'_>) -> Option<usize> {
        if cur.indent() > 3 {
            return None;
        }
        let mut probe = cur.clone();
        probe.skip_whitespace();
        if probe.peek() != Some(Self::PREFIX) {
            return None;
        }
        let marker = probe.pos();
        probe.bump();
        if matches!(probe.peek(), Some(b' ' | b'\t')) {
            probe.advance_columns(1);
        }
        *cur = probe;
        Some(marker)
    }
}
