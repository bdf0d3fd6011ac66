use crate::text::Span;
use crate::tree::ListKind;

use super::kinds::{
    AtxHeading, CodeFence, FenceOpen, HtmlBlock, HtmlKind, ListItem, SetextHeading,
    ThematicBreak,
};

/// A block start recognized at the beginning of a line remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOpen {
    /// Heading level and the local range of its text.
    AtxHeading { level: u8, content: Span },
    FencedCode(FenceOpen),
    HtmlBlock(HtmlKind),
    SetextUnderline { level: u8 },
    ThematicBreak,
    /// List kind and the marker's byte width.
    ListItem { kind: ListKind, width: usize },
}

/// What the builder knows about the line's position in the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenContext {
    /// The innermost matched container is an open paragraph.
    pub container_is_paragraph: bool,
    /// The open leaf is a paragraph, matched or lazily continued.
    pub tip_is_paragraph: bool,
}

/// Tries the leaf and list openers in precedence order. `rest` starts at the
/// first non-space character and has at most 3 columns of indentation before it.
pub fn try_open(rest: &str, ctx: OpenContext) -> Option<BlockOpen> {
    if let Some((level, content)) = AtxHeading::open(rest) {
        return Some(BlockOpen::AtxHeading { level, content });
    }
    if let Some(open) = CodeFence::open(rest) {
        return Some(BlockOpen::FencedCode(open));
    }
    if let Some(kind) = HtmlBlock::start(rest, ctx.tip_is_paragraph) {
        return Some(BlockOpen::HtmlBlock(kind));
    }
    if ctx.container_is_paragraph {
        if let Some(level) = SetextHeading::underline(rest) {
            return Some(BlockOpen::SetextUnderline { level });
        }
    }
    if ThematicBreak::matches(rest) {
        return Some(BlockOpen::ThematicBreak);
    }
    if let Some((kind, width)) = ListItem::marker(rest) {
        let content_is_blank = rest[width..].trim().is_empty();
        if !ctx.container_is_paragraph || ListItem::can_interrupt_paragraph(kind, content_is_blank)
        {
            return Some(BlockOpen::ListItem { kind, width });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::kinds::FenceKind;

    const IN_PARAGRAPH: OpenContext = OpenContext {
        container_is_paragraph: true,
        tip_is_paragraph: true,
    };

    #[test]
    fn fence_is_recognized() {
        match try_open("```rust", OpenContext::default()) {
            Some(BlockOpen::FencedCode(open)) => assert_eq!(open.kind, FenceKind::Backticks),
            other => panic!("expected a fence, got {other:?}"),
        }
    }

    #[test]
    fn setext_needs_a_paragraph() {
        assert_eq!(
            try_open("---", IN_PARAGRAPH),
            Some(BlockOpen::SetextUnderline { level: 2 })
        );
        assert_eq!(try_open("---", OpenContext::default()), Some(BlockOpen::ThematicBreak));
    }

    #[test]
    fn star_rule_beats_list_item() {
        assert_eq!(try_open("* * *", OpenContext::default()), Some(BlockOpen::ThematicBreak));
    }

    #[test]
    fn list_interruption_rules() {
        assert!(matches!(
            try_open("- item", IN_PARAGRAPH),
            Some(BlockOpen::ListItem { .. })
        ));
        assert_eq!(try_open("2. item", IN_PARAGRAPH), None);
        assert_eq!(try_open("*", IN_PARAGRAPH), None);
        assert!(matches!(
            try_open("2. item", OpenContext::default()),
            Some(BlockOpen::ListItem { width: 2, .. })
        ));
    }

    #[test]
    fn complete_tag_cannot_interrupt_paragraph() {
        assert_eq!(try_open("<custom>", IN_PARAGRAPH), None);
        assert_eq!(
            try_open("<custom>", OpenContext::default()),
            Some(BlockOpen::HtmlBlock(HtmlKind::CompleteTag))
        );
    }

    #[test]
    fn plain_text_opens_nothing() {
        assert_eq!(try_open("hello", OpenContext::default()), None);
    }
}
