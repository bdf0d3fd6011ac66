use std::sync::Arc;

use crate::text::{Span, TextSlice};
use crate::tree::InlineTag;

/// A parsed inline before it is moved into the document arena.
///
/// Spans are absolute positions in the document source.
#[derive(Debug, Clone)]
pub struct InlineNode {
    pub tag: InlineTag,
    pub span: Span,
    /// Text, code and HTML content; link and image titles.
    pub literal: TextSlice,
    pub url: Option<String>,
    /// Normalized label for reference links.
    pub label: Option<String>,
    pub children: Vec<InlineNode>,
}

impl InlineNode {
    pub fn leaf(tag: InlineTag, span: Span, literal: TextSlice) -> Self {
        Self {
            tag,
            span,
            literal,
            url: None,
            label: None,
            children: Vec::new(),
        }
    }

    pub fn container(tag: InlineTag, span: Span, children: Vec<InlineNode>) -> Self {
        Self {
            tag,
            span,
            literal: TextSlice::default(),
            url: None,
            label: None,
            children,
        }
    }
}

/// The content lines of one block joined with `\n`, with a map from every
/// byte back to its absolute source position.
///
/// Container prefixes and leading indentation between lines are not part of
/// the joined text, so spans must always be computed through the map.
#[derive(Debug, Clone)]
pub struct InlineSource {
    pub text: String,
    offsets: Vec<usize>,
    /// For each joining `\n`: its index in `text` and the absolute end of the
    /// line ending it stands for.
    joints: Vec<(usize, usize)>,
    /// Absolute end of the last content byte.
    end: usize,
    pub shared: Arc<str>,
}

/// One content line of a block: the content span and the end of the whole
/// line including its line ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLine {
    pub span: Span,
    pub line_end: usize,
}

impl InlineSource {
    pub fn new(shared: &Arc<str>, lines: &[ContentLine]) -> Self {
        let mut text = String::new();
        let mut offsets = Vec::new();
        let mut joints = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                let prev = lines[idx - 1];
                joints.push((text.len(), prev.line_end));
                text.push('\n');
                offsets.push(prev.span.end);
            }
            text.push_str(&shared[line.span.start..line.span.end]);
            offsets.extend(line.span.start..line.span.end);
        }
        let end = lines.last().map_or(0, |l| l.span.end);
        Self {
            text,
            offsets,
            joints,
            end,
            shared: Arc::clone(shared),
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Absolute position of the byte at `idx` (or the content end for `idx == len`).
    pub fn position(&self, idx: usize) -> usize {
        self.offsets.get(idx).copied().unwrap_or(self.end)
    }

    /// Absolute span covering `text[start..end]`.
    pub fn span(&self, start: usize, end: usize) -> Span {
        if end <= start {
            let at = self.position(start);
            return Span::new(at, at);
        }
        let last = end - 1;
        let end_pos = match self.joint_end(last) {
            Some(line_end) => line_end,
            None => self.position(last) + 1,
        };
        Span::new(self.position(start), end_pos)
    }

    /// Absolute end of the line ending a joining `\n` at `idx`.
    pub fn joint_end(&self, idx: usize) -> Option<usize> {
        self.joints
            .iter()
            .find(|(at, _)| *at == idx)
            .map(|(_, line_end)| *line_end)
    }

    /// A literal for `text` found at `text[start..end]`: a view of the source
    /// when identical, otherwise an owned copy.
    pub fn slice(&self, start: usize, end: usize, text: &str) -> TextSlice {
        TextSlice::view_or_owned(&self.shared, self.span(start, end), text)
    }
}
