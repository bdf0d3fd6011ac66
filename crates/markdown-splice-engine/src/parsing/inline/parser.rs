use crate::parsing::escape::{is_escapable, match_entity};
use crate::parsing::html::inline_html_len;
use crate::settings::ParseSettings;
use crate::text::{Span, TextSlice};
use crate::tree::{InlineTag, ReferenceMap, normalize_label};

use super::kinds::{Autolink, CodeSpan, Emphasis, Link, run_length};
use super::types::{InlineNode, InlineSource};

/// What inline parsing needs from the surrounding document.
pub struct InlineContext<'a> {
    pub references: &'a ReferenceMap,
    pub settings: &'a ParseSettings,
    /// Turn full and collapsed references with unknown labels into links
    /// carrying the label instead of plain text. Fragments parse this way.
    pub defer_unresolved: bool,
}

/// Parses the joined content of one block into inline nodes.
///
/// Follows the CommonMark delimiter-stack approach: text, code spans,
/// autolinks, raw HTML and breaks are produced directly; `*`, `_` and `~`
/// runs and `[` / `![` openers are kept as pending pieces until a closer
/// (`]` or a closing run) turns a range of pieces into a container node.
pub fn parse_inlines(src: &InlineSource, ctx: &InlineContext<'_>) -> Vec<InlineNode> {
    let mut parser = InlineParser {
        src,
        ctx,
        pieces: Vec::new(),
        brackets: Vec::new(),
        text: String::new(),
        text_start: 0,
        i: 0,
    };
    parser.run();
    parser.finish()
}

#[derive(Debug)]
enum Piece {
    Node(InlineNode),
    Delim(DelimRun),
}

#[derive(Debug, Clone, Copy)]
struct DelimRun {
    ch: u8,
    /// Buffer index of the first unused delimiter character.
    start: usize,
    len: usize,
    orig_len: usize,
    can_open: bool,
    can_close: bool,
    /// Set once a closer has found no opener.
    spent: bool,
}

#[derive(Debug, Clone, Copy)]
struct Bracket {
    piece: usize,
    start: usize,
    image: bool,
    active: bool,
}

struct LinkTarget {
    url: Option<String>,
    title: Option<String>,
    label: Option<String>,
    end: usize,
}

struct InlineParser<'a> {
    src: &'a InlineSource,
    ctx: &'a InlineContext<'a>,
    pieces: Vec<Piece>,
    brackets: Vec<Bracket>,
    /// Pending processed text and the buffer index where it started.
    text: String,
    text_start: usize,
    i: usize,
}

impl<'a> InlineParser<'a> {
    fn run(&mut self) {
        let src = self.src;
        let bytes = src.text.as_bytes();
        while self.i < bytes.len() {
            match bytes[self.i] {
                b'\\' => self.parse_backslash(),
                CodeSpan::TICK => self.parse_code_span(),
                Autolink::OPEN => self.parse_angle(),
                b'&' => self.parse_entity(),
                b'\n' => self.parse_line_ending(),
                Link::IMAGE if bytes.get(self.i + 1) == Some(&Link::OPEN) => {
                    self.open_bracket(true)
                }
                Link::OPEN => self.open_bracket(false),
                Link::CLOSE => self.close_bracket(),
                b if Emphasis::is_delimiter(b, self.ctx.settings.strikethrough) => {
                    self.push_delimiter(b)
                }
                _ => self.advance_char(),
            }
        }
    }

    fn finish(mut self) -> Vec<InlineNode> {
        let trailing = self.text.len() - self.text.trim_end_matches([' ', '\t']).len();
        self.text.truncate(self.text.len() - trailing);
        self.flush_text_at(self.i - trailing);
        self.process_emphasis(0);
        let src = self.src;
        let nodes = self
            .pieces
            .into_iter()
            .map(|piece| into_node(src, piece))
            .collect();
        merge_text(src, nodes)
    }

    fn push_text(&mut self, s: &str) {
        if self.text.is_empty() {
            self.text_start = self.i;
        }
        self.text.push_str(s);
    }

    fn advance_char(&mut self) {
        let ch_len = self.src.text[self.i..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        let end = self.i + ch_len;
        let src = self.src;
        self.push_text(&src.text[self.i..end]);
        self.i = end;
    }

    fn flush_text(&mut self) {
        self.flush_text_at(self.i);
    }

    fn flush_text_at(&mut self, end: usize) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        let node = InlineNode::leaf(
            InlineTag::Text,
            self.src.span(self.text_start, end),
            self.src.slice(self.text_start, end, &text),
        );
        self.pieces.push(Piece::Node(node));
    }

    fn push_node(&mut self, node: InlineNode) {
        self.flush_text();
        self.pieces.push(Piece::Node(node));
    }

    fn parse_backslash(&mut self) {
        let src = self.src;
        match src.text.as_bytes().get(self.i + 1).copied() {
            Some(b'\n') => {
                let start = self.src.position(self.i);
                let end = self
                    .src
                    .joint_end(self.i + 1)
                    .unwrap_or_else(|| self.src.position(self.i + 1) + 1);
                self.push_node(InlineNode::leaf(
                    InlineTag::LineBreak,
                    Span::new(start, end),
                    TextSlice::default(),
                ));
                self.i += 2;
            }
            Some(next) if is_escapable(next) => {
                self.push_text(&(next as char).to_string());
                self.i += 2;
            }
            _ => self.advance_char(),
        }
    }

    fn parse_code_span(&mut self) {
        let src = self.src;
        let bytes = src.text.as_bytes();
        let start = self.i;
        let run = run_length(bytes, start, CodeSpan::TICK);
        let Some(close) = CodeSpan::find_close(bytes, start + run, run) else {
            self.push_text(&src.text[start..start + run]);
            self.i += run;
            return;
        };
        let raw = &src.text[start + run..close];
        let content = CodeSpan::normalize(raw);
        let (inner_start, inner_end) = if content.len() + 2 == raw.len() {
            (start + run + 1, close - 1)
        } else {
            (start + run, close)
        };
        let node = InlineNode::leaf(
            InlineTag::Code,
            src.span(start, close + run),
            src.slice(inner_start, inner_end, &content),
        );
        self.push_node(node);
        self.i = close + run;
    }

    fn parse_angle(&mut self) {
        let src = self.src;
        let start = self.i;
        let rest = &src.text[start..];
        if let Some(m) = Autolink::parse(rest) {
            let end = start + m.len;
            let child = InlineNode::leaf(
                InlineTag::Text,
                src.span(start + 1, end - 1),
                src.slice(start + 1, end - 1, &m.text),
            );
            let mut link = InlineNode::container(InlineTag::Link, src.span(start, end), vec![child]);
            link.url = Some(m.url);
            self.push_node(link);
            self.i = end;
            return;
        }
        if let Some(len) = inline_html_len(rest) {
            let end = start + len;
            let node = InlineNode::leaf(
                InlineTag::RawHtml,
                src.span(start, end),
                src.slice(start, end, &rest[..len]),
            );
            self.push_node(node);
            self.i = end;
            return;
        }
        self.advance_char();
    }

    fn parse_entity(&mut self) {
        match match_entity(&self.src.text[self.i..]) {
            Some((decoded, len)) => {
                self.push_text(&decoded);
                self.i += len;
            }
            None => self.advance_char(),
        }
    }

    fn parse_line_ending(&mut self) {
        let newline = self.i;
        let trailing = self.text.len() - self.text.trim_end_matches(' ').len();
        self.text.truncate(self.text.len() - trailing);
        let text_end = newline - trailing;
        self.flush_text_at(text_end);

        let (tag, start) = if trailing >= 2 {
            (InlineTag::LineBreak, text_end)
        } else {
            (InlineTag::SoftBreak, newline)
        };
        let end = self
            .src
            .joint_end(newline)
            .unwrap_or_else(|| self.src.position(newline) + 1);
        self.pieces.push(Piece::Node(InlineNode::leaf(
            tag,
            Span::new(self.src.position(start), end),
            TextSlice::default(),
        )));
        self.i = newline + 1;
    }

    fn push_delimiter(&mut self, ch: u8) {
        let src = self.src;
        let start = self.i;
        let len = run_length(src.text.as_bytes(), start, ch);
        if ch == Emphasis::TILDE && len > 2 {
            self.push_text(&src.text[start..start + len]);
            self.i += len;
            return;
        }
        let (can_open, can_close) = Emphasis::flanking(&src.text, start, len, ch);
        self.flush_text();
        self.pieces.push(Piece::Delim(DelimRun {
            ch,
            start,
            len,
            orig_len: len,
            can_open,
            can_close,
            spent: false,
        }));
        self.i += len;
    }

    fn open_bracket(&mut self, image: bool) {
        self.flush_text();
        let start = self.i;
        let end = start + if image { 2 } else { 1 };
        let node = InlineNode::leaf(
            InlineTag::Text,
            self.src.span(start, end),
            self.src.slice(start, end, &self.src.text[start..end]),
        );
        self.pieces.push(Piece::Node(node));
        self.brackets.push(Bracket {
            piece: self.pieces.len() - 1,
            start,
            image,
            active: true,
        });
        self.i = end;
    }

    fn close_bracket(&mut self) {
        let close = self.i;
        let Some(bracket) = self.brackets.last().copied() else {
            self.advance_char();
            return;
        };
        if !bracket.active {
            self.brackets.pop();
            self.advance_char();
            return;
        }
        let label_start = bracket.start + if bracket.image { 2 } else { 1 };
        let Some(target) = self.resolve_link_target(label_start, close) else {
            self.brackets.pop();
            self.advance_char();
            return;
        };

        self.flush_text();
        self.process_emphasis(bracket.piece + 1);
        let src = self.src;
        let children: Vec<InlineNode> = self
            .pieces
            .drain(bracket.piece + 1..)
            .map(|piece| into_node(src, piece))
            .collect();
        self.pieces.pop();

        let tag = if bracket.image {
            InlineTag::Image
        } else {
            InlineTag::Link
        };
        let mut node = InlineNode::container(
            tag,
            src.span(bracket.start, target.end),
            merge_text(src, children),
        );
        node.url = target.url;
        node.label = target.label;
        if let Some(title) = target.title {
            node.literal = TextSlice::owned(title);
        }
        self.pieces.push(Piece::Node(node));
        self.brackets.pop();
        if !bracket.image {
            for earlier in self.brackets.iter_mut().filter(|b| !b.image) {
                earlier.active = false;
            }
        }
        self.i = target.end;
    }

    /// Looks past `]` at `close` for an inline tail, a full or collapsed
    /// reference, or falls back to a shortcut reference.
    fn resolve_link_target(&self, label_start: usize, close: usize) -> Option<LinkTarget> {
        let text = &self.src.text;
        let after = close + 1;
        if text.as_bytes().get(after) == Some(&b'(') {
            if let Some(tail) = Link::parse_inline_tail(text, after) {
                return Some(LinkTarget {
                    url: Some(tail.url),
                    title: tail.title,
                    label: None,
                    end: tail.end,
                });
            }
        }
        let bracket_text = &text[label_start..close];
        if let Some((raw, end)) = Link::parse_label(text, after) {
            let raw = if raw.is_empty() { bracket_text } else { raw };
            return self.lookup_reference(raw, end, true);
        }
        self.lookup_reference(bracket_text, after, false)
    }

    fn lookup_reference(&self, raw: &str, end: usize, deferrable: bool) -> Option<LinkTarget> {
        if raw.trim().is_empty() || raw.len() > Link::MAX_LABEL_LEN {
            return None;
        }
        let label = normalize_label(raw);
        if let Some(reference) = self.ctx.references.get_normalized(&label) {
            return Some(LinkTarget {
                url: Some(reference.url.clone()),
                title: reference.title.clone(),
                label: Some(label),
                end,
            });
        }
        if deferrable && self.ctx.defer_unresolved {
            return Some(LinkTarget {
                url: None,
                title: None,
                label: Some(label),
                end,
            });
        }
        None
    }

    /// Matches delimiter runs at or after `bottom`, turning each matched
    /// opener/closer pair and the pieces between them into a container node.
    fn process_emphasis(&mut self, bottom: usize) {
        let mut closer_idx = bottom;
        while closer_idx < self.pieces.len() {
            let closer = match &self.pieces[closer_idx] {
                Piece::Delim(d) if d.can_close && !d.spent => *d,
                _ => {
                    closer_idx += 1;
                    continue;
                }
            };

            let opener_idx = (bottom..closer_idx).rev().find(|&j| match &self.pieces[j] {
                Piece::Delim(o) => {
                    o.ch == closer.ch
                        && o.can_open
                        && (o.ch != Emphasis::TILDE || o.len == closer.len)
                        && !blocked(o, &closer)
                }
                Piece::Node(_) => false,
            });
            let Some(oi) = opener_idx else {
                if let Piece::Delim(d) = &mut self.pieces[closer_idx] {
                    d.spent = true;
                }
                closer_idx += 1;
                continue;
            };
            let Piece::Delim(opener) = self.pieces[oi] else {
                closer_idx += 1;
                continue;
            };

            let (tag, used) = if closer.ch == Emphasis::TILDE {
                (InlineTag::Strikethrough, closer.len)
            } else if opener.len >= 2 && closer.len >= 2 {
                (InlineTag::Strong, 2)
            } else {
                (InlineTag::Emphasis, 1)
            };

            let src = self.src;
            let node_start = opener.start + opener.len - used;
            let node_end = closer.start + used;
            let children: Vec<InlineNode> = self
                .pieces
                .drain(oi + 1..closer_idx)
                .map(|piece| into_node(src, piece))
                .collect();
            let node = InlineNode::container(
                tag,
                src.span(node_start, node_end),
                merge_text(src, children),
            );
            self.pieces.insert(oi + 1, Piece::Node(node));

            let mut ci = oi + 2;
            if let Piece::Delim(o) = &mut self.pieces[oi] {
                o.len -= used;
            }
            if let Piece::Delim(c) = &mut self.pieces[ci] {
                c.len -= used;
                c.start += used;
            }
            if opener.len == used {
                self.pieces.remove(oi);
                ci -= 1;
            }
            if closer.len == used {
                self.pieces.remove(ci);
            }
            closer_idx = ci;
        }
    }
}

/// The "rule of three": a run that can both open and close may not pair with
/// another when their combined length is a multiple of 3, unless both are.
fn blocked(opener: &DelimRun, closer: &DelimRun) -> bool {
    let opener_both = opener.can_open && opener.can_close;
    let closer_both = closer.can_open && closer.can_close;
    if !opener_both && !closer_both {
        return false;
    }
    if (opener.orig_len + closer.orig_len) % 3 != 0 {
        return false;
    }
    opener.orig_len % 3 != 0 || closer.orig_len % 3 != 0
}

fn into_node(src: &InlineSource, piece: Piece) -> InlineNode {
    match piece {
        Piece::Node(node) => node,
        Piece::Delim(d) => {
            let end = d.start + d.len;
            InlineNode::leaf(
                InlineTag::Text,
                src.span(d.start, end),
                src.slice(d.start, end, &src.text[d.start..end]),
            )
        }
    }
}

/// Joins adjacent text nodes whose spans touch.
fn merge_text(src: &InlineSource, nodes: Vec<InlineNode>) -> Vec<InlineNode> {
    let mut out: Vec<InlineNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let Some(prev) = out.last_mut() {
            if prev.tag == InlineTag::Text
                && node.tag == InlineTag::Text
                && prev.span.end == node.span.start
            {
                let text = format!("{}{}", prev.literal, node.literal);
                let span = Span::new(prev.span.start, node.span.end);
                prev.literal = TextSlice::view_or_owned(&src.shared, span, &text);
                prev.span = span;
                continue;
            }
        }
        out.push(node);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::inline::types::ContentLine;
    use crate::tree::Reference;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn parse_with(
        text: &str,
        references: &ReferenceMap,
        settings: &ParseSettings,
        defer_unresolved: bool,
    ) -> Vec<InlineNode> {
        let shared: Arc<str> = Arc::from(text);
        let mut lines = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            lines.push(ContentLine {
                span: Span::new(offset, offset + line.len()),
                line_end: (offset + line.len() + 1).min(text.len()),
            });
            offset += line.len() + 1;
        }
        let src = InlineSource::new(&shared, &lines);
        parse_inlines(&src, &InlineContext {
            references,
            settings,
            defer_unresolved,
        })
    }

    fn parse(text: &str) -> Vec<InlineNode> {
        parse_with(text, &ReferenceMap::default(), &ParseSettings::default(), false)
    }

    /// Compact `Tag[start..end]` outline for assertions.
    fn outline(nodes: &[InlineNode]) -> String {
        nodes
            .iter()
            .map(|n| {
                let mut s = format!("{:?}[{}..{}]", n.tag, n.span.start, n.span.end);
                if !n.children.is_empty() {
                    s.push_str(&format!("({})", outline(&n.children)));
                } else if !n.literal.is_empty() {
                    s.push_str(&format!("{:?}", n.literal.as_str()));
                }
                s
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(outline(&parse("hello world")), r#"Text[0..11]"hello world""#);
    }

    #[test]
    fn emphasis_and_strong() {
        assert_eq!(
            outline(&parse("a *b* **c**")),
            r#"Text[0..2]"a " Emphasis[2..5](Text[3..4]"b") Text[5..6]" " Strong[6..11](Text[8..9]"c")"#
        );
    }

    #[test]
    fn triple_run_nests_strong_in_emphasis() {
        assert_eq!(
            outline(&parse("***x***")),
            r#"Emphasis[0..7](Strong[1..6](Text[3..4]"x"))"#
        );
    }

    #[test]
    fn unmatched_delimiters_stay_text() {
        assert_eq!(outline(&parse("a * b")), r#"Text[0..5]"a * b""#);
        assert_eq!(outline(&parse("**a")), r#"Text[0..3]"**a""#);
    }

    #[test]
    fn code_span_is_raw() {
        assert_eq!(
            outline(&parse("`*a*` b")),
            r#"Code[0..5]"*a*" Text[5..7]" b""#
        );
    }

    #[test]
    fn escapes_produce_owned_text_with_source_span() {
        let nodes = parse(r"\*a\*");
        assert_eq!(outline(&nodes), r#"Text[0..5]"*a*""#);
    }

    #[test]
    fn inline_link_with_title() {
        let nodes = parse(r#"[a *b*](/u "t")"#);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].tag, InlineTag::Link);
        assert_eq!(nodes[0].url.as_deref(), Some("/u"));
        assert_eq!(nodes[0].literal, "t");
        assert_eq!(nodes[0].span, Span::new(0, 15));
        assert_eq!(outline(&nodes[0].children), r#"Text[1..3]"a " Emphasis[3..6](Text[4..5]"b")"#);
    }

    #[test]
    fn image_alt_is_children() {
        let nodes = parse("![alt](/i.png)");
        assert_eq!(nodes[0].tag, InlineTag::Image);
        assert_eq!(outline(&nodes[0].children), r#"Text[2..5]"alt""#);
    }

    #[test]
    fn no_links_inside_links() {
        let nodes = parse("[a [b](/x)](/y)");
        assert_eq!(
            outline(&nodes),
            r#"Text[0..3]"[a " Link[3..10](Text[4..5]"b") Text[10..15]"](/y)""#
        );
    }

    #[test]
    fn reference_links_record_labels() {
        let mut refs = ReferenceMap::default();
        refs.insert(
            "foo".into(),
            Reference {
                url: "/f".into(),
                title: None,
            },
        );
        let settings = ParseSettings::default();
        for text in ["[x][Foo]", "[Foo][]", "[foo]"] {
            let nodes = parse_with(text, &refs, &settings, false);
            assert_eq!(nodes.len(), 1, "{text}");
            assert_eq!(nodes[0].url.as_deref(), Some("/f"));
            assert_eq!(nodes[0].label.as_deref(), Some("foo"));
        }
    }

    #[test]
    fn unknown_reference_is_text_unless_deferred() {
        let refs = ReferenceMap::default();
        let settings = ParseSettings::default();
        let nodes = parse_with("[x][nope]", &refs, &settings, false);
        assert!(nodes.iter().all(|n| n.tag == InlineTag::Text));

        let nodes = parse_with("[x][nope]", &refs, &settings, true);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].tag, InlineTag::Link);
        assert_eq!(nodes[0].url, None);
        assert_eq!(nodes[0].label.as_deref(), Some("nope"));

        let shortcut = parse_with("[nope]", &refs, &settings, true);
        assert!(shortcut.iter().all(|n| n.tag == InlineTag::Text));
    }

    #[test]
    fn autolink_and_raw_html() {
        assert_eq!(
            outline(&parse("<https://x.y> <b>")),
            r#"Link[0..13](Text[1..12]"https://x.y") Text[13..14]" " RawHtml[14..17]"<b>""#
        );
    }

    #[test]
    fn soft_and_hard_breaks() {
        assert_eq!(
            outline(&parse("a\nb  \nc\\\nd")),
            r#"Text[0..1]"a" SoftBreak[1..2] Text[2..3]"b" LineBreak[3..6] Text[6..7]"c" LineBreak[7..9] Text[9..10]"d""#
        );
    }

    #[test]
    fn trailing_spaces_are_trimmed() {
        assert_eq!(outline(&parse("a  ")), r#"Text[0..1]"a""#);
    }

    #[test]
    fn strikethrough_needs_equal_runs() {
        assert_eq!(
            outline(&parse("~~a~~")),
            r#"Strikethrough[0..5](Text[2..3]"a")"#
        );
        assert_eq!(outline(&parse("~~a~")), r#"Text[0..4]"~~a~""#);
    }

    #[test]
    fn entities_decode() {
        let nodes = parse("a &amp; b");
        assert_eq!(nodes[0].literal, "a & b");
        assert_eq!(nodes[0].span, Span::new(0, 9));
    }
}
