use crate::parsing::html::is_complete_tag_line;

/// The seven HTML block start conditions, each with its own end condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlKind {
    /// `<script>`, `<pre>`, `<style>`, `<textarea>`
    Raw,
    Comment,
    ProcessingInstruction,
    Declaration,
    Cdata,
    /// A known block-level tag name.
    BlockTag,
    /// Any complete open or closing tag alone on its line.
    CompleteTag,
}

impl HtmlKind {
    /// Kinds that run until a blank line rather than an end marker.
    pub fn ends_at_blank(self) -> bool {
        matches!(self, HtmlKind::BlockTag | HtmlKind::CompleteTag)
    }

    /// Whether `line` contains this kind's end marker.
    pub fn ends_on(self, line: &str) -> bool {
        match self {
            HtmlKind::Raw => {
                let lower = line.to_ascii_lowercase();
                HtmlBlock::RAW_TAGS
                    .iter()
                    .any(|tag| lower.contains(&format!("</{tag}>")))
            }
            HtmlKind::Comment => line.contains("-->"),
            HtmlKind::ProcessingInstruction => line.contains("?>"),
            HtmlKind::Declaration => line.contains('>'),
            HtmlKind::Cdata => line.contains("]]>"),
            HtmlKind::BlockTag | HtmlKind::CompleteTag => false,
        }
    }
}

pub struct HtmlBlock;

impl HtmlBlock {
    pub const RAW_TAGS: [&'static str; 4] = ["script", "pre", "style", "textarea"];

    pub const BLOCK_TAGS: &'static [&'static str] = &[
        "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption",
        "center", "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt",
        "fieldset", "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2",
        "h3", "h4", "h5", "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link",
        "main", "menu", "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param",
        "search", "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title",
        "tr", "track", "ul",
    ];

    /// Recognizes an HTML block start at the beginning of `rest`
    /// (indentation already consumed).
    pub fn start(rest: &str, interrupts_paragraph: bool) -> Option<HtmlKind> {
        if !rest.starts_with('<') {
            return None;
        }
        if rest.starts_with("<!--") {
            return Some(HtmlKind::Comment);
        }
        if rest.starts_with("<?") {
            return Some(HtmlKind::ProcessingInstruction);
        }
        if rest.starts_with("<![CDATA[") {
            return Some(HtmlKind::Cdata);
        }
        if rest.len() > 2 && rest.starts_with("<!") && rest.as_bytes()[2].is_ascii_alphabetic() {
            return Some(HtmlKind::Declaration);
        }

        let closing = rest.starts_with("</");
        let name_start = if closing { 2 } else { 1 };
        let name_len = rest[name_start..]
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
            .count();
        let name = rest[name_start..name_start + name_len].to_ascii_lowercase();
        let after = rest.as_bytes().get(name_start + name_len).copied();

        if !closing
            && Self::RAW_TAGS.contains(&name.as_str())
            && matches!(after, None | Some(b' ' | b'\t' | b'>'))
        {
            return Some(HtmlKind::Raw);
        }
        let tag_ends = match after {
            None | Some(b' ' | b'\t' | b'>') => true,
            Some(b'/') => rest[name_start + name_len..].starts_with("/>"),
            _ => false,
        };
        if name_len > 0 && tag_ends && Self::BLOCK_TAGS.contains(&name.as_str()) {
            return Some(HtmlKind::BlockTag);
        }
        if !interrupts_paragraph && is_complete_tag_line(rest) {
            return Some(HtmlKind::CompleteTag);
        }
        None
    }
}
