use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Matches a named, decimal or hexadecimal character reference at the start of the input.
static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();

fn entity_regex() -> &'static Regex {
    ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"^&(?:#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[A-Za-z][A-Za-z0-9]{1,31});")
            .expect("Invalid entity regex")
    })
}

/// True for bytes a backslash may escape.
pub fn is_escapable(b: u8) -> bool {
    b.is_ascii_punctuation()
}

/// Decodes a character reference at the start of `s`, returning the decoded
/// text and the number of bytes consumed. Unknown names are not references.
pub fn match_entity(s: &str) -> Option<(String, usize)> {
    let m = entity_regex().find(s)?;
    let raw = m.as_str();
    let decoded = html_escape::decode_html_entities(raw);
    if decoded == raw {
        return None;
    }
    let decoded = if decoded.contains('\0') {
        decoded.replace('\0', "\u{FFFD}")
    } else {
        decoded.into_owned()
    };
    Some((decoded, m.end()))
}

/// Resolves backslash escapes and character references in a single pass.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains(['\\', '&']) {
        return Cow::Borrowed(s);
    }
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let mut plain_start = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() && is_escapable(bytes[i + 1]) => {
                out.push_str(&s[plain_start..i]);
                out.push(bytes[i + 1] as char);
                i += 2;
                plain_start = i;
            }
            b'&' => match match_entity(&s[i..]) {
                Some((decoded, len)) => {
                    out.push_str(&s[plain_start..i]);
                    out.push_str(&decoded);
                    i += len;
                    plain_start = i;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }
    out.push_str(&s[plain_start..]);
    Cow::Owned(out)
}
