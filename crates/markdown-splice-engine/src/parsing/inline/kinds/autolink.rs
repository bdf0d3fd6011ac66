use std::sync::OnceLock;

use regex::Regex;

static URI_AUTOLINK_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_AUTOLINK_REGEX: OnceLock<Regex> = OnceLock::new();

/// `<scheme:target>` and `<user@host>` autolinks.
pub struct Autolink;

/// A recognized autolink: destination URL, displayed text, and total byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutolinkMatch {
    pub url: String,
    pub text: String,
    pub len: usize,
}

impl Autolink {
    pub const OPEN: u8 = b'<';

    pub fn parse(s: &str) -> Option<AutolinkMatch> {
        let uri = URI_AUTOLINK_REGEX.get_or_init(|| {
            Regex::new(r"^<([A-Za-z][A-Za-z0-9.+-]{1,31}:[^<>\x00-\x20]*)>")
                .expect("Invalid URI autolink regex")
        });
        if let Some(caps) = uri.captures(s) {
            let text = caps[1].to_string();
            return Some(AutolinkMatch {
                url: text.clone(),
                text,
                len: caps[0].len(),
            });
        }
        let email = EMAIL_AUTOLINK_REGEX.get_or_init(|| {
            Regex::new(
                r"^<([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*)>",
            )
            .expect("Invalid email autolink regex")
        });
        let caps = email.captures(s)?;
        let text = caps[1].to_string();
        Some(AutolinkMatch {
            url: format!("mailto:{text}"),
            text,
            len: caps[0].len(),
        })
    }
}
