//! # Inline Kinds
//!
//! Inline-specific types that own their syntax delimiters.
//!
//! ## Types
//!
//! - **`CodeSpan`**: `TICK`, closing-run search and content normalization
//! - **`Autolink`**: `<scheme:target>` and `<user@host>`
//! - **`Link`**: `[` `]` `!`, inline link tails, labels, destinations and titles
//! - **`Emphasis`**: `*` `_` `~` runs and their flanking rules
//!
//! The parser calls these; it never hardcodes a delimiter.

pub mod autolink;
pub mod code_span;
pub mod emphasis;
pub mod link;

pub use autolink::{Autolink, AutolinkMatch};
pub use code_span::{CodeSpan, run_length};
pub use emphasis::Emphasis;
pub use link::{InlineLinkTail, Link, parse_destination, parse_title, skip_whitespace};
