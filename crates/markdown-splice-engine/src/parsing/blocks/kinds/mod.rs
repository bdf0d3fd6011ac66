//! Block syntax, one type per construct.
//!
//! Each type owns its delimiters and recognizes its own opening (and where it
//! applies, closing) lines. The builder decides when a recognizer is allowed
//! to run; the recognizers only look at the unconsumed rest of a line.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod html_block;
pub mod list_item;
pub mod reference;
pub mod table;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceOpen};
pub use heading::{AtxHeading, SetextHeading};
pub use html_block::{HtmlBlock, HtmlKind};
pub use list_item::ListItem;
pub use reference::{ParsedDefinition, ReferenceDefinition};
pub use table::Table;
pub use thematic_break::ThematicBreak;
