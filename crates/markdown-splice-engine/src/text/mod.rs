//! Text primitives shared by the parser, the tree and the rewrite engine.

pub mod cursor;
pub mod lines;
pub mod slice;
pub mod span;

pub use cursor::Cursor;
pub use lines::{LineRef, lines_with_spans};
pub use slice::{TextSlice, preview};
pub use span::Span;
