//! The arena tree: blocks, inlines, the reference map and the document that owns them.

pub mod block;
pub mod document;
pub mod inline;
pub mod references;

pub use block::{Alignment, Block, BlockId, BlockTag, ListData, ListKind};
pub use document::{BlockSiblings, Document, InlineSiblings};
pub use inline::{Inline, InlineId, InlineParent, InlineTag};
pub use references::{Reference, ReferenceMap, normalize_label};
