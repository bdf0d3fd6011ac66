/// Errors raised while rewriting a document.
///
/// None of them is recoverable inside a pass; they propagate out of
/// [`visit`](super::visit) as soon as they occur.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("Ambiguous fragment: expected exactly one {expected}, found {found}")]
    AmbiguousFragment { expected: &'static str, found: usize },
    #[error("Dangling reference: no definition for label [{label}]")]
    DanglingReference { label: String },
    #[error("Internal invariant violation: {0}")]
    InternalInvariantViolation(String),
}

pub(crate) fn violation(message: impl Into<String>) -> RewriteError {
    RewriteError::InternalInvariantViolation(message.into())
}
