use crate::text::Span;

/// Where a node's span lies relative to an edited span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Ends at or before the edit start. Unaffected.
    Before,
    /// Starts at or after the edit end. Shifted by the edit delta.
    After,
    /// Covers the edit. Resized by the edit delta.
    Containing,
    /// Partly inside the edit. Never valid for a tree node.
    Overlapping,
}

/// Classifies `span` against `edit`.
///
/// Spans that only share a boundary with the edit are adjacent, not
/// overlapping. `After` is tested first so that an empty node sitting at the
/// end of an empty edit still counts as following it.
pub fn classify(span: Span, edit: Span) -> Placement {
    if span.start >= edit.end {
        Placement::After
    } else if span.end <= edit.start {
        Placement::Before
    } else if span.contains(edit) {
        Placement::Containing
    } else {
        Placement::Overlapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::ends_at_edit_start(Span::new(0, 5), Placement::Before)]
    #[case::starts_at_edit_end(Span::new(10, 12), Placement::After)]
    #[case::well_before(Span::new(0, 2), Placement::Before)]
    #[case::well_after(Span::new(20, 30), Placement::After)]
    #[case::exact(Span::new(5, 10), Placement::Containing)]
    #[case::ancestor(Span::new(0, 20), Placement::Containing)]
    #[case::straddles_start(Span::new(3, 7), Placement::Overlapping)]
    #[case::straddles_end(Span::new(8, 12), Placement::Overlapping)]
    #[case::inside(Span::new(6, 8), Placement::Overlapping)]
    fn boundaries_are_adjacent_not_overlapping(#[case] span: Span, #[case] expected: Placement) {
        assert_eq!(classify(span, Span::new(5, 10)), expected);
    }

    #[test]
    fn empty_node_at_empty_edit_follows_it() {
        assert_eq!(classify(Span::new(4, 4), Span::new(4, 4)), Placement::After);
        assert_eq!(classify(Span::new(0, 4), Span::new(4, 4)), Placement::Before);
        assert_eq!(classify(Span::new(0, 8), Span::new(4, 4)), Placement::Containing);
    }
}
