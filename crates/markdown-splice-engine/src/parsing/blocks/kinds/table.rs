use crate::text::Span;
use crate::tree::Alignment;

/// GitHub-style pipe tables: a header row, a delimiter row, then body rows.
pub struct Table;

impl Table {
    pub const SEPARATOR: u8 = b'|';

    /// Byte ranges of the trimmed cell contents of a row. Leading and
    /// trailing pipes are optional; `\|` does not separate cells.
    pub fn cells(line: &str) -> Vec<Span> {
        let b = line.as_bytes();
        let mut start = 0;
        let mut end = b.len();
        while start < end && matches!(b[start], b' ' | b'\t') {
            start += 1;
        }
        while end > start && matches!(b[end - 1], b' ' | b'\t') {
            end -= 1;
        }
        if start < end && b[start] == Self::SEPARATOR {
            start += 1;
        }
        if end > start && b[end - 1] == Self::SEPARATOR && (end < 2 || b[end - 2] != b'\\') {
            end -= 1;
        }

        let mut cells = Vec::new();
        let mut cell_start = start;
        let mut i = start;
        while i <= end {
            let at_separator = i < end && b[i] == Self::SEPARATOR && (i == 0 || b[i - 1] != b'\\');
            if i == end || at_separator {
                cells.push(trim(b, cell_start, i));
                cell_start = i + 1;
            }
            i += 1;
        }
        cells
    }

    /// Whether `line` contains an unescaped cell separator.
    pub fn has_separator(line: &str) -> bool {
        let b = line.as_bytes();
        (0..b.len()).any(|i| b[i] == Self::SEPARATOR && (i == 0 || b[i - 1] != b'\\'))
    }

    /// Parses a delimiter row (`| :-- | :-: | --: |`) into column alignments.
    pub fn delimiter_row(line: &str) -> Option<Vec<Alignment>> {
        if !line.contains('-') {
            return None;
        }
        Self::cells(line)
            .into_iter()
            .map(|sp| {
                let cell = &line[sp.start..sp.end];
                let left = cell.starts_with(':');
                let right = cell.len() > 1 && cell.ends_with(':');
                let dashes = &cell[usize::from(left)..cell.len() - usize::from(right)];
                if dashes.is_empty() || !dashes.bytes().all(|c| c == b'-') {
                    return None;
                }
                Some(match (left, right) {
                    (true, true) => Alignment::Center,
                    (true, false) => Alignment::Left,
                    (false, true) => Alignment::Right,
                    (false, false) => Alignment::None,
                })
            })
            .collect()
    }
}

fn trim(b: &[u8], mut start: usize, mut end: usize) -> Span {
    while start < end && matches!(b[start], b' ' | b'\t') {
        start += 1;
    }
    while end > start && matches!(b[end - 1], b' ' | b'\t') {
        end -= 1;
    }
    Span::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(line: &str) -> Vec<&str> {
        Table::cells(line)
            .into_iter()
            .map(|sp| &line[sp.start..sp.end])
            .collect()
    }

    #[test]
    fn cells_with_and_without_outer_pipes() {
        assert_eq!(texts("| a | b |"), vec!["a", "b"]);
        assert_eq!(texts("a | b"), vec!["a", "b"]);
        assert_eq!(texts("| a |  |"), vec!["a", ""]);
    }

    #[test]
    fn escaped_pipe_stays_in_cell() {
        assert_eq!(texts(r"| a \| b | c |"), vec![r"a \| b", "c"]);
    }

    #[test]
    fn delimiter_rows() {
        assert_eq!(
            Table::delimiter_row("| :-- | :-: | --: | --- |"),
            Some(vec![
                Alignment::Left,
                Alignment::Center,
                Alignment::Right,
                Alignment::None
            ])
        );
        assert_eq!(Table::delimiter_row("| a | --- |"), None);
        assert_eq!(Table::delimiter_row("| : |"), None);
    }

    #[test]
    fn separator_detection() {
        assert!(Table::has_separator("a | b"));
        assert!(!Table::has_separator(r"a \| b"));
    }
}
