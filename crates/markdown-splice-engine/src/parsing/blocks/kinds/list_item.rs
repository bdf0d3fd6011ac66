use crate::tree::ListKind;

/// Bullet (`-`, `+`, `*`) and ordered (`1.`, `1)`) list item markers.
pub struct ListItem;

impl ListItem {
    pub const BULLETS: [u8; 3] = [b'-', b'+', b'*'];
    pub const MAX_DIGITS: usize = 9;

    /// Recognizes a list marker at the start of `rest`. Returns the list kind
    /// and the marker's byte length. The marker must be followed by a space,
    /// a tab or the end of the line.
    pub fn marker(rest: &str) -> Option<(ListKind, usize)> {
        let b = rest.as_bytes();
        let first = *b.first()?;
        let (kind, width) = if Self::BULLETS.contains(&first) {
            (
                ListKind::Bullet {
                    marker: first as char,
                },
                1,
            )
        } else {
            let digits = b.iter().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 || digits > Self::MAX_DIGITS {
                return None;
            }
            let delimiter = *b.get(digits)?;
            if delimiter != b'.' && delimiter != b')' {
                return None;
            }
            let start = rest[..digits].parse().ok()?;
            (
                ListKind::Ordered {
                    start,
                    delimiter: delimiter as char,
                },
                digits + 1,
            )
        };
        match b.get(width) {
            None | Some(b' ' | b'\t') => Some((kind, width)),
            _ => None,
        }
    }

    /// Whether a marker may start a list item in the middle of a paragraph:
    /// the item must not be empty and an ordered item must start at 1.
    pub fn can_interrupt_paragraph(kind: ListKind, content_is_blank: bool) -> bool {
        if content_is_blank {
            return false;
        }
        match kind {
            ListKind::Bullet { .. } => true,
            ListKind::Ordered { start, .. } => start == 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("- a", Some((ListKind::Bullet { marker: '-' }, 1)))]
    #[case("*", Some((ListKind::Bullet { marker: '*' }, 1)))]
    #[case("12. x", Some((ListKind::Ordered { start: 12, delimiter: '.' }, 3)))]
    #[case("1)\tx", Some((ListKind::Ordered { start: 1, delimiter: ')' }, 2)))]
    #[case("-a", None)]
    #[case("1.x", None)]
    #[case("1234567890. x", None)]
    #[case("a. x", None)]
    fn markers(#[case] input: &str, #[case] expected: Option<(ListKind, usize)>) {
        assert_eq!(ListItem::marker(input), expected);
    }

    #[test]
    fn paragraph_interruption() {
        let bullet = ListKind::Bullet { marker: '-' };
        let one = ListKind::Ordered {
            start: 1,
            delimiter: '.',
        };
        let two = ListKind::Ordered {
            start: 2,
            delimiter: '.',
        };
        assert!(ListItem::can_interrupt_paragraph(bullet, false));
        assert!(!ListItem::can_interrupt_paragraph(bullet, true));
        assert!(ListItem::can_interrupt_paragraph(one, false));
        assert!(!ListItem::can_interrupt_paragraph(two, false));
    }
}
