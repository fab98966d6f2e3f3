use std::ops::Range;

use crate::model::{Point, TextRange};

/// Maps byte offsets of a document to line/column points.
/// Columns count UTF-16 code units, as editors expect.
pub(crate) struct LineMap<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineMap<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    pub fn point(&self, offset: usize) -> Point {
        let offset = offset.min(self.text.len());
        match self.line_starts.binary_search(&offset) {
            Ok(line) => Point {
                line: line as u32,
                col: 0,
            },
            Err(next_line_idx) => {
                let line = next_line_idx - 1;
                let line_start = self.line_starts[line];
                let col = self.text[line_start..offset].encode_utf16().count();
                Point {
                    line: line as u32,
                    col: col as u32,
                }
            }
        }
    }

    pub fn range(&self, span: Range<usize>) -> TextRange {
        TextRange {
            start: self.point(span.start),
            end: self.point(span.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_on_later_lines() {
        let text = "first\nsecond line\n";
        let map = LineMap::new(text);

        assert_eq!(map.point(0), Point { line: 0, col: 0 });
        assert_eq!(map.point(6), Point { line: 1, col: 0 });
        assert_eq!(map.point(9), Point { line: 1, col: 3 });
    }

    #[test]
    fn test_columns_count_utf16_units() {
        let text = "和[[a]]";
        let map = LineMap::new(text);

        // "和" is 3 bytes but a single UTF-16 unit
        assert_eq!(map.point(3), Point { line: 0, col: 1 });
        assert_eq!(
            map.range(3..text.len()),
            TextRange {
                start: Point { line: 0, col: 1 },
                end: Point { line: 0, col: 6 },
            }
        );
    }
}
