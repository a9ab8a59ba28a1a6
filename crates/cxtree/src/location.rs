use std::fmt;

use line_index::LineIndex;
use text_size::{TextRange, TextSize};

/// A position in a unit's source text. `line` and `column` are 1-based;
/// columns count bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub offset: TextSize,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub(crate) fn new(lines: &LineIndex, offset: TextSize) -> Self {
        let line_col = lines.line_col(offset);
        Self { offset, line: line_col.line + 1, column: line_col.col + 1 }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open source range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub(crate) fn new(lines: &LineIndex, range: TextRange) -> Self {
        Self {
            start: SourceLocation::new(lines, range.start()),
            end: SourceLocation::new(lines, range.end()),
        }
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start.offset, self.end.offset)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use line_index::LineIndex;
    use text_size::{TextRange, TextSize};

    use super::{SourceLocation, SourceRange};

    #[test]
    fn lines_and_columns_are_one_based() {
        let lines = LineIndex::new("int x;\n  int y;\n");
        let start = SourceLocation::new(&lines, TextSize::from(0));
        assert_eq!((start.line, start.column), (1, 1));
        let y = SourceLocation::new(&lines, TextSize::from(13));
        assert_eq!((y.line, y.column), (2, 7));

        let range = SourceRange::new(&lines, TextRange::new(9.into(), 15.into()));
        assert_eq!(range.to_string(), "2:3-2:9");
        assert_eq!(range.range(), TextRange::new(9.into(), 15.into()));
    }
}
