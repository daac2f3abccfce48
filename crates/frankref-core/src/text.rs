//! Offset bookkeeping
//!
//! Scanners match on byte offsets but spans are expressed in characters;
//! editors want line/column pairs with UTF-16 columns. The helpers here
//! convert between the three.

/// Incremental byte-to-character offset converter
///
/// Scanners emit matches in ascending order, so the cursor only ever counts
/// the characters between the previous match and the next one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCursor {
    byte: usize,
    chars: usize,
}

impl CharCursor {
    /// Character offset of `byte`, which must lie on a char boundary of `text`
    pub fn char_offset(&mut self, text: &str, byte: usize) -> usize {
        if byte < self.byte {
            *self = Self::default();
        }
        self.chars += text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// Zero-based line/column position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePosition {
    pub line: usize,
    /// Column in characters
    pub column: usize,
    /// Column in UTF-16 code units, as LSP clients expect
    pub utf16_column: usize,
}

#[derive(Debug, Clone, Copy)]
struct LineStart {
    byte: usize,
    char: usize,
}

/// Maps character offsets of a text to line/column positions
pub struct LineIndex<'t> {
    text: &'t str,
    lines: Vec<LineStart>,
}

impl<'t> LineIndex<'t> {
    pub fn new(text: &'t str) -> Self {
        let mut lines = vec![LineStart { byte: 0, char: 0 }];
        for (chars, (byte, ch)) in text.char_indices().enumerate() {
            if ch == '\n' {
                lines.push(LineStart {
                    byte: byte + 1,
                    char: chars + 1,
                });
            }
        }
        Self { text, lines }
    }

    /// Number of lines in the text
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Position of a character offset; offsets past the end clamp to the last line
    pub fn position(&self, offset: usize) -> LinePosition {
        let line = self.lines.partition_point(|l| l.char <= offset) - 1;
        let start = self.lines[line];
        let column = offset - start.char;
        let utf16_column = self.text[start.byte..]
            .chars()
            .take(column)
            .map(char::len_utf16)
            .sum();

        LinePosition {
            line,
            column,
            utf16_column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_cursor_ascii() {
        let text = "<Forward path=\"x\"/>";
        let mut cursor = CharCursor::default();
        assert_eq!(cursor.char_offset(text, 1), 1);
        assert_eq!(cursor.char_offset(text, 9), 9);
    }

    #[test]
    fn test_char_cursor_multibyte() {
        let text = "é<Adapter/>";
        let mut cursor = CharCursor::default();
        // 'é' is two bytes but one character
        assert_eq!(cursor.char_offset(text, 2), 1);
        assert_eq!(cursor.char_offset(text, text.len()), 11);
    }

    #[test]
    fn test_char_cursor_rewinds() {
        let text = "abcdef";
        let mut cursor = CharCursor::default();
        assert_eq!(cursor.char_offset(text, 5), 5);
        assert_eq!(cursor.char_offset(text, 2), 2);
    }

    #[test]
    fn test_line_index_positions() {
        let text = "line1\nline2\nline3";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 3);
        let pos = index.position(7);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
        assert_eq!(index.position(0).line, 0);
        assert_eq!(index.position(12).line, 2);
        assert_eq!(index.position(12).column, 0);
    }

    #[test]
    fn test_line_index_utf16_columns() {
        // U+1F600 is one char but two UTF-16 units
        let text = "a😀<Forward/>";
        let index = LineIndex::new(text);

        let pos = index.position(2);
        assert_eq!(pos.column, 2);
        assert_eq!(pos.utf16_column, 3);
    }
}
