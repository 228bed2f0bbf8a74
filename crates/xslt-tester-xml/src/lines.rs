//! Byte offset to line lookups.

/// Line-break index over a source string.
///
/// Scans the content once; lookups are a binary search over the
/// newline positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offsets of each newline character.
    line_breaks: Vec<usize>,

    /// Total length of the content in bytes.
    total_length: usize,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let line_breaks: Vec<usize> = content
            .char_indices()
            .filter_map(|(idx, ch)| if ch == '\n' { Some(idx) } else { None })
            .collect();

        LineIndex {
            line_breaks,
            total_length: content.len(),
        }
    }

    /// 1-based line containing `offset`.
    ///
    /// A newline belongs to the line it terminates. Offsets past the end
    /// are clamped to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.total_length);
        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx,
        };
        row + 1
    }
}
