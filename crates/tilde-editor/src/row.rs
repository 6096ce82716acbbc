//! Row and Document — the displayable text.
//!
//! A `Row` is one line of text with no terminating newline; a `Document`
//! is the ordered list of rows the view renders. Width handling is
//! display-aware: truncation to the terminal width counts character cell
//! widths (wide CJK glyphs take two cells), not bytes or chars, so a
//! truncated row never overflows the screen edge and never splits a
//! glyph in half.

use unicode_width::UnicodeWidthChar;

/// Truncate `text` to at most `max_cols` display columns.
///
/// Returns the longest prefix whose total display width fits. A wide
/// character that would straddle the limit is dropped entirely rather
/// than half-rendered.
#[must_use]
pub fn truncate_to_width(text: &str, max_cols: usize) -> &str {
    let mut used = 0usize;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_cols {
            return &text[..idx];
        }
        used += w;
    }
    text
}

/// One line of displayable text. Never contains `\n` or `\r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    text: String,
}

impl Row {
    /// Create a row from a line of text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The full text of the row.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The portion of the row that fits in `max_cols` display columns.
    #[inline]
    #[must_use]
    pub fn visible(&self, max_cols: usize) -> &str {
        truncate_to_width(&self.text, max_cols)
    }
}

/// The ordered rows the view renders.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rows: Vec<Row>,
}

impl Document {
    /// An empty document (renders as all filler rows plus the banner).
    #[must_use]
    pub const fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// A document holding a single line.
    #[must_use]
    pub fn from_line(line: impl Into<String>) -> Self {
        Self {
            rows: vec![Row::new(line)],
        }
    }

    /// The row at screen line `y`, if the document has one there.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&Row> {
        self.rows.get(y)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// -- Tests ------------------------------------------------------------------
