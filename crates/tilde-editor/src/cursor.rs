//! Cursor — bounded position tracking on the screen grid.
//!
//! The `Cursor` is a pure value type: a 0-indexed `(x, y)` cell position
//! plus movement that never leaves the rectangle described by `Bounds`.
//! Every movement key maps to a pure transition — the cursor does not
//! know about the terminal, the document, or rendering.
//!
//! # Clamping, not wrapping
//!
//! Movement at an edge is absorbed: Left at column 0 stays at column 0,
//! Down on the last row stays on the last row. No wrapping to the
//! previous/next line, no scrolling. The visible screen is the entire
//! coordinate space.

use tilde_term::key::Key;

/// The rectangle a cursor may occupy: columns `0..cols`, rows `0..rows`.
///
/// Both dimensions are always > 0 (they come from a successful terminal
/// size query).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub cols: u16,
    pub rows: u16,
}

impl Bounds {
    /// Largest valid x coordinate.
    #[inline]
    #[must_use]
    pub const fn max_x(self) -> u16 {
        self.cols.saturating_sub(1)
    }

    /// Largest valid y coordinate.
    #[inline]
    #[must_use]
    pub const fn max_y(self) -> u16 {
        self.rows.saturating_sub(1)
    }
}

/// A cursor position on the screen grid, 0-indexed from the top-left.
///
/// Lightweight value type. Movement methods consume and return `Self`;
/// the bounds are passed as a parameter rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Column, 0-indexed from the left edge.
    pub x: u16,
    /// Row, 0-indexed from the top.
    pub y: u16,
}

impl Cursor {
    /// A cursor at the top-left corner.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a cursor at a specific cell.
    #[must_use]
    pub const fn at(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    // -- Movement -----------------------------------------------------------

    /// Apply one movement key, clamped to `bounds`.
    ///
    /// Keys that are not movement keys leave the cursor unchanged, so the
    /// caller can route every key through here without pre-filtering.
    #[must_use]
    pub fn step(self, key: Key, bounds: Bounds) -> Self {
        match key {
            Key::Left => Self {
                x: self.x.saturating_sub(1),
                ..self
            },
            Key::Right => Self {
                x: (self.x + 1).min(bounds.max_x()),
                ..self
            },
            Key::Up => Self {
                y: self.y.saturating_sub(1),
                ..self
            },
            Key::Down => Self {
                y: (self.y + 1).min(bounds.max_y()),
                ..self
            },
            Key::Home => Self { x: 0, ..self },
            Key::End => Self {
                x: bounds.max_x(),
                ..self
            },
            Key::PageUp => Self { y: 0, ..self },
            Key::PageDown => Self {
                y: bounds.max_y(),
                ..self
            },
            _ => self,
        }
    }
}

// -- Tests ------------------------------------------------------------------
