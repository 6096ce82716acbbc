//! View — frame composition.
//!
//! Builds a complete terminal frame as bytes in an output buffer:
//! hide the cursor, home, draw every screen row (document text, the
//! welcome banner, or a `~` filler), park the cursor at its logical
//! position, show it again. The caller flushes the buffer in one write.
//!
//! Per-row erase (`EL`) replaces a full-screen clear in the steady
//! state: each drawn row wipes its own tail, so nothing stale survives
//! without the flash a full clear causes. The one full clear happens at
//! session start and teardown, outside the frame path.

use std::io::{self, Write};

use tilde_term::ansi;

use crate::cursor::{Bounds, Cursor};
use crate::row::{Document, truncate_to_width};

/// Banner shown on an empty document, a third of the way down.
const WELCOME: &str = concat!("tilde editor -- version ", env!("CARGO_PKG_VERSION"));

/// Compose one complete frame into `w`.
///
/// Emission order matters: the cursor is hidden for the duration of the
/// redraw (no ghost cursor mid-frame), repositioned to its logical cell
/// only after all rows are drawn, and shown last.
///
/// # Errors
///
/// Propagates writer errors; infallible when `w` is an in-memory buffer.
pub fn compose_frame(
    w: &mut impl Write,
    doc: &Document,
    cursor: Cursor,
    bounds: Bounds,
) -> io::Result<()> {
    ansi::cursor_hide(w)?;
    ansi::cursor_home(w)?;
    draw_rows(w, doc, bounds)?;
    ansi::cursor_to(w, cursor.x, cursor.y)?;
    ansi::cursor_show(w)?;
    Ok(())
}

/// Draw every screen row.
///
/// Each row is followed by an erase-to-end-of-line; every row except the
/// last is terminated with `\r\n` (a newline on the bottom row would
/// scroll the screen).
fn draw_rows(w: &mut impl Write, doc: &Document, bounds: Bounds) -> io::Result<()> {
    let rows = usize::from(bounds.rows);
    let cols = usize::from(bounds.cols);

    for y in 0..rows {
        if let Some(row) = doc.row(y) {
            w.write_all(row.visible(cols).as_bytes())?;
        } else if doc.is_empty() && y == rows / 3 {
            draw_welcome(w, cols)?;
        } else {
            w.write_all(b"~")?;
        }

        ansi::erase_line(w)?;
        if y + 1 < rows {
            w.write_all(b"\r\n")?;
        }
    }
    Ok(())
}

/// Draw the welcome banner, centered, with the filler tilde kept at the
/// left edge when there is room for it.
fn draw_welcome(w: &mut impl Write, cols: usize) -> io::Result<()> {
    let banner = truncate_to_width(WELCOME, cols);

    let mut padding = cols.saturating_sub(banner.len()) / 2;
    if padding > 0 {
        w.write_all(b"~")?;
        padding -= 1;
    }
    for _ in 0..padding {
        w.write_all(b" ")?;
    }
    w.write_all(banner.as_bytes())
}

// -- Tests ------------------------------------------------------------------
