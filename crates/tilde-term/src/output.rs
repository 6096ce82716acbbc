// SPDX-License-Identifier: MIT
//
// Frame output buffering.
//
// OutputBuffer accumulates all ANSI bytes for one frame in memory so the
// entire frame can be written in a single write() syscall. Writing a frame
// piecemeal lets the terminal repaint mid-frame — visible as flicker and,
// worse, a misplaced cursor if the write tears between a position sequence
// and its content. One buffer, one write, one coherent frame.
//
// The buffer is append-only while a frame is being assembled; flushing
// writes everything and clears it for the next frame (keeping capacity).

use std::io::{self, Write};

/// A byte buffer that accumulates ANSI output for a single `write()` syscall.
///
/// Default capacity: 4 KB — enough for a full frame on a typical terminal
/// (rows × (cols + a few escape bytes per row)) without reallocation.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 4096;

impl OutputBuffer {
    /// Create an empty buffer with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write the accumulated frame to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails. A short write surfaces
    /// as `WriteZero` from `write_all` — a torn frame corrupts the display,
    /// so the caller must treat this as fatal.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&self.buf)?;
            stdout.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Write the accumulated frame to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing via flush_stdout() / flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_is_empty() {
        let buf = OutputBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn write_trait_appends() {
        let mut buf = OutputBuffer::new();
        write!(buf, "row {}", 42).unwrap();
        assert_eq!(buf.as_bytes(), b"row 42");
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn writes_accumulate_in_order() {
        let mut buf = OutputBuffer::new();
        buf.write_all(b"\x1b[?25l").unwrap();
        buf.write_all(b"~").unwrap();
        buf.write_all(b"\x1b[K").unwrap();
        assert_eq!(buf.as_bytes(), b"\x1b[?25l~\x1b[K");
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = OutputBuffer::new();
        write!(buf, "some frame data").unwrap();
        let cap = buf.buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.buf.capacity(), cap);
    }

    #[test]
    fn flush_to_writes_everything_once() {
        let mut buf = OutputBuffer::new();
        write!(buf, "frame data").unwrap();

        let mut dest = Vec::new();
        buf.flush_to(&mut dest).unwrap();

        assert_eq!(dest, b"frame data");
        assert!(buf.is_empty()); // cleared after flush
    }

    #[test]
    fn flush_to_empty_is_noop() {
        let mut buf = OutputBuffer::new();
        let mut dest = Vec::new();
        buf.flush_to(&mut dest).unwrap();
        assert!(dest.is_empty());
    }

    #[test]
    fn buffer_reusable_across_frames() {
        let mut buf = OutputBuffer::new();
        let mut dest = Vec::new();

        write!(buf, "frame one").unwrap();
        buf.flush_to(&mut dest).unwrap();
        write!(buf, "frame two").unwrap();
        buf.flush_to(&mut dest).unwrap();

        assert_eq!(dest, b"frame oneframe two");
    }
}
