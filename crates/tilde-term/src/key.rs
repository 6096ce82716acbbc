// SPDX-License-Identifier: MIT
//
// Key input decoding.
//
// The terminal delivers keys as bytes: printable characters arrive as
// themselves, control chords as bytes 0x01-0x1A, and navigation keys as
// multi-byte escape sequences (CSI `ESC [ ...` or SS3 `ESC O ...`). The
// decoder here is an incremental state machine: feed it bytes one at a
// time with advance(), and it emits a logical Key as soon as the bytes
// seen so far resolve to one.
//
// The hard case is a lone ESC. The byte 0x1B is both the Escape key AND
// the first byte of every arrow/navigation sequence, and the only thing
// that distinguishes them is whether more bytes follow promptly. The
// decoder cannot know that; the reader can, because raw mode's read
// timeout (VMIN=0/VTIME=1) bounds how long a sequence continuation can
// take to arrive. So the decoder reports Incomplete for a partial
// sequence, and the reader calls flush() on timeout to resolve whatever
// is pending as the Escape key. A truncated or unrecognized sequence
// resolves the same way — to Escape — rather than leaking raw bytes
// through as spurious input.

use std::collections::VecDeque;
use std::io;

use crate::terminal::read_stdin_byte;

// ─── Key ─────────────────────────────────────────────────────────────────────

/// A logical key, decoded from the terminal's raw byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character (or any byte outside the control range).
    Char(char),
    /// A control chord: `Ctrl('q')` for Ctrl-Q, etc. The letter is
    /// always lowercase.
    Ctrl(char),
    /// The Escape key — or a sequence that could not be recognized.
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Result of feeding one byte to the [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// The bytes seen so far resolved to a key.
    Key(Key),
    /// Mid-sequence; feed more bytes (or flush on timeout).
    Incomplete,
}

/// Incremental escape-sequence decoder.
///
/// Feed bytes with [`advance`](Self::advance). Bytes that begin an escape
/// sequence are held internally until the sequence resolves; everything
/// else decodes immediately. [`flush`](Self::flush) resolves any held
/// bytes as [`Key::Escape`] — call it when a read timeout proves no
/// continuation is coming.
#[derive(Debug, Default)]
pub struct Decoder {
    /// Bytes of a partially-received escape sequence, starting with ESC.
    /// Empty when not mid-sequence.
    pending: Vec<u8>,
}

impl Decoder {
    /// Create a decoder with no pending state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Whether a partial escape sequence is being held.
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Feed one byte.
    pub fn advance(&mut self, byte: u8) -> Decoded {
        if self.pending.is_empty() {
            if byte == 0x1b {
                self.pending.push(byte);
                return Decoded::Incomplete;
            }
            return Decoded::Key(decode_single(byte));
        }

        self.pending.push(byte);
        match decode_escape(&self.pending) {
            Escape::Key(key) => {
                self.pending.clear();
                Decoded::Key(key)
            }
            Escape::Incomplete => Decoded::Incomplete,
        }
    }

    /// Resolve any held partial sequence as [`Key::Escape`].
    ///
    /// Returns `None` if nothing was pending. Called on read timeout:
    /// if no continuation byte arrived within the timeout window, the
    /// held ESC was the Escape key itself.
    pub fn flush(&mut self) -> Option<Key> {
        if self.pending.is_empty() {
            None
        } else {
            self.pending.clear();
            Some(Key::Escape)
        }
    }
}

/// Decode a byte that is not part of an escape sequence.
fn decode_single(byte: u8) -> Key {
    match byte {
        // Control chords: Ctrl-A through Ctrl-Z occupy 0x01-0x1A (the
        // terminal strips bits 5 and 6 of the letter).
        0x01..=0x1a => Key::Ctrl((byte - 0x01 + b'a') as char),
        _ => Key::Char(byte as char),
    }
}

/// Outcome of attempting to decode a held escape sequence.
enum Escape {
    Key(Key),
    Incomplete,
}

/// Decode a buffered escape sequence. `buf[0]` is always ESC.
fn decode_escape(buf: &[u8]) -> Escape {
    debug_assert_eq!(buf[0], 0x1b);

    if buf.len() < 2 {
        return Escape::Incomplete;
    }
    match buf[1] {
        b'[' => decode_csi(buf),
        b'O' => decode_ss3(buf),
        // ESC followed by anything else is not a sequence we speak.
        _ => Escape::Key(Key::Escape),
    }
}

/// Decode a CSI sequence: `ESC [ <final>` or `ESC [ <digit> ~`.
fn decode_csi(buf: &[u8]) -> Escape {
    if buf.len() < 3 {
        return Escape::Incomplete;
    }
    match buf[2] {
        b'A' => Escape::Key(Key::Up),
        b'B' => Escape::Key(Key::Down),
        b'C' => Escape::Key(Key::Right),
        b'D' => Escape::Key(Key::Left),
        b'H' => Escape::Key(Key::Home),
        b'F' => Escape::Key(Key::End),
        b'0'..=b'9' => {
            // vt220-style: ESC [ <n> ~
            if buf.len() < 4 {
                return Escape::Incomplete;
            }
            if buf[3] == b'~' {
                Escape::Key(match buf[2] {
                    b'1' | b'7' => Key::Home,
                    b'3' => Key::Delete,
                    b'4' | b'8' => Key::End,
                    b'5' => Key::PageUp,
                    b'6' => Key::PageDown,
                    _ => Key::Escape,
                })
            } else {
                Escape::Key(Key::Escape)
            }
        }
        _ => Escape::Key(Key::Escape),
    }
}

/// Decode an SS3 sequence: `ESC O <final>` (application cursor mode
/// Home/End on some terminals).
fn decode_ss3(buf: &[u8]) -> Escape {
    if buf.len() < 3 {
        return Escape::Incomplete;
    }
    match buf[2] {
        b'H' => Escape::Key(Key::Home),
        b'F' => Escape::Key(Key::End),
        _ => Escape::Key(Key::Escape),
    }
}

// ─── TtyReader ───────────────────────────────────────────────────────────────

/// Blocking key reader over raw-mode stdin.
///
/// Couples the [`Decoder`] with the raw-mode read policy: each underlying
/// `read()` returns one byte or times out after 100 ms, and a timeout
/// while a partial escape sequence is held resolves it as the Escape key.
/// [`read_key`](Self::read_key) loops until a full key is available, so
/// callers never observe the byte-level granularity.
#[derive(Debug, Default)]
pub struct TtyReader {
    decoder: Decoder,
    /// Keys decoded but not yet handed out. Normally at most one deep.
    ready: VecDeque<Key>,
}

impl TtyReader {
    /// Create a reader with no buffered input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoder: Decoder::new(),
            ready: VecDeque::new(),
        }
    }

    /// Block until one logical key is available and return it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying terminal read fails;
    /// read timeouts are absorbed internally.
    pub fn read_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = self.ready.pop_front() {
                return Ok(key);
            }

            match read_stdin_byte()? {
                Some(byte) => {
                    if let Decoded::Key(key) = self.decoder.advance(byte) {
                        self.ready.push_back(key);
                    }
                }
                None => {
                    // Timeout. A pending partial sequence is now known
                    // to be a bare Escape press.
                    if let Some(key) = self.decoder.flush() {
                        self.ready.push_back(key);
                    }
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Feed a byte slice and collect every key emitted, flushing at the end.
    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut decoder = Decoder::new();
        let mut keys = Vec::new();
        for &b in bytes {
            if let Decoded::Key(key) = decoder.advance(b) {
                keys.push(key);
            }
        }
        if let Some(key) = decoder.flush() {
            keys.push(key);
        }
        keys
    }

    // ── Single bytes ────────────────────────────────────────────────

    #[test]
    fn printable_ascii_decodes_as_char() {
        assert_eq!(decode_all(b"a"), vec![Key::Char('a')]);
        assert_eq!(decode_all(b"Z"), vec![Key::Char('Z')]);
        assert_eq!(decode_all(b" "), vec![Key::Char(' ')]);
        assert_eq!(decode_all(b"~"), vec![Key::Char('~')]);
    }

    #[test]
    fn control_bytes_decode_as_ctrl_chords() {
        assert_eq!(decode_all(&[0x01]), vec![Key::Ctrl('a')]);
        assert_eq!(decode_all(&[0x11]), vec![Key::Ctrl('q')]);
        assert_eq!(decode_all(&[0x1a]), vec![Key::Ctrl('z')]);
    }

    #[test]
    fn nul_byte_is_a_char_not_a_chord() {
        // 0x00 is outside the Ctrl-A..Ctrl-Z range.
        assert_eq!(decode_all(&[0x00]), vec![Key::Char('\0')]);
    }

    #[test]
    fn byte_above_ctrl_range_is_char() {
        assert_eq!(decode_all(&[0x1f]), vec![Key::Char('\x1f')]);
        assert_eq!(decode_all(&[0x7f]), vec![Key::Char('\x7f')]);
    }

    // ── CSI arrow keys ─────────────────────────────────────────────

    #[test]
    fn csi_arrows() {
        assert_eq!(decode_all(b"\x1b[A"), vec![Key::Up]);
        assert_eq!(decode_all(b"\x1b[B"), vec![Key::Down]);
        assert_eq!(decode_all(b"\x1b[C"), vec![Key::Right]);
        assert_eq!(decode_all(b"\x1b[D"), vec![Key::Left]);
    }

    #[test]
    fn csi_home_end() {
        assert_eq!(decode_all(b"\x1b[H"), vec![Key::Home]);
        assert_eq!(decode_all(b"\x1b[F"), vec![Key::End]);
    }

    // ── vt220 tilde sequences ──────────────────────────────────────

    #[test]
    fn tilde_sequences() {
        assert_eq!(decode_all(b"\x1b[1~"), vec![Key::Home]);
        assert_eq!(decode_all(b"\x1b[3~"), vec![Key::Delete]);
        assert_eq!(decode_all(b"\x1b[4~"), vec![Key::End]);
        assert_eq!(decode_all(b"\x1b[5~"), vec![Key::PageUp]);
        assert_eq!(decode_all(b"\x1b[6~"), vec![Key::PageDown]);
        assert_eq!(decode_all(b"\x1b[7~"), vec![Key::Home]);
        assert_eq!(decode_all(b"\x1b[8~"), vec![Key::End]);
    }

    #[test]
    fn unknown_tilde_parameter_is_escape() {
        assert_eq!(decode_all(b"\x1b[2~"), vec![Key::Escape]);
        assert_eq!(decode_all(b"\x1b[9~"), vec![Key::Escape]);
    }

    #[test]
    fn digit_without_tilde_terminator_is_escape() {
        assert_eq!(decode_all(b"\x1b[5x"), vec![Key::Escape]);
    }

    // ── SS3 sequences ──────────────────────────────────────────────

    #[test]
    fn ss3_home_end() {
        assert_eq!(decode_all(b"\x1bOH"), vec![Key::Home]);
        assert_eq!(decode_all(b"\x1bOF"), vec![Key::End]);
    }

    #[test]
    fn unknown_ss3_final_is_escape() {
        assert_eq!(decode_all(b"\x1bOZ"), vec![Key::Escape]);
    }

    // ── Unrecognized and truncated sequences ───────────────────────

    #[test]
    fn unknown_csi_final_is_escape() {
        assert_eq!(decode_all(b"\x1b[Z"), vec![Key::Escape]);
    }

    #[test]
    fn esc_followed_by_ordinary_byte_is_escape() {
        // The trailing byte is consumed as part of the failed sequence.
        assert_eq!(decode_all(b"\x1bx"), vec![Key::Escape]);
    }

    #[test]
    fn bare_escape_resolves_on_flush() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.advance(0x1b), Decoded::Incomplete);
        assert!(decoder.has_pending());
        assert_eq!(decoder.flush(), Some(Key::Escape));
        assert!(!decoder.has_pending());
    }

    #[test]
    fn truncated_csi_resolves_on_flush() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.advance(0x1b), Decoded::Incomplete);
        assert_eq!(decoder.advance(b'['), Decoded::Incomplete);
        assert_eq!(decoder.flush(), Some(Key::Escape));
    }

    #[test]
    fn flush_with_nothing_pending_is_none() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.flush(), None);
        assert_eq!(decoder.advance(b'a'), Decoded::Key(Key::Char('a')));
        assert_eq!(decoder.flush(), None);
    }

    // ── Streams ────────────────────────────────────────────────────

    #[test]
    fn decoder_recovers_after_sequence() {
        // Arrow, then a plain char, then a control chord.
        assert_eq!(
            decode_all(b"\x1b[Aq\x11"),
            vec![Key::Up, Key::Char('q'), Key::Ctrl('q')]
        );
    }

    #[test]
    fn back_to_back_sequences() {
        assert_eq!(
            decode_all(b"\x1b[C\x1b[C\x1b[5~"),
            vec![Key::Right, Key::Right, Key::PageUp]
        );
    }

    #[test]
    fn interleaved_text_and_navigation() {
        assert_eq!(
            decode_all(b"hi\x1b[D!"),
            vec![Key::Char('h'), Key::Char('i'), Key::Left, Key::Char('!')]
        );
    }
}
