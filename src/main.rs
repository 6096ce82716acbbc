// SPDX-License-Identifier: MIT
//
// tilde — a minimal screen-oriented terminal text editor.
//
// This is the main binary that wires together the crates:
//
//   tilde-term   → raw-mode session, key decoding, ANSI, frame buffer
//   tilde-editor → cursor model, rows, frame composition
//
// The loop is synchronous and single-threaded. Each iteration:
//
//   compose frame → one write to stdout → block on one key → dispatch
//
// Dispatch mutates only the editor's own state (cursor position, quit
// flag); all terminal side effects happen in the refresh step. Ctrl-Q
// exits. On any exit path — clean quit, error, panic — the terminal is
// restored to its original line discipline before the process ends.

use std::env;
use std::process;

use tilde_editor::cursor::{Bounds, Cursor};
use tilde_editor::row::Document;
use tilde_editor::view;

use tilde_term::ansi;
use tilde_term::error::Result;
use tilde_term::key::{Key, TtyReader};
use tilde_term::output::OutputBuffer;
use tilde_term::terminal::Terminal;

// ─── Editor ─────────────────────────────────────────────────────────────────

/// What the loop should do after dispatching a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
}

/// The editor application state.
///
/// Holds the display model: the document being shown, the cursor's cell
/// position, and the screen dimensions everything is clamped to. Owns no
/// terminal resources — those stay in `main` so restoration does not
/// depend on this struct's lifetime.
struct Editor {
    document: Document,
    cursor: Cursor,
    bounds: Bounds,
    frame: OutputBuffer,
}

impl Editor {
    /// Create an editor showing `document` on a screen of `bounds`.
    fn new(document: Document, bounds: Bounds) -> Self {
        Self {
            document,
            cursor: Cursor::ORIGIN,
            bounds,
            frame: OutputBuffer::new(),
        }
    }

    /// Apply one key to the editor state.
    ///
    /// Movement keys step the cursor within bounds; Ctrl-Q quits; every
    /// other key is ignored.
    fn dispatch(&mut self, key: Key) -> Action {
        match key {
            Key::Ctrl('q') => Action::Quit,
            _ => {
                self.cursor = self.cursor.step(key, self.bounds);
                Action::Continue
            }
        }
    }

    /// Compose the current frame and write it to the terminal in one go.
    fn refresh(&mut self) -> Result<()> {
        self.frame.clear();
        view::compose_frame(&mut self.frame, &self.document, self.cursor, self.bounds)?;
        self.frame.flush_stdout()?;
        Ok(())
    }

    /// The main loop: paint, read one key, dispatch. Returns on Ctrl-Q.
    fn run(&mut self, keys: &mut TtyReader) -> Result<()> {
        loop {
            self.refresh()?;
            let key = keys.read_key()?;
            if self.dispatch(key) == Action::Quit {
                return Ok(());
            }
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

/// Run the editor session. Split from `main` so the terminal guard's
/// teardown can be sequenced explicitly around the outcome.
fn session() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let document = if args.len() > 1 {
        // File loading comes later; any argument shows the demo line.
        Document::from_line("Hello, world")
    } else {
        Document::empty()
    };

    let mut terminal = Terminal::new();
    terminal.enter_raw()?;

    // Size query after entering raw mode: the cursor-report fallback
    // needs the unechoed input stream.
    let outcome = terminal.size().and_then(|size| {
        let bounds = Bounds {
            cols: size.cols,
            rows: size.rows,
        };
        let mut keys = TtyReader::new();
        Editor::new(document, bounds).run(&mut keys)
    });

    // Leave a clean screen behind regardless of how the session ended.
    {
        use std::io::Write;
        let mut stdout = std::io::stdout().lock();
        let _ = ansi::clear_screen(&mut stdout);
        let _ = ansi::cursor_home(&mut stdout);
        let _ = stdout.flush();
    }

    // Restore before surfacing the session outcome; a restore failure
    // is itself fatal (the shell would inherit a broken terminal).
    terminal.restore()?;
    outcome
}

fn main() {
    if let Err(e) = session() {
        eprintln!("tilde: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tilde_term::key::{Decoded, Decoder};

    const BOUNDS: Bounds = Bounds { cols: 80, rows: 24 };

    fn editor() -> Editor {
        Editor::new(Document::empty(), BOUNDS)
    }

    /// Feed raw terminal bytes through the decoder and dispatch every
    /// resulting key, returning the final action.
    fn feed(e: &mut Editor, bytes: &[u8]) -> Action {
        let mut decoder = Decoder::new();
        let mut action = Action::Continue;
        for &b in bytes {
            if let Decoded::Key(key) = decoder.advance(b) {
                action = e.dispatch(key);
            }
        }
        action
    }

    #[test]
    fn ctrl_q_quits() {
        let mut e = editor();
        assert_eq!(e.dispatch(Key::Ctrl('q')), Action::Quit);
    }

    #[test]
    fn other_ctrl_chords_do_not_quit() {
        let mut e = editor();
        assert_eq!(e.dispatch(Key::Ctrl('c')), Action::Continue);
        assert_eq!(e.dispatch(Key::Ctrl('z')), Action::Continue);
    }

    #[test]
    fn printable_keys_are_ignored() {
        let mut e = editor();
        assert_eq!(e.dispatch(Key::Char('q')), Action::Continue);
        assert_eq!(e.cursor, Cursor::ORIGIN);
    }

    #[test]
    fn arrows_move_the_cursor() {
        let mut e = editor();
        e.dispatch(Key::Right);
        e.dispatch(Key::Right);
        e.dispatch(Key::Down);
        assert_eq!(e.cursor, Cursor::at(2, 1));
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut e = editor();
        for _ in 0..100 {
            e.dispatch(Key::Right);
        }
        assert_eq!(e.cursor, Cursor::at(79, 0));
        for _ in 0..100 {
            e.dispatch(Key::Up);
        }
        assert_eq!(e.cursor, Cursor::ORIGIN);
    }

    #[test]
    fn raw_byte_session_two_rights_then_quit() {
        // Two right-arrow sequences followed by Ctrl-Q, exactly as a
        // terminal would deliver them.
        let mut e = editor();
        let action = feed(&mut e, b"\x1b[C\x1b[C\x11");
        assert_eq!(e.cursor, Cursor::at(2, 0));
        assert_eq!(action, Action::Quit);
    }

    #[test]
    fn refresh_composes_a_frame() {
        let mut e = editor();
        e.frame.clear();
        view::compose_frame(&mut e.frame, &e.document, e.cursor, e.bounds).unwrap();
        assert!(!e.frame.is_empty());
        let bytes = e.frame.as_bytes();
        assert!(bytes.starts_with(b"\x1b[?25l"));
        assert!(bytes.ends_with(b"\x1b[?25h"));
    }
}
