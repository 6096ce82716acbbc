// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode and guaranteed restoration.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd reads/writes. These
// are the standard POSIX interfaces for terminal control — there is no
// safe alternative. Each unsafe block is minimal and documented.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. It captures the original
// termios once, applies a raw configuration (byte-at-a-time input, no echo,
// no signals, no output post-processing, 100 ms read timeout), and restores
// the original on every exit path: explicit restore(), Drop, and panic.
//
// The panic hook deserves special mention: it bypasses Rust's stdout lock
// entirely, writing a pre-built restore sequence directly to fd 1. This
// prevents deadlock if the panic happened while holding the stdout lock
// (common during frame flushing). One raw write, termios restored, then
// the original panic handler prints its message to a working terminal.
//
// Why not crossterm? A terminal left in raw mode is unusable by the shell
// that launched us; owning the restore path directly is the whole point
// of this layer, not something to delegate to an abstraction.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::error::{Error, Result};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells. Both fields are always > 0
/// when produced by [`Terminal::size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// reported dimensions are zero (some terminals answer the ioctl but
/// report 0 columns — the caller falls back to the cursor-report path).
#[cfg(unix)]
#[must_use]
pub fn query_winsize() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn query_winsize() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Read one byte from stdin, honoring the raw-mode read policy.
///
/// With `VMIN=0, VTIME=1` in effect, `read()` returns after at most
/// 100 ms even when no data is available. `Ok(None)` means the timeout
/// expired with nothing to read — a scheduling tick, not an error.
/// `EAGAIN` is folded into the same case. Any other failure is real.
#[cfg(unix)]
pub(crate) fn read_stdin_byte() -> io::Result<Option<u8>> {
    let mut byte: u8 = 0;
    let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast::<libc::c_void>(), 1) };

    match n {
        1 => Ok(Some(byte)),
        0 => Ok(None),
        _ => {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::WouldBlock {
                Ok(None)
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(not(unix))]
pub(crate) fn read_stdin_byte() -> io::Result<Option<u8>> {
    use std::io::Read;

    let mut byte = [0u8; 1];
    match io::stdin().lock().read(&mut byte)? {
        0 => Ok(None),
        _ => Ok(Some(byte[0])),
    }
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it. This global backup — behind a [`Mutex`], not `static mut` —
/// lets the hook restore raw mode without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Screen-reset sequence for emergency use: clear, home, show cursor.
///
/// Written before a panic message (and by the editor before a fatal
/// diagnostic) so the error prints on a clean screen instead of into the
/// middle of a half-drawn frame.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message. The hook
/// writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing Rust's stdout
/// lock to avoid deadlock), restores termios, then delegates to the
/// original panic handler so the error prints to a working terminal.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the screen-reset sequence directly to stdout's file descriptor.
///
/// Bypasses Rust's `io::stdout()` lock to avoid deadlocking if the panic
/// occurred while the lock was held (e.g., mid-frame flush).
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Raw-mode terminal session with guaranteed restoration.
///
/// Call [`enter_raw`](Self::enter_raw) to switch the controlling terminal
/// to raw mode. The original configuration is captured once and restored
/// exactly once — via [`restore`](Self::restore), Drop, or the panic hook,
/// whichever runs first.
///
/// # Example
///
/// ```no_run
/// use tilde_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter_raw()?;
/// let size = term.size()?;
/// // ... render frames, read keys ...
/// term.restore()?;
/// # Ok::<(), tilde_term::error::Error>(())
/// ```
pub struct Terminal {
    /// Original termios saved before entering raw mode. `None` once
    /// restored (restoration happens at most once per session).
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Whether raw mode is currently active.
    active: bool,
}

impl Terminal {
    /// Create a terminal handle. Does **not** touch the terminal —
    /// call [`enter_raw`](Self::enter_raw) for that.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            active: false,
        }
    }

    /// Whether raw mode is currently active.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter raw mode.
    ///
    /// Captures the current termios, then applies a configuration with:
    /// flow control, CR→NL translation, break signaling, parity checking,
    /// and 8th-bit stripping disabled on input; output post-processing
    /// disabled; 8-bit character cells; echo, canonical input, signal
    /// chords, and extended input processing disabled. Reads return after
    /// at most one available byte or a 100 ms timeout (`VMIN=0, VTIME=1`).
    ///
    /// Idempotent: calling while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`] if the termios query or apply fails
    /// (including stdin not being a terminal). On failure the session is
    /// not marked active and nothing needs restoring.
    #[cfg(unix)]
    pub fn enter_raw(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }

        if !is_tty() {
            return Err(Error::Terminal(io::Error::other(
                "stdin is not a terminal",
            )));
        }

        // Install the panic hook (once per process).
        install_panic_hook();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(Error::Terminal(io::Error::last_os_error()));
            }

            // Save the original for restore, and in the global backup
            // for the panic hook.
            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_iflag &= !(libc::BRKINT
                | libc::ICRNL
                | libc::INPCK
                | libc::ISTRIP
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);

            // VMIN=0, VTIME=1: read() returns as soon as any byte is
            // available, or after 100 ms with none. The timeout doubles
            // as the escape-sequence disambiguation window.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 1;

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) != 0 {
                self.original_termios = None;
                if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                    *guard = None;
                }
                return Err(Error::Terminal(io::Error::last_os_error()));
            }
        }

        self.active = true;
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn enter_raw(&mut self) -> Result<()> {
        install_panic_hook();
        self.active = true;
        Ok(())
    }

    /// Restore the original terminal configuration.
    ///
    /// Idempotent: the captured termios is re-applied at most once; a
    /// second call (or a Drop after an explicit restore) is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`] if the termios apply fails. The caller
    /// should report this and exit non-zero — a terminal stuck in raw
    /// mode is unusable by the invoking shell.
    #[cfg(unix)]
    pub fn restore(&mut self) -> Result<()> {
        self.active = false;

        if let Some(original) = self.original_termios.take() {
            // Clear the global backup first; even if tcsetattr fails we
            // must not retry from the panic hook (no recursion on a
            // failed restore).
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) != 0 {
                    return Err(Error::Terminal(io::Error::last_os_error()));
                }
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn restore(&mut self) -> Result<()> {
        self.active = false;
        Ok(())
    }

    /// The terminal's dimensions, both guaranteed > 0.
    ///
    /// Primary path: `ioctl(TIOCGWINSZ)`. If that is unavailable or
    /// reports zero columns, fall back to parking the cursor in the
    /// bottom-right corner and asking the terminal where it ended up
    /// via a device-status exchange (requires raw mode, since the
    /// response arrives unechoed on the input stream).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`] if neither path yields usable
    /// dimensions, or [`Error::Io`] if the exchange itself fails.
    pub fn size(&mut self) -> Result<Size> {
        if let Some(size) = query_winsize() {
            return Ok(size);
        }
        self.size_from_cursor_report()
    }

    /// Dimension fallback: move the cursor to the bottom-right corner
    /// (the terminal clamps the move at the true edge), then parse the
    /// cursor-position report `ESC [ <rows> ; <cols> R`.
    fn size_from_cursor_report(&mut self) -> Result<Size> {
        {
            let mut stdout = io::stdout().lock();
            ansi::cursor_to_corner(&mut stdout).map_err(Error::Io)?;
            ansi::device_status_request(&mut stdout).map_err(Error::Io)?;
            stdout.flush().map_err(Error::Io)?;
        }

        // Collect the response up to the 'R' terminator. A read timeout
        // mid-response means the terminal never answered.
        let mut response = Vec::with_capacity(16);
        while response.len() < 32 {
            match read_stdin_byte().map_err(Error::Io)? {
                Some(b'R') | None => break,
                Some(byte) => response.push(byte),
            }
        }

        parse_cursor_report(&response).ok_or_else(|| {
            Error::Terminal(io::Error::new(
                io::ErrorKind::InvalidData,
                "unusable cursor position report",
            ))
        })
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            // Can't propagate from Drop; report so the failure is visible.
            eprintln!("tilde: failed to restore terminal: {e}");
        }
    }
}

// ─── Cursor report parsing ──────────────────────────────────────────────────

/// Parse a cursor-position report body: `ESC [ <rows> ; <cols> R` with
/// the trailing `R` already stripped. Returns `None` for a malformed
/// report or zero dimensions.
fn parse_cursor_report(buf: &[u8]) -> Option<Size> {
    let rest = buf.strip_prefix(b"\x1b[")?;
    let (rows, rest) = parse_u16(rest)?;
    let rest = rest.strip_prefix(b";")?;
    let (cols, rest) = parse_u16(rest)?;

    if !rest.is_empty() || rows == 0 || cols == 0 {
        return None;
    }
    Some(Size { cols, rows })
}

/// Parse a decimal u16 prefix. Returns `(value, remaining_bytes)`, or
/// `None` if the slice does not start with a digit.
fn parse_u16(buf: &[u8]) -> Option<(u16, &[u8])> {
    let mut val: u16 = 0;
    let mut pos = 0;
    while pos < buf.len() && buf[pos].is_ascii_digit() {
        val = val
            .saturating_mul(10)
            .saturating_add(u16::from(buf[pos] - b'0'));
        pos += 1;
    }
    if pos == 0 {
        return None;
    }
    Some((val, &buf[pos..]))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
