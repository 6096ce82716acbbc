// SPDX-License-Identifier: MIT
//
// Error taxonomy for the terminal layer.
//
// Two classes, both unrecoverable where they occur:
//
//   Terminal — the line-discipline configuration could not be queried or
//   applied, or the screen dimensions could not be determined.
//
//   Io — a read or write on the terminal stream failed. A zero-byte read
//   timeout is NOT an Io error; callers retry those transparently.
//
// There is no retry policy for either class. The caller's obligation on
// any error is: restore the terminal (best effort), print a diagnostic
// to stderr, exit non-zero.

use std::io;

use thiserror::Error;

/// Fatal errors surfaced by the terminal layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Terminal mode get/set or dimension query failed.
    #[error("terminal control failed: {0}")]
    Terminal(#[source] io::Error),

    /// A terminal read or write failed (other than a read timeout).
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for terminal-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        fn fails() -> Result<()> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "short write"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(Error::Io(_))));
    }

    #[test]
    fn terminal_error_display() {
        let e = Error::Terminal(io::Error::other("tcsetattr"));
        let msg = e.to_string();
        assert!(msg.contains("terminal control failed"));
    }

    #[test]
    fn io_error_display() {
        let e = Error::Io(io::Error::new(io::ErrorKind::WriteZero, "short write"));
        assert!(e.to_string().contains("terminal I/O failed"));
    }

    #[test]
    fn error_source_is_preserved() {
        use std::error::Error as _;
        let e = Error::Terminal(io::Error::other("tcgetattr"));
        assert!(e.source().is_some());
    }
}
