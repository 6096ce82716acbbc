// SPDX-License-Identifier: MIT
//
// tilde-term — terminal layer for tilde.
//
// Everything the editor needs to own a terminal: raw-mode session
// management with guaranteed restoration, a decoder that turns the raw
// input byte stream into logical keys, an output buffer that assembles
// one full frame for a single atomic write, and the small vocabulary of
// VT100 escape sequences the rest of the workspace speaks.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via ANSI escape
// sequences and raw termios. Every byte sent to the terminal is
// accounted for. Every byte read from it has exactly one meaning.

pub mod ansi;
pub mod error;
pub mod key;
pub mod output;
pub mod terminal;
