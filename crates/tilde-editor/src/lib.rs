//! # tilde-editor — Editor core for tilde
//!
//! This crate contains the screen-model half of the editor:
//!
//! - **[`cursor`]** — `Cursor` (x, y) and the `Bounds` it moves within, 0-indexed
//! - **[`row`]** — `Row` and `Document`, the displayable text
//! - **[`view`]** — frame composition: rows, filler tildes, welcome banner
//!
//! Everything here is pure: the types take sizes and keys as values and
//! produce bytes into a writer. Terminal ownership (raw mode, reads,
//! the actual write to stdout) lives in `tilde-term`.

pub mod cursor;
pub mod row;
pub mod view;
