//! Filesystem helpers for writing template files.

pub mod atomic;

pub use atomic::{atomic_write_file, write_if_absent};
