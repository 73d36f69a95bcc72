//! Filesystem primitives shared across features.

pub mod atomic;
pub mod json;

pub use atomic::{atomic_write, create_backup, file_exists};
pub use json::{parse_json_loose, read_json_loose, write_json_pretty};
