//! Destination tree mutation: atomic writes, removals and content patches

pub mod content_patcher;
pub mod filesystem_output;

pub use content_patcher::{ContentPatcher, GemfileEdit};
pub use filesystem_output::{remove_paths, write_atomic};
