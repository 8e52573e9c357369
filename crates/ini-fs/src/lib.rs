//! Filesystem layer for INI documents
//!
//! Provides locked atomic writes and the folder/file preparation helpers
//! used when loading and persisting documents.

pub mod error;
pub mod io;

pub use error::{Error, Result};
pub use io::{
    RobustnessConfig, ensure_file_exists_at, ensure_folder_exists_for, read_text, write_atomic,
    write_text,
};
