//! Error types for ini-doc

/// Result type for ini-doc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ini-doc operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Section not found: {name}")]
    SectionNotFound { name: String },

    #[error("No destination to persist to: document was not loaded from a file")]
    NoDestination,

    #[error(transparent)]
    Fs(#[from] ini_fs::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn section_not_found(name: impl Into<String>) -> Self {
        Self::SectionNotFound { name: name.into() }
    }
}
