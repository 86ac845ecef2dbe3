use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading, parsing or compiling message catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid compiled catalog: {0}")]
    Mo(#[from] gettext::Error),

    #[error("Compiled catalog is too large to encode")]
    TooLarge,

    #[error("Syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },
}
