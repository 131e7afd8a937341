use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrimError {
    #[error("Invalid page specification: {0}")]
    InvalidSpec(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Search text '{0}' not found")]
    SearchNotFound(String),

    #[error("PDF error for {}: {message}", path.display())]
    PdfIo { path: PathBuf, message: String },

    #[error("{0}")]
    InvalidInput(String),
}

impl TrimError {
    pub fn pdf_io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        TrimError::PdfIo {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrimError>;
