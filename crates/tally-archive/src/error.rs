use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive entry '{entry}' escapes the extraction root")]
    PathEscape { entry: String, resolved: PathBuf },

    #[error("archive entry path contains a null byte: {entry:?}")]
    InvalidPath { entry: String },

    #[error("archive is corrupted: {source}")]
    Corrupted { source: zip::result::ZipError },

    #[error("failed to read archive entry '{entry}': {source}")]
    ReadEntry { entry: String, source: zip::result::ZipError },

    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("archive exceeds {limit} limit of {max}")]
    LimitExceeded { limit: &'static str, max: u64 },
}

impl Error {
    /// Whether this error came from the path-confinement check.
    pub fn is_path_escape(&self) -> bool {
        matches!(self, Self::PathEscape { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
