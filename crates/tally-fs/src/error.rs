use std::io;
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create staging file in '{dir}': {source}")]
    CreateStaging { dir: PathBuf, source: io::Error },

    #[error("failed to write staging file '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("upload stream failed after {written} bytes: {source}")]
    Stream { written: u64, source: BoxError },

    #[error("failed to allocate workspace in '{dir}': {source}")]
    Allocate { dir: PathBuf, source: io::Error },

    #[error("failed to remove workspace '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
