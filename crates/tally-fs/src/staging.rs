use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use futures_util::{Stream, StreamExt};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug)]
pub struct StagingOptions {
    prefix: &'static str,
    suffix: &'static str,
}

impl Default for StagingOptions {
    fn default() -> Self { Self::new() }
}

impl StagingOptions {
    pub fn new() -> Self {
        Self {
            prefix: "upload-",
            suffix: ".zip",
        }
    }

    pub fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }
}

/// An upload persisted to a uniquely named file.
///
/// The file is deleted when the value is dropped. The deletion guard exists
/// before the first byte is written, so a failed copy never leaves a partial
/// file behind.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    len: u64,
}

impl StagedFile {
    /// Copy `reader` into a new staging file under `dir`.
    pub fn stage<R: Read>(dir: &Path, mut reader: R, options: StagingOptions) -> Result<Self> {
        let (mut file, path) = create(dir, options)?;
        let len = io::copy(&mut reader, &mut file).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        // Close the writer before anyone can open the file for reading.
        drop(file);

        tracing::debug!(path = %path.display(), bytes = len, "staged upload");
        Ok(Self { path, len })
    }

    /// Copy a stream of byte chunks into a new staging file under `dir`.
    ///
    /// A chunk error from the stream aborts staging; the partial file is
    /// removed with the guard.
    pub async fn stage_stream<S, B, E>(dir: &Path, stream: S, options: StagingOptions) -> Result<Self>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (file, path) = create(dir, options)?;
        let mut file = tokio::fs::File::from_std(file);
        let mut stream = std::pin::pin!(stream);
        let mut len = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Stream {
                written: len,
                source: e.into(),
            })?;
            let chunk = chunk.as_ref();
            file.write_all(chunk).await.map_err(|source| Error::Write {
                path: path.to_path_buf(),
                source,
            })?;
            len += chunk.len() as u64;
        }

        file.flush().await.map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        drop(file);

        tracing::debug!(path = %path.display(), bytes = len, "staged upload");
        Ok(Self { path, len })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn len(&self) -> u64 { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Open the staged bytes for reading.
    pub fn open(&self) -> io::Result<File> { File::open(&self.path) }

    /// Delete the staged file now, reporting failures that `Drop` would swallow.
    pub fn release(self) -> Result<()> {
        let path = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Write { path, source }),
        }
    }
}

fn create(dir: &Path, options: StagingOptions) -> Result<(File, TempPath)> {
    let named = tempfile::Builder::new()
        .prefix(options.prefix)
        .suffix(options.suffix)
        .tempfile_in(dir)
        .map_err(|source| Error::CreateStaging {
            dir: dir.to_path_buf(),
            source,
        })?;
    Ok(named.into_parts())
}
