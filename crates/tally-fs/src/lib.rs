//! Request-scoped filesystem resources.
//!
//! Both resources live under a temp directory, carry generated unique names,
//! and delete themselves when dropped:
//!
//! - [`StagedFile`] holds the raw bytes of an upload.
//! - [`Workspace`] is the directory an archive is unpacked into.

mod error;
mod staging;
mod workspace;

pub use error::{Error, Result};
pub use staging::{StagedFile, StagingOptions};
pub use workspace::Workspace;

use std::path::{Path, PathBuf};

/// Resolve an optional temp root to the directory new resources go into.
pub fn temp_root(dir: Option<&Path>) -> PathBuf {
    dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir)
}
