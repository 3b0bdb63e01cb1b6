//! The extraction loop and its entry sources.
//!
//! # Platform Behavior
//!
//! **Unix**: file modes recorded in the archive are applied through
//! [`file_mode`](crate::options::file_mode) when `preserve_permissions` is set.
//!
//! **Windows (non-Unix)**: permission handling is a no-op.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use crate::entry::{ArchiveReport, Entry, EntryKind};
use crate::error::{Error, Result};
use crate::options::ExtractOptions;
use crate::sanitize::{normalize_path, sanitize_entry_path};

mod zip;

pub use zip::ZipSource;

/// An entry listed by the archive but not yet written.
///
/// `reader` is the lazily opened payload of a file entry and borrows the
/// source, so it is gone before the next entry is requested.
pub struct PendingEntry<'a> {
    pub name: String,
    pub size: u64,
    pub mode: Option<u32>,
    pub kind: EntryKind,
    pub reader: Option<Box<dyn Read + 'a>>,
}

/// Archive-specific entry listing, in container order.
pub trait EntrySource {
    fn next_entry(&mut self) -> Option<Result<PendingEntry<'_>>>;
}

/// Main extraction pipeline.
///
/// Entries are processed strictly in the order the source lists them. Every
/// entry's path is checked against `destination` before anything is written
/// for it, and the first failure aborts the whole extraction. Whatever was
/// written before the failure is left for the caller to discard.
pub fn extract<S: EntrySource>(
    source: &mut S,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let root = resolve_root(destination)?;
    let mut report = ArchiveReport::default();

    while let Some(pending) = source.next_entry() {
        let mut pending = pending?;

        if let Some(max) = options.max_entries {
            if report.entry_count >= max {
                return Err(Error::LimitExceeded {
                    limit: "entry count",
                    max: max as u64,
                });
            }
        }

        let sanitized = sanitize_entry_path(&pending.name, &root)?;

        let written = match pending.kind {
            EntryKind::Directory => {
                ensure_directory(&sanitized.resolved)?;
                0
            }
            EntryKind::File => {
                let budget = options
                    .max_unpacked_bytes
                    .map(|max| max.saturating_sub(report.total_bytes));
                let written = match pending.reader.as_mut() {
                    Some(reader) => write_file(&mut **reader, &sanitized.resolved, budget)?,
                    None => write_file(&mut io::empty(), &sanitized.resolved, budget)?,
                };
                if written > budget.unwrap_or(u64::MAX) {
                    return Err(Error::LimitExceeded {
                        limit: "unpacked size",
                        max: options.max_unpacked_bytes.unwrap_or_default(),
                    });
                }
                if options.preserve_permissions {
                    apply_mode(&sanitized.resolved, pending.mode)?;
                }
                written
            }
        };

        tracing::trace!(entry = %pending.name, bytes = written, "extracted entry");

        report.entry_count += 1;
        report.total_bytes += written;
        report.entries.push(Entry {
            original_path: pending.name,
            target_path: sanitized.resolved,
            size: written,
            mode: pending.mode,
            kind: pending.kind,
        });
    }

    tracing::debug!(
        entries = report.entry_count,
        bytes = report.total_bytes,
        "extraction finished"
    );
    Ok(report)
}

/// Extract a ZIP archive from any seekable reader.
pub fn extract_from_reader<R: Read + Seek>(
    reader: R,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let mut source = ZipSource::new(reader)?;
    extract(&mut source, destination, options)
}

/// Extract the ZIP archive stored at `archive`.
pub fn extract_file(
    archive: &Path,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let file = File::open(archive).map_err(|source| Error::Open {
        path: archive.to_path_buf(),
        source,
    })?;
    extract_from_reader(BufReader::new(file), destination, options)
}

fn resolve_root(destination: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(destination).map_err(|source| Error::ExtractionFailed {
        path: destination.to_path_buf(),
        source,
    })?;
    Ok(normalize_path(&absolute))
}

/// Copy one payload to `target`, creating missing ancestors first.
///
/// With a budget, at most `budget + 1` bytes are copied so the caller can
/// tell an overrun from an exact fit.
fn write_file(reader: &mut dyn Read, target: &Path, budget: Option<u64>) -> Result<u64> {
    if let Some(parent) = target.parent() {
        ensure_directory(parent)?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(target)
        .map_err(|source| Error::ExtractionFailed {
            path: target.to_path_buf(),
            source,
        })?;

    let copied = match budget {
        Some(budget) => io::copy(&mut Read::take(reader, budget.saturating_add(1)), &mut file),
        None => io::copy(reader, &mut file),
    };
    copied.map_err(|source| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source,
    })
}

fn ensure_directory(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| Error::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = std::fs::Permissions::from_mode(crate::options::file_mode(mode));
    std::fs::set_permissions(path, permissions).map_err(|source| Error::ExtractionFailed {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}
