//! ZIP extraction confined to a destination root.
//!
//! # Architecture
//!
//! - `sanitize.rs` - Path normalization and the confinement check (zip-slip prevention)
//! - `extract/` - The entry loop and the ZIP entry source
//! - `entry.rs` - Report types
//! - `options.rs` - Limits and permission handling

pub use entry::{ArchiveReport, Entry, EntryKind};
pub use error::{Error, Result};
pub use extract::{EntrySource, PendingEntry, ZipSource, extract, extract_file, extract_from_reader};
pub use options::ExtractOptions;
pub use sanitize::{SanitizedPath, is_contained, normalize_path, sanitize_entry_path};

pub mod entry;
mod error;
pub mod extract;
pub mod options;
mod sanitize;
