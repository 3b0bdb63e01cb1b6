use std::io::{Read, Seek};

use crate::entry::EntryKind;
use crate::error::{Error, Result};
use crate::extract::{EntrySource, PendingEntry};

pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).map_err(|source| Error::Corrupted { source })?;
        Ok(Self { archive, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }
}

impl<R: Read + Seek> EntrySource for ZipSource<R> {
    fn next_entry(&mut self) -> Option<Result<PendingEntry<'_>>> {
        if self.index >= self.archive.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let file = match self.archive.by_index(index) {
            Ok(f) => f,
            Err(source) => {
                return Some(Err(Error::ReadEntry {
                    entry: format!("#{index}"),
                    source,
                }));
            }
        };

        // The raw name, not `enclosed_name()`: confinement is checked by the
        // extraction loop so an escape is reported instead of skipped.
        let name = file.name().to_owned();
        let size = file.size();
        let mode = file.unix_mode();

        // Symlink entries fall through as files: their target text is written
        // as a regular file and no link is ever created.
        let (kind, reader): (_, Option<Box<dyn Read + '_>>) = if file.is_dir() {
            (EntryKind::Directory, None)
        } else {
            (EntryKind::File, Some(Box::new(file)))
        };

        Some(Ok(PendingEntry {
            name,
            size,
            mode,
            kind,
            reader,
        }))
    }
}
