//! Archive and request body fixtures.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

pub const BOUNDARY: &str = "tally-test-boundary-7f3a";

/// Build an in-memory ZIP; names ending in `/` become directory entries.
#[allow(dead_code)]
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Swap a same-length placeholder entry name for a hostile one.
#[allow(dead_code)]
pub fn with_hostile_name(archive: Vec<u8>, placeholder: &str, hostile: &str) -> Vec<u8> {
    assert_eq!(placeholder.len(), hostile.len());
    let mut archive = archive;
    let needle = placeholder.as_bytes();
    let mut i = 0;
    while i + needle.len() <= archive.len() {
        if &archive[i..i + needle.len()] == needle {
            archive[i..i + needle.len()].copy_from_slice(hostile.as_bytes());
            i += needle.len();
        } else {
            i += 1;
        }
    }
    archive
}

/// A multipart/form-data body with one part per `(field, filename, data)`.
#[allow(dead_code)]
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/zip\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Relative path to contents for every file under `root`.
#[allow(dead_code)]
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let key = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                out.insert(key, std::fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}
