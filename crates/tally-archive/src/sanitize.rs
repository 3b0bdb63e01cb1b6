use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: String,
    pub resolved: PathBuf,
}

/// Whether `candidate` lies strictly below `root`.
///
/// Both paths must already be absolute and normalized. The comparison is
/// component-wise, so `/work/ws-evil` is not inside `/work/ws`, and the root
/// itself is not inside the root.
pub fn is_contained(root: &Path, candidate: &Path) -> bool {
    candidate != root && candidate.starts_with(root)
}

/// Resolve an archive entry name against `root` and check confinement.
///
/// `root` must be absolute and normalized (see [`normalize_path`]).
pub fn sanitize_entry_path(entry: &str, root: &Path) -> Result<SanitizedPath> {
    if entry.contains('\0') {
        return Err(Error::InvalidPath {
            entry: entry.to_owned(),
        });
    }

    // Archives written on Windows may use backslashes as separators.
    let relative = entry.replace('\\', "/");
    let resolved = normalize_path(&root.join(relative));

    if !is_contained(root, &resolved) {
        return Err(Error::PathEscape {
            entry: entry.to_owned(),
            resolved,
        });
    }

    Ok(SanitizedPath {
        original: entry.to_owned(),
        resolved,
    })
}

/// Lexically normalize a path: drop `.`, let `..` pop, never rise above the
/// filesystem root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}
