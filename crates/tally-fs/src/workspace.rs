use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const PREFIX: &str = "analysis-";

/// A uniquely named directory owned by one request.
///
/// The directory and everything under it is removed exactly once: by
/// [`Workspace::release`] or, on any other exit path, by `Drop`.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    released: bool,
}

impl Workspace {
    /// Create a new empty directory under `dir`.
    pub fn allocate(dir: &Path) -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir_in(dir)
            .map_err(|source| Error::Allocate {
                dir: dir.to_path_buf(),
                source,
            })?
            .keep();

        tracing::debug!(root = %root.display(), "allocated workspace");
        Ok(Self {
            root,
            released: false,
        })
    }

    pub fn path(&self) -> &Path { &self.root }

    /// Remove the workspace tree now.
    ///
    /// A directory that is already gone counts as released.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        remove_tree(&self.root)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_tree(&self.root) {
            tracing::warn!(error = %e, "failed to remove workspace on drop");
        }
    }
}

fn remove_tree(root: &Path) -> Result<()> {
    match std::fs::remove_dir_all(root) {
        Ok(()) => {
            tracing::debug!(root = %root.display(), "released workspace");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Remove {
            path: root.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_allocate_creates_empty_dir() -> Result<()> {
        let dir = tempdir().unwrap();
        let workspace = Workspace::allocate(dir.path())?;
        assert!(workspace.path().is_dir());
        assert!(workspace.path().starts_with(dir.path()));
        assert_eq!(std::fs::read_dir(workspace.path()).unwrap().count(), 0);
        let name = workspace.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(PREFIX));
        Ok(())
    }

    #[test]
    fn test_release_removes_tree() -> Result<()> {
        let dir = tempdir().unwrap();
        let workspace = Workspace::allocate(dir.path())?;
        let root = workspace.path().to_path_buf();
        std::fs::create_dir_all(root.join("a/b")).unwrap();
        std::fs::write(root.join("a/b/file.txt"), "data").unwrap();
        workspace.release()?;
        assert!(!root.exists());
        Ok(())
    }

    #[test]
    fn test_release_tolerates_missing_dir() -> Result<()> {
        let dir = tempdir().unwrap();
        let workspace = Workspace::allocate(dir.path())?;
        std::fs::remove_dir_all(workspace.path()).unwrap();
        workspace.release()
    }

    #[test]
    fn test_workspace_cleanup_on_drop() -> Result<()> {
        let dir = tempdir().unwrap();
        let root = {
            let workspace = Workspace::allocate(dir.path())?;
            std::fs::write(workspace.path().join("file.txt"), "data").unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!root.exists());
        Ok(())
    }

    #[test]
    fn test_allocate_missing_parent_fails() {
        let dir = tempdir().unwrap();
        let result = Workspace::allocate(&dir.path().join("missing"));
        assert!(matches!(result, Err(Error::Allocate { .. })));
    }
}
