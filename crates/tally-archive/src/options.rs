/// Options controlling a single extraction.
#[derive(Clone, Copy, Debug)]
pub struct ExtractOptions {
    pub preserve_permissions: bool,
    pub max_entries: Option<usize>,
    pub max_unpacked_bytes: Option<u64>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            preserve_permissions: true,
            max_entries: None,
            max_unpacked_bytes: None,
        }
    }
}

impl ExtractOptions {
    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    pub fn max_unpacked_bytes(mut self, max: u64) -> Self {
        self.max_unpacked_bytes = Some(max);
        self
    }
}

/// Mode applied to an extracted file.
///
/// Keeps the rwx bits the archive recorded, always grants the owner read and
/// write, and drops setuid, setgid and sticky bits.
pub fn file_mode(archived: Option<u32>) -> u32 {
    match archived {
        Some(mode) => (mode & 0o777) | 0o600,
        None => 0o644,
    }
}
