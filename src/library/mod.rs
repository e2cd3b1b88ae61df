mod entry;
mod error;

pub use entry::{DirectoryEntry, Entry, FileEntry, LinkEntry};
pub use error::LibraryError;

use std::path::{Path, PathBuf};

/// Filesystem roots the service operates on: the library tree being exposed
/// and the scratch directory holding in-flight chunked uploads.
///
/// Immutable for the life of the process; constructed once and injected into
/// the service.
#[derive(Debug, Clone)]
pub struct Directories {
    pub library_dir: PathBuf,
    pub temp_dir: PathBuf,
}

impl Directories {
    pub fn new(library_dir: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: library_dir.into(),
            temp_dir: temp_dir.into(),
        }
    }

    /// Conventional layout under a single data root: `<root>/library` for
    /// content and `<root>/temp` for upload scratch space.
    pub fn under(data_root: &Path) -> Self {
        Self {
            library_dir: data_root.join("library"),
            temp_dir: data_root.join("temp"),
        }
    }
}

/// OS metadata junk that is never exposed, regardless of caller privilege.
const SYSTEM_NAMES: &[&str] = &["Thumbs.db", "desktop.ini", ".DS_Store", "lost+found"];

pub fn is_system(name: &str) -> bool {
    SYSTEM_NAMES.iter().any(|sys| name.eq_ignore_ascii_case(sys))
}

/// Dot-prefixed names are the hidden convention across the whole service;
/// the hidden toggle adds or removes the prefix.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Visibility rule applied identically during directory listing and bundle
/// flattening: system entries are excluded unconditionally, hidden entries
/// only show up for privileged callers.
pub fn is_visible(name: &str, privileged: bool) -> bool {
    if is_system(name) {
        return false;
    }
    privileged || !is_hidden(name)
}
