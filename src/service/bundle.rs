use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, Timelike};
use tracing::warn;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::library::{self, LibraryError};
use crate::security::PathResolver;

/// One file destined for the archive: its entry name and where to read it
/// from. Sources are opened lazily, one entry at a time, never all at once.
#[derive(Debug, Clone)]
pub struct BundleEntry {
    /// Library-relative path, used as the archive entry name.
    pub archive_path: String,
    pub source: PathBuf,
}

impl BundleEntry {
    pub fn open(&self) -> io::Result<File> {
        File::open(&self.source)
    }
}

/// A flattened selection ready to stream as a zip.
pub struct ArchiveBundle {
    file_name: String,
    entries: Vec<BundleEntry>,
}

impl ArchiveBundle {
    pub(super) fn new(entries: Vec<BundleEntry>) -> Self {
        let file_name = format!("Download-{}.zip", Local::now().format("%Y-%m-%d-%H-%M-%S"));
        Self { file_name, entries }
    }

    /// Suggested name for the downloaded archive.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    /// Stream every entry into `writer`, holding at most one source stream
    /// open at a time. A failure reading one entry skips that entry rather
    /// than aborting the whole bundle.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<(), LibraryError> {
        let mut zip = ZipWriter::new(writer);
        let now = Local::now();
        let options: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(
                zip::DateTime::from_date_and_time(
                    now.year() as u16,
                    now.month() as u8,
                    now.day() as u8,
                    now.hour() as u8,
                    now.minute() as u8,
                    now.second() as u8,
                )
                .unwrap_or_default(),
            );

        for entry in &self.entries {
            zip.start_file(entry.archive_path.as_str(), options)?;
            match entry.open() {
                Ok(mut source) => {
                    if let Err(err) = io::copy(&mut source, &mut zip) {
                        warn!("skipping bundle entry {}: {err}", entry.archive_path);
                    }
                }
                Err(err) => warn!("skipping bundle entry {}: {err}", entry.archive_path),
            }
        }

        zip.finish()?;
        Ok(())
    }
}

/// Expand the requested paths depth-first into file leaves, applying the
/// visibility filter at every directory level. Requested paths that resolve
/// to nothing are skipped, consistent with the best-effort bundle policy.
pub(super) fn flatten(
    resolver: &PathResolver,
    paths: &[String],
    privileged: bool,
) -> Result<Vec<BundleEntry>, LibraryError> {
    let mut entries = Vec::new();
    for raw in paths {
        let resolved = resolver.resolve(raw)?;
        if resolved.is_file() {
            push_leaf(resolver, &resolved, &mut entries);
        } else if resolved.is_dir() {
            flatten_directory(resolver, &resolved, privileged, &mut entries)?;
        }
    }
    Ok(entries)
}

/// Subdirectories recurse before this level's files are emitted, matching
/// the listing's directories-first ordering.
fn flatten_directory(
    resolver: &PathResolver,
    dir: &Path,
    privileged: bool,
    out: &mut Vec<BundleEntry>,
) -> Result<(), LibraryError> {
    let mut subdirs = Vec::new();
    let mut files = Vec::new();

    for item in fs::read_dir(dir)? {
        let item = item?;
        let name = item.file_name().to_string_lossy().into_owned();
        if !library::is_visible(&name, privileged) {
            continue;
        }
        let file_type = item.file_type()?;
        if file_type.is_dir() {
            subdirs.push(item.path());
        } else if file_type.is_file() {
            files.push(item.path());
        }
    }

    for sub in subdirs {
        flatten_directory(resolver, &sub, privileged, out)?;
    }
    for file in files {
        push_leaf(resolver, &file, out);
    }
    Ok(())
}

fn push_leaf(resolver: &PathResolver, path: &Path, out: &mut Vec<BundleEntry>) {
    if let Some(archive_path) = resolver.relative_of(path) {
        out.push(BundleEntry {
            archive_path,
            source: path.to_path_buf(),
        });
    }
}
