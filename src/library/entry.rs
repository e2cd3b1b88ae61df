use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::link::{LinkFile, LinkType};

/// A single listed item: directory, regular file, or link shortcut.
///
/// Serialized with a `type` tag so listing payloads keep the per-kind field
/// sets distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Entry {
    Directory(DirectoryEntry),
    File(FileEntry),
    Link(LinkEntry),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub name: String,
    pub full_name: PathBuf,
    /// Library-relative path, forward-slash separated.
    pub path: String,
    pub last_changed: DateTime<Utc>,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub full_name: PathBuf,
    pub path: String,
    pub last_changed: DateTime<Utc>,
    pub is_hidden: bool,
    pub size: u64,
    /// Extension with its leading dot, empty when the name has none.
    pub extension: String,
    pub name_without_extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEntry {
    pub name: String,
    pub full_name: PathBuf,
    pub path: String,
    pub last_changed: DateTime<Utc>,
    pub is_hidden: bool,
    pub link_type: LinkType,
    pub display_name: String,
    pub link_target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_data: Option<String>,
}

impl Entry {
    pub fn directory(full_name: &Path, path: String, meta: &Metadata) -> io::Result<Self> {
        let name = base_name(full_name);
        Ok(Entry::Directory(DirectoryEntry {
            is_hidden: super::is_hidden(&name),
            name,
            full_name: full_name.to_path_buf(),
            path,
            last_changed: modified(meta)?,
        }))
    }

    pub fn file(full_name: &Path, path: String, meta: &Metadata) -> io::Result<Self> {
        let name = base_name(full_name);
        let extension = full_name
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let name_without_extension = full_name
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Entry::File(FileEntry {
            is_hidden: super::is_hidden(&name),
            name,
            full_name: full_name.to_path_buf(),
            path,
            last_changed: modified(meta)?,
            size: meta.len(),
            extension,
            name_without_extension,
        }))
    }

    pub fn link(full_name: &Path, path: String, meta: &Metadata, link: LinkFile) -> io::Result<Self> {
        let name = base_name(full_name);
        Ok(Entry::Link(LinkEntry {
            is_hidden: super::is_hidden(&name),
            name,
            full_name: full_name.to_path_buf(),
            path,
            last_changed: modified(meta)?,
            link_type: link.link_type,
            display_name: link.display_name,
            link_target: link.link_target,
            icon_data: link.icon_data,
        }))
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Directory(entry) => &entry.name,
            Entry::File(entry) => &entry.name,
            Entry::Link(entry) => &entry.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Entry::Directory(entry) => &entry.path,
            Entry::File(entry) => &entry.path,
            Entry::Link(entry) => &entry.path,
        }
    }

    pub fn is_hidden(&self) -> bool {
        match self {
            Entry::Directory(entry) => entry.is_hidden,
            Entry::File(entry) => entry.is_hidden,
            Entry::Link(entry) => entry.is_hidden,
        }
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn modified(meta: &Metadata) -> io::Result<DateTime<Utc>> {
    Ok(meta.modified()?.into())
}
