use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::library::{self, Entry, LibraryError};
use crate::link::LinkFile;
use crate::security::PathResolver;

use super::Content;

/// Fixed label heading every breadcrumb trail.
const BREADCRUMB_ROOT: &str = "Library";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_total: u32,
}

/// One level of a directory, shaped for the listing payload.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
    pub breadcrumbs: Vec<String>,
    pub items: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

pub(super) fn get_directory(
    resolver: &PathResolver,
    raw_path: &str,
    page: u32,
    page_size: u32,
    privileged: bool,
) -> Result<Content, LibraryError> {
    let normalized = resolver.normalize(raw_path)?;
    let dir = resolver.resolve(raw_path)?;
    if !dir.is_dir() {
        return Ok(Content::Missing);
    }

    let mut items = visible_entries(resolver, &dir, privileged)?;

    let total = items.len();
    let mut pagination = None;
    if page > 0 && page_size > 0 {
        let skip = (page as usize - 1) * page_size as usize;
        items = items
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();
        pagination = Some(Pagination {
            page,
            page_total: total.div_ceil(page_size as usize) as u32,
        });
    }

    let mut breadcrumbs = vec![BREADCRUMB_ROOT.to_string()];
    breadcrumbs.extend(
        normalized
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string),
    );

    // The root's parent lies outside the sandbox; the root itself maps to
    // the empty string. Both report as "no parent".
    let parent_path = dir
        .parent()
        .and_then(|parent| resolver.relative_of(parent))
        .filter(|parent| !parent.is_empty());

    Ok(Content::Directory(DirectoryListing {
        path: normalized,
        parent_path,
        breadcrumbs,
        items,
        pagination,
    }))
}

/// Immediate children only: directories first, then files and links, each
/// class in filesystem enumeration order. Link files that fail to decode are
/// dropped so one corrupt body cannot break the whole listing.
fn visible_entries(
    resolver: &PathResolver,
    dir: &Path,
    privileged: bool,
) -> Result<Vec<Entry>, LibraryError> {
    let mut directories = Vec::new();
    let mut files = Vec::new();

    for item in fs::read_dir(dir)? {
        let item = item?;
        let name = item.file_name().to_string_lossy().into_owned();
        if !library::is_visible(&name, privileged) {
            continue;
        }

        let full_path = item.path();
        let Some(relative) = resolver.relative_of(&full_path) else {
            continue;
        };
        let meta = item.metadata()?;

        if meta.is_dir() {
            directories.push(Entry::directory(&full_path, relative, &meta)?);
        } else if LinkFile::is_link_path(&full_path) {
            match decode_link(&full_path) {
                Ok(link) => files.push(Entry::link(&full_path, relative, &meta, link)?),
                Err(err) => {
                    warn!("dropping malformed link file {}: {err}", full_path.display());
                }
            }
        } else if meta.is_file() {
            files.push(Entry::file(&full_path, relative, &meta)?);
        }
    }

    directories.append(&mut files);
    Ok(directories)
}

fn decode_link(path: &Path) -> Result<LinkFile, LibraryError> {
    let bytes = fs::read(path)?;
    Ok(LinkFile::decode(&bytes)?)
}
