mod bundle;
mod listing;
mod mutate;
mod upload;

pub use bundle::{ArchiveBundle, BundleEntry};
pub use listing::{DirectoryListing, Pagination};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::icon::{HttpIconFetcher, IconFetcher};
use crate::library::{Directories, LibraryError};
use crate::security::PathResolver;

/// Kind discriminator carried by mutation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Directory,
    File,
    Link,
}

/// Result of a content fetch: raw file bytes, a one-level directory listing,
/// or nothing at all (callers translate `Missing` to a not-found response).
#[derive(Debug)]
pub enum Content {
    File {
        data: Vec<u8>,
        content_type: String,
        file_name: String,
    },
    Directory(DirectoryListing),
    Missing,
}

/// Result of a bundle download request: a single file served directly, or a
/// flattened selection ready to stream as a zip.
pub enum Download {
    File {
        data: Vec<u8>,
        content_type: String,
        file_name: String,
    },
    Archive(ArchiveBundle),
}

/// The content service over a sandboxed library tree.
///
/// Stateless between calls: the filesystem is the sole source of truth and
/// every operation re-resolves its paths fresh. Methods block on I/O, so
/// concurrent callers run them on their own workers.
pub struct FileService {
    dirs: Directories,
    resolver: PathResolver,
    icons: Box<dyn IconFetcher>,
}

impl FileService {
    pub fn new(dirs: Directories) -> Self {
        let resolver = PathResolver::new(dirs.library_dir.clone());
        Self {
            dirs,
            resolver,
            icons: Box::new(HttpIconFetcher),
        }
    }

    pub fn with_icon_fetcher(mut self, icons: Box<dyn IconFetcher>) -> Self {
        self.icons = icons;
        self
    }

    pub fn directories(&self) -> &Directories {
        &self.dirs
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Fetch a file's bytes, or list a directory one level deep.
    ///
    /// `page == 0` or `page_size == 0` disables pagination. A path naming
    /// neither a file nor a directory yields `Content::Missing`.
    pub fn get_content(
        &self,
        path: &str,
        page: u32,
        page_size: u32,
        privileged: bool,
    ) -> Result<Content, LibraryError> {
        let resolved = self.resolver.resolve(path)?;
        if resolved.is_file() {
            let (data, content_type, file_name) = read_file(&resolved)?;
            return Ok(Content::File {
                data,
                content_type,
                file_name,
            });
        }
        listing::get_directory(&self.resolver, path, page, page_size, privileged)
    }

    /// `"file"`, `"directory"`, or `""` for anything else.
    pub fn get_type(&self, path: &str) -> Result<&'static str, LibraryError> {
        let resolved = self.resolver.resolve(path)?;
        Ok(if resolved.is_file() {
            "file"
        } else if resolved.is_dir() {
            "directory"
        } else {
            ""
        })
    }

    /// Resolve a download request: exactly one path naming a regular file is
    /// served directly; anything else becomes a streamed zip bundle.
    pub fn download(&self, paths: &[String], privileged: bool) -> Result<Download, LibraryError> {
        if paths.is_empty() {
            return Err(LibraryError::EmptyRequest);
        }

        if paths.len() == 1 && self.get_type(&paths[0])? == "file" {
            let resolved = self.resolver.resolve(&paths[0])?;
            let (data, content_type, file_name) = read_file(&resolved)?;
            return Ok(Download::File {
                data,
                content_type,
                file_name,
            });
        }

        let entries = bundle::flatten(&self.resolver, paths, privileged)?;
        Ok(Download::Archive(ArchiveBundle::new(entries)))
    }

    /// Rename an item. For links the file stays put and only the display
    /// name inside the body changes. No-op when the source is missing.
    pub fn change_name(
        &self,
        target: &str,
        new_name: &str,
        kind: ItemKind,
    ) -> Result<(), LibraryError> {
        mutate::change_name(&self.resolver, target, new_name, kind)
    }

    /// Flip an item's hidden state. No-op when the target is missing.
    pub fn toggle_hidden(&self, target: &str, kind: ItemKind) -> Result<(), LibraryError> {
        mutate::toggle_hidden(&self.resolver, target, kind)
    }

    /// Delete an item, recursively for directories. Missing targets are
    /// silently ignored.
    pub fn delete(&self, target: &str, kind: ItemKind) -> Result<(), LibraryError> {
        mutate::delete(&self.resolver, target, kind)
    }

    /// Create a child directory. Fails with `DirectoryNotFound` when the
    /// parent does not exist.
    pub fn create_folder(&self, location: &str, folder_name: &str) -> Result<(), LibraryError> {
        mutate::create_folder(&self.resolver, location, folder_name)
    }

    /// Create a link shortcut under `location`. The URL is normalized (bare
    /// hosts get a scheme) and an icon is fetched best-effort.
    pub fn create_link(
        &self,
        location: &str,
        link_target: &str,
        display_name: &str,
    ) -> Result<(), LibraryError> {
        mutate::create_link(
            &self.resolver,
            self.icons.as_ref(),
            location,
            link_target,
            display_name,
        )
    }

    /// Move an item into a destination folder, keeping its base name. No-op
    /// unless both the source and the destination folder exist.
    pub fn move_item(
        &self,
        target: &str,
        destination: &str,
        kind: ItemKind,
    ) -> Result<(), LibraryError> {
        mutate::move_item(&self.resolver, target, destination, kind)
    }

    /// Copy an item into a destination folder, recursively for directories.
    /// Same existence gating as `move_item`.
    pub fn copy_item(
        &self,
        target: &str,
        destination: &str,
        kind: ItemKind,
    ) -> Result<(), LibraryError> {
        mutate::copy_item(&self.resolver, target, destination, kind)
    }

    /// Append one chunk of a base64 data-URL payload to the upload's temp
    /// file; the terminal chunk atomically promotes it to the destination.
    pub fn upload_chunk(
        &self,
        target: &str,
        file_data: &str,
        chunk_number: u32,
        total_chunks: u32,
    ) -> Result<(), LibraryError> {
        upload::upload_chunk(
            &self.resolver,
            &self.dirs.temp_dir,
            target,
            file_data,
            chunk_number,
            total_chunks,
        )
    }
}

fn read_file(path: &Path) -> Result<(Vec<u8>, String, String), LibraryError> {
    let data = fs::read(path)?;
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((data, content_type, file_name))
}
