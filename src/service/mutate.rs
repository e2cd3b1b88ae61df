use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use url::Url;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::icon::IconFetcher;
use crate::library::LibraryError;
use crate::link::{LinkFile, LinkType, LINK_EXTENSION};
use crate::security::PathResolver;

use super::ItemKind;

pub(super) fn change_name(
    resolver: &PathResolver,
    target: &str,
    new_name: &str,
    kind: ItemKind,
) -> Result<(), LibraryError> {
    let path = resolver.resolve(target)?;

    if kind == ItemKind::Link {
        return rename_link(&path, new_name);
    }

    if !exists_as(&path, kind) {
        return Ok(());
    }
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let new_path = resolver.child(parent, new_name)?;
    let old_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if old_name != new_name && old_name.to_uppercase() == new_name.to_uppercase() {
        // A case-only rename collides with itself on case-insensitive
        // filesystems; hop through a unique intermediate name.
        let temp = parent.join(Uuid::new_v4().to_string());
        fs::rename(&path, &temp)?;
        fs::rename(&temp, &new_path)?;
    } else {
        fs::rename(&path, &new_path)?;
    }
    Ok(())
}

/// Links keep their on-disk name; renaming rewrites only the display name
/// inside the body.
fn rename_link(path: &Path, new_name: &str) -> Result<(), LibraryError> {
    if !path.is_file() {
        return Ok(());
    }
    let mut link = LinkFile::decode(&fs::read(path)?)?;
    link.display_name = new_name.to_string();
    fs::write(path, link.encode()?)?;
    Ok(())
}

pub(super) fn toggle_hidden(
    resolver: &PathResolver,
    target: &str,
    kind: ItemKind,
) -> Result<(), LibraryError> {
    // An empty target names the library root, which is never toggled.
    if resolver.normalize(target)?.is_empty() {
        return Ok(());
    }
    let path = resolver.resolve(target)?;
    if !exists_as(&path, kind) {
        return Ok(());
    }
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return Ok(());
    };
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let toggled = match name.strip_prefix('.') {
        Some(rest) => rest.to_string(),
        None => format!(".{name}"),
    };
    fs::rename(&path, parent.join(toggled))?;
    Ok(())
}

pub(super) fn delete(
    resolver: &PathResolver,
    target: &str,
    kind: ItemKind,
) -> Result<(), LibraryError> {
    let path = resolver.resolve(target)?;
    match kind {
        ItemKind::Directory => {
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            }
        }
        ItemKind::File | ItemKind::Link => {
            if path.is_file() {
                fs::remove_file(&path)?;
            }
        }
    }
    Ok(())
}

pub(super) fn create_folder(
    resolver: &PathResolver,
    location: &str,
    folder_name: &str,
) -> Result<(), LibraryError> {
    let parent = resolver.resolve(location)?;
    if !parent.is_dir() {
        return Err(LibraryError::DirectoryNotFound(parent));
    }
    match fs::create_dir(resolver.child(&parent, folder_name)?) {
        Ok(()) => Ok(()),
        // Creating a folder that already exists is idempotent.
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(err) => Err(err.into()),
    }
}

pub(super) fn create_link(
    resolver: &PathResolver,
    icons: &dyn IconFetcher,
    location: &str,
    link_target: &str,
    display_name: &str,
) -> Result<(), LibraryError> {
    let parent = resolver.resolve(location)?;
    if !parent.is_dir() {
        return Err(LibraryError::DirectoryNotFound(parent));
    }

    let url = normalize_url(link_target)?;
    let icon_data = url.host_str().and_then(|host| icons.fetch_icon(host));

    let link = LinkFile {
        link_type: LinkType::Url,
        link_target: url.to_string(),
        display_name: display_name.to_string(),
        icon_data,
    };
    let file_name = format!("{}.{LINK_EXTENSION}", Uuid::new_v4());
    fs::write(parent.join(file_name), link.encode()?)?;
    Ok(())
}

/// Accepts bare hosts ("example.com") by defaulting the scheme to https.
fn normalize_url(raw: &str) -> Result<Url, LibraryError> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}"))
            .map_err(|err| LibraryError::InvalidPayload(format!("invalid link target {raw:?}: {err}"))),
        Err(err) => Err(LibraryError::InvalidPayload(format!(
            "invalid link target {raw:?}: {err}"
        ))),
    }
}

pub(super) fn move_item(
    resolver: &PathResolver,
    target: &str,
    destination: &str,
    kind: ItemKind,
) -> Result<(), LibraryError> {
    let Some((source, dest)) = source_and_destination(resolver, target, destination, kind)? else {
        return Ok(());
    };
    fs::rename(&source, &dest)?;
    Ok(())
}

pub(super) fn copy_item(
    resolver: &PathResolver,
    target: &str,
    destination: &str,
    kind: ItemKind,
) -> Result<(), LibraryError> {
    let Some((source, dest)) = source_and_destination(resolver, target, destination, kind)? else {
        return Ok(());
    };
    match kind {
        ItemKind::Directory => copy_directory(&source, &dest)?,
        ItemKind::File | ItemKind::Link => {
            fs::copy(&source, &dest)?;
        }
    }
    Ok(())
}

/// Resolves both ends of a move/copy. `None` means the operation is a no-op:
/// either the source is missing or the destination folder does not exist.
fn source_and_destination(
    resolver: &PathResolver,
    target: &str,
    destination: &str,
    kind: ItemKind,
) -> Result<Option<(PathBuf, PathBuf)>, LibraryError> {
    let source = resolver.resolve(target)?;
    let dest_folder = resolver.resolve(destination)?;
    if !exists_as(&source, kind) || !dest_folder.is_dir() {
        return Ok(None);
    }
    let Some(name) = source.file_name() else {
        return Ok(None);
    };
    let dest = dest_folder.join(name);
    Ok(Some((source, dest)))
}

fn copy_directory(source: &Path, destination: &Path) -> Result<(), LibraryError> {
    for item in WalkDir::new(source) {
        let item = item.map_err(std::io::Error::from)?;
        let relative = item
            .path()
            .strip_prefix(source)
            .map_err(|_| LibraryError::InvalidPath(item.path().display().to_string()))?;
        let target = destination.join(relative);
        if item.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if item.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(item.path(), &target)?;
        }
    }
    Ok(())
}

fn exists_as(path: &Path, kind: ItemKind) -> bool {
    match kind {
        ItemKind::Directory => path.is_dir(),
        ItemKind::File | ItemKind::Link => path.is_file(),
    }
}
