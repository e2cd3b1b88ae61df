use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::library::LibraryError;
use crate::security::PathResolver;

/// Marker splitting the data-URL prefix from the base64 payload.
const BASE64_MARKER: &str = ";base64,";

/// Append one chunk to the upload's temp file; the terminal chunk promotes
/// the temp file to the destination with rename semantics, so a partially
/// written file is never visible at the final path.
///
/// Chunks are assumed to arrive in increasing order for a given upload;
/// concurrent chunks for the same destination race on the same temp file.
pub(super) fn upload_chunk(
    resolver: &PathResolver,
    temp_dir: &Path,
    target: &str,
    file_data: &str,
    chunk_number: u32,
    total_chunks: u32,
) -> Result<(), LibraryError> {
    let payload = file_data
        .split_once(BASE64_MARKER)
        .map(|(_, rest)| rest)
        .ok_or_else(|| {
            LibraryError::InvalidPayload(format!("missing {BASE64_MARKER:?} marker"))
        })?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| LibraryError::InvalidPayload(format!("bad base64 chunk: {err}")))?;

    let destination = resolver.resolve(target)?;
    let temp_path = temp_dir.join(temp_file_name(resolver, target)?);

    fs::create_dir_all(temp_dir)?;

    let mut file = if chunk_number == 1 {
        fs::File::create(&temp_path)?
    } else {
        OpenOptions::new().append(true).create(true).open(&temp_path)?
    };
    file.write_all(&bytes)?;
    drop(file);

    if chunk_number == total_chunks {
        if let Some(parent) = destination.parent() {
            if !parent.is_dir() {
                fs::create_dir_all(parent)?;
            }
        }
        promote(&temp_path, &destination)?;
    }
    Ok(())
}

/// Deterministic per-destination temp name `{stem}_{dirhash}.tmp`: uploads
/// to different directories never collide, while a restarted upload to the
/// same destination reuses (and truncates) the previous temp file.
pub(super) fn temp_file_name(
    resolver: &PathResolver,
    target: &str,
) -> Result<String, LibraryError> {
    let normalized = resolver.normalize(target)?;
    let (dir, file_name) = match normalized.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", normalized.as_str()),
    };
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);

    let mut hasher = Sha256::new();
    hasher.update(dir.as_bytes());
    let digest = hex::encode(hasher.finalize());

    Ok(format!("{stem}_{}.tmp", &digest[..16]))
}

fn promote(temp: &Path, destination: &Path) -> Result<(), LibraryError> {
    // Windows rename does not replace an existing destination.
    #[cfg(windows)]
    if destination.is_file() {
        fs::remove_file(destination)?;
    }
    fs::rename(temp, destination)?;
    Ok(())
}
