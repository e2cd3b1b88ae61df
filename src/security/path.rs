use crate::library::LibraryError;
use std::path::{Component, Path, PathBuf};

/// Resolves caller-supplied relative paths against the library root to
/// prevent:
/// - Directory traversal (`../` escaping the root)
/// - Absolute paths (`/etc/passwd`)
///
/// Every path the service touches goes through here first. Both `/` and `\`
/// separators are accepted on input; paths reported outward always use `/`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalize a relative path to its canonical forward-slash form.
    ///
    /// Empty input normalizes to the empty string, meaning the root itself.
    /// Leading separators are stripped, `.` segments are dropped, and `..`
    /// segments pop the previous component; popping past the root fails with
    /// `InvalidPath`.
    pub fn normalize(&self, raw: &str) -> Result<String, LibraryError> {
        let trimmed = raw.trim_start_matches(['/', '\\']);
        let unified = trimmed.replace('\\', "/");

        let mut components: Vec<&str> = Vec::new();
        for component in Path::new(&unified).components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {
                    return Err(LibraryError::InvalidPath(raw.to_string()));
                }
                Component::CurDir => continue,
                Component::ParentDir => {
                    if components.pop().is_none() {
                        return Err(LibraryError::InvalidPath(raw.to_string()));
                    }
                }
                Component::Normal(part) => {
                    let part = part
                        .to_str()
                        .ok_or_else(|| LibraryError::InvalidPath(raw.to_string()))?;
                    components.push(part);
                }
            }
        }

        Ok(components.join("/"))
    }

    /// Resolve a relative path to an absolute path under the root.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, LibraryError> {
        let normalized = self.normalize(raw)?;
        if normalized.is_empty() {
            return Ok(self.root.clone());
        }
        let mut resolved = self.root.clone();
        for part in normalized.split('/') {
            resolved.push(part);
        }
        Ok(resolved)
    }

    /// The forward-slash path of `absolute` relative to the root, or `None`
    /// if the path does not live under the root. The root itself maps to the
    /// empty string.
    pub fn relative_of(&self, absolute: &Path) -> Option<String> {
        let stripped = absolute.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in stripped.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?),
                _ => return None,
            }
        }
        Some(parts.join("/"))
    }

    /// Join a single caller-supplied name onto an already-resolved directory.
    ///
    /// Names that are themselves path fragments are rejected so a rename or
    /// folder creation cannot smuggle the target outside the sandbox.
    pub fn child(&self, parent: &Path, name: &str) -> Result<PathBuf, LibraryError> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(LibraryError::InvalidPath(name.to_string()));
        }
        Ok(parent.join(name))
    }
}
