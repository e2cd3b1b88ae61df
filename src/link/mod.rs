mod tests;

use std::ffi::OsStr;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Reserved extension marking a file as a link shortcut rather than content.
pub const LINK_EXTENSION: &str = "link";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkType {
    #[default]
    #[serde(rename = "URL")]
    Url,
}

/// Body of a `.link` file: a virtual shortcut that behaves like a file in
/// listings but points at an external URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFile {
    #[serde(default)]
    pub link_type: LinkType,
    pub link_target: String,
    pub display_name: String,
    /// Base64 image bytes, absent when no icon could be fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_data: Option<String>,
}

impl LinkFile {
    pub fn new(link_target: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            link_type: LinkType::Url,
            link_target: link_target.into(),
            display_name: display_name.into(),
            icon_data: None,
        }
    }

    /// Indented JSON body. serde_json escapes only what JSON requires, so
    /// URLs and titles stay readable and round-trip untouched.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Decoding a malformed body is an error for the caller to absorb:
    /// listings and bundles drop the entry, they never fail outright.
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Whether a path carries the reserved link extension.
    pub fn is_link_path(path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| ext.eq_ignore_ascii_case(LINK_EXTENSION))
            .unwrap_or(false)
    }
}
