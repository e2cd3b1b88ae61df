// Public API exports
pub mod icon;
pub mod library;
pub mod link;
pub mod security;
pub mod service;

// Re-export main types for convenience
pub use icon::{HttpIconFetcher, IconFetcher, NoIconFetcher};
pub use library::{Directories, DirectoryEntry, Entry, FileEntry, LibraryError, LinkEntry};
pub use link::{LinkFile, LinkType, LINK_EXTENSION};
pub use security::PathResolver;
pub use service::{
    ArchiveBundle, BundleEntry, Content, DirectoryListing, Download, FileService, ItemKind,
    Pagination,
};
