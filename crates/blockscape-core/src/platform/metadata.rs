/// File metadata, directory listing, and canonicalisation: everything the
/// scanner asks of the host filesystem.
///
/// The scanner only talks to the [`MetadataProvider`] trait, so tests (and
/// hosts with their own virtual filesystems) can substitute a provider.
/// [`StdMetadataProvider`] is the real implementation over `std::fs`.
use crate::config::SizeMetric;
use compact_str::CompactString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Facts about one path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    pub is_dir: bool,
    /// The path itself is a symlink (regardless of what it points at).
    pub is_symlink: bool,
    /// Provider-level package flag (bundle bit, …). The scanner also
    /// recognises packages by extension.
    pub is_package: bool,
    pub is_hidden: bool,
    pub type_identifier: Option<CompactString>,
    pub logical_size: Option<u64>,
    /// Space actually allocated on disk, when the platform reports it.
    pub allocated_size: Option<u64>,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
}

impl FileMetadata {
    /// Allocated size, falling back to logical size, falling back to 0.
    pub fn best_size(&self) -> u64 {
        self.allocated_size.or(self.logical_size).unwrap_or(0)
    }

    /// Size under the requested metric.
    pub fn size_for(&self, metric: SizeMetric) -> u64 {
        match metric {
            SizeMetric::Allocated => self.best_size(),
            SizeMetric::Logical => self.logical_size.unwrap_or(0),
        }
    }
}

/// Host filesystem access used by the scanner.
pub trait MetadataProvider {
    /// Stat `path`. With `follow_symlinks`, a symlink reports its target's
    /// type and size (but still `is_symlink = true`).
    fn metadata(&self, path: &Path, follow_symlinks: bool) -> io::Result<FileMetadata>;

    /// Immediate children of a directory, sorted. Dot-files are omitted
    /// unless `include_hidden`.
    fn list_dir(&self, path: &Path, include_hidden: bool) -> io::Result<Vec<PathBuf>>;

    /// Resolve symlinks and relative components.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// [`MetadataProvider`] over `std::fs`.
///
/// Type identifiers are not available without a platform type system, so
/// they are always `None`; the classifier's extension table covers the
/// common cases.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdMetadataProvider;

impl MetadataProvider for StdMetadataProvider {
    fn metadata(&self, path: &Path, follow_symlinks: bool) -> io::Result<FileMetadata> {
        let link_meta = fs::symlink_metadata(path)?;
        let is_symlink = link_meta.file_type().is_symlink();
        let meta = if is_symlink && follow_symlinks {
            fs::metadata(path)?
        } else {
            link_meta
        };

        Ok(FileMetadata {
            is_dir: meta.is_dir(),
            is_symlink,
            is_package: false,
            is_hidden: is_dot_name(path) || super::allocation::has_hidden_attribute(&meta),
            type_identifier: None,
            logical_size: Some(meta.len()),
            allocated_size: super::allocation::allocated_size(path, &meta),
            created: meta.created().ok(),
            modified: meta.modified().ok(),
            accessed: meta.accessed().ok(),
        })
    }

    fn list_dir(&self, path: &Path, include_hidden: bool) -> io::Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let child = entry.path();
            if !include_hidden && is_dot_name(&child) {
                continue;
            }
            children.push(child);
        }
        children.sort();
        Ok(children)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }
}

/// Unix-style hidden entry: the final component starts with a dot.
pub fn is_dot_name(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}
