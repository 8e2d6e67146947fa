/// A single node in the scanned tree.
///
/// Nodes own their children directly (`Vec<FileNode>`), so the tree is
/// strictly tree-shaped: a child is scanned, never linked, and cycles are
/// structurally impossible. A node is finished before its parent is built
/// and is never mutated afterwards; operations that "change" a tree, such as
/// splicing in a deeper on-demand scan, return a new tree.
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Final path segment of the synthetic Others node's path.
///
/// The path only gives the node a stable id; identity comes from
/// [`NodeState::Others`], since a real file may carry this name too.
pub const OTHERS_SEGMENT: &str = "<::others::>";

/// Stable identifier derived from a node's path.
///
/// Hosts use it as a selection key. It carries no meaning beyond identity,
/// but is stable across rescans of the same path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn for_path(path: &Path) -> Self {
        let hash = blake3::hash(path.as_os_str().as_encoded_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        Self(u64::from_le_bytes(head))
    }
}

/// How completely a node was materialised by the scan that built it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Fully scanned (files, packages, and directories within `max_depth`).
    #[default]
    Complete,
    /// Directory at `max_depth`: there is more below, not yet scanned.
    Truncated,
    /// Directory whose canonical path was already visited in this scan.
    CycleSkipped,
    /// Hidden entry reached while hidden entries are excluded.
    HiddenPlaceholder,
    /// The synthetic aggregate built by [`FileNode::others`]. Never produced
    /// by a scan.
    Others,
}

/// One file, package, or directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileNode {
    pub id: NodeId,

    /// Path as scanned (not resolved through symlinks).
    pub path: PathBuf,

    /// Final path component, or the whole path for roots like `/`.
    pub name: CompactString,

    pub is_dir: bool,

    /// A directory presented as one opaque file (e.g. `Foo.app`). Only set
    /// when the scan treated it that way, so a package is always a leaf.
    pub is_package: bool,

    /// Lowercase extension without the dot; empty when there is none.
    pub extension: CompactString,

    /// Best-effort platform type identifier (`public.jpeg`, `image/png`, …).
    pub type_identifier: Option<CompactString>,

    /// Allocated size for leaves; sum of children for directories.
    pub size_bytes: u64,

    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,

    pub state: NodeState,

    /// Sorted by name. Empty for leaves, packages, and placeholders.
    pub children: Vec<FileNode>,
}

impl FileNode {
    /// A file (or package) leaf of the given size.
    pub fn leaf(path: PathBuf, size_bytes: u64) -> Self {
        Self::bare(path, false, size_bytes, NodeState::Complete)
    }

    /// A package directory treated as a file.
    pub fn package(path: PathBuf, size_bytes: u64) -> Self {
        let mut node = Self::bare(path, true, size_bytes, NodeState::Complete);
        node.is_package = true;
        node
    }

    /// A directory built from finished children. Its size is their sum and
    /// the children are ordered by name.
    pub fn directory(path: PathBuf, mut children: Vec<FileNode>) -> Self {
        children.sort_by(|a, b| a.name.cmp(&b.name));
        let size_bytes = children.iter().map(|c| c.size_bytes).sum();
        let mut node = Self::bare(path, true, size_bytes, NodeState::Complete);
        node.children = children;
        node
    }

    /// An empty, zero-sized node that records why nothing was scanned.
    pub fn placeholder(path: PathBuf, is_dir: bool, state: NodeState) -> Self {
        Self::bare(path, is_dir, 0, state)
    }

    /// The synthetic aggregate of `members`, placed under `parent`.
    ///
    /// It has no children of its own; callers keep the real members next to
    /// it so a user can "enter" it.
    pub fn others(parent: &Path, members: &[&FileNode]) -> Self {
        let size_bytes = members.iter().map(|m| m.size_bytes).sum();
        let mut node = Self::bare(
            parent.join(OTHERS_SEGMENT),
            false,
            size_bytes,
            NodeState::Others,
        );
        node.name = CompactString::new(format!(
            "Others ({})",
            super::size::format_count(members.len() as u64)
        ));
        node
    }

    pub fn with_type_identifier(mut self, type_identifier: Option<CompactString>) -> Self {
        self.type_identifier = type_identifier;
        self
    }

    pub fn with_timestamps(
        mut self,
        created: Option<SystemTime>,
        modified: Option<SystemTime>,
        accessed: Option<SystemTime>,
    ) -> Self {
        self.created = created;
        self.modified = modified;
        self.accessed = accessed;
        self
    }

    fn bare(path: PathBuf, is_dir: bool, size_bytes: u64, state: NodeState) -> Self {
        Self {
            id: NodeId::for_path(&path),
            name: display_name(&path),
            extension: extension_of(&path),
            path,
            is_dir,
            is_package: false,
            type_identifier: None,
            size_bytes,
            created: None,
            modified: None,
            accessed: None,
            state,
            children: Vec::new(),
        }
    }

    /// Files and packages are sized by their own metadata and never have
    /// children.
    #[inline]
    pub fn is_treated_as_file(&self) -> bool {
        !self.is_dir || self.is_package
    }

    /// `true` for the synthetic Others node. Hosts must exclude it from
    /// open/reveal/trash actions.
    pub fn is_others(&self) -> bool {
        self.state == NodeState::Others
    }

    /// A directory cut off at `max_depth`; rescan it to see what is inside.
    #[inline]
    pub fn needs_deeper_scan(&self) -> bool {
        self.state == NodeState::Truncated
    }

    /// Depth-first search for `path` in this subtree.
    pub fn find(&self, path: &Path) -> Option<&FileNode> {
        if self.path == path {
            return Some(self);
        }
        if !path.starts_with(&self.path) {
            return None;
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Number of leaves (files and packages) in this subtree.
    pub fn file_count(&self) -> u64 {
        if self.is_treated_as_file() {
            return 1;
        }
        self.children.iter().map(FileNode::file_count).sum()
    }

    /// Whole and fractional days since modification, relative to `now`.
    /// `None` without a timestamp; clamped at zero for future timestamps.
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<f64> {
        let modified: DateTime<Utc> = self.modified?.into();
        let secs = (now - modified).num_seconds().max(0) as f64;
        Some(secs / 86_400.0)
    }

    /// A new tree in which the node at `replacement.path` is swapped for
    /// `replacement`, with every ancestor's size re-summed.
    ///
    /// Returns `None` when no node in this tree has that path.
    pub fn with_subtree(&self, replacement: FileNode) -> Option<FileNode> {
        if self.path == replacement.path {
            return Some(replacement);
        }
        if self.is_treated_as_file() || !replacement.path.starts_with(&self.path) {
            return None;
        }
        let pos = self
            .children
            .iter()
            .position(|c| replacement.path.starts_with(&c.path))?;
        let new_child = self.children[pos].with_subtree(replacement)?;

        let mut children = self.children.clone();
        children[pos] = new_child;
        let mut node = self.clone();
        node.size_bytes = children.iter().map(|c| c.size_bytes).sum();
        node.children = children;
        Some(node)
    }
}

fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => {
            let s = path.to_string_lossy();
            let trimmed = s.trim_end_matches(['/', '\\']);
            CompactString::new(if trimmed.is_empty() { &*s } else { trimmed })
        }
    }
}

fn extension_of(path: &Path) -> CompactString {
    path.extension()
        .map(|e| CompactString::new(e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> FileNode {
        let sub = FileNode::directory(
            PathBuf::from("/r/sub"),
            vec![
                FileNode::leaf(PathBuf::from("/r/sub/b.txt"), 200),
                FileNode::leaf(PathBuf::from("/r/sub/a.txt"), 100),
            ],
        );
        FileNode::directory(
            PathBuf::from("/r"),
            vec![sub, FileNode::leaf(PathBuf::from("/r/z.bin"), 50)],
        )
    }

    #[test]
    fn directory_sums_children_and_sorts_by_name() {
        let tree = sample_tree();
        assert_eq!(tree.size_bytes, 350);
        let sub = &tree.children[0];
        assert_eq!(sub.size_bytes, 300);
        assert_eq!(sub.children[0].name, "a.txt");
        assert_eq!(sub.children[1].name, "b.txt");
        assert_eq!(tree.file_count(), 3);
    }

    #[test]
    fn extension_is_lowercased() {
        let node = FileNode::leaf(PathBuf::from("/r/Photo.JPG"), 1);
        assert_eq!(node.extension, "jpg");
        assert_eq!(node.name, "Photo.JPG");
        let bare = FileNode::leaf(PathBuf::from("/r/Makefile"), 1);
        assert_eq!(bare.extension, "");
    }

    #[test]
    fn node_id_is_stable_per_path() {
        let a = NodeId::for_path(Path::new("/r/a"));
        assert_eq!(a, NodeId::for_path(Path::new("/r/a")));
        assert_ne!(a, NodeId::for_path(Path::new("/r/b")));
    }

    #[test]
    fn others_node_is_flagged_and_summed() {
        let a = FileNode::leaf(PathBuf::from("/r/a"), 5);
        let b = FileNode::leaf(PathBuf::from("/r/b"), 7);
        let others = FileNode::others(Path::new("/r"), &[&a, &b]);
        assert!(others.is_others());
        assert!(!a.is_others());
        assert_eq!(others.size_bytes, 12);
        assert!(others.children.is_empty());
        assert_eq!(others.name, "Others (2)");
    }

    #[test]
    fn real_file_named_like_others_is_not_others() {
        let real = FileNode::leaf(PathBuf::from("/r").join(OTHERS_SEGMENT), 3);
        assert!(!real.is_others());
        assert_eq!(real.state, NodeState::Complete);
    }

    #[test]
    fn find_walks_into_subdirectories() {
        let tree = sample_tree();
        let hit = tree.find(Path::new("/r/sub/b.txt")).unwrap();
        assert_eq!(hit.size_bytes, 200);
        assert!(tree.find(Path::new("/elsewhere")).is_none());
    }

    #[test]
    fn with_subtree_reaggregates_ancestors() {
        let tree = sample_tree();
        let deeper = FileNode::directory(
            PathBuf::from("/r/sub"),
            vec![FileNode::leaf(PathBuf::from("/r/sub/big.iso"), 10_000)],
        );
        let updated = tree.with_subtree(deeper).unwrap();
        assert_eq!(updated.size_bytes, 10_050);
        assert_eq!(updated.children[0].size_bytes, 10_000);
        // The original tree is untouched.
        assert_eq!(tree.size_bytes, 350);
    }

    #[test]
    fn with_subtree_unknown_path_is_none() {
        let tree = sample_tree();
        let stray = FileNode::leaf(PathBuf::from("/r/missing/x"), 1);
        assert!(tree.with_subtree(stray).is_none());
    }

    #[test]
    fn truncated_directory_needs_deeper_scan() {
        let node = FileNode::placeholder(PathBuf::from("/r/deep"), true, NodeState::Truncated);
        assert!(node.needs_deeper_scan());
        assert_eq!(node.size_bytes, 0);
        let cycle = FileNode::placeholder(PathBuf::from("/r/loop"), true, NodeState::CycleSkipped);
        assert!(!cycle.needs_deeper_scan());
    }

    #[test]
    fn age_days_uses_reference_time() {
        let modified = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(86_400);
        let node = FileNode::leaf(PathBuf::from("/r/a"), 1).with_timestamps(None, Some(modified), None);
        let now: DateTime<Utc> =
            (SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(11 * 86_400)).into();
        assert_eq!(node.age_days(now), Some(10.0));
        assert_eq!(FileNode::leaf(PathBuf::from("/r/b"), 1).age_days(now), None);
    }
}
