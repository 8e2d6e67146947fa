/// Top-N selection of a node's children.
///
/// Filters by enabled family, orders by size, keeps the largest `limit`
/// and folds the remainder into one synthetic Others node.
use crate::classify::Family;
use crate::model::FileNode;
use std::collections::BTreeSet;

/// Outcome of [`select`] for one parent.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    /// The largest `limit` children, descending by size.
    pub visible: Vec<&'a FileNode>,
    /// Everything past `limit`, same order. Kept so a host can "enter"
    /// the Others block.
    pub others: Vec<&'a FileNode>,
    /// Aggregate of `others`; `None` when `others` is empty.
    pub others_node: Option<FileNode>,
}

impl<'a> Selection<'a> {
    /// Nodes to hand to the layout engine: `visible` then the Others node.
    pub fn layout_items(&self) -> Vec<&FileNode> {
        let mut items: Vec<&FileNode> = self.visible.clone();
        items.extend(self.others_node.as_ref());
        items
    }

    /// Total bytes represented by the selection, including Others.
    pub fn total_bytes(&self) -> u64 {
        self.visible
            .iter()
            .chain(self.others.iter())
            .map(|n| n.size_bytes)
            .sum()
    }
}

/// Select the children to display.
///
/// Directories are never filtered out; files and packages are dropped when
/// `family_of` maps them to a family outside `enabled`. Ties in size are
/// broken by name so the result does not depend on input order.
pub fn select<'a, F>(
    children: &'a [FileNode],
    enabled: &BTreeSet<Family>,
    limit: usize,
    mut family_of: F,
) -> Selection<'a>
where
    F: FnMut(&FileNode) -> Family,
{
    let mut kept: Vec<&'a FileNode> = children
        .iter()
        .filter(|child| {
            (child.is_dir && !child.is_package) || enabled.contains(&family_of(child))
        })
        .collect();

    kept.sort_by(|a, b| {
        b.size_bytes
            .cmp(&a.size_bytes)
            .then_with(|| a.name.cmp(&b.name))
    });

    let others = if kept.len() > limit {
        kept.split_off(limit)
    } else {
        Vec::new()
    };

    let others_node = others.first().map(|first| {
        let parent = first.path.parent().unwrap_or(&first.path);
        FileNode::others(parent, &others)
    });

    Selection {
        visible: kept,
        others,
        others_node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn files(sizes: &[u64]) -> Vec<FileNode> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| FileNode::leaf(PathBuf::from(format!("/r/f{i:02}.txt")), size))
            .collect()
    }

    fn all() -> BTreeSet<Family> {
        Family::ALL.into_iter().collect()
    }

    #[test]
    fn ten_children_limit_three() {
        let children = files(&[10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        let sel = select(&children, &all(), 3, |_| Family::Text);

        let visible: Vec<u64> = sel.visible.iter().map(|n| n.size_bytes).collect();
        assert_eq!(visible, vec![100, 90, 80]);
        assert_eq!(sel.others.len(), 7);

        let others = sel.others_node.as_ref().unwrap();
        assert!(others.is_others());
        assert_eq!(others.size_bytes, 10 + 20 + 30 + 40 + 50 + 60 + 70);
        assert_eq!(others.name, "Others (7)");
        assert_eq!(others.path.parent().unwrap(), PathBuf::from("/r"));
        assert_eq!(sel.layout_items().len(), 4);
    }

    #[test]
    fn no_others_under_limit() {
        let children = files(&[5, 6]);
        let sel = select(&children, &all(), 40, |_| Family::Text);
        assert_eq!(sel.visible.len(), 2);
        assert!(sel.others.is_empty());
        assert!(sel.others_node.is_none());
        assert_eq!(sel.layout_items().len(), 2);
    }

    #[test]
    fn disabled_family_is_dropped_but_directories_stay() {
        let mut children = files(&[100, 200]);
        children.push(FileNode::directory(PathBuf::from("/r/dir"), Vec::new()));
        let enabled: BTreeSet<Family> = [Family::Image].into_iter().collect();

        let sel = select(&children, &enabled, 10, |n| {
            if n.is_dir {
                Family::Folder
            } else {
                Family::Text
            }
        });
        assert_eq!(sel.visible.len(), 1);
        assert!(sel.visible[0].is_dir);
    }

    #[test]
    fn ties_break_by_name() {
        let children = vec![
            FileNode::leaf(PathBuf::from("/r/b"), 7),
            FileNode::leaf(PathBuf::from("/r/a"), 7),
        ];
        let sel = select(&children, &all(), 10, |_| Family::Other);
        assert_eq!(sel.visible[0].name, "a");
        assert_eq!(sel.visible[1].name, "b");
    }

    #[test]
    fn empty_children() {
        let sel = select(&[], &all(), 3, |_| Family::Other);
        assert!(sel.visible.is_empty());
        assert!(sel.others_node.is_none());
    }

    proptest! {
        #[test]
        fn partition_is_exact(sizes in prop::collection::vec(0u64..1_000_000, 0..60), limit in 0usize..20) {
            let children = files(&sizes);
            let sel = select(&children, &all(), limit, |_| Family::Other);

            prop_assert_eq!(sel.visible.len() + sel.others.len(), children.len());
            prop_assert!(sel.visible.len() <= limit);
            prop_assert_eq!(sel.others_node.is_some(), !sel.others.is_empty());
            if let Some(node) = &sel.others_node {
                let sum: u64 = sel.others.iter().map(|n| n.size_bytes).sum();
                prop_assert_eq!(node.size_bytes, sum);
            }
            if let (Some(last), Some(first)) = (sel.visible.last(), sel.others.first()) {
                prop_assert!(last.size_bytes >= first.size_bytes);
            }
            prop_assert_eq!(sel.total_bytes(), sizes.iter().sum::<u64>());
        }
    }
}
