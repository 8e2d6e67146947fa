/// Layout engine: turns classified nodes into placement records.
///
/// Pure and synchronous: the same items, marks and config always give the
/// same [`Layout`]. Nothing here reads the clock or the filesystem; age
/// based heights use [`LayoutConfig::reference_time`].
pub mod family_arms;
pub mod grid;
pub mod radial;
pub mod rooms;
pub mod sizing;

use crate::classify::ClassificationTag;
use crate::config::{LayoutConfig, LayoutStrategy};
use crate::model::{Footprint, FileNode, Layout, PlacementRecord, Rgba};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// One node to lay out, with its classification.
#[derive(Debug, Clone)]
pub struct LayoutItem<'a> {
    pub node: &'a FileNode,
    pub tag: ClassificationTag,
}

/// UI state that only changes flags on the records, never positions.
#[derive(Debug, Clone, Default)]
pub struct Marks {
    pub selected: HashSet<PathBuf>,
    /// Search hits.
    pub matched: HashSet<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Place `items`. Records come out largest first; the first record is
    /// the hub for the family-arms strategy and the centre for radial.
    pub fn layout(&self, items: &[LayoutItem<'_>], marks: &Marks) -> Layout {
        if items.is_empty() {
            return Layout::default();
        }
        let config = &self.config;
        let blocks = sizing::measure(items, config);

        let positions = match config.strategy {
            LayoutStrategy::FamilyArms => family_arms::place(&blocks, config),
            LayoutStrategy::Grid => grid::place(&blocks, config),
            LayoutStrategy::Radial => radial::place(&blocks, config),
            LayoutStrategy::Rooms => rooms::place(&blocks, config),
        };

        let connections = if config.show_connections
            && config.strategy == LayoutStrategy::FamilyArms
        {
            family_arms::connections(&blocks, &positions, config.max_connections)
        } else {
            Vec::new()
        };

        let placements = blocks
            .iter()
            .zip(&positions)
            .map(|(block, &position)| {
                let node = block.node;
                let tag = &items[block.index].tag;
                PlacementRecord {
                    id: node.id,
                    path: node.path.clone(),
                    family: block.family,
                    position,
                    footprint: Footprint {
                        width: block.side,
                        depth: block.side,
                    },
                    height: block.height,
                    rel: block.rel,
                    selected: marks.selected.contains(&node.path),
                    matched: marks.matched.contains(&node.path),
                    is_others: node.is_others(),
                    label: sizing::label(node),
                    color: Rgba {
                        a: sizing::alpha(block.rel, config),
                        ..tag.color
                    },
                    material: sizing::material(block.rel, config),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            strategy = ?config.strategy,
            placements = placements.len(),
            connections = connections.len(),
            "layout pass complete"
        );

        Layout {
            placements,
            connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classifier, Family};
    use crate::model::Vec3;

    fn children() -> Vec<FileNode> {
        let mut nodes: Vec<FileNode> = [
            ("a.jpg", 9_000),
            ("b.png", 7_000),
            ("c.mp4", 50_000),
            ("d.rs", 300),
            ("e.txt", 20),
            ("f.zip", 1_200),
        ]
        .iter()
        .map(|(name, size)| FileNode::leaf(PathBuf::from("/r").join(name), *size))
        .collect();
        nodes.push(FileNode::directory(
            PathBuf::from("/r/sub"),
            vec![FileNode::leaf(PathBuf::from("/r/sub/x.bin"), 4_000)],
        ));
        nodes.push(FileNode::directory(
            PathBuf::from("/r/other"),
            vec![FileNode::leaf(PathBuf::from("/r/other/y.bin"), 600)],
        ));
        nodes
    }

    fn items(nodes: &[FileNode]) -> Vec<LayoutItem<'_>> {
        let classifier = Classifier::default();
        let mut batch = classifier.begin_batch();
        nodes
            .iter()
            .map(|node| LayoutItem {
                node,
                tag: classifier.classify(node, &mut batch),
            })
            .collect()
    }

    fn engine(strategy: LayoutStrategy) -> LayoutEngine {
        LayoutEngine::new(LayoutConfig {
            strategy,
            ..LayoutConfig::default()
        })
    }

    fn min_centre_distance(positions: &[Vec3]) -> f32 {
        let mut min = f32::INFINITY;
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                min = min.min((a.x - b.x).hypot(a.z - b.z));
            }
        }
        min
    }

    #[test]
    fn empty_items_give_empty_layout() {
        let layout = LayoutEngine::default().layout(&[], &Marks::default());
        assert!(layout.is_empty());
        assert!(layout.connections.is_empty());
    }

    #[test]
    fn single_item_is_the_hub() {
        let nodes = vec![FileNode::leaf(PathBuf::from("/r/only.pdf"), 10)];
        let layout = LayoutEngine::default().layout(&items(&nodes), &Marks::default());
        assert_eq!(layout.len(), 1);
        let hub = &layout.placements[0];
        assert_eq!(hub.position.horizontal_radius(), 0.0);
        assert_eq!(hub.rel, 1.0);
        assert!(layout.connections.is_empty());
    }

    #[test]
    fn records_are_largest_first_with_decreasing_rel() {
        let nodes = children();
        let layout = LayoutEngine::default().layout(&items(&nodes), &Marks::default());
        assert_eq!(layout.len(), nodes.len());
        assert_eq!(layout.placements[0].path, PathBuf::from("/r/c.mp4"));
        for pair in layout.placements.windows(2) {
            assert!(pair[0].rel >= pair[1].rel);
        }
        assert_eq!(layout.connections.len(), nodes.len() - 1);
    }

    #[test]
    fn layout_is_deterministic() {
        let nodes = children();
        for strategy in [
            LayoutStrategy::FamilyArms,
            LayoutStrategy::Grid,
            LayoutStrategy::Radial,
            LayoutStrategy::Rooms,
        ] {
            let engine = engine(strategy);
            let first = engine.layout(&items(&nodes), &Marks::default());
            let second = engine.layout(&items(&nodes), &Marks::default());
            assert_eq!(first, second, "{strategy:?}");
        }
    }

    #[test]
    fn marks_only_change_flags() {
        let nodes = children();
        let engine = LayoutEngine::default();
        let plain = engine.layout(&items(&nodes), &Marks::default());

        let mut marks = Marks::default();
        marks.selected.insert(PathBuf::from("/r/d.rs"));
        marks.matched.insert(PathBuf::from("/r/sub"));
        let marked = engine.layout(&items(&nodes), &marks);

        for (a, b) in plain.placements.iter().zip(&marked.placements) {
            assert_eq!(a.position, b.position);
            assert_eq!(b.selected, b.path == PathBuf::from("/r/d.rs"));
            assert_eq!(b.matched, b.path == PathBuf::from("/r/sub"));
        }
    }

    #[test]
    fn colour_alpha_tracks_rel() {
        let nodes = children();
        let engine = LayoutEngine::default();
        let layout = engine.layout(&items(&nodes), &Marks::default());
        let hub = &layout.placements[0];
        assert!((hub.color.a - engine.config().max_alpha).abs() < 1e-6);
        let smallest = layout.placements.last().unwrap();
        assert!(smallest.color.a < hub.color.a);
        assert!(smallest.color.a >= engine.config().min_alpha);
    }

    #[test]
    fn grid_and_radial_keep_a_cell_apart() {
        let nodes = children();
        let cell = LayoutConfig::default().max_block + LayoutConfig::default().spacing;
        for strategy in [LayoutStrategy::Grid, LayoutStrategy::Radial] {
            let layout = engine(strategy).layout(&items(&nodes), &Marks::default());
            let positions: Vec<Vec3> = layout.placements.iter().map(|p| p.position).collect();
            assert!(min_centre_distance(&positions) >= cell - 1e-3, "{strategy:?}");
        }
    }

    #[test]
    fn rooms_puts_folders_outside_the_file_grid() {
        let nodes = children();
        let cfg = LayoutConfig {
            strategy: LayoutStrategy::Rooms,
            ..LayoutConfig::default()
        };
        let layout = LayoutEngine::new(cfg.clone()).layout(&items(&nodes), &Marks::default());

        let files = layout.placements.iter().filter(|p| p.family != Family::Folder).count();
        let inner = grid::clearance(files, &cfg) + grid::cell(&cfg);
        let folder_radii: Vec<f32> = layout
            .placements
            .iter()
            .filter(|p| p.family == Family::Folder)
            .map(|p| p.position.horizontal_radius())
            .collect();
        assert_eq!(folder_radii.len(), 2);
        for r in &folder_radii {
            assert!(*r >= inner - 1e-3);
        }
        for pair in folder_radii.windows(2) {
            assert!(pair[0] >= pair[1] - 1e-3);
        }
    }
}
