/// Family arms, the default strategy.
///
/// The largest block sits alone at the origin (the hub). Every family gets a
/// spiral arm starting at an evenly spaced angle; members walk outward and
/// upward along it in descending size order. Steps are sized from the block
/// itself, so big blocks push their neighbours further along the arm.
use super::sizing::Block;
use crate::config::LayoutConfig;
use crate::model::{Connection, Vec3};
use std::collections::BTreeMap;
use std::f32::consts::{PI, TAU};

/// Below this radius the step formula is meaningless.
const MIN_STEP_RADIUS: f32 = 1e-3;

/// Centre of every block, in the order of `blocks` (largest first).
pub fn place(blocks: &[Block<'_>], config: &LayoutConfig) -> Vec<Vec3> {
    let mut positions = vec![Vec3::ZERO; blocks.len()];
    let Some(hub) = blocks.first() else {
        return positions;
    };
    positions[0] = Vec3::new(0.0, hub.height / 2.0, 0.0);

    // Arms are keyed by family name, so their order never depends on which
    // family happens to hold the largest file.
    let mut arms: BTreeMap<&'static str, Vec<usize>> = BTreeMap::new();
    for (i, block) in blocks.iter().enumerate() {
        arms.entry(block.family.as_str()).or_default().push(i);
    }
    let arm_count = arms.len().max(1);

    for (arm, members) in arms.values().enumerate() {
        let mut angle = TAU * arm as f32 / arm_count as f32;
        let mut radius = config.arm_base_radius * config.max_block;
        let mut turns = 0.0f32;

        for &i in members.iter().filter(|&&i| i != 0) {
            let block = &blocks[i];
            let gap = config.gap_base + (1.0 - block.rel) * config.gap_range;
            let step = if radius > MIN_STEP_RADIUS {
                ((block.side + gap) / radius).max(config.arm_spread)
            } else {
                config.arm_spread
            }
            .min(PI);
            let drift = (block.side + config.spacing) * config.arm_drift;

            angle += step;
            radius += drift;
            turns += step / TAU;
            let elevation = turns * config.arm_pitch * config.max_block;

            positions[i] = Vec3::new(
                radius * angle.cos(),
                block.height / 2.0 + elevation,
                radius * angle.sin(),
            );
        }
    }
    positions
}

/// Hub-to-block edges in placement order, at most `max_connections`.
pub fn connections(
    blocks: &[Block<'_>],
    positions: &[Vec3],
    max_connections: usize,
) -> Vec<Connection> {
    let Some(&hub) = positions.first() else {
        return Vec::new();
    };
    blocks
        .iter()
        .zip(positions)
        .skip(1)
        .take(max_connections)
        .map(|(block, &to)| Connection {
            from: hub,
            to,
            path: block.node.path.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Family;
    use crate::layout::sizing;
    use crate::model::FileNode;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn nodes(specs: &[(u64, Family)]) -> Vec<FileNode> {
        specs
            .iter()
            .enumerate()
            .map(|(i, (size, _))| FileNode::leaf(PathBuf::from(format!("/r/n{i:03}")), *size))
            .collect()
    }

    fn blocks<'a>(
        nodes: &'a [FileNode],
        specs: &[(u64, Family)],
        cfg: &LayoutConfig,
    ) -> Vec<Block<'a>> {
        let max = nodes.iter().map(|n| n.size_bytes).max().unwrap_or(0);
        let mut out: Vec<Block<'a>> = nodes
            .iter()
            .zip(specs)
            .enumerate()
            .map(|(index, (node, (_, family)))| {
                let rel = sizing::rel(node.size_bytes, max);
                Block {
                    index,
                    node,
                    family: *family,
                    rel,
                    side: sizing::side(rel, cfg),
                    height: sizing::height(node, rel, cfg),
                }
            })
            .collect();
        out.sort_by(|a, b| {
            b.node
                .size_bytes
                .cmp(&a.node.size_bytes)
                .then_with(|| a.node.name.cmp(&b.node.name))
        });
        out
    }

    /// (radius, elevation) of every non-hub block on each family's arm.
    fn arm_tracks(blocks: &[Block<'_>], positions: &[Vec3]) -> Vec<Vec<(f32, f32)>> {
        let mut arms: BTreeMap<&str, Vec<(f32, f32)>> = BTreeMap::new();
        for (b, p) in blocks.iter().zip(positions).skip(1) {
            arms.entry(b.family.as_str())
                .or_default()
                .push((p.horizontal_radius(), p.y - b.height / 2.0));
        }
        arms.into_values().collect()
    }

    #[test]
    fn single_item_is_hub_only() {
        let cfg = LayoutConfig::default();
        let specs = [(100, Family::Image)];
        let ns = nodes(&specs);
        let bs = blocks(&ns, &specs, &cfg);
        let pos = place(&bs, &cfg);
        assert_eq!(pos.len(), 1);
        assert_eq!(pos[0].horizontal_radius(), 0.0);
        assert!(connections(&bs, &pos, 64).is_empty());
    }

    #[test]
    fn empty_input() {
        let cfg = LayoutConfig::default();
        assert!(place(&[], &cfg).is_empty());
        assert!(connections(&[], &[], 64).is_empty());
    }

    #[test]
    fn arms_start_at_distinct_angles() {
        let cfg = LayoutConfig::default();
        let specs = [(1000, Family::Video), (50, Family::Image), (40, Family::Text)];
        let ns = nodes(&specs);
        let bs = blocks(&ns, &specs, &cfg);
        let pos = place(&bs, &cfg);
        let a = pos[1].z.atan2(pos[1].x);
        let b = pos[2].z.atan2(pos[2].x);
        assert!((a - b).abs() > 0.5, "arms overlap at {a} and {b}");
    }

    #[test]
    fn connections_are_capped() {
        let cfg = LayoutConfig::default();
        let specs: Vec<(u64, Family)> = (1..=10).map(|i| (i * 10, Family::Code)).collect();
        let ns = nodes(&specs);
        let bs = blocks(&ns, &specs, &cfg);
        let pos = place(&bs, &cfg);
        let edges = connections(&bs, &pos, 4);
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|e| e.from == pos[0]));
        assert_eq!(edges[0].path, bs[1].node.path);
    }

    #[test]
    fn tiny_base_radius_clamps_step() {
        let cfg = LayoutConfig {
            arm_base_radius: 0.0,
            ..LayoutConfig::default()
        };
        let specs = [(100, Family::Code), (90, Family::Code), (80, Family::Code)];
        let ns = nodes(&specs);
        let bs = blocks(&ns, &specs, &cfg);
        let pos = place(&bs, &cfg);
        assert!(pos.iter().all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite()));
    }

    fn family_strategy() -> impl Strategy<Value = Family> {
        prop::sample::select(Family::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn hub_at_origin_and_arms_monotonic(
            specs in prop::collection::vec((0u64..10_000_000, family_strategy()), 1..80)
        ) {
            let cfg = LayoutConfig::default();
            let ns = nodes(&specs);
            let bs = blocks(&ns, &specs, &cfg);
            let pos = place(&bs, &cfg);

            prop_assert_eq!(pos[0].horizontal_radius(), 0.0);
            for track in arm_tracks(&bs, &pos) {
                for pair in track.windows(2) {
                    prop_assert!(pair[1].0 > pair[0].0 - 1e-3, "radius shrank: {:?}", pair);
                    prop_assert!(pair[1].1 >= pair[0].1 - 1e-3, "elevation fell: {:?}", pair);
                }
            }
        }
    }
}
