/// Concentric rings around the largest block.
///
/// Ring `k` has radius `k · cell` and holds `floor(2πr / cell)` blocks, so
/// neighbouring centres on a ring are at least one cell apart.
use super::grid::cell;
use super::sizing::Block;
use crate::config::LayoutConfig;
use crate::model::Vec3;
use std::f32::consts::TAU;

pub fn place(blocks: &[Block<'_>], config: &LayoutConfig) -> Vec<Vec3> {
    let Some((centre, rest)) = blocks.split_first() else {
        return Vec::new();
    };
    let cell = cell(config);
    let mut positions = Vec::with_capacity(blocks.len());
    positions.push(Vec3::new(0.0, centre.height / 2.0, 0.0));

    let mut ring = 1usize;
    let mut remaining = rest;
    while !remaining.is_empty() {
        let radius = ring as f32 * cell;
        let capacity = ring_capacity(ring);
        let take = capacity.min(remaining.len());
        let (on_ring, rest) = remaining.split_at(take);
        for (slot, block) in on_ring.iter().enumerate() {
            let angle = TAU * slot as f32 / capacity as f32;
            positions.push(Vec3::new(
                radius * angle.cos(),
                block.height / 2.0,
                radius * angle.sin(),
            ));
        }
        remaining = rest;
        ring += 1;
    }
    positions
}

/// Blocks that fit on ring `k`. The cell size cancels out of
/// `2π · k · cell / cell`.
pub fn ring_capacity(ring: usize) -> usize {
    ((TAU * ring as f32).floor() as usize).max(1)
}
